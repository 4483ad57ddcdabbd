//! The three searches built on the engine.
//!
//! - [`ring`]: tables synchronizing rings of several lengths at once
//! - [`exp_ring`]: tables that renormalize onto themselves on rings
//! - [`embed`]: verification that a fixed table collapses onto an aggregate one

pub mod embed;
pub mod exp_ring;
pub mod ring;

pub use embed::{Embedder, Embedding, RejectReason, Rejection, SymbolRenamer, Verification};
pub use exp_ring::{ExpRingSearch, ExpansionSearch};
pub use ring::{RingProgress, RingSearch};
