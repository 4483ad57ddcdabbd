//! Rule-table search for the firing squad synchronization problem
//!
//! This crate finds local update rules for one-dimensional cellular
//! automata under which a ring of cells, started from a single initiator,
//! enters the firing state `F` on every cell at the same step:
//!
//! - **Window algebra**: [`Segment`] windowing, simulation and the
//!   exponentiation transform between a table and its renormalization
//! - **Partial tables**: append-only [`RuleTable`]s with insert-or-conflict
//!   semantics
//! - **Engine**: an explicit-stack [`Backtracker`] that refines partial
//!   tables under the misfire invariant and yields solutions lazily
//! - **Drivers**: [`RingSearch`], [`ExpRingSearch`] and [`Embedder`]
//!
//! # Architecture
//!
//! `fssp-core` does no I/O. Results leave through the [`ResultSink`] trait,
//! implemented on disk by `fssp-fs`:
//!
//! ```text
//!                 fssp-cli
//!                  |     |
//!            fssp-fs     |
//!                  |     |
//!                 fssp-core
//! ```
//!
//! # Example
//!
//! ```
//! use fssp_core::{RingSearch, RingSearchConfig, Symbol};
//!
//! let config = RingSearchConfig {
//!     lengths: vec![2, 4],
//!     states: Symbol::parse_many("QGA").unwrap(),
//!     initiator: None,
//!     symmetric: false,
//!     time_optimal: false,
//!     width: None,
//!     init_table: None,
//! };
//! let mut search = RingSearch::start(&config).unwrap();
//! let table = search.next().expect("a two-state solution exists");
//! assert!(table.uses_all(Symbol::parse_many("GA").unwrap()));
//! ```

pub mod config;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod queue;
pub mod segment;
pub mod sink;
pub mod symbol;
pub mod table;
pub mod trace;

pub use config::{
    EmbedConfig, ExpRingSearchConfig, RingSearchConfig, RunConfig, default_rename_pool,
};
pub use drivers::{
    Embedder, Embedding, ExpRingSearch, ExpansionSearch, RejectReason, Rejection, RingProgress,
    RingSearch, SymbolRenamer, Verification,
};
pub use engine::{Backtracker, Choice, Firing, Problem, Refiner, SearchStats, Step, Symmetry};
pub use error::{Error, Result};
pub use queue::WindowQueue;
pub use segment::Segment;
pub use sink::{ResultSink, RunParams};
pub use symbol::{Alphabet, Symbol, render_symbols};
pub use table::{Conflict, RuleTable};
pub use trace::{RingTrace, TraceOutcome, simulate_ring};
