//! Command implementations for fssp-cli

pub mod config;
pub mod embed;
pub mod search;
pub mod show;
pub mod simulate;

pub use config::{run, run_config};
pub use embed::run_embed;
pub use search::{run_exp_ring, run_ring};
pub use show::run_show;
pub use simulate::run_simulate;
