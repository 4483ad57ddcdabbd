//! Shared test utilities for the fssp workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: known solution tables and the configurations that find them
//! - [`sink`]: [`MemorySink`](sink::MemorySink), an in-memory result sink
//! - [`workspace`]: [`TestDir`](workspace::TestDir) for record and config files

pub mod fixtures;
pub mod sink;
pub mod workspace;
