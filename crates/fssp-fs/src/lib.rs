//! Filesystem layer for fssp searches
//!
//! Provides the durable [`RecordFile`] result sink, loading of record files
//! for inspection and resumption, and format-agnostic configuration files.

pub mod config;
pub mod error;
pub mod io;
pub mod records;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use records::{
    INIT_TABLE_KEY, RecordFile, RecordLog, load_records, next_record_path, record_path,
};
