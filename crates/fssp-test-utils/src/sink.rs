//! In-memory [`ResultSink`].

use std::convert::Infallible;

use fssp_core::{ResultSink, RuleTable, RunParams};

/// Collects everything a search hands to its sink.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub params: Option<RunParams>,
    pub tables: Vec<RuleTable>,
    pub ended: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for MemorySink {
    type Error = Infallible;

    fn begin(&mut self, params: &RunParams) -> Result<(), Infallible> {
        assert!(self.params.is_none(), "MemorySink::begin called twice");
        self.params = Some(params.clone());
        Ok(())
    }

    fn accept(&mut self, table: &RuleTable) -> Result<u64, Infallible> {
        assert!(self.params.is_some(), "MemorySink::accept before begin");
        assert!(!self.ended, "MemorySink::accept after end");
        self.tables.push(table.clone());
        Ok(self.tables.len() as u64)
    }

    fn end(&mut self) -> Result<(), Infallible> {
        self.ended = true;
        Ok(())
    }
}
