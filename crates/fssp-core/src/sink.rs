//! Where search results go.

use std::fmt;

use crate::RuleTable;

/// Name and parameters of a search run, in the order they are recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    name: String,
    entries: Vec<(String, String)>,
}

impl RunParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Append a parameter rendered with [`fmt::Display`].
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.entries.push((key.into(), value.to_string()));
        self
    }

    /// Append a parameter rendered as a quoted string.
    pub fn with_text(self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.with(key, format!("'{value}'"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Durable consumer of search results.
///
/// `accept` must not return before the table is on stable storage: a search
/// may be killed at any point, and every accepted table has to survive it.
pub trait ResultSink {
    type Error;

    /// Record the run parameters before any table.
    fn begin(&mut self, params: &RunParams) -> Result<(), Self::Error>;

    /// Persist one table; returns its 1-based id within the run.
    fn accept(&mut self, table: &RuleTable) -> Result<u64, Self::Error>;

    /// Close the run.
    fn end(&mut self) -> Result<(), Self::Error>;
}
