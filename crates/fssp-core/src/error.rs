//! Error types for fssp-core

/// Result type for fssp-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building searches or parsing their inputs.
///
/// Contradictions found while searching are not errors; they only prune the
/// branch that produced them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Character that cannot be used as a cell state
    #[error(
        "Invalid symbol {symbol:?}: states are printable ASCII characters \
         other than quotes, ':', '|', ',', '{{' and '}}'"
    )]
    InvalidSymbol { symbol: char },

    /// Q or F used where only working states are allowed
    #[error("Reserved symbol {symbol} cannot be used as a working state")]
    ReservedSymbol { symbol: char },

    /// The same state listed twice
    #[error("Duplicate symbol {symbol} in alphabet")]
    DuplicateSymbol { symbol: char },

    /// Rule table keys of different lengths
    #[error("Window {window} has width {found}, expected {expected}")]
    MixedWidths {
        window: String,
        expected: usize,
        found: usize,
    },

    /// Granularity that does not divide a length it must divide
    #[error("Granularity {gran} does not divide the {what} ({len})")]
    Granularity {
        gran: usize,
        what: &'static str,
        len: usize,
    },

    /// Empty table where a window width is required
    #[error("Rule table is empty; its window width cannot be determined")]
    EmptyTable,

    /// Seed table that does not preserve quiescence
    #[error("Rule table maps the quiescent window {window} to {symbol}")]
    NotQuiescent { window: String, symbol: char },

    /// Two tables disagree on a window
    #[error("Conflicting definitions for {window}: {existing} and {proposed}")]
    Conflict {
        window: String,
        existing: char,
        proposed: char,
    },

    /// The pool of fresh aggregate symbols ran out
    #[error("Renaming pool exhausted while renaming block {block}")]
    RenamePoolExhausted { block: String },

    /// Malformed rule table literal
    #[error("Failed to parse rule table: {message}")]
    ParseTable { message: String },

    /// Search parameter outside its domain
    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },
}

impl Error {
    pub fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseTable {
            message: message.into(),
        }
    }
}
