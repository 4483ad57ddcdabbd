//! Cell states and alphabets.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single cell state.
///
/// States are printable ASCII characters. Two of them are distinguished:
/// [`Symbol::QUIESCENT`] (`Q`) and [`Symbol::FIRING`] (`F`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Symbol(u8);

impl Symbol {
    /// The rest state.
    pub const QUIESCENT: Symbol = Symbol(b'Q');
    /// The synchronized terminal state.
    pub const FIRING: Symbol = Symbol(b'F');

    /// Create a symbol from a character.
    ///
    /// Characters used by the table literal syntax are rejected so that any
    /// table can be rendered and parsed back.
    pub fn new(c: char) -> Result<Self> {
        if !c.is_ascii_graphic() || matches!(c, '\'' | '"' | ':' | '|' | ',' | '{' | '}') {
            return Err(Error::InvalidSymbol { symbol: c });
        }
        Ok(Self(c as u8))
    }

    /// Parse every character of `s` as a symbol.
    pub fn parse_many(s: &str) -> Result<Vec<Symbol>> {
        s.chars().map(Symbol::new).collect()
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }

    pub fn is_quiescent(self) -> bool {
        self == Self::QUIESCENT
    }

    pub fn is_firing(self) -> bool {
        self == Self::FIRING
    }
}

impl TryFrom<char> for Symbol {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        Self::new(c)
    }
}

impl From<Symbol> for char {
    fn from(symbol: Symbol) -> char {
        symbol.as_char()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Render a list of symbols as a plain string, e.g. `QGA`.
pub fn render_symbols(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.as_char()).collect()
}

/// The non-firing states a search may assign, in the order it tries them.
///
/// Q is always present, F never is: firing is decided separately from the
/// choice among the other states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    non_firing: Vec<Symbol>,
}

impl Alphabet {
    /// Build an alphabet from working states; Q is tried after them.
    pub fn from_working(working: &[Symbol]) -> Result<Self> {
        for &symbol in working {
            if symbol.is_quiescent() || symbol.is_firing() {
                return Err(Error::ReservedSymbol {
                    symbol: symbol.as_char(),
                });
            }
        }
        let mut non_firing = working.to_vec();
        non_firing.push(Symbol::QUIESCENT);
        Self::checked(non_firing)
    }

    /// Build an alphabet from an explicit, ordered list of non-firing states.
    ///
    /// The list must contain Q and must not contain F.
    pub fn from_non_firing(states: &[Symbol]) -> Result<Self> {
        if let Some(f) = states.iter().find(|s| s.is_firing()) {
            return Err(Error::ReservedSymbol { symbol: f.as_char() });
        }
        if !states.contains(&Symbol::QUIESCENT) {
            return Err(Error::invalid(
                "states",
                format!("{} does not contain the quiescent state Q", render_symbols(states)),
            ));
        }
        Self::checked(states.to_vec())
    }

    fn checked(non_firing: Vec<Symbol>) -> Result<Self> {
        let mut seen = HashSet::new();
        for &symbol in &non_firing {
            if !seen.insert(symbol) {
                return Err(Error::DuplicateSymbol {
                    symbol: symbol.as_char(),
                });
            }
        }
        Ok(Self { non_firing })
    }

    /// States tried when a window is hypothesized not to fire.
    pub fn non_firing(&self) -> &[Symbol] {
        &self.non_firing
    }

    /// Non-firing states other than Q, in order.
    pub fn working(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.non_firing.iter().copied().filter(|s| !s.is_quiescent())
    }

    /// The first working state, conventionally the initiator (general).
    pub fn initiator(&self) -> Option<Symbol> {
        self.working().next()
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        symbol.is_firing() || self.non_firing.contains(&symbol)
    }
}
