//! Partial rule tables.
//!
//! A [`RuleTable`] maps windows of one fixed width to the next state of the
//! window's center cell. Tables only ever grow: defining a window that is
//! already mapped to a different state is a [`Conflict`], never an update.
//!
//! Tables render as a literal sorted by window, which is also the persisted
//! form of search results:
//!
//! ```text
//! {'AQA': 'F', 'GQQ': 'A', 'QQQ': 'Q'}
//! ```
//!
//! The compact form `AQA:F|GQQ:A|QQQ:Q` parses to the same table. The empty
//! literal `{}` parses to an unsized table: it has no rules to take a width
//! from, and drivers treat it as no seed at all.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Segment, Symbol};

impl Borrow<[Symbol]> for Segment {
    fn borrow(&self) -> &[Symbol] {
        self.symbols()
    }
}

/// Attempt to redefine a window with a different state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub window: Segment,
    pub existing: Symbol,
    pub proposed: Symbol,
}

impl From<Conflict> for Error {
    fn from(conflict: Conflict) -> Self {
        Error::Conflict {
            window: conflict.window.to_string(),
            existing: conflict.existing.as_char(),
            proposed: conflict.proposed.as_char(),
        }
    }
}

/// Append-only partial map from windows to next states.
///
/// A width of 0 marks the unsized empty table parsed from `{}`; it holds no
/// rules and none can be defined in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleTable {
    width: usize,
    rules: BTreeMap<Segment, Symbol>,
}

impl RuleTable {
    /// An empty table over windows of `width` cells.
    pub fn new(width: usize) -> Self {
        assert!(width > 0, "rule table width must be positive");
        Self {
            width,
            rules: BTreeMap::new(),
        }
    }

    /// The empty table parsed from `{}`, whose width is not known yet.
    pub fn blank() -> Self {
        Self {
            width: 0,
            rules: BTreeMap::new(),
        }
    }

    /// False only for [`RuleTable::blank`].
    pub fn is_sized(&self) -> bool {
        self.width > 0
    }

    /// The table `{Q^width: Q}`.
    pub fn quiescent(width: usize) -> Self {
        let mut table = Self::new(width);
        table
            .rules
            .insert(Segment::uniform(Symbol::QUIESCENT, width), Symbol::QUIESCENT);
        table
    }

    /// Build a table from rules, taking the width from the first window.
    ///
    /// No rules at all give the [blank](RuleTable::blank) table.
    pub fn from_rules(rules: impl IntoIterator<Item = (Segment, Symbol)>) -> Result<Self> {
        let mut rules = rules.into_iter().peekable();
        let Some(width) = rules.peek().map(|(w, _)| w.len()) else {
            return Ok(Self::blank());
        };
        if width == 0 {
            return Err(Error::parse("windows must not be empty"));
        }
        let mut table = Self::new(width);
        for (window, symbol) in rules {
            if window.len() != width {
                return Err(Error::MixedWidths {
                    window: window.to_string(),
                    expected: width,
                    found: window.len(),
                });
            }
            table.define(window, symbol)?;
        }
        Ok(table)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cells a window reaches beyond its center: `width - 1`.
    pub fn null(&self) -> usize {
        self.width.saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, window: &Segment) -> Option<Symbol> {
        self.rules.get(window).copied()
    }

    pub(crate) fn get_cells(&self, cells: &[Symbol]) -> Option<Symbol> {
        self.rules.get(cells).copied()
    }

    pub fn contains(&self, window: &Segment) -> bool {
        self.rules.contains_key(window)
    }

    /// Define `window` to map to `symbol`.
    ///
    /// Defining a window again with the same state is a no-op.
    pub fn define(&mut self, window: Segment, symbol: Symbol) -> std::result::Result<(), Conflict> {
        assert_eq!(window.len(), self.width, "window {window} has the wrong width");
        match self.rules.get(&window) {
            Some(&existing) if existing != symbol => Err(Conflict {
                window,
                existing,
                proposed: symbol,
            }),
            Some(_) => Ok(()),
            None => {
                self.rules.insert(window, symbol);
                Ok(())
            }
        }
    }

    /// Add every rule of `other`; the tables must agree where they overlap.
    pub fn merge(&mut self, other: &RuleTable) -> Result<()> {
        if !other.is_sized() {
            return Ok(());
        }
        if other.width != self.width {
            return Err(Error::MixedWidths {
                window: other
                    .rules
                    .keys()
                    .next()
                    .map(|w| w.to_string())
                    .unwrap_or_default(),
                expected: self.width,
                found: other.width,
            });
        }
        for (window, &symbol) in &other.rules {
            self.define(window.clone(), symbol)?;
        }
        Ok(())
    }

    /// Make sure the all-Q window maps to Q.
    pub fn ensure_quiescent(&mut self) -> Result<()> {
        if !self.is_sized() {
            return Err(Error::EmptyTable);
        }
        let window = Segment::uniform(Symbol::QUIESCENT, self.width);
        self.define(window, Symbol::QUIESCENT)
            .map_err(|conflict| Error::NotQuiescent {
                window: conflict.window.to_string(),
                symbol: conflict.existing.as_char(),
            })
    }

    /// Rules in window order.
    pub fn iter(&self) -> impl Iterator<Item = (&Segment, Symbol)> {
        self.rules.iter().map(|(w, &s)| (w, s))
    }

    /// Every state appearing in a window or as an image.
    pub fn states(&self) -> BTreeSet<Symbol> {
        self.rules
            .iter()
            .flat_map(|(w, &s)| w.symbols().iter().copied().chain(std::iter::once(s)))
            .collect()
    }

    /// True when every one of `working` appears somewhere in the table.
    pub fn uses_all(&self, working: impl IntoIterator<Item = Symbol>) -> bool {
        let states = self.states();
        working.into_iter().all(|s| states.contains(&s))
    }

    /// Rules grouped by how many Q cells their window holds.
    ///
    /// Index `k` of the result lists the windows with exactly `k` Q cells.
    pub fn distribution(&self) -> Vec<Vec<(&Segment, Symbol)>> {
        let mut groups = vec![Vec::new(); self.width + 1];
        for (window, symbol) in self.iter() {
            groups[window.count(Symbol::QUIESCENT)].push((window, symbol));
        }
        groups
    }

    /// The compact `w:s|w:s` rendering.
    pub fn to_compact(&self) -> String {
        self.rules
            .iter()
            .map(|(w, s)| format!("{w}:{s}"))
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (window, symbol)) in self.rules.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{window}': '{symbol}'")?;
        }
        write!(f, "}}")
    }
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    for quote in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}

fn parse_entry(entry: &str) -> Result<(Segment, Symbol)> {
    let (window, symbol) = entry
        .split_once(':')
        .ok_or_else(|| Error::parse(format!("entry {entry:?} has no ':'")))?;
    let window: Segment = unquote(window).parse()?;
    let mut chars = unquote(symbol).chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok((window, Symbol::new(c)?)),
        _ => Err(Error::parse(format!(
            "image of {window} must be a single state, got {symbol:?}"
        ))),
    }
}

impl FromStr for RuleTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let entries: Vec<&str> = if let Some(rest) = s.strip_prefix('{') {
            rest.strip_suffix('}')
                .ok_or_else(|| Error::parse("missing closing '}'"))?
                .split(',')
                .collect()
        } else {
            s.split('|').collect()
        };
        let rules = entries
            .into_iter()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(parse_entry)
            .collect::<Result<Vec<_>>>()?;
        Self::from_rules(rules)
    }
}

impl TryFrom<String> for RuleTable {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<RuleTable> for String {
    fn from(table: RuleTable) -> String {
        table.to_string()
    }
}
