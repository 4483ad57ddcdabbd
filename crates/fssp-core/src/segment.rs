//! Segments of cells and the window algebra over them.
//!
//! A [`Segment`] is a row of cell states. Rule tables map fixed-width
//! segments (windows) to the next state of their center cell, so one step
//! of simulation shortens a segment by `width - 1` cells. Ring
//! configurations are simulated by unrolling them first.
//!
//! # Renormalization
//!
//! [`Segment::exponentiate`] expands a coarse segment into its fine form for
//! base `b` and granularity `g`: every `g`-block is followed by `b - 1`
//! padding blocks, all Q, or all F when the segment starts with an F-block.
//!
//! ```text
//! RST  base 3, gran 1  ->  RQQSQQTQQ
//! RSTU base 2, gran 2  ->  RSQQTUQQ
//! FFF  base 2, gran 1  ->  FFFFFF
//! ```
//!
//! [`Segment::contract`] keeps one block out of every `b` and undoes it.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, RuleTable, Symbol};

/// An ordered row of cell states.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Segment(Vec<Symbol>);

impl Segment {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }

    /// `len` copies of `symbol`.
    pub fn uniform(symbol: Symbol, len: usize) -> Self {
        Self(vec![symbol; len])
    }

    /// A ring of `len` cells at rest except the initiator in cell 0.
    pub fn ring_seed(initiator: Symbol, len: usize) -> Self {
        let mut cells = vec![Symbol::QUIESCENT; len];
        if let Some(first) = cells.first_mut() {
            *first = initiator;
        }
        Self(cells)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn first(&self) -> Option<Symbol> {
        self.0.first().copied()
    }

    /// Copy of the cells in `range`.
    pub fn slice(&self, range: Range<usize>) -> Segment {
        Self(self.0[range].to_vec())
    }

    /// True when the segment is non-empty and every cell is `symbol`.
    pub fn is_uniform(&self, symbol: Symbol) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&s| s == symbol)
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        self.0.iter().filter(|&&s| s == symbol).count()
    }

    pub fn reversed(&self) -> Segment {
        Self(self.0.iter().rev().copied().collect())
    }

    /// The smaller of the segment and its mirror image.
    pub fn canonical(&self) -> Segment {
        let reversed = self.reversed();
        if reversed < *self { reversed } else { self.clone() }
    }

    /// Iterate over `gran`-sized blocks.
    pub fn blocks(&self, gran: usize) -> impl Iterator<Item = &[Symbol]> {
        self.0.chunks(gran)
    }

    /// All distinct windows of `width` cells, stepped by `gran`.
    ///
    /// # Panics
    ///
    /// Panics when `gran` divides neither the segment length nor
    /// `width - gran`; drivers validate their parameters so this is a
    /// contract violation.
    pub fn windows(&self, width: usize, gran: usize) -> BTreeSet<Segment> {
        assert!(gran > 0 && width >= gran, "window width {width} below granularity {gran}");
        assert!(
            self.len() % gran == 0 && (width - gran) % gran == 0,
            "granularity {gran} does not divide segment length {} and nullity {}",
            self.len(),
            width - gran
        );
        if self.len() < width {
            return BTreeSet::new();
        }
        (0..=self.len() - width)
            .step_by(gran)
            .map(|i| self.slice(i..i + width))
            .collect()
    }

    /// Unroll a ring configuration by appending its first `null` cells,
    /// cycling the ring when it is shorter than `null`.
    pub fn unroll_ring(&self, null: usize) -> Segment {
        let mut cells = self.0.clone();
        cells.extend(self.0.iter().copied().cycle().take(null));
        Self(cells)
    }

    /// Simulate `steps` steps under `table`.
    ///
    /// Returns `None` as soon as a window is unmapped, or when the segment
    /// is too short to hold a single window.
    pub fn advance(&self, table: &RuleTable, steps: usize) -> Option<Segment> {
        let width = table.width();
        let mut cells = self.0.clone();
        for _ in 0..steps {
            if width == 0 || cells.len() < width {
                return None;
            }
            cells = cells
                .windows(width)
                .map(|w| table.get_cells(w))
                .collect::<Option<Vec<_>>>()?;
        }
        Some(Self(cells))
    }

    /// Expand to the fine form for `base` at granularity `gran`.
    pub fn exponentiate(&self, base: usize, gran: usize) -> Segment {
        let firing = self.0.len() >= gran && self.0[..gran].iter().all(|s| s.is_firing());
        let pad = if firing { Symbol::FIRING } else { Symbol::QUIESCENT };
        let mut cells = Vec::with_capacity(self.len() * base);
        for block in self.blocks(gran) {
            cells.extend_from_slice(block);
            cells.extend(std::iter::repeat_n(pad, (base - 1) * gran));
        }
        Self(cells)
    }

    /// Keep one `gran`-block out of every `base`.
    pub fn contract(&self, base: usize, gran: usize) -> Segment {
        let cells = self
            .0
            .chunks(gran)
            .step_by(base)
            .flat_map(|block| block.iter().copied())
            .collect();
        Self(cells)
    }
}

impl From<Vec<Symbol>> for Segment {
    fn from(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }
}

impl FromStr for Segment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Symbol::parse_many(s).map(Self)
    }
}

impl TryFrom<String> for Segment {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Segment> for String {
    fn from(segment: Segment) -> String {
        segment.to_string()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.0 {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}
