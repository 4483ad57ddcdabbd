//! Verification that a fixed table collapses onto an aggregate table.
//!
//! Blocks of `gran` base states are renamed to single aggregate states. The
//! closure of the seed segments is walked breadth first; for every window
//! `w` in it, running the base table `base * stride` steps on the
//! exponentiated window must give the exponentiation of what `stride` steps
//! give on `w` itself. When every window passes, the renamed windows and
//! their renamed images form the aggregate table.

use std::collections::BTreeMap;

use crate::config::EmbedConfig;
use crate::{Error, Result, RuleTable, Segment, Symbol, WindowQueue};

/// Bijective renaming of `gran`-blocks to aggregate states.
///
/// The all-Q and all-F blocks are always renamed to Q and F. Other blocks
/// take the next unused symbol from the pool the first time they are seen.
#[derive(Debug, Clone)]
pub struct SymbolRenamer {
    gran: usize,
    pool: std::vec::IntoIter<Symbol>,
    names: BTreeMap<Segment, Symbol>,
}

impl SymbolRenamer {
    /// # Errors
    ///
    /// Returns an error when the pool repeats a symbol or contains Q or F.
    pub fn new(gran: usize, pool: &[Symbol]) -> Result<Self> {
        let mut names = BTreeMap::new();
        names.insert(Segment::uniform(Symbol::QUIESCENT, gran), Symbol::QUIESCENT);
        names.insert(Segment::uniform(Symbol::FIRING, gran), Symbol::FIRING);
        for (i, &symbol) in pool.iter().enumerate() {
            if symbol.is_quiescent() || symbol.is_firing() {
                return Err(Error::ReservedSymbol {
                    symbol: symbol.as_char(),
                });
            }
            if pool[..i].contains(&symbol) {
                return Err(Error::DuplicateSymbol {
                    symbol: symbol.as_char(),
                });
            }
        }
        Ok(Self {
            gran,
            pool: pool.to_vec().into_iter(),
            names,
        })
    }

    /// Rename every block of `segment`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenamePoolExhausted`] when a new block needs a name
    /// and the pool is empty.
    pub fn rename(&mut self, segment: &Segment) -> Result<Segment> {
        let mut renamed = Vec::with_capacity(segment.len() / self.gran);
        for block in segment.blocks(self.gran) {
            let block = Segment::new(block.to_vec());
            let symbol = match self.names.get(&block) {
                Some(&symbol) => symbol,
                None => {
                    let symbol = self.pool.next().ok_or_else(|| Error::RenamePoolExhausted {
                        block: block.to_string(),
                    })?;
                    tracing::trace!(%block, %symbol, "new aggregate state");
                    self.names.insert(block, symbol);
                    symbol
                }
            };
            renamed.push(symbol);
        }
        Ok(Segment::new(renamed))
    }

    /// Blocks named so far, Q and F blocks included.
    pub fn names(&self) -> &BTreeMap<Segment, Symbol> {
        &self.names
    }

    pub fn into_names(self) -> BTreeMap<Segment, Symbol> {
        self.names
    }
}

/// A successful embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedding {
    /// The aggregate table.
    pub table: RuleTable,
    /// Base block for each aggregate state.
    pub renaming: BTreeMap<Segment, Symbol>,
}

/// Why a window broke the embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The base table does not map a window met while simulating.
    Unmapped,
    /// The fine simulation disagrees with the exponentiated image.
    Mismatch { expected: Segment, found: Segment },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The closure window whose check failed.
    pub window: Segment,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Embedded(Embedding),
    Rejected(Rejection),
}

impl Verification {
    pub fn embedding(&self) -> Option<&Embedding> {
        match self {
            Verification::Embedded(embedding) => Some(embedding),
            Verification::Rejected(_) => None,
        }
    }
}

/// Checks a fixed base table against its renormalization.
#[derive(Debug, Clone)]
pub struct Embedder {
    table: RuleTable,
    seeds: Vec<Segment>,
    stride: usize,
    gran: usize,
    base: usize,
    pool: Vec<Symbol>,
}

impl Embedder {
    /// # Errors
    ///
    /// Returns an error when base is below 2, stride or granularity is
    /// zero, the base table is empty, there are no seeds, a seed is shorter
    /// than one aggregate window, the granularity does not divide the
    /// nullity or a seed length, or the renaming pool is malformed.
    pub fn new(config: &EmbedConfig) -> Result<Self> {
        if config.base < 2 {
            return Err(Error::invalid("base", format!("must be at least 2, got {}", config.base)));
        }
        if config.stride == 0 {
            return Err(Error::invalid("stride", "must be positive"));
        }
        if config.gran == 0 {
            return Err(Error::invalid("gran", "must be positive"));
        }
        if !config.base_table.is_sized() {
            return Err(Error::EmptyTable);
        }
        if config.seeds.is_empty() {
            return Err(Error::invalid("seeds", "at least one seed is required"));
        }
        let null = config.base_table.null() * config.stride;
        if null % config.gran != 0 {
            return Err(Error::Granularity {
                gran: config.gran,
                what: "nullity",
                len: null,
            });
        }
        for seed in &config.seeds {
            if seed.len() % config.gran != 0 {
                return Err(Error::Granularity {
                    gran: config.gran,
                    what: "seed length",
                    len: seed.len(),
                });
            }
            if seed.len() < null + config.gran {
                return Err(Error::invalid(
                    "seeds",
                    format!("{seed} is shorter than a window of {} cells", null + config.gran),
                ));
            }
        }
        SymbolRenamer::new(config.gran, &config.rename)?;

        Ok(Self {
            table: config.base_table.clone(),
            seeds: config.seeds.clone(),
            stride: config.stride,
            gran: config.gran,
            base: config.base,
            pool: config.rename.clone(),
        })
    }

    /// Base cells a window of the aggregate table reaches beyond its center.
    pub fn null(&self) -> usize {
        self.table.null() * self.stride
    }

    /// Walk the closure of the seeds.
    ///
    /// # Errors
    ///
    /// Only an exhausted renaming pool is an error; a window that fails to
    /// simulate or to match is reported as [`Verification::Rejected`].
    pub fn verify(&self) -> Result<Verification> {
        let null = self.null();
        let window_width = null + self.gran;
        let mut renamer = SymbolRenamer::new(self.gran, &self.pool)?;
        let mut aggregate = RuleTable::new(window_width / self.gran);
        let mut queue = WindowQueue::new(window_width, self.gran);
        for seed in &self.seeds {
            queue.enqueue(seed);
        }

        while let Some(window) = queue.dequeue() {
            let reject = |reason: RejectReason| -> Result<Verification> {
                tracing::debug!(%window, ?reason, "embedding rejected");
                Ok(Verification::Rejected(Rejection {
                    window: window.clone(),
                    reason,
                }))
            };

            let mut fine = window.exponentiate(self.base, self.gran);
            queue.enqueue(&fine);
            for _ in 0..self.base {
                match fine.advance(&self.table, self.stride) {
                    Some(next) => fine = next,
                    None => return reject(RejectReason::Unmapped),
                }
                queue.enqueue(&fine);
            }

            let Some(image) = window.advance(&self.table, self.stride) else {
                return reject(RejectReason::Unmapped);
            };
            let expected = image.exponentiate(self.base, self.gran);
            if fine != expected {
                return reject(RejectReason::Mismatch { expected, found: fine });
            }

            let key = renamer.rename(&window)?;
            let value = renamer.rename(&image)?;
            if let Some(symbol) = value.first() {
                aggregate.define(key, symbol)?;
            }
        }

        tracing::debug!(rules = aggregate.len(), "embedding verified");
        Ok(Verification::Embedded(Embedding {
            table: aggregate,
            renaming: renamer.into_names(),
        }))
    }
}
