//! Search for self-renormalizing tables on rings.
//!
//! A table solves this search when one step of it, read at base `b`, is
//! reproduced by `b` steps of the same table on the exponentiated
//! configuration, and the seed ring reaches all-F under it. The outer
//! iterator walks the ring trajectory one coarse step at a time; every step
//! runs an [`ExpansionSearch`] that extends the table found so far until the
//! renormalization closure of the current configuration is consistent.

use std::collections::HashSet;

use crate::config::ExpRingSearchConfig;
use crate::engine::{
    Backtracker, Choice, Contradiction, Firing, Problem, Refiner, Resolution, SearchStats, Step,
    Symmetry,
};
use crate::{Alphabet, Error, Result, RuleTable, Segment, Symbol, WindowQueue};

/// Extend a table so that every window reachable from `seed` renormalizes.
#[derive(Debug, Clone)]
pub struct ExpansionSearch {
    seed: Segment,
    base: usize,
    refiner: Refiner,
}

impl ExpansionSearch {
    pub fn new(seed: Segment, base: usize, refiner: Refiner) -> Self {
        Self { seed, base, refiner }
    }

    /// Check the closure of the seed, stopping at the first undecided step.
    fn close(&self, table: &mut RuleTable) -> std::result::Result<Option<Choice>, Contradiction> {
        let resolution = self.refiner.define_segment(table, &self.seed, Firing::Permitted)?;
        if let Resolution::Branch(choice) = resolution {
            return Ok(Some(choice));
        }

        let mut queue = WindowQueue::new(table.width(), 1);
        queue.enqueue(&self.seed);
        while let Some(window) = queue.dequeue() {
            let image = table.get(&window).ok_or(Contradiction)?;
            let mut segment = window.exponentiate(self.base, 1);
            for _ in 1..self.base {
                let resolution = self.refiner.define_segment(table, &segment, Firing::Forbidden)?;
                if let Resolution::Branch(choice) = resolution {
                    return Ok(Some(choice));
                }
                queue.enqueue(&segment);
                segment = segment.advance(table, 1).ok_or(Contradiction)?;
            }
            self.refiner.close_end_window(table, &segment, image)?;
            queue.enqueue(&segment);
        }
        Ok(None)
    }
}

impl Problem for ExpansionSearch {
    type State = ();
    type Output = RuleTable;

    // Every node re-runs the closure from the seed: the table only grows,
    // so the windows already checked are settled again without branching.
    fn explore(&self, _: (), mut table: RuleTable) -> Step<(), RuleTable> {
        match self.close(&mut table) {
            Ok(None) => Step::Found(table),
            Ok(Some(choice)) => Step::Branch { state: (), choice },
            Err(Contradiction) => Step::Contradiction,
        }
    }
}

#[derive(Debug)]
struct Frame {
    cfg: Segment,
    search: Backtracker<ExpansionSearch>,
}

/// Cursor over renormalizing tables that synchronize the seed ring.
#[derive(Debug)]
pub struct ExpRingSearch {
    base: usize,
    null: usize,
    refiner: Refiner,
    frames: Vec<Frame>,
    seen: HashSet<Segment>,
    finished: SearchStats,
}

impl ExpRingSearch {
    /// Validate `config` and position the cursor before the first solution.
    ///
    /// # Errors
    ///
    /// Returns an error for a base below 2, a zero nullity or ring length,
    /// a malformed working alphabet, or a seed table of the wrong width.
    pub fn new(config: &ExpRingSearchConfig) -> Result<Self> {
        if config.base < 2 {
            return Err(Error::invalid("base", format!("must be at least 2, got {}", config.base)));
        }
        if config.null == 0 {
            return Err(Error::invalid("null", "must be positive"));
        }
        if config.init_len == 0 {
            return Err(Error::invalid("init_len", "must be positive"));
        }
        let alphabet = Alphabet::from_working(&config.working)?;
        let initiator = alphabet
            .initiator()
            .ok_or_else(|| Error::invalid("working", "at least one working state is required"))?;

        let width = config.null + 1;
        let mut table = match config.seed_table() {
            Some(table) if table.width() != width => {
                return Err(Error::invalid(
                    "init_table",
                    format!("windows have width {}, expected {width}", table.width()),
                ));
            }
            Some(table) => table.clone(),
            None => RuleTable::new(width),
        };
        table.ensure_quiescent()?;

        let cfg = Segment::ring_seed(initiator, config.init_len);
        tracing::debug!(
            base = config.base,
            null = config.null,
            seed = %cfg,
            "starting exponential ring search"
        );
        let mut search = Self {
            base: config.base,
            null: config.null,
            refiner: Refiner::new(&alphabet, Symmetry::Asymmetric),
            frames: Vec::new(),
            seen: HashSet::from([cfg.clone()]),
            finished: SearchStats::default(),
        };
        let frame = search.frame(cfg, table);
        search.frames.push(frame);
        Ok(search)
    }

    fn frame(&self, cfg: Segment, table: RuleTable) -> Frame {
        let problem =
            ExpansionSearch::new(cfg.unroll_ring(self.null), self.base, self.refiner.clone());
        Frame {
            cfg,
            search: Backtracker::new(problem, (), table),
        }
    }

    /// Counters summed over every expansion search run so far.
    pub fn stats(&self) -> SearchStats {
        let mut stats = self.finished;
        for frame in &self.frames {
            stats += frame.search.stats();
        }
        stats
    }

    /// Number of coarse ring steps on the current trajectory.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Iterator for ExpRingSearch {
    type Item = RuleTable;

    fn next(&mut self) -> Option<RuleTable> {
        while let Some(frame) = self.frames.last_mut() {
            let Some(table) = frame.search.next() else {
                let frame = self.frames.pop()?;
                self.finished += frame.search.stats();
                self.seen.remove(&frame.cfg);
                continue;
            };
            let Some(next) = frame.cfg.unroll_ring(self.null).advance(&table, 1) else {
                continue;
            };
            if next.is_uniform(Symbol::FIRING) {
                tracing::info!(steps = self.frames.len(), rules = table.len(), "ring fired");
                return Some(table);
            }
            if !self.seen.insert(next.clone()) {
                tracing::debug!(cfg = %next, "configuration recurred");
                continue;
            }
            let frame = self.frame(next, table);
            self.frames.push(frame);
        }
        None
    }
}
