//! Direct search for tables that synchronize rings of several lengths.
//!
//! One table is grown across all lengths: once the shortest ring fires, the
//! next ring starts from its seed under the same (partial) table, so every
//! later length can only specialize what the earlier ones fixed.

use std::collections::HashSet;

use crate::config::RingSearchConfig;
use crate::engine::{
    Backtracker, Contradiction, Firing, Problem, Refiner, Resolution, Step, Symmetry,
};
use crate::{Alphabet, Error, Result, RuleTable, Segment, Symbol};

/// Width used when neither the configuration nor the seed table gives one.
pub const DEFAULT_WIDTH: usize = 3;

/// Where one branch of a ring search stands.
#[derive(Debug, Clone)]
pub struct RingProgress {
    length_index: usize,
    cfg: Segment,
    seen: HashSet<Segment>,
}

impl RingProgress {
    fn start(length_index: usize, cfg: Segment) -> Self {
        let seen = HashSet::from([cfg.clone()]);
        Self {
            length_index,
            cfg,
            seen,
        }
    }

    /// Index of the ring length being synchronized.
    pub fn length_index(&self) -> usize {
        self.length_index
    }

    /// Current configuration of the ring.
    pub fn configuration(&self) -> &Segment {
        &self.cfg
    }

    /// Steps simulated so far on the current ring.
    pub fn time(&self) -> usize {
        self.seen.len() - 1
    }
}

/// Search problem for [`Backtracker`]: synchronize every ring length.
#[derive(Debug, Clone)]
pub struct RingSearch {
    lengths: Vec<usize>,
    initiator: Symbol,
    null: usize,
    time_optimal: bool,
    refiner: Refiner,
}

impl RingSearch {
    /// Validate `config` and return a cursor over its solutions.
    ///
    /// # Errors
    ///
    /// Returns an error when the lengths are empty or zero, the alphabet is
    /// malformed, the initiator is not a working state of the alphabet, or
    /// the seed table disagrees with the requested width or does not keep
    /// the all-Q window quiescent.
    pub fn start(config: &RingSearchConfig) -> Result<Backtracker<RingSearch>> {
        if config.lengths.is_empty() {
            return Err(Error::invalid("lengths", "at least one ring length is required"));
        }
        if config.lengths.contains(&0) {
            return Err(Error::invalid("lengths", "ring lengths must be positive"));
        }

        let alphabet = Alphabet::from_non_firing(&config.states)?;
        let initiator = match config.initiator {
            Some(symbol) => symbol,
            None => alphabet
                .initiator()
                .ok_or_else(|| Error::invalid("states", "no working state to act as initiator"))?,
        };
        if initiator.is_quiescent() || initiator.is_firing() || !alphabet.contains(initiator) {
            return Err(Error::invalid(
                "initiator",
                format!("{initiator} is not a working state of the alphabet"),
            ));
        }

        let mut table = match (config.seed_table(), config.width) {
            (Some(table), Some(width)) if table.width() != width => {
                return Err(Error::invalid(
                    "width",
                    format!("seed table has width {}, requested {width}", table.width()),
                ));
            }
            (Some(table), _) => table.clone(),
            (None, Some(0)) => return Err(Error::invalid("width", "window width must be positive")),
            (None, width) => RuleTable::new(width.unwrap_or(DEFAULT_WIDTH)),
        };
        table.ensure_quiescent()?;

        let symmetry = if config.symmetric {
            Symmetry::Mirror
        } else {
            Symmetry::Asymmetric
        };
        if symmetry == Symmetry::Mirror {
            for (window, symbol) in table.iter() {
                if table.get(&window.reversed()).is_some_and(|s| s != symbol) {
                    return Err(Error::invalid(
                        "init_table",
                        format!("{window} and its mirror image map to different states"),
                    ));
                }
            }
        }

        tracing::debug!(
            lengths = ?config.lengths,
            width = table.width(),
            initiator = %initiator,
            ?symmetry,
            time_optimal = config.time_optimal,
            "starting ring search"
        );
        let search = RingSearch {
            lengths: config.lengths.clone(),
            initiator,
            null: table.null(),
            time_optimal: config.time_optimal,
            refiner: Refiner::new(&alphabet, symmetry),
        };
        let progress = RingProgress::start(0, Segment::ring_seed(initiator, config.lengths[0]));
        Ok(Backtracker::new(search, progress, table))
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn initiator(&self) -> Symbol {
        self.initiator
    }

    fn firing_at(&self, progress: &RingProgress) -> Firing {
        let n = progress.cfg.len();
        // The next configuration is the one at time `seen.len()`.
        let time = progress.seen.len();
        if time < n {
            Firing::Forbidden
        } else if self.time_optimal && time == n {
            Firing::Required
        } else {
            Firing::Permitted
        }
    }
}

impl Problem for RingSearch {
    type State = RingProgress;
    type Output = RuleTable;

    fn explore(
        &self,
        mut progress: RingProgress,
        mut table: RuleTable,
    ) -> Step<RingProgress, RuleTable> {
        loop {
            if progress.cfg.is_uniform(Symbol::FIRING) {
                let index = progress.length_index + 1;
                let Some(&length) = self.lengths.get(index) else {
                    return Step::Found(table);
                };
                tracing::info!(
                    fired = progress.cfg.len(),
                    next = length,
                    "ring synchronized, extending to next length"
                );
                progress = RingProgress::start(index, Segment::ring_seed(self.initiator, length));
                continue;
            }

            let firing = self.firing_at(&progress);
            let unrolled = progress.cfg.unroll_ring(self.null);
            match self.refiner.define_segment(&mut table, &unrolled, firing) {
                Err(Contradiction) => return Step::Contradiction,
                Ok(Resolution::Branch(choice)) => {
                    return Step::Branch {
                        state: progress,
                        choice,
                    };
                }
                Ok(Resolution::Defined) => {}
            }

            let Some(next) = unrolled.advance(&table, 1) else {
                return Step::Contradiction;
            };
            // A recurring configuration never fires.
            if !progress.seen.insert(next.clone()) {
                return Step::Contradiction;
            }
            progress.cfg = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{TraceOutcome, simulate_ring};
    use pretty_assertions::assert_eq;

    fn config(lengths: &[usize], states: &str) -> RingSearchConfig {
        RingSearchConfig {
            lengths: lengths.to_vec(),
            states: Symbol::parse_many(states).unwrap(),
            initiator: None,
            symmetric: false,
            time_optimal: false,
            width: None,
            init_table: Some("{'QQQ': 'Q'}".parse().unwrap()),
        }
    }

    #[test]
    fn first_solution_for_two_lengths() {
        let mut search = RingSearch::start(&config(&[2, 4], "QGA")).unwrap();
        let table = search.next().unwrap();
        let expected: RuleTable = "{'AQA': 'F', 'AQQ': 'Q', 'GAQ': 'Q', 'GGQ': 'G', \
             'GQG': 'Q', 'GQQ': 'Q', 'QAQ': 'F', 'QGA': 'G', 'QGG': 'Q', 'QGQ': 'A', \
             'QQG': 'G', 'QQQ': 'Q'}"
            .parse()
            .unwrap();
        assert_eq!(table, expected);
        assert_eq!(search.stats().nodes, 13);
    }

    #[test]
    fn every_solution_fires_each_ring_on_time() {
        let search = RingSearch::start(&config(&[2, 4], "QGA")).unwrap();
        let g = Symbol::new('G').unwrap();
        for table in search.take(5) {
            for n in [2, 4] {
                let trace = simulate_ring(&table, &Segment::ring_seed(g, n), 64);
                assert!(matches!(trace.outcome, TraceOutcome::Fired { step } if step >= n));
                assert_eq!(trace.premature, None);
            }
        }
    }

    #[test]
    fn time_optimal_solutions_fire_at_ring_length() {
        let mut cfg = config(&[2], "QGA");
        cfg.time_optimal = true;
        let solutions: Vec<RuleTable> = RingSearch::start(&cfg).unwrap().collect();
        assert_eq!(solutions.len(), 6);
        let g = Symbol::new('G').unwrap();
        for table in &solutions {
            let trace = simulate_ring(table, &Segment::ring_seed(g, 2), 8);
            assert_eq!(trace.outcome, TraceOutcome::Fired { step: 2 });
        }
    }

    #[test]
    fn exhaustive_counts() {
        assert_eq!(RingSearch::start(&config(&[2], "QGA")).unwrap().count(), 64);

        let mut symmetric = config(&[2], "QGA");
        symmetric.symmetric = true;
        assert_eq!(RingSearch::start(&symmetric).unwrap().count(), 64);
    }

    #[test]
    fn symmetric_solutions_are_mirror_closed() {
        let mut cfg = config(&[2, 4], "QGA");
        cfg.symmetric = true;
        cfg.time_optimal = true;
        let solutions: Vec<RuleTable> = RingSearch::start(&cfg).unwrap().collect();
        assert_eq!(solutions.len(), 71);
        for table in &solutions {
            for (window, symbol) in table.iter() {
                assert_eq!(table.get(&window.reversed()), Some(symbol));
            }
        }
    }

    #[test]
    fn seed_table_without_width_defaults_to_three() {
        let mut cfg = config(&[2], "QGA");
        cfg.init_table = None;
        let search = RingSearch::start(&cfg).unwrap();
        assert_eq!(search.problem().initiator(), Symbol::new('G').unwrap());
        assert_eq!(search.count(), 64);
    }

    #[test]
    fn empty_seed_literal_means_no_seed() {
        let mut cfg = config(&[2], "QGA");
        cfg.init_table = Some("{}".parse().unwrap());
        cfg.width = Some(3);
        let search = RingSearch::start(&cfg).unwrap();
        assert_eq!(search.count(), 64);
    }

    #[test]
    fn rejects_bad_parameters() {
        let err = RingSearch::start(&config(&[], "QGA")).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "lengths", .. }));

        let mut cfg = config(&[2], "QGA");
        cfg.initiator = Some(Symbol::new('Z').unwrap());
        let err = RingSearch::start(&cfg).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "initiator", .. }));

        let mut cfg = config(&[2], "QGA");
        cfg.width = Some(5);
        let err = RingSearch::start(&cfg).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "width", .. }));

        let mut cfg = config(&[2], "QGA");
        cfg.init_table = Some("{'QQQ': 'G'}".parse().unwrap());
        let err = RingSearch::start(&cfg).unwrap_err();
        assert!(matches!(err, Error::NotQuiescent { .. }));

        let err = RingSearch::start(&config(&[2], "Q")).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "states", .. }));
    }
}
