//! Plain simulation of a ring under a complete table.

use std::collections::HashMap;

use crate::{RuleTable, Segment, Symbol};

/// How a ring simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// Every cell reached F at `step`.
    Fired { step: usize },
    /// The configuration at `step` already appeared at `first_seen`.
    Recurred { step: usize, first_seen: usize },
    /// The table has no rule for a window of the configuration at `step`.
    Unmapped { step: usize },
    /// The step bound was reached.
    StepLimit,
}

/// Configurations visited by [`simulate_ring`], starting at step 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingTrace {
    pub configurations: Vec<Segment>,
    pub outcome: TraceOutcome,
    /// First step at which some but not all cells were firing.
    pub premature: Option<usize>,
}

impl RingTrace {
    pub fn fired(&self) -> bool {
        matches!(self.outcome, TraceOutcome::Fired { .. })
    }

    /// True when the ring fired and no cell fired before the others.
    pub fn synchronized(&self) -> bool {
        self.fired() && self.premature.is_none()
    }
}

/// Simulate the ring `cfg` under `table` for at most `max_steps` steps.
pub fn simulate_ring(table: &RuleTable, cfg: &Segment, max_steps: usize) -> RingTrace {
    let null = table.null();
    let mut configurations = vec![cfg.clone()];
    let mut first_seen = HashMap::from([(cfg.clone(), 0)]);
    let mut premature = None;

    if cfg.is_uniform(Symbol::FIRING) {
        return RingTrace {
            configurations,
            outcome: TraceOutcome::Fired { step: 0 },
            premature,
        };
    }

    let mut current = cfg.clone();
    for step in 1..=max_steps {
        let Some(next) = current.unroll_ring(null).advance(table, 1) else {
            return RingTrace {
                configurations,
                outcome: TraceOutcome::Unmapped { step: step - 1 },
                premature,
            };
        };
        configurations.push(next.clone());

        if next.is_uniform(Symbol::FIRING) {
            return RingTrace {
                configurations,
                outcome: TraceOutcome::Fired { step },
                premature,
            };
        }
        if premature.is_none() && next.count(Symbol::FIRING) > 0 {
            premature = Some(step);
        }
        if let Some(&earlier) = first_seen.get(&next) {
            return RingTrace {
                configurations,
                outcome: TraceOutcome::Recurred {
                    step,
                    first_seen: earlier,
                },
                premature,
            };
        }
        first_seen.insert(next.clone(), step);
        current = next;
    }

    RingTrace {
        configurations,
        outcome: TraceOutcome::StepLimit,
        premature,
    }
}
