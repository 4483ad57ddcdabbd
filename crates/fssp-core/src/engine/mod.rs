//! Depth-first backtracking over partial rule tables.
//!
//! Every driver is an instance of the same loop: take a partial table,
//! simulate until the table either contradicts itself, reaches the goal, or
//! needs a choice; on a choice, try each alternative on its own copy of the
//! table. [`Backtracker`] runs that loop with an explicit stack of pending
//! choices and hands out solutions one at a time through [`Iterator`], so a
//! caller can stop early or resume later without re-running the search.
//!
//! ```text
//!            explore(state, table)
//!   ACTIVE ───────────────────────────┬──────────────┐
//!     │                               │              │
//!     ▼                               ▼              ▼
//!  Contradiction (drop)         Found (yield)   Branch (push choice)
//! ```

mod choice;
mod refine;

pub use choice::Choice;
pub use refine::{Contradiction, Firing, Refiner, Resolution, Symmetry};

use std::fmt;
use std::ops::AddAssign;

use serde::Serialize;

use crate::RuleTable;

/// What exploring one node produced.
#[derive(Debug)]
pub enum Step<S, O> {
    /// The table is inconsistent; abandon this branch.
    Contradiction,
    /// The goal was reached.
    Found(O),
    /// Resume with `state` once per alternative of `choice`.
    Branch { state: S, choice: Choice },
}

/// A search expressed as "explore a node until it settles".
///
/// `State` is everything a node carries besides its table; it is cloned for
/// every child of a branch point.
pub trait Problem {
    type State: Clone;
    type Output;

    fn explore(&self, state: Self::State, table: RuleTable) -> Step<Self::State, Self::Output>;
}

/// Counters describing the work done by a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes explored.
    pub nodes: u64,
    /// Nodes abandoned on a contradiction.
    pub contradictions: u64,
    /// Nodes that ended in a choice.
    pub branch_points: u64,
    /// Solutions handed out.
    pub solutions: u64,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, other: Self) {
        self.nodes += other.nodes;
        self.contradictions += other.contradictions;
        self.branch_points += other.branch_points;
        self.solutions += other.solutions;
    }
}

/// Resumable depth-first search over a [`Problem`].
///
/// Children are explored in the order their [`Choice`] yields them. Each
/// child owns its table; no table is ever visible to two branches.
pub struct Backtracker<P: Problem> {
    problem: P,
    seed: Option<(P::State, RuleTable)>,
    stack: Vec<(P::State, Choice)>,
    stats: SearchStats,
}

impl<P: Problem + fmt::Debug> fmt::Debug for Backtracker<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backtracker")
            .field("problem", &self.problem)
            .field("depth", &self.stack.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<P: Problem> Backtracker<P> {
    pub fn new(problem: P, state: P::State, table: RuleTable) -> Self {
        Self {
            problem,
            seed: Some((state, table)),
            stack: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Number of open branch points.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn next_node(&mut self) -> Option<(P::State, RuleTable)> {
        if let Some(seed) = self.seed.take() {
            return Some(seed);
        }
        loop {
            let (state, choice) = self.stack.last_mut()?;
            match choice.next() {
                Some(table) => return Some((state.clone(), table)),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<P: Problem> Iterator for Backtracker<P> {
    type Item = P::Output;

    fn next(&mut self) -> Option<P::Output> {
        while let Some((state, table)) = self.next_node() {
            self.stats.nodes += 1;
            match self.problem.explore(state, table) {
                Step::Contradiction => self.stats.contradictions += 1,
                Step::Found(output) => {
                    self.stats.solutions += 1;
                    tracing::debug!(
                        nodes = self.stats.nodes,
                        depth = self.stack.len(),
                        "solution found"
                    );
                    return Some(output);
                }
                Step::Branch { state, choice } => {
                    self.stats.branch_points += 1;
                    tracing::trace!(
                        depth = self.stack.len(),
                        windows = choice.windows().len(),
                        fan_out = choice.fan_out(),
                        "branching"
                    );
                    self.stack.push((state, choice));
                }
            }
        }
        None
    }
}
