//! Lazy enumeration of the children of a branch point.

use crate::{RuleTable, Segment, Symbol};

use super::Symmetry;

/// The alternatives at one branch point.
///
/// Yields one extended copy of the parent table per alternative: first the
/// "fire now" hypothesis when it is allowed, then every assignment of
/// non-firing states to the undefined windows in odometer order (the last
/// window varies fastest). Children are built on demand, so a branch over
/// `k` windows never holds more than one of its `|A|^k` tables at a time.
#[derive(Debug, Clone)]
pub struct Choice {
    parent: RuleTable,
    windows: Vec<Segment>,
    symbols: Vec<Symbol>,
    symmetry: Symmetry,
    fire_pending: bool,
    digits: Option<Vec<usize>>,
}

impl Choice {
    pub(crate) fn new(
        parent: RuleTable,
        windows: Vec<Segment>,
        symbols: Vec<Symbol>,
        symmetry: Symmetry,
        fire_first: bool,
    ) -> Self {
        let digits = (!symbols.is_empty()).then(|| vec![0; windows.len()]);
        Self {
            parent,
            windows,
            symbols,
            symmetry,
            fire_pending: fire_first,
            digits,
        }
    }

    /// The undefined windows this branch point assigns.
    pub fn windows(&self) -> &[Segment] {
        &self.windows
    }

    /// Total number of alternatives, saturating on overflow.
    pub fn fan_out(&self) -> usize {
        let exponent = u32::try_from(self.windows.len()).unwrap_or(u32::MAX);
        let assignments = self.symbols.len().saturating_pow(exponent);
        assignments.saturating_add(usize::from(self.fire_pending))
    }

    fn next_assignment(&mut self) -> Option<Vec<Symbol>> {
        if self.fire_pending {
            self.fire_pending = false;
            return Some(vec![Symbol::FIRING; self.windows.len()]);
        }
        let digits = self.digits.as_mut()?;
        let assignment = digits.iter().map(|&d| self.symbols[d]).collect();

        let mut exhausted = true;
        for digit in digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.symbols.len() {
                exhausted = false;
                break;
            }
            *digit = 0;
        }
        if exhausted {
            self.digits = None;
        }
        Some(assignment)
    }
}

impl Iterator for Choice {
    type Item = RuleTable;

    fn next(&mut self) -> Option<RuleTable> {
        loop {
            let assignment = self.next_assignment()?;
            let mut child = self.parent.clone();
            let consistent = self
                .windows
                .iter()
                .zip(assignment)
                .all(|(window, symbol)| self.symmetry.assign(&mut child, window, symbol).is_ok());
            if consistent {
                return Some(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(s: &str) -> Segment {
        s.parse().unwrap()
    }

    fn symbols(s: &str) -> Vec<Symbol> {
        Symbol::parse_many(s).unwrap()
    }

    #[test]
    fn enumerates_fire_then_odometer_order() {
        let choice = Choice::new(
            RuleTable::quiescent(3),
            vec![seg("GQG"), seg("QGQ")],
            symbols("QG"),
            Symmetry::Asymmetric,
            true,
        );
        assert_eq!(choice.fan_out(), 5);
        let images: Vec<String> = choice
            .map(|t| format!("{}{}", t.get(&seg("GQG")).unwrap(), t.get(&seg("QGQ")).unwrap()))
            .collect();
        assert_eq!(images, vec!["FF", "QQ", "QG", "GQ", "GG"]);
    }

    #[test]
    fn children_never_touch_the_parent() {
        let parent = RuleTable::quiescent(3);
        let mut choice = Choice::new(
            parent.clone(),
            vec![seg("QQG")],
            symbols("A"),
            Symmetry::Asymmetric,
            false,
        );
        let child = choice.next().unwrap();
        assert_eq!(child.len(), 2);
        assert_eq!(parent.len(), 1);
        assert!(choice.next().is_none());
    }

    #[test]
    fn mirrored_assignment_defines_both_orientations() {
        let mut choice = Choice::new(
            RuleTable::quiescent(3),
            vec![seg("GQQ")],
            symbols("A"),
            Symmetry::Mirror,
            false,
        );
        let child = choice.next().unwrap();
        assert_eq!(child.get(&seg("GQQ")), child.get(&seg("QQG")));
    }

    #[test]
    fn without_non_firing_states_only_fire_remains() {
        let choice = Choice::new(
            RuleTable::quiescent(3),
            vec![seg("GGG")],
            Vec::new(),
            Symmetry::Asymmetric,
            true,
        );
        assert_eq!(choice.count(), 1);
    }
}
