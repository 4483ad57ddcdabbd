//! The two refinement primitives shared by every search driver.

use serde::{Deserialize, Serialize};

use crate::table::Conflict;
use crate::{Alphabet, RuleTable, Segment, Symbol};

use super::Choice;

/// Whether a simulated step may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Firing {
    /// No window may map to F on this step.
    Forbidden,
    /// The step may fire, but only unanimously.
    Permitted,
    /// Every window must map to F on this step.
    Required,
}

/// A partial table violated the misfire or renormalization invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction;

impl From<Conflict> for Contradiction {
    fn from(_: Conflict) -> Self {
        Contradiction
    }
}

/// Result of defining a segment.
#[derive(Debug)]
pub enum Resolution {
    /// Every window of the segment is mapped; it can be simulated.
    Defined,
    /// The table must be extended by one of the alternatives first.
    Branch(Choice),
}

/// Whether windows and their mirror images are tied together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symmetry {
    #[default]
    Asymmetric,
    /// A window and its reverse always map to the same state.
    Mirror,
}

impl Symmetry {
    /// Define `window`, and its reverse under [`Symmetry::Mirror`].
    pub fn assign(
        self,
        table: &mut RuleTable,
        window: &Segment,
        symbol: Symbol,
    ) -> Result<(), Conflict> {
        table.define(window.clone(), symbol)?;
        if self == Symmetry::Mirror {
            table.define(window.reversed(), symbol)?;
        }
        Ok(())
    }
}

/// Extends partial tables so that segments can be simulated.
#[derive(Debug, Clone)]
pub struct Refiner {
    non_firing: Vec<Symbol>,
    symmetry: Symmetry,
}

impl Refiner {
    pub fn new(alphabet: &Alphabet, symmetry: Symmetry) -> Self {
        Self {
            non_firing: alphabet.non_firing().to_vec(),
            symmetry,
        }
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Define every window of `segment`, or say how to branch.
    ///
    /// Firing is unanimous: once one window maps to F, every other window
    /// of the segment must too, and the undefined ones are forced to F. A
    /// segment with no defined windows branches into "fire now" (when
    /// permitted) followed by every non-firing assignment.
    pub fn define_segment(
        &self,
        table: &mut RuleTable,
        segment: &Segment,
        firing: Firing,
    ) -> Result<Resolution, Contradiction> {
        let mut undefined = Vec::new();
        let mut fires = false;
        let mut rests = false;
        for window in segment.windows(table.width(), 1) {
            match table.get(&window) {
                Some(symbol) if symbol.is_firing() => fires = true,
                Some(_) => rests = true,
                None => undefined.push(window),
            }
        }

        if firing == Firing::Required || fires {
            if rests || (fires && firing == Firing::Forbidden) {
                return Err(Contradiction);
            }
            self.define_all(table, &undefined, Symbol::FIRING)?;
            return Ok(Resolution::Defined);
        }
        if undefined.is_empty() {
            return Ok(Resolution::Defined);
        }

        if self.symmetry == Symmetry::Mirror {
            undefined = undefined
                .iter()
                .map(Segment::canonical)
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect();
        }
        let fire_first = firing == Firing::Permitted && !rests;
        Ok(Resolution::Branch(Choice::new(
            table.clone(),
            undefined,
            self.non_firing.clone(),
            self.symmetry,
            fire_first,
        )))
    }

    /// Close the penultimate image of an exponentiated window.
    ///
    /// `segment` is the fine segment one step before the end of the
    /// renormalized step of a window known to map to `image`. Its leading
    /// window must map to `image` and every later window to the padding
    /// state (F when `image` is F, Q otherwise), so the next step produces
    /// exactly the exponentiated image.
    pub fn close_end_window(
        &self,
        table: &mut RuleTable,
        segment: &Segment,
        image: Symbol,
    ) -> Result<(), Contradiction> {
        let width = table.width();
        self.symmetry.assign(table, &segment.slice(0..width), image)?;

        let pad = if image.is_firing() { Symbol::FIRING } else { Symbol::QUIESCENT };
        let tail = segment.slice(1..segment.len());
        let mut undefined = Vec::new();
        for window in tail.windows(width, 1) {
            match table.get(&window) {
                Some(symbol) if symbol != pad => return Err(Contradiction),
                Some(_) => {}
                None => undefined.push(window),
            }
        }
        self.define_all(table, &undefined, pad)
    }

    fn define_all(
        &self,
        table: &mut RuleTable,
        windows: &[Segment],
        symbol: Symbol,
    ) -> Result<(), Contradiction> {
        for window in windows {
            self.symmetry.assign(table, window, symbol)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(s: &str) -> Segment {
        s.parse().unwrap()
    }

    fn refiner(symmetry: Symmetry) -> Refiner {
        let alphabet = Alphabet::from_non_firing(&Symbol::parse_many("QGA").unwrap()).unwrap();
        Refiner::new(&alphabet, symmetry)
    }

    fn table(literal: &str) -> RuleTable {
        literal.parse().unwrap()
    }

    #[test]
    fn fully_defined_segment_is_settled() {
        let mut t = table("{'QQQ': 'Q'}");
        let resolution = refiner(Symmetry::Asymmetric)
            .define_segment(&mut t, &seg("QQQQ"), Firing::Permitted)
            .unwrap();
        assert!(matches!(resolution, Resolution::Defined));
    }

    #[test]
    fn partial_firing_is_completed() {
        let mut t = table("{'QQQ': 'Q', 'AQA': 'F'}");
        let resolution = refiner(Symmetry::Asymmetric)
            .define_segment(&mut t, &seg("AQAQ"), Firing::Permitted)
            .unwrap();
        assert!(matches!(resolution, Resolution::Defined));
        assert_eq!(t.get(&seg("QAQ")), Some(Symbol::FIRING));
    }

    #[test]
    fn mixed_firing_is_a_contradiction() {
        let mut t = table("{'QQQ': 'Q', 'QQA': 'F'}");
        let result =
            refiner(Symmetry::Asymmetric).define_segment(&mut t, &seg("QQQA"), Firing::Permitted);
        assert_eq!(result.err(), Some(Contradiction));
    }

    #[test]
    fn forbidden_firing_is_a_contradiction() {
        let mut t = table("{'QQQ': 'Q', 'AQA': 'F'}");
        let result =
            refiner(Symmetry::Asymmetric).define_segment(&mut t, &seg("AQA"), Firing::Forbidden);
        assert_eq!(result.err(), Some(Contradiction));
    }

    #[test]
    fn required_firing_forces_every_window() {
        let mut t = table("{'QQQ': 'Q'}");
        refiner(Symmetry::Asymmetric)
            .define_segment(&mut t, &seg("GAGA"), Firing::Required)
            .unwrap();
        assert_eq!(t.get(&seg("GAG")), Some(Symbol::FIRING));
        assert_eq!(t.get(&seg("AGA")), Some(Symbol::FIRING));

        let mut t = table("{'QQQ': 'Q'}");
        let result =
            refiner(Symmetry::Asymmetric).define_segment(&mut t, &seg("QQQG"), Firing::Required);
        assert_eq!(result.err(), Some(Contradiction));
    }

    #[test]
    fn undefined_segment_branches() {
        let mut t = table("{'QQQ': 'Q'}");
        let resolution = refiner(Symmetry::Asymmetric)
            .define_segment(&mut t, &seg("GQGQ"), Firing::Permitted)
            .unwrap();
        let Resolution::Branch(choice) = resolution else {
            panic!("expected a branch");
        };
        assert_eq!(choice.windows(), &[seg("GQG"), seg("QGQ")]);
        assert_eq!(choice.fan_out(), 10);
        assert_eq!(t.len(), 1, "branching leaves the table untouched");
    }

    #[test]
    fn forbidden_branch_omits_fire_hypothesis() {
        let mut t = table("{'QQQ': 'Q'}");
        let Ok(Resolution::Branch(choice)) =
            refiner(Symmetry::Asymmetric).define_segment(&mut t, &seg("GQAQ"), Firing::Forbidden)
        else {
            panic!("expected a branch");
        };
        assert_eq!(choice.fan_out(), 9);
        assert!(choice.into_iter().all(|child| child.get(&seg("GQA")) != Some(Symbol::FIRING)));
    }

    #[test]
    fn mirror_branches_on_canonical_windows() {
        let mut t = table("{'QQQ': 'Q'}");
        let Ok(Resolution::Branch(choice)) =
            refiner(Symmetry::Mirror).define_segment(&mut t, &seg("QQGQQ"), Firing::Forbidden)
        else {
            panic!("expected a branch");
        };
        assert_eq!(choice.windows(), &[seg("GQQ"), seg("QGQ")]);
    }

    #[test]
    fn end_window_pads_with_quiescence() {
        let mut t = table("{'QQQ': 'Q'}");
        refiner(Symmetry::Asymmetric)
            .close_end_window(&mut t, &seg("RQQQ"), Symbol::new('S').unwrap())
            .unwrap();
        assert_eq!(t.get(&seg("RQQ")), Some(Symbol::new('S').unwrap()));

        let mut t = table("{'QQQ': 'Q', 'QQR': 'S'}");
        let result =
            refiner(Symmetry::Asymmetric).close_end_window(&mut t, &seg("RQQR"), Symbol::QUIESCENT);
        assert_eq!(result, Err(Contradiction));
    }

    #[test]
    fn end_window_rejects_conflicting_image() {
        let mut t = table("{'QQQ': 'Q', 'RQQ': 'R'}");
        let image = Symbol::new('S').unwrap();
        let result = refiner(Symmetry::Asymmetric).close_end_window(&mut t, &seg("RQQQ"), image);
        assert_eq!(result, Err(Contradiction));
    }
}
