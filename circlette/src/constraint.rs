//! The four local validity rules and the state enumerations derived from them.
//!
//! | Rule | Formula | Meaning |
//! |------|---------|---------|
//! | R1 | `(G0, G1) ≠ (1, 1)` | three generations only |
//! | R2 | `χ = W` | chirality gate |
//! | R3 | `LQ = 0 ⇒ C = 00`, `LQ = 1 ⇒ C ≠ 00` | leptons colourless, quarks coloured |
//! | R4 | `¬(LQ = 0 ∧ I3 = 0 ∧ χ = 1)` | no right-handed neutrinos |
//!
//! This module is the single source of truth for the rules. Every
//! enumeration elsewhere in the workspace goes through [`evaluate`].

use crate::ring::{Bit, State, StateSet, StateSpace};
use serde::{Deserialize, Serialize};

/// Number of valid states under all four rules.
pub const VALID_STATE_COUNT: usize = 45;

/// Number of valid lepton states (LQ = 0).
pub const LEPTON_COUNT: usize = 9;

/// Number of valid quark states (LQ = 1).
pub const QUARK_COUNT: usize = 36;

/// Number of states failing only R4.
pub const STERILE_COUNT: usize = 3;

/// Per-rule verdicts for one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Verdict {
    /// Three generations only.
    pub r1: bool,
    /// Chirality gate.
    pub r2: bool,
    /// Colour requires quark identity.
    pub r3: bool,
    /// No right-handed neutrinos.
    pub r4: bool,
}

impl Verdict {
    /// Conjunction of all four rules.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.r1 && self.r2 && self.r3 && self.r4
    }

    /// True when R1–R3 hold and R4 alone fails.
    #[inline]
    #[must_use]
    pub const fn fails_only_r4(self) -> bool {
        self.r1 && self.r2 && self.r3 && !self.r4
    }

    /// The verdicts as an array `[r1, r2, r3, r4]`.
    #[must_use]
    pub const fn as_array(self) -> [bool; 4] {
        [self.r1, self.r2, self.r3, self.r4]
    }
}

/// Evaluates the four rules on a state.
///
/// # Example
///
/// ```
/// use circlette::constraint::evaluate;
/// use circlette::ring::State;
///
/// // Right-handed neutrino: LQ = 0, I3 = 0, χ = W = 1.
/// let v = evaluate(State::from_bits([0, 0, 0, 0, 0, 0, 1, 1]));
/// assert!(v.r1 && v.r2 && v.r3);
/// assert!(!v.r4);
/// ```
#[must_use]
pub const fn evaluate(state: State) -> Verdict {
    let g0 = state.bit(Bit::G0);
    let g1 = state.bit(Bit::G1);
    let c0 = state.bit(Bit::C0);
    let c1 = state.bit(Bit::C1);
    let lq = state.bit(Bit::Lq);
    let i3 = state.bit(Bit::I3);
    let chi = state.bit(Bit::Chi);
    let w = state.bit(Bit::W);

    let coloured = c0 || c1;

    Verdict {
        r1: !(g0 && g1),
        r2: chi == w,
        r3: if lq { coloured } else { !coloured },
        r4: !(!lq && !i3 && chi),
    }
}

/// True if all four rules hold.
#[inline]
#[must_use]
pub const fn is_valid(state: State) -> bool {
    evaluate(state).is_valid()
}

/// All 256 states in binary counting order.
#[must_use]
pub const fn all_states() -> StateSpace {
    StateSpace::new()
}

/// The valid states in binary counting order.
pub fn valid_states() -> impl Iterator<Item = State> {
    all_states().filter(|s| is_valid(*s))
}

/// The valid states as a set.
#[must_use]
pub fn valid_set() -> StateSet {
    valid_states().collect()
}

/// States satisfying R1–R3 but failing R4.
pub fn sterile_candidates() -> impl Iterator<Item = State> {
    all_states().filter(|s| evaluate(*s).fails_only_r4())
}

/// Valid states with LQ = 0.
pub fn leptons() -> impl Iterator<Item = State> {
    valid_states().filter(|s| !s.bit(Bit::Lq))
}

/// Valid states with LQ = 1.
pub fn quarks() -> impl Iterator<Item = State> {
    valid_states().filter(|s| s.bit(Bit::Lq))
}

/// The ring read backwards (antimatter reading).
#[inline]
#[must_use]
pub const fn ring_reversal(state: State) -> State {
    state.reversed()
}

/// Valid states together with their ring reversals.
///
/// Reading the ring backwards gives the antimatter encoding; the union
/// is strictly larger than the valid set because most reversals break R3.
#[must_use]
pub fn with_reversals(valid: &StateSet) -> StateSet {
    valid
        .iter()
        .map(ring_reversal)
        .collect::<StateSet>()
        .union(valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_45_valid_states() {
        assert_eq!(valid_states().count(), VALID_STATE_COUNT);
        assert_eq!(valid_set().len(), VALID_STATE_COUNT);
    }

    #[test]
    fn leptons_and_quarks_split() {
        assert_eq!(leptons().count(), LEPTON_COUNT);
        assert_eq!(quarks().count(), QUARK_COUNT);
    }

    #[test]
    fn three_sterile_candidates() {
        let sterile: Vec<State> = sterile_candidates().collect();
        assert_eq!(sterile.len(), STERILE_COUNT);
        for s in sterile {
            assert!(!s.bit(Bit::Lq));
            assert!(!s.bit(Bit::I3));
            assert!(s.bit(Bit::Chi));
            assert_eq!(s.colour_bits(), (0, 0));
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        for s in all_states() {
            assert_eq!(evaluate(s), evaluate(s));
            assert_eq!(is_valid(s), evaluate(s).as_array().iter().all(|r| *r));
        }
    }

    #[test]
    fn valid_states_obey_each_rule() {
        for s in valid_states() {
            assert_ne!(s.generation_bits(), (1, 1), "R1 violated in {s}");
            assert_eq!(s.bit(Bit::Chi), s.bit(Bit::W), "R2 violated in {s}");
            if s.bit(Bit::Lq) {
                assert_ne!(s.colour_bits(), (0, 0), "uncoloured quark {s}");
            } else {
                assert_eq!(s.colour_bits(), (0, 0), "coloured lepton {s}");
            }
        }
    }

    #[test]
    fn three_generations_present() {
        let mut gens: Vec<(u8, u8)> = valid_states().map(State::generation_bits).collect();
        gens.sort_unstable();
        gens.dedup();
        assert_eq!(gens, vec![(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn reversal_union_bounds() {
        let valid = valid_set();
        let combined = with_reversals(&valid);
        assert!(combined.len() > VALID_STATE_COUNT);
        assert!(combined.len() <= 2 * VALID_STATE_COUNT);
        assert!(valid.is_subset(&combined));
        for s in valid.iter() {
            assert!(combined.contains(ring_reversal(s)));
            assert_eq!(ring_reversal(ring_reversal(s)), s);
        }
    }
}
