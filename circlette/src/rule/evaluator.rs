//! Orbit decomposition and per-rule scoring.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use super::Rule;
use crate::ring::{State, StateSet, StateSpace, STATE_COUNT};

/// Default cap on the multiplicative order search (inclusive).
pub const DEFAULT_ORDER_CAP: u32 = 300;

/// Partition of the 256 states into orbits under a rule.
///
/// Each orbit is the run of newly visited states obtained by iterating
/// from the smallest unvisited state until a visited state recurs. For an
/// invertible rule these are exactly its cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDecomposition {
    orbits: Vec<Vec<State>>,
}

impl CycleDecomposition {
    /// Decomposes the full state space.
    #[must_use]
    pub fn of(rule: &Rule) -> Self {
        let mut visited = [false; STATE_COUNT];
        let mut orbits = Vec::new();
        for start in StateSpace::new() {
            if visited[usize::from(start.value())] {
                continue;
            }
            let mut orbit = Vec::new();
            let mut current = start;
            while !visited[usize::from(current.value())] {
                visited[usize::from(current.value())] = true;
                orbit.push(current);
                current = rule.apply(current);
            }
            orbits.push(orbit);
        }
        Self { orbits }
    }

    /// Number of orbits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orbits.len()
    }

    /// Always false: the state space is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orbits.is_empty()
    }

    /// Orbits in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &[State]> {
        self.orbits.iter().map(Vec::as_slice)
    }

    /// Orbits lying entirely inside `valid`.
    pub fn pure<'a>(&'a self, valid: &'a StateSet) -> impl Iterator<Item = &'a [State]> + 'a {
        self.iter()
            .filter(move |orbit| orbit.iter().all(|s| valid.contains(*s)))
    }
}

/// Score card for one rule over the valid set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAnalysis {
    /// The rule analysed.
    pub rule: Rule,
    /// Full rank over GF(2).
    pub invertible: bool,
    /// Every valid state maps to a valid state.
    pub preserves_spectrum: bool,
    /// Total bits flipped over the valid set.
    pub flips: u32,
    /// Size of the valid set.
    pub valid_count: usize,
    /// Valid states mapped to themselves.
    pub fixed_point_count: usize,
    /// Valid states lying in pure orbits.
    pub valid_in_pure: usize,
    /// Lengths of pure orbits, longest first.
    pub pure_cycle_lengths: Vec<usize>,
    /// Smallest `k ≥ 1` with `M^k = I`, if within the cap.
    pub order: Option<u32>,
    /// Orbits over all 256 states.
    pub total_cycles: usize,
}

impl RuleAnalysis {
    /// Mean Hamming distance between a valid state and its image, exact.
    #[must_use]
    pub fn cost(&self) -> Rational64 {
        match self.valid_count {
            0 => Rational64::from_integer(0),
            n => Rational64::new(i64::from(self.flips), n as i64),
        }
    }

    /// [`Self::cost`] as a float.
    #[must_use]
    pub fn avg_cost(&self) -> f64 {
        match self.valid_count {
            0 => 0.0,
            n => f64::from(self.flips) / n as f64,
        }
    }

    /// True when every valid state sits in a pure orbit.
    #[must_use]
    pub fn all_valid_pure(&self) -> bool {
        self.valid_in_pure == self.valid_count
    }

    /// True when at least one valid state moves.
    #[must_use]
    pub fn is_nontrivial(&self) -> bool {
        self.fixed_point_count < self.valid_count
    }
}

/// Scores a rule over `valid` with the default order cap.
#[must_use]
pub fn analyze(rule: &Rule, valid: &StateSet) -> RuleAnalysis {
    analyze_with_cap(rule, valid, DEFAULT_ORDER_CAP)
}

/// Scores a rule over `valid`, searching the order up to `order_cap`.
#[must_use]
pub fn analyze_with_cap(rule: &Rule, valid: &StateSet, order_cap: u32) -> RuleAnalysis {
    let mut flips = 0;
    let mut fixed_point_count = 0;
    let mut preserves_spectrum = true;
    for s in valid {
        let image = rule.apply(s);
        flips += s.hamming(image);
        if image == s {
            fixed_point_count += 1;
        }
        if !valid.contains(image) {
            preserves_spectrum = false;
        }
    }

    let cycles = CycleDecomposition::of(rule);
    let mut pure_cycle_lengths: Vec<usize> = cycles.pure(valid).map(<[State]>::len).collect();
    pure_cycle_lengths.sort_unstable_by(|a, b| b.cmp(a));

    RuleAnalysis {
        rule: *rule,
        invertible: rule.is_invertible(),
        preserves_spectrum,
        flips,
        valid_count: valid.len(),
        fixed_point_count,
        valid_in_pure: pure_cycle_lengths.iter().sum(),
        pure_cycle_lengths,
        order: rule.matrix().order(order_cap),
        total_cycles: cycles.len(),
    }
}

/// Valid pairs exchanged by a rule: pure orbits of length two.
///
/// Each pair differs only in the rule's target bit.
#[must_use]
pub fn weak_doublets(rule: &Rule, valid: &StateSet) -> Vec<(State, State)> {
    CycleDecomposition::of(rule)
        .pure(valid)
        .filter_map(|orbit| match orbit {
            [a, b] => Some((*a, *b)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Generation;
    use crate::constraint::valid_set;
    use crate::ring::Bit;

    fn winner() -> Rule {
        Rule::new(Bit::Lq, Bit::I3)
    }

    #[test]
    fn orbits_partition_the_space() {
        for rule in [winner(), Rule::new(Bit::C0, Bit::C0), Rule::new(Bit::G0, Bit::W)] {
            let cycles = CycleDecomposition::of(&rule);
            let total: usize = cycles.iter().map(<[State]>::len).sum();
            assert_eq!(total, STATE_COUNT);
            let all: StateSet = cycles.iter().flatten().copied().collect();
            assert_eq!(all, StateSet::FULL);
        }
    }

    #[test]
    fn orbit_lengths_divide_order() {
        let rule = winner();
        let order = rule.matrix().order(DEFAULT_ORDER_CAP).expect("finite order");
        for orbit in CycleDecomposition::of(&rule).iter() {
            assert_eq!(order as usize % orbit.len(), 0);
        }
    }

    #[test]
    fn winner_analysis() {
        let valid = valid_set();
        let a = analyze(&winner(), &valid);
        assert!(a.invertible);
        assert!(a.preserves_spectrum);
        assert_eq!(a.cost(), Rational64::new(36, 45));
        assert!((a.avg_cost() - 0.8).abs() < 1e-12);
        assert_eq!(a.fixed_point_count, 9);
        assert_eq!(a.valid_in_pure, 45);
        assert_eq!(a.pure_cycle_lengths, [vec![2; 18], vec![1; 9]].concat());
        assert_eq!(a.order, Some(2));
        assert!(a.all_valid_pure() && a.is_nontrivial());
    }

    #[test]
    fn reverse_coupling_breaks_leptons() {
        let valid = valid_set();
        let a = analyze(&Rule::new(Bit::I3, Bit::Lq), &valid);
        assert!(!a.preserves_spectrum);
        assert!(a.valid_in_pure < 45);
    }

    #[test]
    fn self_coupling_has_no_order() {
        let a = analyze(&Rule::new(Bit::Chi, Bit::Chi), &valid_set());
        assert!(!a.invertible);
        assert_eq!(a.order, None);
    }

    #[test]
    fn doublets_differ_in_target_only() {
        let valid = valid_set();
        let rule = winner();
        let doublets = weak_doublets(&rule, &valid);
        assert_eq!(doublets.len(), 18);
        for (a, b) in &doublets {
            assert_eq!(a.hamming(*b), 1);
            assert_eq!(a.flip(rule.target()), *b);
        }
        for g in Generation::ALL {
            let n = doublets
                .iter()
                .filter(|(a, _)| {
                    let (g0, g1) = a.generation_bits();
                    Generation::from_bits(g0, g1) == Some(g)
                })
                .count();
            assert_eq!(n, 6);
        }
    }
}
