//! Candidate XOR update rules between ring positions.
//!
//! A rule copies every bit unchanged except one target, which becomes
//! `target ⊕ source`. Rules are generated either from ring-adjacent sector
//! boundaries (both directions per boundary) or from an explicit directed
//! list.
//!
//! - [`gf2`]: the matrix representation.
//! - [`evaluator`]: orbit decomposition and per-rule scoring.
//! - [`search`]: the uniqueness policy over a candidate set.

pub mod evaluator;
pub mod gf2;
pub mod search;

pub use evaluator::{
    analyze, analyze_with_cap, weak_doublets, CycleDecomposition, RuleAnalysis, DEFAULT_ORDER_CAP,
};
pub use gf2::Gf2Matrix;
pub use search::{find_unique_rule, rank, SearchOutcome, SearchReport};

use crate::ring::{Bit, State};
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four sector boundaries on the ring.
pub const SECTOR_BOUNDARIES: [(Bit, Bit); 4] = [
    (Bit::G1, Bit::C0),
    (Bit::C1, Bit::Lq),
    (Bit::Lq, Bit::I3),
    (Bit::W, Bit::G0),
];

/// Directed `(source, target)` index pairs for the sector boundaries.
pub const CANONICAL_ADJACENCY: [(usize, usize); 8] = [
    (1, 2),
    (2, 1),
    (3, 4),
    (4, 3),
    (4, 5),
    (5, 4),
    (7, 0),
    (0, 7),
];

/// Errors building a candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
    /// A directed pair named a position outside the ring.
    #[error("ring position {index} out of range (expected 0..8)")]
    PositionOutOfRange {
        /// The offending index.
        index: usize,
    },
    /// A boundary pair is not adjacent on the ring.
    #[error("{a} and {b} are not adjacent on the ring")]
    NotAdjacent {
        /// First position.
        a: Bit,
        /// Second position.
        b: Bit,
    },
}

/// A single XOR coupling `target ⊕= source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    source: Bit,
    target: Bit,
    matrix: Gf2Matrix,
}

impl Rule {
    /// The coupling `target ⊕= source`.
    #[must_use]
    pub const fn new(source: Bit, target: Bit) -> Self {
        Self {
            source,
            target,
            matrix: Gf2Matrix::coupling(source.index(), target.index()),
        }
    }

    /// The position read.
    #[must_use]
    pub const fn source(&self) -> Bit {
        self.source
    }

    /// The position written.
    #[must_use]
    pub const fn target(&self) -> Bit {
        self.target
    }

    /// The GF(2) matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Gf2Matrix {
        &self.matrix
    }

    /// One application.
    #[inline]
    #[must_use]
    pub const fn apply(&self, state: State) -> State {
        self.matrix.apply(state)
    }

    /// False for self-couplings, which clear their diagonal entry.
    #[must_use]
    pub const fn is_invertible(&self) -> bool {
        self.matrix.is_invertible()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}⊕={}", self.target, self.source)
    }
}

/// An ordered list of candidate rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCandidateSet {
    rules: Vec<Rule>,
}

impl RuleCandidateSet {
    /// Both directions across each boundary, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError::NotAdjacent`] if a pair is not one ring
    /// hop apart.
    pub fn from_boundaries(boundaries: &[(Bit, Bit)]) -> Result<Self, CandidateError> {
        let mut rules = Vec::with_capacity(boundaries.len() * 2);
        for &(a, b) in boundaries {
            if a.distance(b) != 1 {
                return Err(CandidateError::NotAdjacent { a, b });
            }
            rules.push(Rule::new(a, b));
            rules.push(Rule::new(b, a));
        }
        Ok(Self { rules })
    }

    /// One rule per `(source, target)` index pair.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError::PositionOutOfRange`] for any index ≥ 8.
    pub fn from_directed(pairs: &[(usize, usize)]) -> Result<Self, CandidateError> {
        let position =
            |index| Bit::from_index(index).ok_or(CandidateError::PositionOutOfRange { index });
        let rules = pairs
            .iter()
            .map(|&(s, t)| Ok(Rule::new(position(s)?, position(t)?)))
            .collect::<Result<Vec<_>, CandidateError>>()?;
        Ok(Self { rules })
    }

    /// The eight sector-boundary couplings.
    #[must_use]
    pub fn canonical() -> Self {
        let rules = SECTOR_BOUNDARIES
            .iter()
            .flat_map(|&(a, b)| [Rule::new(a, b), Rule::new(b, a)])
            .collect();
        Self { rules }
    }

    /// All 56 couplings between distinct positions, source-major.
    #[must_use]
    pub fn all_couplings() -> Self {
        let rules = Bit::ALL
            .iter()
            .flat_map(|&s| {
                Bit::ALL
                    .iter()
                    .filter(move |&&t| t != s)
                    .map(move |&t| Rule::new(s, t))
            })
            .collect();
        Self { rules }
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True with no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Candidates in order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Candidates that are excluded from scoring.
    pub fn singular(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| !r.is_invertible())
    }
}

impl<'a> IntoIterator for &'a RuleCandidateSet {
    type Item = &'a Rule;
    type IntoIter = core::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_matches_directed_list() {
        let from_pairs = RuleCandidateSet::from_directed(&CANONICAL_ADJACENCY).expect("in range");
        assert_eq!(RuleCandidateSet::canonical(), from_pairs);
        assert_eq!(
            RuleCandidateSet::from_boundaries(&SECTOR_BOUNDARIES).expect("adjacent"),
            from_pairs
        );
        assert_eq!(from_pairs.len(), 2 * SECTOR_BOUNDARIES.len());
    }

    #[test]
    fn canonical_candidates_are_invertible() {
        let set = RuleCandidateSet::canonical();
        assert!(set.iter().all(Rule::is_invertible));
        assert_eq!(set.singular().count(), 0);
    }

    #[test]
    fn out_of_range_rejected() {
        assert_eq!(
            RuleCandidateSet::from_directed(&[(4, 5), (8, 0)]),
            Err(CandidateError::PositionOutOfRange { index: 8 })
        );
        assert!(RuleCandidateSet::from_directed(&[(0, 11)]).is_err());
    }

    #[test]
    fn non_adjacent_boundary_rejected() {
        let err = RuleCandidateSet::from_boundaries(&[(Bit::G0, Bit::Lq)]).unwrap_err();
        assert_eq!(err, CandidateError::NotAdjacent { a: Bit::G0, b: Bit::Lq });
    }

    #[test]
    fn self_coupling_is_reported_singular() {
        let set = RuleCandidateSet::from_directed(&[(3, 3), (4, 5)]).expect("in range");
        let singular: Vec<&Rule> = set.singular().collect();
        assert_eq!(singular.len(), 1);
        assert_eq!(singular[0].source(), Bit::C1);
    }

    #[test]
    fn all_couplings_count() {
        let all = RuleCandidateSet::all_couplings();
        assert_eq!(all.len(), 56);
        assert!(all.iter().all(|r| r.source() != r.target()));
    }

    #[test]
    fn display() {
        assert_eq!(Rule::new(Bit::Lq, Bit::I3).to_string(), "I3⊕=LQ");
    }
}
