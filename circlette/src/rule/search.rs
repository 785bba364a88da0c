//! The uniqueness policy over a candidate set.
//!
//! A candidate qualifies when it is invertible, keeps every valid state in
//! a pure orbit and moves at least one valid state. Among qualifiers the
//! strictly lowest exact cost wins; a tie is reported, never broken.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::evaluator::{analyze, RuleAnalysis};
use super::RuleCandidateSet;
use crate::ring::StateSet;

/// Result of the uniqueness policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// Exactly one qualifier has the lowest cost.
    Unique(RuleAnalysis),
    /// Several qualifiers share the lowest cost.
    Ambiguous(Vec<RuleAnalysis>),
    /// No candidate qualifies.
    NoneFound,
}

impl SearchOutcome {
    /// The winner, if unique.
    #[must_use]
    pub fn unique(&self) -> Option<&RuleAnalysis> {
        match self {
            Self::Unique(a) => Some(a),
            _ => None,
        }
    }
}

/// Outcome plus the full ranking of every candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    /// The policy decision.
    pub outcome: SearchOutcome,
    /// All candidates, valid-in-pure descending then cost ascending.
    pub ranking: Vec<RuleAnalysis>,
    /// Candidates meeting every criterion except cost.
    pub qualifying: usize,
}

fn qualifies(a: &RuleAnalysis) -> bool {
    a.invertible && a.all_valid_pure() && a.is_nontrivial()
}

/// Orders analyses for display: most valid states in pure orbits first,
/// then cheapest.
pub fn rank(analyses: &mut [RuleAnalysis]) {
    analyses.sort_by(|a, b| {
        b.valid_in_pure
            .cmp(&a.valid_in_pure)
            .then_with(|| a.cost().cmp(&b.cost()))
    });
}

/// Applies the uniqueness policy to every candidate.
///
/// # Example
///
/// ```
/// use circlette::constraint::valid_set;
/// use circlette::ring::Bit;
/// use circlette::rule::{find_unique_rule, RuleCandidateSet};
///
/// let report = find_unique_rule(&RuleCandidateSet::canonical(), &valid_set());
/// let winner = report.outcome.unique().unwrap();
/// assert_eq!((winner.rule.source(), winner.rule.target()), (Bit::Lq, Bit::I3));
/// ```
#[must_use]
pub fn find_unique_rule(candidates: &RuleCandidateSet, valid: &StateSet) -> SearchReport {
    let mut ranking: Vec<RuleAnalysis> = candidates
        .iter()
        .map(|rule| {
            let a = analyze(rule, valid);
            debug!(
                rule = %rule,
                invertible = a.invertible,
                valid_in_pure = a.valid_in_pure,
                cost = %a.cost(),
                "scored candidate"
            );
            a
        })
        .collect();
    rank(&mut ranking);

    let qualifiers: Vec<&RuleAnalysis> = ranking.iter().filter(|a| qualifies(a)).collect();
    let best = qualifiers.iter().map(|a| a.cost()).min();
    let outcome = match best {
        None => SearchOutcome::NoneFound,
        Some(best) => {
            let mut tied: Vec<RuleAnalysis> = qualifiers
                .iter()
                .filter(|a| a.cost() == best)
                .map(|a| (*a).clone())
                .collect();
            if tied.len() == 1 {
                SearchOutcome::Unique(tied.remove(0))
            } else {
                SearchOutcome::Ambiguous(tied)
            }
        }
    };

    match &outcome {
        SearchOutcome::Unique(w) => info!(rule = %w.rule, cost = %w.cost(), "unique rule found"),
        SearchOutcome::Ambiguous(t) => info!(tied = t.len(), "rule search ambiguous"),
        SearchOutcome::NoneFound => info!("no candidate qualifies"),
    }

    SearchReport {
        qualifying: qualifiers.len(),
        outcome,
        ranking,
    }
}
