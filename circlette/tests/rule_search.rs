//! End-to-end rule discovery over the canonical and exhaustive candidate
//! sets.

use circlette::catalogue::{Catalogue, Generation, Kind};
use circlette::constraint::valid_set;
use circlette::ring::{Bit, StateSet};
use circlette::rule::{
    analyze, find_unique_rule, weak_doublets, Rule, RuleCandidateSet, SearchOutcome,
    CANONICAL_ADJACENCY, SECTOR_BOUNDARIES,
};
use num_rational::Rational64;

#[test]
fn canonical_search_selects_weak_isospin() {
    let valid = valid_set();
    let report = find_unique_rule(&RuleCandidateSet::canonical(), &valid);
    let w = match report.outcome {
        SearchOutcome::Unique(w) => w,
        other => panic!("expected a unique winner, got {other:?}"),
    };
    assert_eq!(w.rule.source(), Bit::Lq);
    assert_eq!(w.rule.target(), Bit::I3);
    assert_eq!(w.cost(), Rational64::new(36, 45));
    assert_eq!(w.order, Some(2));
    assert_eq!(w.fixed_point_count, 9);
    assert_eq!(w.pure_cycle_lengths.iter().filter(|&&l| l == 2).count(), 18);
    assert_eq!(w.pure_cycle_lengths.iter().filter(|&&l| l == 1).count(), 9);
    assert_eq!(w.total_cycles, 128 + 64);
}

#[test]
fn boundary_and_directed_inputs_agree() {
    let valid = valid_set();
    let directed = RuleCandidateSet::from_directed(&CANONICAL_ADJACENCY).expect("in range");
    let boundaries = RuleCandidateSet::from_boundaries(&SECTOR_BOUNDARIES).expect("adjacent");
    assert_eq!(
        find_unique_rule(&directed, &valid),
        find_unique_rule(&boundaries, &valid)
    );
}

#[test]
fn fixed_points_are_the_leptons() {
    let valid = valid_set();
    let rule = Rule::new(Bit::Lq, Bit::I3);
    let fixed: StateSet = valid.iter().filter(|s| rule.apply(*s) == *s).collect();
    let cat = Catalogue::global();
    assert_eq!(fixed.len(), 9);
    assert!(fixed.iter().all(|s| cat.get(s).map(|p| p.kind) == Some(Kind::Lepton)));
}

#[test]
fn doublets_pair_up_and_down_quarks() {
    let cat = Catalogue::global();
    let doublets = weak_doublets(&Rule::new(Bit::Lq, Bit::I3), &valid_set());
    assert_eq!(doublets.len(), 18);
    for (a, b) in doublets {
        let (pa, pb) = (cat.get(a).expect("valid"), cat.get(b).expect("valid"));
        assert_eq!(pa.kind, Kind::Quark);
        assert_eq!(pa.generation, pb.generation);
        assert_eq!(pa.colour, pb.colour);
        assert_eq!(pa.chirality, pb.chirality);
        assert_eq!(pa.charge - pb.charge, Rational64::from_integer(1));
    }
    let per_gen = Generation::ALL.map(|g| {
        weak_doublets(&Rule::new(Bit::Lq, Bit::I3), &valid_set())
            .iter()
            .filter(|(a, _)| cat.get(*a).map(|p| p.generation) == Some(g))
            .count()
    });
    assert_eq!(per_gen, [6, 6, 6]);
}

#[test]
fn exhaustive_search_is_ambiguous() {
    let valid = valid_set();
    let report = find_unique_rule(&RuleCandidateSet::all_couplings(), &valid);
    let tied = match report.outcome {
        SearchOutcome::Ambiguous(tied) => tied,
        other => panic!("expected ambiguity, got {other:?}"),
    };
    let mut rules: Vec<String> = tied.iter().map(|a| a.rule.to_string()).collect();
    rules.sort();
    assert_eq!(rules, ["C0⊕=C1", "C1⊕=C0", "I3⊕=C0", "I3⊕=C1"]);
    assert!(tied.iter().all(|a| a.cost() == Rational64::new(24, 45)));
    // The canonical winner still qualifies, at a higher cost.
    let winner = analyze(&Rule::new(Bit::Lq, Bit::I3), &valid);
    assert!(report.ranking.contains(&winner));
    assert_eq!(report.qualifying, 5);
}

#[test]
fn search_report_serialises_as_json() -> Result<(), serde_json::Error> {
    let report = find_unique_rule(&RuleCandidateSet::canonical(), &valid_set());
    let json = serde_json::to_value(&report)?;
    assert_eq!(json["qualifying"], 1);
    assert!(json["outcome"].get("Unique").is_some());
    assert_eq!(json["ranking"].as_array().map(Vec::len), Some(8));
    let back: circlette::rule::SearchReport = serde_json::from_value(json)?;
    assert_eq!(back, report);
    Ok(())
}

#[test]
fn winner_matrix_squares_to_identity() {
    let m = *Rule::new(Bit::Lq, Bit::I3).matrix();
    assert!(!m.is_identity());
    assert!(m.pow(2).is_identity());
    assert_eq!(m.pow(2), m.mul(&m));
    assert_eq!(m.order(16), Some(2));
}
