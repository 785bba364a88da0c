//! Spectrum validator.
//!
//! Verifies the valid-state inventory and its labelling:
//! - 256 states, 45 valid (9 leptons, 36 quarks)
//! - 3 states failing only R4
//! - validity is deterministic and each rule excludes something
//! - 45 catalogue entries, 15 per generation, lepton charges {0, −1},
//!   quark charges {2/3, −1/3}

use std::collections::BTreeSet;

use circlette::catalogue::{koide_ratio, Catalogue, Generation, Kind};
use circlette::constraint::{
    all_states, evaluate, is_valid, leptons, quarks, sterile_candidates, valid_set, valid_states,
    with_reversals, Verdict, LEPTON_COUNT, QUARK_COUNT, STERILE_COUNT,
    VALID_STATE_COUNT as VALID_COUNT,
};
use circlette::ring::{Bit, STATE_COUNT};
use num_rational::Rational64;

use crate::report::{check_count, ConformanceReport, TestResult};

const EXPECTED_PER_GENERATION: usize = 15;

/// Validates the spectrum.
pub fn validate() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    validate_inventory(&mut report);
    validate_determinism(&mut report);
    validate_rule_independence(&mut report);
    validate_catalogue(&mut report);
    validate_reversal(&mut report);
    validate_koide(&mut report);
    report
}

fn validate_inventory(report: &mut ConformanceReport) {
    let validator = "spectrum/inventory";
    check_count(report, validator, "state", all_states().count(), STATE_COUNT);
    check_count(report, validator, "valid", valid_states().count(), VALID_COUNT);
    check_count(report, validator, "lepton", leptons().count(), LEPTON_COUNT);
    check_count(report, validator, "quark", quarks().count(), QUARK_COUNT);
    check_count(
        report,
        validator,
        "sterile",
        sterile_candidates().count(),
        STERILE_COUNT,
    );

    let bridge_split = valid_states().all(|s| {
        let lepton = leptons().any(|l| l == s);
        lepton != s.bit(Bit::Lq)
    });
    report.push(TestResult::check(
        validator,
        bridge_split,
        "Leptons are exactly the valid states with LQ = 0",
    ));
}

fn validate_determinism(report: &mut ConformanceReport) {
    let validator = "spectrum/determinism";
    let first: Vec<(bool, Verdict)> = all_states().map(|s| (is_valid(s), evaluate(s))).collect();
    let unstable: Vec<String> = all_states()
        .zip(&first)
        .filter(|(s, before)| (is_valid(*s), evaluate(*s)) != **before)
        .map(|(s, _)| s.to_string())
        .collect();
    if unstable.is_empty() {
        report.push(TestResult::pass(
            validator,
            "Validity is stable under re-evaluation for all 256 states",
        ));
    } else {
        report.push(TestResult::fail_with_details(
            validator,
            format!("{} states change verdict on re-evaluation", unstable.len()),
            unstable,
        ));
    }
}

fn validate_rule_independence(report: &mut ConformanceReport) {
    let validator = "spectrum/rules";
    for rule in 0..4 {
        let only_here = all_states()
            .filter(|s| {
                let v = evaluate(*s).as_array();
                !v[rule] && v.iter().enumerate().all(|(i, ok)| i == rule || *ok)
            })
            .count();
        report.push(TestResult::check(
            validator,
            only_here > 0,
            format!("R{} alone excludes {} states", rule + 1, only_here),
        ));
    }
}

fn validate_catalogue(report: &mut ConformanceReport) {
    let validator = "spectrum/catalogue";
    let cat = Catalogue::global();
    check_count(report, validator, "catalogue", cat.len(), VALID_COUNT);

    let names: BTreeSet<&str> = cat.iter().map(|p| p.name.as_str()).collect();
    check_count(report, validator, "distinct name", names.len(), VALID_COUNT);

    for generation in Generation::ALL {
        let n = cat.iter().filter(|p| p.generation == generation).count();
        check_count(
            report,
            validator,
            &format!("generation {}", generation.number()),
            n,
            EXPECTED_PER_GENERATION,
        );
    }

    let lepton: BTreeSet<Rational64> = cat.of_kind(Kind::Lepton).map(|p| p.charge).collect();
    let quark: BTreeSet<Rational64> = cat.of_kind(Kind::Quark).map(|p| p.charge).collect();
    report.push(TestResult::check(
        validator,
        lepton == BTreeSet::from([Rational64::from_integer(0), Rational64::from_integer(-1)]),
        format!("Lepton charges {:?}", fmt_rationals(&lepton)),
    ));
    report.push(TestResult::check(
        validator,
        quark == BTreeSet::from([Rational64::new(2, 3), Rational64::new(-1, 3)]),
        format!("Quark charges {:?}", fmt_rationals(&quark)),
    ));
}

fn fmt_rationals(set: &BTreeSet<Rational64>) -> Vec<String> {
    set.iter().map(ToString::to_string).collect()
}

fn validate_reversal(report: &mut ConformanceReport) {
    let validator = "spectrum/reversal";
    let union = with_reversals(&valid_set()).len();
    report.push(TestResult::check(
        validator,
        (VALID_COUNT..=2 * VALID_COUNT).contains(&union),
        format!("Valid states plus ring reversals: {union} (between 45 and 90)"),
    ));
}

fn validate_koide(report: &mut ConformanceReport) {
    let validator = "spectrum/koide";
    let k = koide_ratio(Catalogue::generation_masses(Kind::Lepton, true));
    let deviation = (k - 2.0 / 3.0).abs();
    if deviation < 1e-4 {
        report.push(TestResult::pass(
            validator,
            format!("Charged-lepton Koide ratio {k:.6} within 1e-4 of 2/3"),
        ));
    } else {
        report.push(TestResult::warn(
            validator,
            format!("Charged-lepton Koide ratio {k:.6} is {deviation:.2e} from 2/3"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectrum_conforms() {
        let report = validate();
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
        assert!(failures.is_empty(), "spectrum failures: {:#?}", failures);
    }
}
