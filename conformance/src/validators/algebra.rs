//! Clifford-algebra validator.
//!
//! The standard Dirac triple must satisfy every identity to 1e-14; a triple
//! with two entries swapped must fail at least one, or the check has no
//! discriminating power.

use circlette::algebra::{verify, CliffordReport, DiracTriple, CLIFFORD_TOLERANCE};

use crate::report::{ConformanceReport, TestResult};

/// Validates the Clifford identities.
pub fn validate() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let triple = DiracTriple::standard();
    validate_standard(&mut report, &verify(&triple, CLIFFORD_TOLERANCE));
    validate_perturbed(&mut report, &verify(&triple.perturbed(), CLIFFORD_TOLERANCE));
    report
}

fn validate_standard(report: &mut ConformanceReport, clifford: &CliffordReport) {
    let validator = "algebra/clifford";
    for check in &clifford.checks {
        report.push(TestResult::check(
            validator,
            check.passed,
            format!("{} (error {:.1e})", check.identity, check.error),
        ));
    }
}

fn validate_perturbed(report: &mut ConformanceReport, clifford: &CliffordReport) {
    let validator = "algebra/discrimination";
    let caught: Vec<String> = clifford
        .checks
        .iter()
        .filter(|c| !c.passed)
        .map(|c| format!("{} (error {:.3})", c.identity, c.error))
        .collect();
    if caught.is_empty() {
        report.push(TestResult::fail(
            validator,
            "Perturbed triple passes every identity",
        ));
    } else {
        report.push(
            TestResult::pass(
                validator,
                format!("Perturbed triple fails {} identities", caught.len()),
            )
            .with_details(caught),
        );
    }
}
