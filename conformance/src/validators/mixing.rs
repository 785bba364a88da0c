//! Mixing validator.
//!
//! Builds mass matrices over a fixed sweep of couplings and phases and
//! checks the CKM phase convention and unitarity on each. Non-finite input
//! and wrong-length model parameters must be rejected.

use circlette::fit::{CkmModel, SharedCoupling};
use circlette::mixing::{
    build_mass_matrix, ckm_from_mass_matrices, MixingError, DOWN_MASSES_MEV, UP_MASSES_MEV,
};

use crate::report::{ConformanceReport, TestResult};

const UNITARITY_TOLERANCE: f64 = 1e-8;
const DIAGONAL_IM_TOLERANCE: f64 = 1e-9;

/// Coupling and phase sweep, physical masses.
const SWEEP: [([f64; 3], [f64; 3], [f64; 3], [f64; 3]); 4] = [
    ([0.0; 3], [0.0; 3], [0.0; 3], [0.0; 3]),
    ([1.0, 0.5, 20.0], [0.0, 0.3, 0.0], [10.0, 2.0, 50.0], [0.0; 3]),
    ([50.0, -30.0, 400.0], [1.0, 2.0, 3.0], [-8.0, 12.0, 90.0], [0.5, 4.0, 1.5]),
    ([500.0, 500.0, 500.0], [3.0, 0.1, 5.9], [-500.0, 250.0, -125.0], [6.0, 2.0, 0.2]),
];

/// Validates the mixing solver.
pub fn validate() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    validate_sweep(&mut report);
    validate_rejection(&mut report);
    report
}

fn validate_sweep(report: &mut ConformanceReport) {
    let validator = "mixing/ckm";
    for (i, (eu, pu, ed, pd)) in SWEEP.iter().enumerate() {
        let up = build_mass_matrix(*eu, UP_MASSES_MEV, *pu);
        let down = build_mass_matrix(*ed, DOWN_MASSES_MEV, *pd);
        let sol = match ckm_from_mass_matrices(&up, &down) {
            Ok(sol) => sol,
            Err(e) => {
                report.push(TestResult::fail(validator, format!("Case {i}: {e}")));
                continue;
            }
        };
        let unitarity = sol.unitarity_error();
        report.push(TestResult::check(
            validator,
            unitarity < UNITARITY_TOLERANCE,
            format!("Case {i}: max|VV† − I| = {unitarity:.1e}"),
        ));
        let bad: Vec<String> = (0..3)
            .map(|k| (k, sol.v[(k, k)]))
            .filter(|(_, z)| z.re < 0.0 || z.im.abs() > DIAGONAL_IM_TOLERANCE)
            .map(|(k, z)| format!("V[{k}{k}] = {z}"))
            .collect();
        if bad.is_empty() {
            report.push(TestResult::pass(
                validator,
                format!("Case {i}: diagonal real and non-negative"),
            ));
        } else {
            report.push(TestResult::fail_with_details(
                validator,
                format!("Case {i}: phase convention broken"),
                bad,
            ));
        }
    }
}

fn validate_rejection(report: &mut ConformanceReport) {
    let validator = "mixing/rejection";
    let up = build_mass_matrix([f64::NAN, 0.0, 0.0], UP_MASSES_MEV, [0.0; 3]);
    let down = build_mass_matrix([0.0; 3], DOWN_MASSES_MEV, [0.0; 3]);
    match ckm_from_mass_matrices(&up, &down) {
        Err(MixingError::NonFinite { sector }) => report.push(TestResult::pass(
            validator,
            format!("Non-finite {sector} matrix rejected"),
        )),
        Err(e) => report.push(TestResult::fail(
            validator,
            format!("Wrong error for non-finite input: {e}"),
        )),
        Ok(_) => report.push(TestResult::fail(
            validator,
            "Non-finite input accepted",
        )),
    }
    match SharedCoupling::default().solve(&[0.0; 2]) {
        Err(MixingError::ParameterCount { expected, found }) => report.push(TestResult::pass(
            validator,
            format!("Short parameter vector rejected ({found} of {expected})"),
        )),
        Err(e) => report.push(TestResult::fail(
            validator,
            format!("Wrong error for short parameters: {e}"),
        )),
        Ok(_) => report.push(TestResult::fail(
            validator,
            "Short parameter vector accepted",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixing_conforms() {
        let report = validate();
        assert!(report.all_passed(), "{:#?}", report.results);
        assert_eq!(report.results.len(), 2 * SWEEP.len() + 2);
    }
}
