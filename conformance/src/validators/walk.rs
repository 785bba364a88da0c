//! Quantum-walk validator.
//!
//! A massive walk must conserve probability, stay centred and track the
//! spreading Schrödinger Gaussian. A massless walk must split into two
//! lumps separated by two sites per tick.

use circlette::walk::{simulate_massive, simulate_massless, WalkConfig, NORM_TOLERANCE};

use crate::report::{ConformanceReport, TestResult};

/// Smallest acceptable walk/Schrödinger overlap.
const OVERLAP_THRESHOLD: f64 = 0.95;

const CONFIG: WalkConfig = WalkConfig {
    sites: 2_000,
    steps: 400,
    theta: 0.05,
    sigma0: 30.0,
};

/// Validates both walks.
pub fn validate() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    validate_massive(&mut report);
    validate_massless(&mut report);
    report
}

fn validate_massive(report: &mut ConformanceReport) {
    let validator = "walk/massive";
    let d = match simulate_massive(&CONFIG) {
        Ok(walk) => walk.diagnostics,
        Err(e) => {
            report.push(TestResult::fail(validator, format!("Walk rejected: {e}")));
            return;
        }
    };
    let drift = (d.final_norm - d.initial_norm).abs();
    report.push(TestResult::check(
        validator,
        drift < NORM_TOLERANCE,
        format!("Norm drift {drift:.1e} over {} ticks", CONFIG.steps),
    ));
    report.push(TestResult::check(
        validator,
        d.centred,
        format!("Peak at site {} (start {})", d.peak, CONFIG.sites / 2),
    ));
    report.push(TestResult::check(
        validator,
        d.overlap > OVERLAP_THRESHOLD,
        format!(
            "Overlap with Schrödinger width σ(t) = {:.1}: {:.4}",
            d.sigma_t, d.overlap
        ),
    ));
}

fn validate_massless(report: &mut ConformanceReport) {
    let validator = "walk/massless";
    let d = match simulate_massless(&CONFIG) {
        Ok(walk) => walk.diagnostics,
        Err(e) => {
            report.push(TestResult::fail(validator, format!("Walk rejected: {e}")));
            return;
        }
    };
    if d.separation == d.expected_separation {
        report.push(TestResult::pass(
            validator,
            format!("Movers {} sites apart after {} ticks", d.separation, CONFIG.steps),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            validator,
            format!(
                "Wrong separation: expected {}, got {}",
                d.expected_separation, d.separation
            ),
            vec![format!("right peak {}, left peak {}", d.right_peak, d.left_peak)],
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_conforms() {
        let report = validate();
        assert!(report.all_passed(), "{:#?}", report.results);
        assert_eq!(report.results.len(), 4);
    }
}
