//! Circlette conformance suite.
//!
//! Runs both pipelines of the `circlette` crate and turns every claimed
//! invariant into a pass, warning or failure. Mismatches are never errors:
//! the report carries them and the caller decides the exit status.
//!
//! # Conformance Scope
//!
//! | Validator | Invariants |
//! |-----------|------------|
//! | `spectrum/*` | 256/45/9/36/3 counts, determinism, catalogue labels, reversal bounds |
//! | `rules/*` | unique canonical winner I3⊕=LQ, cost 36/45, order 2, 18 doublets |
//! | `charges/*` | traces 0/16/6/10, anomaly cancellation, GUT ratio 3/8 |
//! | `algebra/*` | Clifford identities to 1e-14, perturbed triple caught |
//! | `mixing/*` | CKM unitarity to 1e-8, real non-negative diagonal |
//! | `lattice/*` | Dirac points 4 / 1 / 4 |
//! | `walk/*` | norm conservation, Schrödinger spreading, massless separation |
//!
//! # Entry Point
//!
//! ```
//! use circlette_conformance::run_all;
//!
//! let report = run_all();
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

pub use report::{ConformanceReport, Severity, TestResult};

use tracing::info;

/// Runs all conformance validators and returns the aggregated report.
///
/// Validators are run in this order:
/// 1. Spectrum inventory and catalogue
/// 2. Rule search (canonical and exhaustive)
/// 3. Charge traces, anomalies and the Weinberg angle
/// 4. Clifford identities
/// 5. CKM mixing
/// 6. Lattice Dirac points
/// 7. Quantum walks
pub fn run_all() -> ConformanceReport {
    let mut report = ConformanceReport::new();

    // 1. Spectrum
    report.extend(validators::spectrum::validate());

    // 2. Rule search
    report.extend(validators::rules::validate());

    // 3. Charges
    report.extend(validators::charges::validate());

    // 4. Clifford algebra
    report.extend(validators::algebra::validate());

    // 5. Mixing
    report.extend(validators::mixing::validate());

    // 6. Lattice
    report.extend(validators::lattice::validate());

    // 7. Quantum walks
    report.extend(validators::walk::validate());

    info!(
        checks = report.results.len(),
        failures = report.failure_count(),
        warnings = report.count(Severity::Warning),
        "conformance run complete"
    );
    report
}

#[cfg(test)]
mod tests_unit {
    use super::*;

    #[test]
    fn full_suite_passes() {
        let report = run_all();
        let failures: Vec<_> = report
            .results
            .iter()
            .filter(|r| r.is_failure())
            .collect();
        assert!(
            failures.is_empty(),
            "Conformance failures: {:#?}",
            failures
        );
    }

    #[test]
    fn report_serialises() -> Result<(), serde_json::Error> {
        let report = run_all();
        let json = serde_json::to_value(&report)?;
        let results = json["results"].as_array().cloned().unwrap_or_default();
        assert_eq!(results.len(), report.results.len());
        assert!(results
            .iter()
            .any(|r| r["severity"] == "warning" && r["validator"] == "rules/exhaustive"));
        Ok(())
    }
}
