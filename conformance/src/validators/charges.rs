//! Charge-sector validator: traces, anomaly cancellation and the Weinberg
//! angle ratios.

use circlette::charge::{anomalies_by_generation, AnomalySums, Traces, WeinbergAnalysis};
use circlette::constraint::valid_states;
use num_rational::Rational64;

use crate::report::{ConformanceReport, TestResult};

/// Validates the charge sector.
pub fn validate() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    validate_traces(&mut report);
    validate_anomalies(&mut report);
    validate_weinberg(&mut report);
    report
}

fn validate_traces(report: &mut ConformanceReport) {
    let validator = "charges/traces";
    let t = Traces::over(valid_states());
    let expected = [
        ("ΣQ", t.sum_q, Rational64::from_integer(0)),
        ("ΣQ²", t.sum_q2, Rational64::from_integer(16)),
        ("ΣT₃²", t.sum_t3_sq, Rational64::from_integer(6)),
        ("Σ(Y/2)²", t.sum_half_y_sq, Rational64::from_integer(10)),
    ];
    for (label, actual, want) in expected {
        report.push(TestResult::check(
            validator,
            actual == want,
            format!("{label} = {actual} (expected {want})"),
        ));
    }
}

fn push_anomalies(report: &mut ConformanceReport, validator: &str, scope: &str, sums: &AnomalySums) {
    let nonzero: Vec<String> = sums
        .named()
        .iter()
        .filter(|(_, v)| *v != Rational64::from_integer(0))
        .map(|(name, v)| format!("{name} = {v}"))
        .collect();
    if nonzero.is_empty() {
        report.push(TestResult::pass(
            validator,
            format!("All anomaly sums vanish for {scope}"),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            validator,
            format!("{} anomaly sums do not vanish for {scope}", nonzero.len()),
            nonzero,
        ));
    }
}

fn validate_anomalies(report: &mut ConformanceReport) {
    let validator = "charges/anomalies";
    push_anomalies(
        report,
        validator,
        "the full spectrum",
        &AnomalySums::over(valid_states()),
    );
    for (g, sums) in anomalies_by_generation().iter().enumerate() {
        push_anomalies(report, validator, &format!("generation {}", g + 1), sums);
    }
}

fn validate_weinberg(report: &mut ConformanceReport) {
    let validator = "charges/weinberg";
    let w = WeinbergAnalysis::experimental();
    report.push(TestResult::check(
        validator,
        w.gut_ratio == Rational64::new(3, 8),
        format!("GUT trace ratio ΣT₃²/ΣQ² = {}", w.gut_ratio),
    ));
    report.push(TestResult::check(
        validator,
        w.su5_ratio == Rational64::new(1, 2),
        format!("SU(5)-normalised hypercharge ratio = {}", w.su5_ratio),
    ));
    let details = w
        .nearby
        .iter()
        .take(5)
        .map(|f| format!("k = {} gives sin²θ_W = {:.5} ({:.3}%)", f.k, f.sin2, 100.0 * f.deviation))
        .collect();
    report.push(
        TestResult::pass(
            validator,
            format!(
                "Normalisation k = {:.5} reaches sin²θ_W = {}",
                w.k_needed, w.target
            ),
        )
        .with_details(details),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charges_conform() {
        let report = validate();
        assert!(report.all_passed(), "{:#?}", report.results);
        // traces (4) + anomalies (1 + 3) + weinberg (3)
        assert_eq!(report.results.len(), 11);
    }
}
