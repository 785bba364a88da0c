//! Lattice validator: Dirac point counts per lattice Hamiltonian.

use circlette::algebra::DiracTriple;
use circlette::lattice::{scan, Lattice, ScanConfig};

use crate::report::{ConformanceReport, TestResult};

/// Expected zero-energy points on the default grid.
const EXPECTED: [(Lattice, usize); 3] = [
    (Lattice::NAIVE, 4),
    (Lattice::WILSON, 1),
    (Lattice::OCTAGON, 4),
];

/// Validates fermion doubling across the lattices.
pub fn validate() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let validator = "lattice/dirac_points";
    let triple = DiracTriple::standard();
    let config = ScanConfig::default();
    for (lattice, expected) in EXPECTED {
        let s = scan(&lattice, &triple, &config);
        let details = s
            .points
            .iter()
            .map(|p| {
                format!(
                    "({:+.3}π, {:+.3}π) gap {:.1e} at {:?}",
                    p.kx / std::f64::consts::PI,
                    p.ky / std::f64::consts::PI,
                    p.gap,
                    p.location
                )
            })
            .collect();
        let result = if s.count() == expected {
            TestResult::pass(
                validator,
                format!(
                    "{}: {} Dirac points ({} doublers)",
                    lattice.name(),
                    s.count(),
                    s.doublers()
                ),
            )
        } else {
            TestResult::fail(
                validator,
                format!(
                    "{}: expected {} Dirac points, found {}",
                    lattice.name(),
                    expected,
                    s.count()
                ),
            )
        };
        report.push(result.with_details(details));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_conforms() {
        let report = validate();
        assert!(report.all_passed(), "{:#?}", report.results);
        assert_eq!(report.results[1].details.len(), 1);
    }
}
