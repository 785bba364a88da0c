//! Charges, Clifford identities, lattice scans and CKM mixing, driven
//! through the public API.

use circlette::algebra::{verify, DiracTriple, CLIFFORD_TOLERANCE};
use circlette::catalogue::{electric_charge, Catalogue};
use circlette::charge::{AnomalySums, QuantumNumbers, Traces, WeinbergAnalysis};
use circlette::constraint::{valid_set, valid_states, with_reversals};
use circlette::fit::{fit, FitConfig, ModelKind, RingDistance};
use circlette::lattice::{scan, Lattice, ScanConfig, SymmetryPoint};
use circlette::mixing::{
    build_mass_matrix, ckm_from_mass_matrices, CouplingPattern, DOWN_MASSES_MEV, UP_MASSES_MEV,
};
use num_rational::Rational64;

// =============================================================================
// Charges
// =============================================================================

#[test]
fn catalogue_charge_matches_quantum_numbers() {
    for p in Catalogue::global().iter() {
        let qn = QuantumNumbers::of(p.state);
        assert_eq!(p.charge, qn.q, "{}", p.name);
        assert_eq!(electric_charge(p.state), qn.q);
        // Gell-Mann–Nishijima.
        assert_eq!(qn.q, qn.t3 + qn.y / Rational64::from_integer(2), "{}", p.name);
    }
}

#[test]
fn reversal_images_spoil_the_traces() {
    let traces = Traces::over(valid_states());
    let doubled = Traces::over(with_reversals(&valid_set()).iter());
    assert_ne!(traces, doubled);
    assert!(AnomalySums::over(valid_states()).cancels());
}

#[test]
fn weinberg_normalisation_needs_a_small_k() {
    let w = WeinbergAnalysis::compute(0.25);
    let k = 0.25 * 6.0 / (0.75 * 10.0);
    assert!((w.k_needed - k).abs() < 1e-12);
    assert!(w.nearby.iter().any(|f| f.k == Rational64::new(1, 5)));
    let best = &w.nearby[0];
    assert_eq!(best.k, Rational64::new(1, 5));
    assert!(best.deviation < 1e-12);
}

// =============================================================================
// Algebra And Lattice
// =============================================================================

#[test]
fn clifford_identities_and_perturbation() {
    let standard = verify(&DiracTriple::standard(), CLIFFORD_TOLERANCE);
    assert!(standard.all_passed());
    assert_eq!(standard.checks.len(), 7);
    let broken = verify(&DiracTriple::standard().perturbed(), CLIFFORD_TOLERANCE);
    assert!(!broken.all_passed());
    assert!(broken.max_error() > 0.1);
}

#[test]
fn doubling_across_lattices() {
    let d = DiracTriple::standard();
    let config = ScanConfig::default();
    let naive = scan(&Lattice::NAIVE, &d, &config);
    let wilson = scan(&Lattice::WILSON, &d, &config);
    let octagon = scan(&Lattice::OCTAGON, &d, &config);
    assert_eq!((naive.count(), wilson.count(), octagon.count()), (4, 1, 4));
    assert_eq!(wilson.doublers(), 0);
    let mut corners: Vec<SymmetryPoint> = naive.points.iter().map(|p| p.location).collect();
    corners.sort_by_key(|p| *p as u8);
    assert_eq!(
        corners,
        [
            SymmetryPoint::Gamma,
            SymmetryPoint::X,
            SymmetryPoint::Y,
            SymmetryPoint::M
        ]
    );
}

#[test]
fn coarse_grid_still_finds_gamma() {
    let config = ScanConfig {
        grid: 16,
        ..ScanConfig::default()
    };
    let s = scan(&Lattice::WILSON, &DiracTriple::standard(), &config);
    assert_eq!(s.count(), 1);
    assert!(s.points[0].location.is_physical());
}

// =============================================================================
// Mixing
// =============================================================================

#[test]
fn ring_distance_couplings_decay() {
    let eps = RingDistance::couplings(2.0, 10.0);
    let by_pattern: Vec<u32> = CouplingPattern::ALL.iter().map(|p| p.ring_distance()).collect();
    assert_eq!(by_pattern, [3, 4, 7]);
    assert!(eps[0] > eps[1] && eps[1] > eps[2]);
}

#[test]
fn physical_masses_with_small_couplings() {
    let up = build_mass_matrix([1.0, 0.5, 20.0], UP_MASSES_MEV, [0.0, 0.3, 0.0]);
    let down = build_mass_matrix([10.0, 2.0, 50.0], DOWN_MASSES_MEV, [0.0, 0.0, 0.0]);
    let sol = ckm_from_mass_matrices(&up, &down).expect("finite");
    assert!(sol.unitarity_error() < 1e-10);
    let mags = sol.magnitudes();
    for (i, row) in mags.iter().enumerate() {
        assert!(row[i] > 0.9, "row {i} not diagonal-dominated: {row:?}");
    }
    assert!(sol.jarlskog().is_finite());
}

#[test]
fn small_ring_distance_fit() {
    let mut config = FitConfig::for_model(ModelKind::RingDistance);
    config.restarts = 6;
    config.nelder_mead.max_iter = 1500;
    let a = fit(&config).expect("fit");
    let b = fit(&config).expect("fit");
    assert_eq!(a.params.len(), 3);
    assert_eq!(a.params, b.params);
    assert!(a.error.is_finite());
    assert!((a.rms - (a.error / 9.0).sqrt()).abs() < 1e-15);
}
