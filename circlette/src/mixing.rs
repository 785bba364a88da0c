//! Quark mass matrices and the CKM mixing matrix.
//!
//! Generation mixing enters through three off-diagonal couplings, each
//! confined to the pair of generations a single generation-bit flip can
//! connect:
//!
//! | Pattern | Flip | Couples |
//! |---------|------|---------|
//! | `G0`    | G0   | 1 ↔ 2   |
//! | `G1`    | G1   | 1 ↔ 3   |
//! | `G0G1`  | both | 2 ↔ 3   |
//!
//! [`ckm_from_mass_matrices`] diagonalises `M·M†` for each sector and
//! returns `V = U_up† · U_down` with a real non-negative diagonal.

use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Measured CKM magnitudes (PDG 2024).
pub const CKM_EXPERIMENTAL: [[f64; 3]; 3] = [
    [0.97435, 0.22500, 0.00369],
    [0.22486, 0.97349, 0.04182],
    [0.00857, 0.04110, 0.99912],
];

/// Up-type running masses u, c, t in MeV.
pub const UP_MASSES_MEV: [f64; 3] = [2.16, 1270.0, 172_760.0];

/// Down-type running masses d, s, b in MeV.
pub const DOWN_MASSES_MEV: [f64; 3] = [4.67, 93.4, 4180.0];

/// Iteration limit for the Hermitian eigensolver.
const EIGEN_MAX_ITER: usize = 10_000;

/// Errors from the mixing pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MixingError {
    /// An input matrix held NaN or infinity.
    #[error("{sector} mass matrix has non-finite entries")]
    NonFinite {
        /// `"up"` or `"down"`.
        sector: &'static str,
    },
    /// The eigensolver did not converge.
    #[error("eigendecomposition of the {sector} sector did not converge")]
    NoConvergence {
        /// `"up"` or `"down"`.
        sector: &'static str,
    },
    /// A model received the wrong number of parameters.
    #[error("expected {expected} parameters, got {found}")]
    ParameterCount {
        /// Parameters the model takes.
        expected: usize,
        /// Parameters supplied.
        found: usize,
    },
}

/// Off-diagonal sparsity pattern of one coupling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CouplingPattern {
    /// Generations 1 ↔ 2.
    G0,
    /// Generations 1 ↔ 3.
    G1,
    /// Generations 2 ↔ 3.
    G0G1,
}

impl CouplingPattern {
    /// In the order couplings and phases are passed around.
    pub const ALL: [Self; 3] = [Self::G0, Self::G1, Self::G0G1];

    /// Zero-based generation indices coupled.
    #[must_use]
    pub const fn pair(self) -> (usize, usize) {
        match self {
            Self::G0 => (0, 1),
            Self::G1 => (0, 2),
            Self::G0G1 => (1, 2),
        }
    }

    /// Ring distance the flip spans (3, 4 and 7 hops).
    #[must_use]
    pub const fn ring_distance(self) -> u32 {
        match self {
            Self::G0 => 3,
            Self::G1 => 4,
            Self::G0G1 => 7,
        }
    }
}

/// `diag(masses) + Σₖ εₖ·e^{iφₖ}·Pₖ` with `Pₖ` the symmetric pattern of
/// [`CouplingPattern::ALL`]`[k]`.
#[must_use]
pub fn build_mass_matrix(
    couplings: [f64; 3],
    masses: [f64; 3],
    phases: [f64; 3],
) -> Matrix3<Complex64> {
    let diag = Vector3::from(masses.map(|x| Complex64::new(x, 0.0)));
    let mut m = Matrix3::from_diagonal(&diag);
    for ((pattern, eps), phi) in CouplingPattern::ALL.iter().zip(couplings).zip(phases) {
        let (i, j) = pattern.pair();
        let z = Complex64::from_polar(eps, phi);
        m[(i, j)] += z;
        m[(j, i)] += z;
    }
    m
}

fn is_finite(m: &Matrix3<Complex64>) -> bool {
    m.iter().all(|z| z.re.is_finite() && z.im.is_finite())
}

/// Eigen-decomposes `M·M†`, ascending. Returns masses `√|λ|` and the
/// matching eigenvector columns.
fn diagonalise(
    m: &Matrix3<Complex64>,
    sector: &'static str,
) -> Result<([f64; 3], Matrix3<Complex64>), MixingError> {
    if !is_finite(m) {
        return Err(MixingError::NonFinite { sector });
    }
    let h = m * m.adjoint();
    let eig = SymmetricEigen::try_new(h, f64::EPSILON, EIGEN_MAX_ITER)
        .ok_or(MixingError::NoConvergence { sector })?;
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));
    let masses = order.map(|k| eig.eigenvalues[k].abs().sqrt());
    let u = Matrix3::from_fn(|r, c| eig.eigenvectors[(r, order[c])]);
    if !is_finite(&u) {
        return Err(MixingError::NoConvergence { sector });
    }
    Ok((masses, u))
}

/// A CKM matrix with the sector masses it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct MixingSolution {
    /// The mixing matrix, diagonal real and non-negative.
    pub v: Matrix3<Complex64>,
    /// Up-type masses, ascending.
    pub masses_up: [f64; 3],
    /// Down-type masses, ascending.
    pub masses_down: [f64; 3],
}

impl MixingSolution {
    /// `|V_ij|`.
    #[must_use]
    pub fn magnitudes(&self) -> [[f64; 3]; 3] {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, x) in row.iter_mut().enumerate() {
                *x = self.v[(i, j)].norm();
            }
        }
        out
    }

    /// `max |V·V† − I|`.
    #[must_use]
    pub fn unitarity_error(&self) -> f64 {
        let d = self.v * self.v.adjoint() - Matrix3::identity();
        d.iter().map(|z| z.norm()).fold(0.0, f64::max)
    }

    /// `Im(V₀₀ V₁₁ V₀₁* V₁₀*)`.
    #[must_use]
    pub fn jarlskog(&self) -> f64 {
        let v = &self.v;
        (v[(0, 0)] * v[(1, 1)] * v[(0, 1)].conj() * v[(1, 0)].conj()).im
    }

    /// Wolfenstein `λ = |V₀₁|`.
    #[must_use]
    pub fn wolfenstein_lambda(&self) -> f64 {
        self.v[(0, 1)].norm()
    }

    /// Wolfenstein `A = |V₁₂| / λ²`.
    #[must_use]
    pub fn wolfenstein_a(&self) -> f64 {
        let lambda = self.wolfenstein_lambda();
        self.v[(1, 2)].norm() / (lambda * lambda)
    }

    /// `Σ (|V_ij| − target_ij)²`.
    #[must_use]
    pub fn squared_error(&self, target: &[[f64; 3]; 3]) -> f64 {
        self.magnitudes()
            .iter()
            .flatten()
            .zip(target.iter().flatten())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Plain-data view for reports.
    #[must_use]
    pub fn summary(&self) -> MixingSummary {
        MixingSummary {
            magnitudes: self.magnitudes(),
            masses_up: self.masses_up,
            masses_down: self.masses_down,
            unitarity_error: self.unitarity_error(),
            jarlskog: self.jarlskog(),
            wolfenstein_lambda: self.wolfenstein_lambda(),
            wolfenstein_a: self.wolfenstein_a(),
        }
    }
}

/// Serialisable observables of a [`MixingSolution`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixingSummary {
    /// `|V_ij|`.
    pub magnitudes: [[f64; 3]; 3],
    /// Up-type masses.
    pub masses_up: [f64; 3],
    /// Down-type masses.
    pub masses_down: [f64; 3],
    /// `max |V·V† − I|`.
    pub unitarity_error: f64,
    /// Jarlskog invariant.
    pub jarlskog: f64,
    /// Wolfenstein λ.
    pub wolfenstein_lambda: f64,
    /// Wolfenstein A.
    pub wolfenstein_a: f64,
}

/// Mixing matrix between the mass bases of two sectors.
///
/// # Errors
///
/// [`MixingError::NonFinite`] if either input has a NaN or infinite entry,
/// [`MixingError::NoConvergence`] if the eigensolver fails.
///
/// # Example
///
/// ```
/// use circlette::mixing::{build_mass_matrix, ckm_from_mass_matrices};
///
/// let up = build_mass_matrix([0.0; 3], [1.0, 2.0, 3.0], [0.0; 3]);
/// let down = build_mass_matrix([0.0; 3], [4.0, 5.0, 6.0], [0.0; 3]);
/// let sol = ckm_from_mass_matrices(&up, &down).unwrap();
/// assert!((sol.v[(0, 0)].re - 1.0).abs() < 1e-12);
/// assert!((sol.masses_down[2] - 6.0).abs() < 1e-12);
/// ```
pub fn ckm_from_mass_matrices(
    up: &Matrix3<Complex64>,
    down: &Matrix3<Complex64>,
) -> Result<MixingSolution, MixingError> {
    let (masses_up, u_up) = diagonalise(up, "up")?;
    let (masses_down, u_down) = diagonalise(down, "down")?;
    let mut v = u_up.adjoint() * u_down;
    for i in 0..3 {
        let rot = Complex64::from_polar(1.0, -v[(i, i)].arg());
        for j in 0..3 {
            v[(i, j)] *= rot;
        }
    }
    Ok(MixingSolution {
        v,
        masses_up,
        masses_down,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_matrix_patterns() {
        let m = build_mass_matrix([1.0, 2.0, 3.0], [10.0, 20.0, 30.0], [0.0; 3]);
        assert_eq!(m[(0, 1)], Complex64::new(1.0, 0.0));
        assert_eq!(m[(1, 0)], m[(0, 1)]);
        assert_eq!(m[(0, 2)], Complex64::new(2.0, 0.0));
        assert_eq!(m[(1, 2)], Complex64::new(3.0, 0.0));
        assert_eq!(m[(1, 1)], Complex64::new(20.0, 0.0));
    }

    #[test]
    fn phase_rotates_coupling() {
        let quarter = core::f64::consts::FRAC_PI_2;
        let m = build_mass_matrix([0.0, 2.0, 0.0], [1.0; 3], [0.0, quarter, 0.0]);
        assert!(m[(0, 2)].re.abs() < 1e-15);
        assert!((m[(0, 2)].im - 2.0).abs() < 1e-15);
        assert_eq!(m[(0, 1)], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn diagonal_inputs_give_identity() {
        let up = build_mass_matrix([0.0; 3], UP_MASSES_MEV, [0.0; 3]);
        let down = build_mass_matrix([0.0; 3], DOWN_MASSES_MEV, [0.0; 3]);
        let sol = ckm_from_mass_matrices(&up, &down).expect("finite input");
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((sol.v[(i, j)].norm() - expected).abs() < 1e-9);
            }
        }
        for (got, want) in sol.masses_up.iter().zip(UP_MASSES_MEV) {
            assert!((got - want).abs() / want < 1e-6);
        }
        assert!(sol.jarlskog().abs() < 1e-15);
    }

    #[test]
    fn coupled_sectors_are_unitary() {
        let up = build_mass_matrix([30.0, 5.0, 800.0], UP_MASSES_MEV, [0.3, 1.1, 2.0]);
        let down = build_mass_matrix([20.0, 8.0, 150.0], DOWN_MASSES_MEV, [0.0, 0.7, 0.0]);
        let sol = ckm_from_mass_matrices(&up, &down).expect("finite input");
        assert!(sol.unitarity_error() < 1e-8);
        for i in 0..3 {
            assert!(sol.v[(i, i)].re >= 0.0);
            assert!(sol.v[(i, i)].im.abs() < 1e-12);
        }
        assert!(sol.masses_down.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn non_finite_rejected() {
        let good = build_mass_matrix([0.0; 3], [1.0, 2.0, 3.0], [0.0; 3]);
        let bad = build_mass_matrix([f64::NAN, 0.0, 0.0], [1.0, 2.0, 3.0], [0.0; 3]);
        assert_eq!(
            ckm_from_mass_matrices(&good, &bad),
            Err(MixingError::NonFinite { sector: "down" })
        );
        let inf = build_mass_matrix([0.0; 3], [f64::INFINITY, 2.0, 3.0], [0.0; 3]);
        assert!(ckm_from_mass_matrices(&inf, &good).is_err());
    }

    #[test]
    fn squared_error_against_self_is_zero() {
        let up = build_mass_matrix([10.0, 1.0, 100.0], UP_MASSES_MEV, [0.0; 3]);
        let down = build_mass_matrix([5.0, 1.0, 50.0], DOWN_MASSES_MEV, [0.0; 3]);
        let sol = ckm_from_mass_matrices(&up, &down).expect("finite input");
        assert!(sol.squared_error(&sol.magnitudes()) < 1e-30);
        assert!(sol.squared_error(&CKM_EXPERIMENTAL) > 0.0);
    }
}
