//! Clifford algebra checks for the 4×4 Dirac matrices built from Pauli
//! matrices.
//!
//! ```text
//! α₁ = σx ⊗ σx    α₂ = σx ⊗ σy    β = σz ⊗ I₂
//! ```
//!
//! The three matrices pairwise anticommute, square to the identity, and
//! their product `α₁α₂` equals `i(I₂ ⊗ σz)`.

use nalgebra::{Matrix2, Matrix4};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Default tolerance for the identity checks.
pub const CLIFFORD_TOLERANCE: f64 = 1e-14;

const fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// 2×2 identity.
#[must_use]
pub fn identity2() -> Matrix2<Complex64> {
    Matrix2::identity()
}

/// Pauli σx.
#[must_use]
pub fn sigma_x() -> Matrix2<Complex64> {
    Matrix2::new(c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0))
}

/// Pauli σy.
#[must_use]
pub fn sigma_y() -> Matrix2<Complex64> {
    Matrix2::new(c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0))
}

/// Pauli σz.
#[must_use]
pub fn sigma_z() -> Matrix2<Complex64> {
    Matrix2::new(c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(-1.0, 0.0))
}

/// Kronecker product of two 2×2 matrices.
#[must_use]
pub fn kron2(a: &Matrix2<Complex64>, b: &Matrix2<Complex64>) -> Matrix4<Complex64> {
    Matrix4::from_fn(|r, col| a[(r / 2, col / 2)] * b[(r % 2, col % 2)])
}

/// Largest entry modulus of `a − b`.
#[must_use]
pub fn max_abs_diff(a: &Matrix4<Complex64>, b: &Matrix4<Complex64>) -> f64 {
    (a - b).iter().map(|z| z.norm()).fold(0.0, f64::max)
}

/// The three Dirac matrices used by the lattice Hamiltonians.
#[derive(Debug, Clone, PartialEq)]
pub struct DiracTriple {
    /// α₁.
    pub alpha1: Matrix4<Complex64>,
    /// α₂.
    pub alpha2: Matrix4<Complex64>,
    /// β.
    pub beta: Matrix4<Complex64>,
}

impl DiracTriple {
    /// The Pauli-product construction.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            alpha1: kron2(&sigma_x(), &sigma_x()),
            alpha2: kron2(&sigma_x(), &sigma_y()),
            beta: kron2(&sigma_z(), &identity2()),
        }
    }

    /// `α₁α₂`.
    #[must_use]
    pub fn product(&self) -> Matrix4<Complex64> {
        self.alpha1 * self.alpha2
    }

    /// Copy with two entries of α₁ swapped.
    #[must_use]
    pub fn perturbed(&self) -> Self {
        let mut out = self.clone();
        out.alpha1.swap((0, 0), (0, 3));
        out
    }
}

impl Default for DiracTriple {
    fn default() -> Self {
        Self::standard()
    }
}

/// One identity check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliffordCheck {
    /// Identity checked, e.g. `{α₁,β} = 0`.
    pub identity: String,
    /// Max-abs residual.
    pub error: f64,
    /// Residual within tolerance.
    pub passed: bool,
}

/// All identity checks for one triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliffordReport {
    /// Tolerance used.
    pub tolerance: f64,
    /// Individual checks.
    pub checks: Vec<CliffordCheck>,
}

impl CliffordReport {
    /// True when every check passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Largest residual.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.checks.iter().map(|c| c.error).fold(0.0, f64::max)
    }
}

/// Checks the anticommutators, squares and product identity.
#[must_use]
pub fn verify(triple: &DiracTriple, tolerance: f64) -> CliffordReport {
    let DiracTriple {
        alpha1: a1,
        alpha2: a2,
        beta: b,
    } = triple;
    let zero = Matrix4::<Complex64>::zeros();
    let id = Matrix4::<Complex64>::identity();
    let i_sigma_z = kron2(&identity2(), &sigma_z()) * c(0.0, 1.0);

    let residuals = [
        ("{α₁,α₂} = 0", max_abs_diff(&(a1 * a2 + a2 * a1), &zero)),
        ("{α₁,β} = 0", max_abs_diff(&(a1 * b + b * a1), &zero)),
        ("{α₂,β} = 0", max_abs_diff(&(a2 * b + b * a2), &zero)),
        ("α₁² = I", max_abs_diff(&(a1 * a1), &id)),
        ("α₂² = I", max_abs_diff(&(a2 * a2), &id)),
        ("β² = I", max_abs_diff(&(b * b), &id)),
        ("α₁α₂ = i(I⊗σz)", max_abs_diff(&(a1 * a2), &i_sigma_z)),
    ];

    CliffordReport {
        tolerance,
        checks: residuals
            .into_iter()
            .map(|(identity, error)| CliffordCheck {
                identity: identity.to_owned(),
                error,
                passed: error <= tolerance,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pauli_algebra() {
        let i = c(0.0, 1.0);
        assert_eq!(sigma_x() * sigma_y(), sigma_z() * i);
        assert_eq!(sigma_x() * sigma_x(), identity2());
    }

    #[test]
    fn kron_layout() {
        let k = kron2(&sigma_z(), &identity2());
        assert_eq!(k[(0, 0)], c(1.0, 0.0));
        assert_eq!(k[(1, 1)], c(1.0, 0.0));
        assert_eq!(k[(2, 2)], c(-1.0, 0.0));
        assert_eq!(k[(0, 2)], c(0.0, 0.0));
    }

    #[test]
    fn standard_triple_passes() {
        let report = verify(&DiracTriple::standard(), CLIFFORD_TOLERANCE);
        assert_eq!(report.checks.len(), 7);
        assert!(report.all_passed(), "{report:?}");
        assert!(report.max_error() <= CLIFFORD_TOLERANCE);
    }

    #[test]
    fn perturbed_triple_fails() {
        let report = verify(&DiracTriple::standard().perturbed(), CLIFFORD_TOLERANCE);
        assert!(!report.all_passed());
    }

    #[test]
    fn matrices_are_hermitian() {
        let t = DiracTriple::standard();
        for m in [&t.alpha1, &t.alpha2, &t.beta] {
            assert_eq!(m.adjoint(), *m);
        }
    }
}
