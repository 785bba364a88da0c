//! Two-dimensional lattice Hamiltonians and Brillouin-zone scans.
//!
//! Each Hamiltonian is a 4×4 Hermitian matrix built from the Dirac triple
//! of [`crate::algebra`]. A scan samples the periodic zone on an `N × N`
//! grid, marks cells whose smallest `|E|` is below a threshold, and groups
//! marked cells into 4-connected clusters. Each cluster is one Dirac point.
//!
//! | Lattice | Dirac points |
//! |---------|--------------|
//! | naive, `m = 0` | 4 |
//! | Wilson, `r > 0` | 1 |
//! | 4.8.8, `m = 0` | 4 |
//! | symmetric diagonal, `r > 0` | 2 |

use core::f64::consts::PI;

use nalgebra::{Matrix4, SymmetricEigen};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::algebra::{identity2, kron2, sigma_z, DiracTriple};

const EIGEN_MAX_ITER: usize = 10_000;

/// Default scan resolution per axis.
pub const DEFAULT_GRID: usize = 64;

/// Default `|E|` threshold for a zero-energy cell.
pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// Tolerance, in units of π, when naming high-symmetry points.
pub const SYMMETRY_TOLERANCE: f64 = 0.15;

/// A lattice Hamiltonian family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Lattice {
    /// `α₁ sin kx + α₂ sin ky + mβ`.
    Naive {
        /// Bare mass.
        mass: f64,
    },
    /// Naive plus the Wilson mass `r(2 − cos kx − cos ky)`.
    Wilson {
        /// Bare mass.
        mass: f64,
        /// Wilson parameter.
        r: f64,
    },
    /// 4.8.8 tiling: nearest-neighbour `t₁` plus diagonal hops through
    /// the interstitial squares, `4t₂ sin kx sin ky · (−iα₁α₂)`.
    Octagon {
        /// Nearest-neighbour hopping.
        t1: f64,
        /// Diagonal hopping.
        t2: f64,
        /// Bare mass.
        mass: f64,
    },
    /// Diagonal hops coupling to β with mass `r(1 − cos kx cos ky)`.
    /// Gaps the X and Y doublers but not M.
    SymmetricDiagonal {
        /// Bare mass.
        mass: f64,
        /// Diagonal Wilson parameter.
        r: f64,
    },
}

impl Lattice {
    /// Naive square lattice, massless.
    pub const NAIVE: Self = Self::Naive { mass: 0.0 };

    /// Wilson fermions with `r = 1`.
    pub const WILSON: Self = Self::Wilson { mass: 0.0, r: 1.0 };

    /// 4.8.8 with `t₁ = 1`, `t₂ = 0.5`.
    pub const OCTAGON: Self = Self::Octagon {
        t1: 1.0,
        t2: 0.5,
        mass: 0.0,
    };

    /// Short name for reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Naive { .. } => "naive",
            Self::Wilson { .. } => "wilson",
            Self::Octagon { .. } => "4.8.8",
            Self::SymmetricDiagonal { .. } => "symmetric-diagonal",
        }
    }

    /// Bloch Hamiltonian at `(kx, ky)`.
    #[must_use]
    pub fn hamiltonian(&self, d: &DiracTriple, kx: f64, ky: f64) -> Matrix4<Complex64> {
        let re = |x: f64| Complex64::new(x, 0.0);
        let (sx, sy) = (kx.sin(), ky.sin());
        let kinetic = |t: f64| d.alpha1 * re(t * sx) + d.alpha2 * re(t * sy);
        match *self {
            Self::Naive { mass } => kinetic(1.0) + d.beta * re(mass),
            Self::Wilson { mass, r } => {
                let m = mass + r * (2.0 - kx.cos() - ky.cos());
                kinetic(1.0) + d.beta * re(m)
            }
            Self::Octagon { t1, t2, mass } => {
                // −iα₁α₂ = I⊗σz
                let nnn = kron2(&identity2(), &sigma_z());
                kinetic(t1) + nnn * re(4.0 * t2 * sx * sy) + d.beta * re(mass)
            }
            Self::SymmetricDiagonal { mass, r } => {
                let m = mass + r * (1.0 - kx.cos() * ky.cos());
                kinetic(1.0) + d.beta * re(m)
            }
        }
    }

    /// Ascending eigenvalues at `(kx, ky)`. All NaN if the solver fails.
    #[must_use]
    pub fn energies(&self, d: &DiracTriple, kx: f64, ky: f64) -> [f64; 4] {
        let h = self.hamiltonian(d, kx, ky);
        match SymmetricEigen::try_new(h, f64::EPSILON, EIGEN_MAX_ITER) {
            Some(eig) => {
                let mut e = [
                    eig.eigenvalues[0],
                    eig.eigenvalues[1],
                    eig.eigenvalues[2],
                    eig.eigenvalues[3],
                ];
                e.sort_by(f64::total_cmp);
                e
            }
            None => [f64::NAN; 4],
        }
    }

    /// Smallest `|E|` at `(kx, ky)`.
    #[must_use]
    pub fn gap(&self, d: &DiracTriple, kx: f64, ky: f64) -> f64 {
        self.energies(d, kx, ky)
            .iter()
            .map(|e| e.abs())
            .fold(f64::INFINITY, f64::min)
    }
}

/// Named points of the square Brillouin zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymmetryPoint {
    /// `(0, 0)`, the physical fermion.
    Gamma,
    /// `(π, 0)`.
    X,
    /// `(0, π)`.
    Y,
    /// `(π, π)`.
    M,
    /// Anywhere else.
    Other,
}

impl SymmetryPoint {
    /// Names a momentum, tolerance in units of π.
    #[must_use]
    pub fn classify(kx: f64, ky: f64, tolerance: f64) -> Self {
        let (x, y) = ((kx / PI).abs(), (ky / PI).abs());
        let near = |v: f64, target: f64| (v - target).abs() < tolerance;
        match (near(x, 0.0), near(x, 1.0), near(y, 0.0), near(y, 1.0)) {
            (true, _, true, _) => Self::Gamma,
            (_, true, true, _) => Self::X,
            (true, _, _, true) => Self::Y,
            (_, true, _, true) => Self::M,
            _ => Self::Other,
        }
    }

    /// True for Γ.
    #[must_use]
    pub const fn is_physical(self) -> bool {
        matches!(self, Self::Gamma)
    }
}

/// Scan settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Samples per axis.
    pub grid: usize,
    /// `|E|` below which a cell counts as zero-energy.
    pub threshold: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            grid: DEFAULT_GRID,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// One zero-energy cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiracPoint {
    /// kx of the cluster's lowest-gap cell.
    pub kx: f64,
    /// ky of the cluster's lowest-gap cell.
    pub ky: f64,
    /// Smallest `|E|` in the cluster.
    pub gap: f64,
    /// Cells in the cluster.
    pub cells: usize,
    /// High-symmetry label.
    pub location: SymmetryPoint,
}

/// Result of a Brillouin-zone scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrillouinScan {
    /// Lattice scanned.
    pub lattice: Lattice,
    /// Settings used.
    pub config: ScanConfig,
    /// Clusters found, in row-major discovery order.
    pub points: Vec<DiracPoint>,
}

impl BrillouinScan {
    /// Number of Dirac points.
    #[must_use]
    pub fn count(&self) -> usize {
        self.points.len()
    }

    /// Dirac points away from Γ.
    #[must_use]
    pub fn doublers(&self) -> usize {
        self.points
            .iter()
            .filter(|p| !p.location.is_physical())
            .count()
    }
}

/// Grid momentum `−π + 2πi/N`.
#[must_use]
pub fn grid_momentum(i: usize, n: usize) -> f64 {
    -PI + 2.0 * PI * i as f64 / n as f64
}

/// Scans the periodic zone for zero-energy clusters.
#[must_use]
pub fn scan(lattice: &Lattice, triple: &DiracTriple, config: &ScanConfig) -> BrillouinScan {
    let n = config.grid;
    let gaps: Vec<f64> = (0..n * n)
        .map(|idx| {
            let (row, col) = (idx / n, idx % n);
            lattice.gap(triple, grid_momentum(col, n), grid_momentum(row, n))
        })
        .collect();
    let zero: Vec<bool> = gaps.iter().map(|g| *g < config.threshold).collect();

    let mut seen = vec![false; n * n];
    let mut points = Vec::new();
    let mut stack = Vec::new();
    for start in 0..n * n {
        if !zero[start] || seen[start] {
            continue;
        }
        seen[start] = true;
        stack.push(start);
        let mut cells = 0;
        let mut best = start;
        while let Some(idx) = stack.pop() {
            cells += 1;
            if gaps[idx] < gaps[best] {
                best = idx;
            }
            let (row, col) = (idx / n, idx % n);
            let neighbours = [
                ((row + n - 1) % n) * n + col,
                ((row + 1) % n) * n + col,
                row * n + (col + n - 1) % n,
                row * n + (col + 1) % n,
            ];
            for nb in neighbours {
                if zero[nb] && !seen[nb] {
                    seen[nb] = true;
                    stack.push(nb);
                }
            }
        }
        let (kx, ky) = (grid_momentum(best % n, n), grid_momentum(best / n, n));
        points.push(DiracPoint {
            kx,
            ky,
            gap: gaps[best],
            cells,
            location: SymmetryPoint::classify(kx, ky, SYMMETRY_TOLERANCE),
        });
    }

    BrillouinScan {
        lattice: *lattice,
        config: *config,
        points,
    }
}

/// Bands sampled along Γ → X → M → Γ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPath {
    /// Cumulative path length at each sample.
    pub k: Vec<f64>,
    /// Sorted energies at each sample.
    pub energies: Vec<[f64; 4]>,
    /// Path length at Γ, X, M and the closing Γ.
    pub ticks: [f64; 4],
}

/// Samples the high-symmetry path with `per_segment` points per leg.
#[must_use]
pub fn band_path(lattice: &Lattice, triple: &DiracTriple, per_segment: usize) -> BandPath {
    let legs = [((0.0, 0.0), (PI, 0.0)), ((PI, 0.0), (PI, PI)), ((PI, PI), (0.0, 0.0))];
    let mut k = Vec::with_capacity(3 * per_segment);
    let mut energies = Vec::with_capacity(3 * per_segment);
    let mut ticks = [0.0; 4];
    let mut pos = 0.0;
    for (leg, ((x0, y0), (x1, y1))) in legs.into_iter().enumerate() {
        let step = ((x1 - x0) * (x1 - x0) + (y1 - y0) * (y1 - y0)).sqrt() / per_segment as f64;
        for s in 0..per_segment {
            let t = s as f64 / per_segment as f64;
            let (kx, ky) = (x0 + t * (x1 - x0), y0 + t * (y1 - y0));
            k.push(pos);
            energies.push(lattice.energies(triple, kx, ky));
            pos += step;
        }
        ticks[leg + 1] = pos;
    }
    BandPath { k, energies, ticks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(lattice: Lattice) -> BrillouinScan {
        scan(&lattice, &DiracTriple::standard(), &ScanConfig::default())
    }

    #[test]
    fn hamiltonians_are_hermitian() {
        let d = DiracTriple::standard();
        let lattices = [
            Lattice::NAIVE,
            Lattice::WILSON,
            Lattice::OCTAGON,
            Lattice::SymmetricDiagonal { mass: 0.2, r: 0.5 },
        ];
        for lattice in lattices {
            for (kx, ky) in [(0.3, -1.2), (2.0, 0.7), (-2.9, 2.9)] {
                let h = lattice.hamiltonian(&d, kx, ky);
                let diff = (h - h.adjoint()).iter().map(|z| z.norm()).fold(0.0, f64::max);
                assert!(diff < 1e-14, "{} not Hermitian", lattice.name());
            }
        }
    }

    #[test]
    fn naive_dispersion() {
        let d = DiracTriple::standard();
        let (kx, ky) = (0.4, 1.1);
        let e = Lattice::NAIVE.energies(&d, kx, ky);
        let expected = (kx.sin().powi(2) + ky.sin().powi(2)).sqrt();
        assert!((e[3] - expected).abs() < 1e-12);
        assert!((e[0] + expected).abs() < 1e-12);
    }

    #[test]
    fn naive_has_four_points() {
        let s = count(Lattice::NAIVE);
        assert_eq!(s.count(), 4);
        assert_eq!(s.doublers(), 3);
    }

    #[test]
    fn wilson_removes_doublers() {
        let s = count(Lattice::WILSON);
        assert_eq!(s.count(), 1);
        assert_eq!(s.points[0].location, SymmetryPoint::Gamma);
        let weak = count(Lattice::Wilson { mass: 0.0, r: 0.3 });
        assert_eq!(weak.count(), 1);
    }

    #[test]
    fn octagon_keeps_doublers() {
        let s = count(Lattice::OCTAGON);
        assert_eq!(s.count(), 4);
    }

    #[test]
    fn symmetric_diagonal_leaves_m() {
        let s = count(Lattice::SymmetricDiagonal { mass: 0.0, r: 1.0 });
        let mut found: Vec<SymmetryPoint> = s.points.iter().map(|p| p.location).collect();
        found.sort_by_key(|p| *p as u8);
        assert_eq!(found, vec![SymmetryPoint::Gamma, SymmetryPoint::M]);
    }

    #[test]
    fn mass_gaps_everything() {
        assert_eq!(count(Lattice::Naive { mass: 0.5 }).count(), 0);
    }

    #[test]
    fn classification() {
        assert_eq!(SymmetryPoint::classify(0.0, 0.0, 0.15), SymmetryPoint::Gamma);
        assert_eq!(SymmetryPoint::classify(-PI, 0.0, 0.15), SymmetryPoint::X);
        assert_eq!(SymmetryPoint::classify(0.0, PI, 0.15), SymmetryPoint::Y);
        assert_eq!(SymmetryPoint::classify(-PI, -PI, 0.15), SymmetryPoint::M);
        assert_eq!(SymmetryPoint::classify(1.0, 2.0, 0.15), SymmetryPoint::Other);
    }

    #[test]
    fn band_path_ticks() {
        let p = band_path(&Lattice::NAIVE, &DiracTriple::standard(), 50);
        assert_eq!(p.k.len(), 150);
        assert!((p.ticks[1] - PI).abs() < 1e-9);
        assert!((p.ticks[2] - 2.0 * PI).abs() < 1e-9);
        assert!((p.ticks[3] - (2.0 + 2f64.sqrt()) * PI).abs() < 1e-9);
        // Gapless at Γ.
        assert!(p.energies[0].iter().all(|e| e.abs() < 1e-12));
    }
}
