//! Fitting mass-matrix couplings to measured CKM magnitudes.
//!
//! The objectives are pure functions of a parameter vector. Minimisation
//! goes through the [`Minimizer`] trait; [`MultiStart`] wraps any
//! minimiser with seeded uniform restarts inside box bounds and keeps the
//! best finite trial.
//!
//! # Models
//!
//! | Model | Parameters |
//! |-------|------------|
//! | [`SharedCoupling`] | `ε₁₂ ε₁₃ ε₂₃ φ₁₂ φ₁₃ φ₂₃`, same for both sectors |
//! | [`SeparateSector`] | `εᵘ₁₂ εᵘ₁₃ εᵘ₂₃ εᵈ₁₂ εᵈ₁₃ εᵈ₂₃ φᵘ φᵈ`, phase on the 1↔3 coupling |
//! | [`RingDistance`]   | `ξ scale φ`, couplings `scale·e^{−d/ξ}` by ring distance |

pub mod nelder_mead;

pub use nelder_mead::NelderMead;

use core::f64::consts::TAU;

use nalgebra::Matrix3;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::mixing::{
    build_mass_matrix, ckm_from_mass_matrices, CouplingPattern, MixingError, MixingSolution,
    MixingSummary, CKM_EXPERIMENTAL, DOWN_MASSES_MEV, UP_MASSES_MEV,
};

/// A scalar function of a parameter vector.
pub trait Objective {
    /// Length of the parameter vector.
    fn dimension(&self) -> usize;

    /// Value at `params`. Non-negative for the CKM models; may be
    /// non-finite where the model breaks down.
    fn evaluate(&self, params: &[f64]) -> f64;
}

/// Result of one local minimisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minimum {
    /// Best point found.
    pub x: Vec<f64>,
    /// Objective at `x`.
    pub value: f64,
    /// Iterations used.
    pub iterations: usize,
    /// Tolerances met before the iteration limit.
    pub converged: bool,
}

/// A local minimiser.
pub trait Minimizer {
    /// Minimises `f` starting from `start`.
    fn minimize<O: Objective + ?Sized>(&self, f: &O, start: &[f64]) -> Minimum;
}

/// Errors from the fitting driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Bounds do not match the objective's dimension.
    #[error("expected {expected} bounds, got {found}")]
    DimensionMismatch {
        /// Objective dimension.
        expected: usize,
        /// Bounds supplied.
        found: usize,
    },
    /// A bound is empty, reversed or non-finite.
    #[error("invalid bounds [{lower}, {upper}] for parameter {index}")]
    InvalidBounds {
        /// Parameter index.
        index: usize,
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },
    /// Every trial ended at a non-finite value.
    #[error("none of {restarts} trials reached a finite objective value")]
    NoFiniteTrial {
        /// Trials attempted.
        restarts: usize,
    },
    /// The best parameters could not be turned back into a mixing matrix.
    #[error(transparent)]
    Mixing(#[from] MixingError),
}

/// Best trial of a multi-start run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// The winning local minimum.
    pub best: Minimum,
    /// Index of the winning trial.
    pub best_trial: usize,
    /// Trials with a finite final value.
    pub finite_trials: usize,
    /// Trials attempted.
    pub restarts: usize,
}

/// Seeded multi-start wrapper around a local minimiser.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiStart<M> {
    /// Local minimiser.
    pub minimizer: M,
    /// Number of starting points.
    pub restarts: usize,
    /// RNG seed.
    pub seed: u64,
}

impl<M: Minimizer> MultiStart<M> {
    /// Runs `restarts` local minimisations from uniform starts in `bounds`.
    ///
    /// # Errors
    ///
    /// [`FitError::DimensionMismatch`] or [`FitError::InvalidBounds`] for
    /// bad bounds, [`FitError::NoFiniteTrial`] if no trial ends finite.
    pub fn run<O: Objective + ?Sized>(
        &self,
        f: &O,
        bounds: &[(f64, f64)],
    ) -> Result<FitResult, FitError> {
        if bounds.len() != f.dimension() {
            return Err(FitError::DimensionMismatch {
                expected: f.dimension(),
                found: bounds.len(),
            });
        }
        for (index, &(lower, upper)) in bounds.iter().enumerate() {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                return Err(FitError::InvalidBounds {
                    index,
                    lower,
                    upper,
                });
            }
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<(usize, Minimum)> = None;
        let mut finite_trials = 0;
        for trial in 0..self.restarts {
            let start: Vec<f64> = bounds
                .iter()
                .map(|&(lo, hi)| rng.gen_range(lo..hi))
                .collect();
            let m = self.minimizer.minimize(f, &start);
            if !m.value.is_finite() {
                continue;
            }
            finite_trials += 1;
            if best.as_ref().map_or(true, |(_, b)| m.value < b.value) {
                debug!(trial, value = m.value, iterations = m.iterations, "improved fit");
                best = Some((trial, m));
            }
        }

        let (best_trial, best) = best.ok_or(FitError::NoFiniteTrial {
            restarts: self.restarts,
        })?;
        Ok(FitResult {
            best,
            best_trial,
            finite_trials,
            restarts: self.restarts,
        })
    }
}

/// Experimental inputs shared by the CKM models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CkmData {
    /// Target `|V_ij|`.
    pub target: [[f64; 3]; 3],
    /// Up-type masses, MeV.
    pub masses_up: [f64; 3],
    /// Down-type masses, MeV.
    pub masses_down: [f64; 3],
}

impl Default for CkmData {
    fn default() -> Self {
        Self {
            target: CKM_EXPERIMENTAL,
            masses_up: UP_MASSES_MEV,
            masses_down: DOWN_MASSES_MEV,
        }
    }
}

/// Up-type and down-type mass matrices.
pub type MassPair = (Matrix3<Complex64>, Matrix3<Complex64>);

fn fixed<const N: usize>(params: &[f64]) -> Result<[f64; N], MixingError> {
    params.try_into().map_err(|_| MixingError::ParameterCount {
        expected: N,
        found: params.len(),
    })
}

/// A parametrised pair of mass matrices.
pub trait CkmModel {
    /// Short name for reports.
    fn name(&self) -> &'static str;

    /// Parameter count.
    fn parameter_count(&self) -> usize;

    /// Inputs the model fits against.
    fn data(&self) -> &CkmData;

    /// Up and down mass matrices at `params`.
    ///
    /// # Errors
    ///
    /// [`MixingError::ParameterCount`] if `params` has the wrong length.
    fn mass_matrices(&self, params: &[f64]) -> Result<MassPair, MixingError>;

    /// Sampling box for restarts.
    fn bounds(&self, coupling_bound: f64) -> Vec<(f64, f64)>;

    /// Mixing matrix at `params`.
    ///
    /// # Errors
    ///
    /// [`MixingError::ParameterCount`] for a wrong-length `params`, else
    /// whatever the solver reports.
    fn solve(&self, params: &[f64]) -> Result<MixingSolution, MixingError> {
        let (up, down) = self.mass_matrices(params)?;
        ckm_from_mass_matrices(&up, &down)
    }
}

impl<T: CkmModel> Objective for T {
    fn dimension(&self) -> usize {
        self.parameter_count()
    }

    fn evaluate(&self, params: &[f64]) -> f64 {
        if params.len() != self.parameter_count() {
            return f64::NAN;
        }
        match self.solve(params) {
            Ok(sol) => sol.squared_error(&self.data().target),
            Err(_) => f64::INFINITY,
        }
    }
}

fn symmetric_bounds(couplings: usize, bound: f64, phases: usize) -> Vec<(f64, f64)> {
    let mut b = vec![(-bound, bound); couplings];
    b.extend(std::iter::repeat((0.0, TAU)).take(phases));
    b
}

/// Same couplings and phases in both sectors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SharedCoupling {
    /// Inputs.
    pub data: CkmData,
}

impl CkmModel for SharedCoupling {
    fn name(&self) -> &'static str {
        "shared"
    }

    fn parameter_count(&self) -> usize {
        6
    }

    fn data(&self) -> &CkmData {
        &self.data
    }

    fn mass_matrices(&self, p: &[f64]) -> Result<MassPair, MixingError> {
        let [e12, e13, e23, p12, p13, p23] = fixed::<6>(p)?;
        let couplings = [e12, e13, e23];
        let phases = [p12, p13, p23];
        Ok((
            build_mass_matrix(couplings, self.data.masses_up, phases),
            build_mass_matrix(couplings, self.data.masses_down, phases),
        ))
    }

    fn bounds(&self, coupling_bound: f64) -> Vec<(f64, f64)> {
        symmetric_bounds(3, coupling_bound, 3)
    }
}

/// Independent couplings per sector, one phase each on the 1↔3 coupling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeparateSector {
    /// Inputs.
    pub data: CkmData,
}

impl CkmModel for SeparateSector {
    fn name(&self) -> &'static str {
        "separate"
    }

    fn parameter_count(&self) -> usize {
        8
    }

    fn data(&self) -> &CkmData {
        &self.data
    }

    fn mass_matrices(&self, p: &[f64]) -> Result<MassPair, MixingError> {
        let [u12, u13, u23, d12, d13, d23, phi_u, phi_d] = fixed::<8>(p)?;
        Ok((
            build_mass_matrix([u12, u13, u23], self.data.masses_up, [0.0, phi_u, 0.0]),
            build_mass_matrix([d12, d13, d23], self.data.masses_down, [0.0, phi_d, 0.0]),
        ))
    }

    fn bounds(&self, coupling_bound: f64) -> Vec<(f64, f64)> {
        symmetric_bounds(6, coupling_bound, 2)
    }
}

/// Couplings fall off exponentially with the ring distance each flip
/// spans; one phase on the 1↔3 coupling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RingDistance {
    /// Inputs.
    pub data: CkmData,
}

impl RingDistance {
    /// `scale · e^{−d/ξ}` for each pattern.
    #[must_use]
    pub fn couplings(xi: f64, scale: f64) -> [f64; 3] {
        CouplingPattern::ALL.map(|p| scale * (-f64::from(p.ring_distance()) / xi).exp())
    }
}

impl CkmModel for RingDistance {
    fn name(&self) -> &'static str {
        "ring-distance"
    }

    fn parameter_count(&self) -> usize {
        3
    }

    fn data(&self) -> &CkmData {
        &self.data
    }

    fn mass_matrices(&self, p: &[f64]) -> Result<MassPair, MixingError> {
        let [xi, scale, phase] = fixed::<3>(p)?;
        let couplings = Self::couplings(xi, scale);
        let phases = [0.0, phase, 0.0];
        Ok((
            build_mass_matrix(couplings, self.data.masses_up, phases),
            build_mass_matrix(couplings, self.data.masses_down, phases),
        ))
    }

    /// ξ in `[0.5, 5]`, scale in `[0.01, coupling_bound]`, phase in `[0, 2π)`.
    fn bounds(&self, coupling_bound: f64) -> Vec<(f64, f64)> {
        vec![(0.5, 5.0), (0.01, coupling_bound.max(0.02)), (0.0, TAU)]
    }
}

/// Which model a fit uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    /// [`SharedCoupling`].
    #[default]
    Shared,
    /// [`SeparateSector`].
    Separate,
    /// [`RingDistance`].
    RingDistance,
}

/// Everything a fit run needs. Deserialises from TOML with every field
/// optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Model to fit.
    pub model: ModelKind,
    /// Starting points.
    pub restarts: usize,
    /// RNG seed.
    pub seed: u64,
    /// Couplings are sampled in `[−bound, bound]` (MeV).
    pub coupling_bound: f64,
    /// Local minimiser settings.
    pub nelder_mead: NelderMead,
    /// Experimental inputs.
    pub data: CkmData,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self::shared()
    }
}

impl FitConfig {
    /// 500 restarts, seed 42, couplings within ±100 MeV.
    #[must_use]
    pub fn shared() -> Self {
        Self {
            model: ModelKind::Shared,
            restarts: 500,
            seed: 42,
            coupling_bound: 100.0,
            nelder_mead: NelderMead::default(),
            data: CkmData::default(),
        }
    }

    /// 1000 restarts, seed 123, couplings within ±500 MeV, tighter
    /// tolerances.
    #[must_use]
    pub fn separate() -> Self {
        Self {
            model: ModelKind::Separate,
            restarts: 1000,
            seed: 123,
            coupling_bound: 500.0,
            nelder_mead: NelderMead {
                max_iter: 10_000,
                xatol: 1e-12,
                fatol: 1e-14,
            },
            data: CkmData::default(),
        }
    }

    /// 200 restarts over `ξ`, scale up to 100 and the phase.
    #[must_use]
    pub fn ring_distance() -> Self {
        Self {
            model: ModelKind::RingDistance,
            restarts: 200,
            seed: 7,
            coupling_bound: 100.0,
            nelder_mead: NelderMead::default(),
            data: CkmData::default(),
        }
    }

    /// Defaults for a model.
    #[must_use]
    pub fn for_model(model: ModelKind) -> Self {
        match model {
            ModelKind::Shared => Self::shared(),
            ModelKind::Separate => Self::separate(),
            ModelKind::RingDistance => Self::ring_distance(),
        }
    }
}

/// Outcome of fitting one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFit {
    /// Model fitted.
    pub model: ModelKind,
    /// Best parameters.
    pub params: Vec<f64>,
    /// Squared error at `params`.
    pub error: f64,
    /// `√(error / 9)`.
    pub rms: f64,
    /// Observables at `params`.
    pub mixing: MixingSummary,
    /// Driver bookkeeping.
    pub result: FitResult,
}

fn fit_with<T: CkmModel>(model: &T, kind: ModelKind, config: &FitConfig) -> Result<ModelFit, FitError> {
    let driver = MultiStart {
        minimizer: config.nelder_mead,
        restarts: config.restarts,
        seed: config.seed,
    };
    let result = driver.run(model, &model.bounds(config.coupling_bound))?;
    let mixing = model.solve(&result.best.x)?.summary();
    Ok(ModelFit {
        model: kind,
        params: result.best.x.clone(),
        error: result.best.value,
        rms: (result.best.value / 9.0).sqrt(),
        mixing,
        result,
    })
}

/// Fits the configured model.
///
/// # Errors
///
/// Any [`FitError`] from the driver or the final solve.
pub fn fit(config: &FitConfig) -> Result<ModelFit, FitError> {
    let data = config.data;
    match config.model {
        ModelKind::Shared => fit_with(&SharedCoupling { data }, config.model, config),
        ModelKind::Separate => fit_with(&SeparateSector { data }, config.model, config),
        ModelKind::RingDistance => fit_with(&RingDistance { data }, config.model, config),
    }
}
