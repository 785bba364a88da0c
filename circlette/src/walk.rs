//! One-dimensional quantum walk with the I3⊕=LQ flip as its coin.
//!
//! Each site carries a right-mover and a left-mover amplitude. One tick
//! mixes the pair with the rotation `cos θ · I − i sin θ · σₓ`, then shifts
//! right-movers one site right and left-movers one site left on a periodic
//! chain. The flip rate `θ` plays the role of a mass.
//!
//! | Walk | Behaviour |
//! |------|-----------|
//! | massive, `θ > 0` | stays centred, spreads like a free Schrödinger packet |
//! | massless, `θ = 0` | splits into two lumps moving apart at one site per tick |
//!
//! The Schrödinger comparison uses the width
//! `σ(t) = σ₀ √(1 + (t / (2 tan θ · σ₀²))²)`.

use core::f64::consts::{FRAC_PI_2, PI};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Largest allowed change in total probability over a run.
pub const NORM_TOLERANCE: f64 = 1e-6;

/// Errors from walk settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalkError {
    /// The chain needs at least two sites.
    #[error("a walk needs at least 2 sites, got {0}")]
    TooFewSites(usize),
    /// The initial width must be positive and finite.
    #[error("initial width must be positive and finite, got {0}")]
    InvalidWidth(f64),
    /// A massive walk needs `0 < θ < π/2`.
    #[error("flip rate must lie in (0, π/2) for a massive walk, got {0}")]
    InvalidRate(f64),
}

/// Walk settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Sites on the periodic chain.
    pub sites: usize,
    /// Ticks to run.
    pub steps: usize,
    /// Flip rate per tick. Ignored by the massless walk.
    pub theta: f64,
    /// Initial Gaussian width in sites.
    pub sigma0: f64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            sites: 10_000,
            steps: 2_500,
            theta: 0.05,
            sigma0: 30.0,
        }
    }
}

impl WalkConfig {
    fn check(&self) -> Result<(), WalkError> {
        if self.sites < 2 {
            return Err(WalkError::TooFewSites(self.sites));
        }
        if !(self.sigma0.is_finite() && self.sigma0 > 0.0) {
            return Err(WalkError::InvalidWidth(self.sigma0));
        }
        Ok(())
    }

    /// Starting site of the packet.
    #[must_use]
    pub const fn centre(&self) -> usize {
        self.sites / 2
    }
}

/// Right- and left-mover amplitudes on a periodic chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Walker {
    right: Vec<Complex64>,
    left: Vec<Complex64>,
    cos: f64,
    sin: f64,
}

impl Walker {
    /// A zero-momentum Gaussian packet at `centre`, split evenly between
    /// the two movers.
    #[must_use]
    pub fn gaussian(sites: usize, centre: usize, sigma0: f64, theta: f64) -> Self {
        let norm = (2.0 * PI * sigma0 * sigma0).powf(0.25) * 2f64.sqrt();
        let right: Vec<Complex64> = (0..sites)
            .map(|x| {
                let d = x as f64 - centre as f64;
                Complex64::new((-d * d / (4.0 * sigma0 * sigma0)).exp() / norm, 0.0)
            })
            .collect();
        Self {
            left: right.clone(),
            right,
            cos: theta.cos(),
            sin: theta.sin(),
        }
    }

    /// One tick: coin rotation, then shift.
    pub fn step(&mut self) {
        let mix = Complex64::new(0.0, -self.sin);
        for (r, l) in self.right.iter_mut().zip(self.left.iter_mut()) {
            let (a, b) = (*r, *l);
            *r = a * self.cos + b * mix;
            *l = a * mix + b * self.cos;
        }
        self.right.rotate_right(1);
        self.left.rotate_left(1);
    }

    /// Total probability.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.right.iter().chain(&self.left).map(|z| z.norm_sqr()).sum()
    }

    /// `|ψ_R|² + |ψ_L|²` per site.
    #[must_use]
    pub fn density(&self) -> Vec<f64> {
        self.right
            .iter()
            .zip(&self.left)
            .map(|(r, l)| r.norm_sqr() + l.norm_sqr())
            .collect()
    }

    /// `|ψ_R|²` per site.
    #[must_use]
    pub fn right_density(&self) -> Vec<f64> {
        self.right.iter().map(|z| z.norm_sqr()).collect()
    }

    /// `|ψ_L|²` per site.
    #[must_use]
    pub fn left_density(&self) -> Vec<f64> {
        self.left.iter().map(|z| z.norm_sqr()).collect()
    }
}

/// First index of the largest value.
#[must_use]
pub fn peak(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, max), (i, &v)| {
            if v > max {
                (i, v)
            } else {
                (best, max)
            }
        })
        .0
}

/// Bhattacharyya coefficient of two densities, each normalised first.
#[must_use]
pub fn bhattacharyya(p: &[f64], q: &[f64]) -> f64 {
    let (sp, sq): (f64, f64) = (p.iter().sum(), q.iter().sum());
    p.iter()
        .zip(q)
        .map(|(a, b)| (a / sp * b / sq).max(0.0).sqrt())
        .sum()
}

/// Free Schrödinger width after `steps` ticks with effective mass `tan θ`.
#[must_use]
pub fn schrodinger_width(sigma0: f64, theta: f64, steps: usize) -> f64 {
    let t = steps as f64 / (2.0 * theta.tan() * sigma0 * sigma0);
    sigma0 * (1.0 + t * t).sqrt()
}

/// Massive-walk measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassiveDiagnostics {
    /// Probability before the first tick.
    pub initial_norm: f64,
    /// Probability after the last tick.
    pub final_norm: f64,
    /// Norm drift within [`NORM_TOLERANCE`].
    pub unitary: bool,
    /// Densest site of the walk.
    pub peak: usize,
    /// Densest site of the Schrödinger Gaussian.
    pub analytical_peak: usize,
    /// Walk peak within one site of the start.
    pub centred: bool,
    /// Overlap of walk and Schrödinger densities.
    pub overlap: f64,
    /// Schrödinger width at the final tick.
    pub sigma_t: f64,
    /// `σ(t) / σ₀`.
    pub spread_factor: f64,
    /// Flip rate.
    pub theta: f64,
    /// Effective mass `tan θ`.
    pub mass: f64,
    /// `|θ − tan θ| / θ` in percent.
    pub small_angle_error_pct: f64,
}

/// A finished massive walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassiveWalk {
    /// Settings used.
    pub config: WalkConfig,
    /// Final walk density.
    pub density: Vec<f64>,
    /// Schrödinger Gaussian at the final tick.
    pub analytical: Vec<f64>,
    /// Measurements.
    pub diagnostics: MassiveDiagnostics,
}

/// Runs the massive walk and compares it with a spreading Gaussian.
///
/// # Errors
///
/// [`WalkError`] for a short chain, a bad width or `θ` outside `(0, π/2)`.
pub fn simulate_massive(config: &WalkConfig) -> Result<MassiveWalk, WalkError> {
    config.check()?;
    let theta = config.theta;
    if !(theta > 0.0 && theta < FRAC_PI_2) {
        return Err(WalkError::InvalidRate(theta));
    }
    let x0 = config.centre();
    let mut walker = Walker::gaussian(config.sites, x0, config.sigma0, theta);
    let initial_norm = walker.norm();
    for _ in 0..config.steps {
        walker.step();
    }
    let final_norm = walker.norm();
    let density = walker.density();

    let sigma_t = schrodinger_width(config.sigma0, theta, config.steps);
    let scale = (2.0 * PI).sqrt() * sigma_t;
    let analytical: Vec<f64> = (0..config.sites)
        .map(|x| {
            let d = x as f64 - x0 as f64;
            (-d * d / (2.0 * sigma_t * sigma_t)).exp() / scale
        })
        .collect();

    let p = peak(&density);
    let diagnostics = MassiveDiagnostics {
        initial_norm,
        final_norm,
        unitary: (final_norm - initial_norm).abs() < NORM_TOLERANCE,
        peak: p,
        analytical_peak: peak(&analytical),
        centred: p.abs_diff(x0) <= 1,
        overlap: bhattacharyya(&density, &analytical),
        sigma_t,
        spread_factor: sigma_t / config.sigma0,
        theta,
        mass: theta.tan(),
        small_angle_error_pct: (theta - theta.tan()).abs() / theta * 100.0,
    };
    debug!(
        steps = config.steps,
        overlap = diagnostics.overlap,
        peak = diagnostics.peak,
        "massive walk finished"
    );
    Ok(MassiveWalk {
        config: *config,
        density,
        analytical,
        diagnostics,
    })
}

/// Massless-walk measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MasslessDiagnostics {
    /// Probability before the first tick.
    pub initial_norm: f64,
    /// Probability after the last tick.
    pub final_norm: f64,
    /// Densest right-mover site.
    pub right_peak: usize,
    /// Densest left-mover site.
    pub left_peak: usize,
    /// `|right_peak − left_peak|`.
    pub separation: usize,
    /// `min(2 · steps, sites)`.
    pub expected_separation: usize,
}

/// A finished massless walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasslessWalk {
    /// Settings used.
    pub config: WalkConfig,
    /// Final density.
    pub density: Vec<f64>,
    /// Measurements.
    pub diagnostics: MasslessDiagnostics,
}

/// Runs the walk with no flips, so the movers never mix.
///
/// # Errors
///
/// [`WalkError`] for a short chain or a bad width.
pub fn simulate_massless(config: &WalkConfig) -> Result<MasslessWalk, WalkError> {
    config.check()?;
    let mut walker = Walker::gaussian(config.sites, config.centre(), config.sigma0, 0.0);
    let initial_norm = walker.norm();
    for _ in 0..config.steps {
        walker.step();
    }
    let right_peak = peak(&walker.right_density());
    let left_peak = peak(&walker.left_density());
    let diagnostics = MasslessDiagnostics {
        initial_norm,
        final_norm: walker.norm(),
        right_peak,
        left_peak,
        separation: right_peak.abs_diff(left_peak),
        expected_separation: (2 * config.steps).min(config.sites),
    };
    debug!(
        steps = config.steps,
        separation = diagnostics.separation,
        "massless walk finished"
    );
    Ok(MasslessWalk {
        config: *config,
        density: walker.density(),
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> WalkConfig {
        WalkConfig {
            sites: 2_000,
            steps: 400,
            theta: 0.05,
            sigma0: 30.0,
        }
    }

    #[test]
    fn massive_walk_conserves_norm() {
        let walk = simulate_massive(&small()).expect("valid settings");
        let d = walk.diagnostics;
        assert!((d.initial_norm - 1.0).abs() < 1e-6);
        assert!((d.final_norm - d.initial_norm).abs() < 1e-6);
        assert!(d.unitary);
    }

    #[test]
    fn massive_walk_spreads_like_schrodinger() {
        let d = simulate_massive(&small()).expect("valid settings").diagnostics;
        assert_eq!(d.peak, 1_000);
        assert_eq!(d.analytical_peak, 1_000);
        assert!(d.centred);
        assert!(d.overlap > 0.98, "overlap {}", d.overlap);
        assert!((d.sigma_t - 136.558).abs() < 1e-2);
        assert!(d.small_angle_error_pct < 0.1);
    }

    #[test]
    fn massless_walk_splits_at_one_site_per_tick() {
        let d = simulate_massless(&small()).expect("valid settings").diagnostics;
        assert_eq!(d.right_peak, 1_400);
        assert_eq!(d.left_peak, 600);
        assert_eq!(d.separation, 800);
        assert_eq!(d.separation, d.expected_separation);
        assert!((d.final_norm - d.initial_norm).abs() < 1e-6);
    }

    #[test]
    fn single_step_is_unitary_for_any_rate() {
        for theta in [0.0, 0.3, 1.0, 1.5] {
            let mut w = Walker::gaussian(64, 32, 4.0, theta);
            let before = w.norm();
            w.step();
            assert!((w.norm() - before).abs() < 1e-12);
        }
    }

    #[test]
    fn bad_settings_are_rejected() {
        let zero_rate = WalkConfig {
            theta: 0.0,
            ..small()
        };
        assert_eq!(
            simulate_massive(&zero_rate).err(),
            Some(WalkError::InvalidRate(0.0))
        );
        // The massless walk ignores θ.
        assert!(simulate_massless(&zero_rate).is_ok());
        let one_site = WalkConfig { sites: 1, ..small() };
        assert_eq!(
            simulate_massless(&one_site).err(),
            Some(WalkError::TooFewSites(1))
        );
        let flat = WalkConfig {
            sigma0: -1.0,
            ..small()
        };
        assert!(matches!(
            simulate_massive(&flat),
            Err(WalkError::InvalidWidth(_))
        ));
    }

    #[test]
    fn overlap_of_identical_densities_is_one() {
        let p = [0.1, 0.5, 0.3, 0.1];
        assert!((bhattacharyya(&p, &p) - 1.0).abs() < 1e-12);
        assert_eq!(peak(&p), 1);
    }
}
