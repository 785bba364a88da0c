//! Exact quantum numbers, trace sums, gauge anomalies and the Weinberg
//! angle read off the valid spectrum.
//!
//! All sums are exact rationals. Only the normalisation search against the
//! measured mixing angle drops to `f64`.

use num_rational::Rational64;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::catalogue::{electric_charge, Generation};
use crate::constraint::valid_states;
use crate::ring::{Bit, State};

/// Measured `sin²θ_W` at the Z pole (MS-bar).
pub const SIN2_THETA_W_EXPERIMENTAL: f64 = 0.23122;

/// Tolerance used when listing small fractions near the required
/// normalisation.
pub const FRACTION_TOLERANCE: f64 = 0.002;

/// Largest denominator tried in fraction searches (exclusive).
pub const FRACTION_MAX_DENOMINATOR: i64 = 100;

/// Charge, weak isospin projection and hypercharge of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumNumbers {
    /// Electric charge `Q`.
    pub q: Rational64,
    /// `T₃`: `1/2 − I3` when left-handed, zero when right-handed.
    pub t3: Rational64,
    /// Hypercharge `Y = 2(Q − T₃)`.
    pub y: Rational64,
    /// Left-handed (χ = 0).
    pub left: bool,
    /// Quark (LQ = 1).
    pub quark: bool,
}

impl QuantumNumbers {
    /// Reads the quantum numbers off a state.
    #[must_use]
    pub fn of(state: State) -> Self {
        let q = electric_charge(state);
        let left = !state.bit(Bit::Chi);
        let t3 = if left {
            Rational64::new(1, 2) - Rational64::from_integer(i64::from(state.bit_u8(Bit::I3)))
        } else {
            Rational64::zero()
        };
        Self {
            q,
            t3,
            y: Rational64::from_integer(2) * (q - t3),
            left,
            quark: state.bit(Bit::Lq),
        }
    }
}

/// Quadratic trace sums over a set of states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Traces {
    /// `ΣQ`.
    pub sum_q: Rational64,
    /// `ΣQ²`.
    pub sum_q2: Rational64,
    /// `ΣT₃²`.
    pub sum_t3_sq: Rational64,
    /// `Σ(Y/2)²`.
    pub sum_half_y_sq: Rational64,
}

impl Traces {
    /// Sums over the given states.
    pub fn over(states: impl IntoIterator<Item = State>) -> Self {
        let half = Rational64::new(1, 2);
        states
            .into_iter()
            .map(QuantumNumbers::of)
            .fold(Self::default(), |acc, n| {
                let hy = n.y * half;
                Self {
                    sum_q: acc.sum_q + n.q,
                    sum_q2: acc.sum_q2 + n.q * n.q,
                    sum_t3_sq: acc.sum_t3_sq + n.t3 * n.t3,
                    sum_half_y_sq: acc.sum_half_y_sq + hy * hy,
                }
            })
    }
}

/// Gauge anomaly sums. Every field vanishes for a consistent spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnomalySums {
    /// `ΣQ`.
    pub charge: Rational64,
    /// `Σ_L Y − Σ_R Y` (mixed gravitational).
    pub gravitational: Rational64,
    /// `Σ_L Y³ − Σ_R Y³` (U(1)³).
    pub hypercharge_cubed: Rational64,
    /// `Σ_L Y − Σ_R Y` over quarks (SU(3)²U(1)).
    pub colour: Rational64,
    /// `Σ_L T₃` (SU(2)).
    pub weak: Rational64,
}

impl AnomalySums {
    /// Sums over the given states.
    pub fn over(states: impl IntoIterator<Item = State>) -> Self {
        states
            .into_iter()
            .map(QuantumNumbers::of)
            .fold(Self::default(), |acc, n| {
                let sign = if n.left {
                    Rational64::from_integer(1)
                } else {
                    Rational64::from_integer(-1)
                };
                Self {
                    charge: acc.charge + n.q,
                    gravitational: acc.gravitational + sign * n.y,
                    hypercharge_cubed: acc.hypercharge_cubed + sign * n.y * n.y * n.y,
                    colour: if n.quark {
                        acc.colour + sign * n.y
                    } else {
                        acc.colour
                    },
                    weak: if n.left { acc.weak + n.t3 } else { acc.weak },
                }
            })
    }

    /// Named sums, for reporting.
    #[must_use]
    pub fn named(&self) -> [(&'static str, Rational64); 5] {
        [
            ("charge", self.charge),
            ("gravitational", self.gravitational),
            ("U(1)³", self.hypercharge_cubed),
            ("SU(3)²U(1)", self.colour),
            ("SU(2)", self.weak),
        ]
    }

    /// True when every sum is zero.
    #[must_use]
    pub fn cancels(&self) -> bool {
        self.named().iter().all(|(_, v)| v.is_zero())
    }
}

/// Valid states of one generation.
pub fn generation_states(generation: Generation) -> impl Iterator<Item = State> {
    valid_states().filter(move |s| {
        let (g0, g1) = s.generation_bits();
        Generation::from_bits(g0, g1) == Some(generation)
    })
}

/// Anomaly sums for each generation, lightest first.
#[must_use]
pub fn anomalies_by_generation() -> [AnomalySums; 3] {
    Generation::ALL.map(|g| AnomalySums::over(generation_states(g)))
}

/// A small fraction close to the normalisation needed to reproduce a
/// target mixing angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearbyFraction {
    /// The candidate normalisation.
    pub k: Rational64,
    /// `sin²θ_W` it predicts.
    pub sin2: f64,
    /// Relative deviation from the target.
    pub deviation: f64,
}

/// Weinberg angle ratios derived from the spectrum traces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeinbergAnalysis {
    /// Traces over the full valid set.
    pub traces: Traces,
    /// `ΣT₃² / ΣQ²`, the unification-scale ratio.
    pub gut_ratio: Rational64,
    /// `Σ(Y/2)² / (Σ(Y/2)² + ΣT₃²)`.
    pub hypercharge_ratio: Rational64,
    /// The same ratio with SU(5) normalisation `k = 3/5`.
    pub su5_ratio: Rational64,
    /// Target value the normalisation search aims for.
    pub target: f64,
    /// `k` such that `k·Σ(Y/2)² / (k·Σ(Y/2)² + ΣT₃²)` equals the target.
    pub k_needed: f64,
    /// Fractions `n/d` with `d < 100` within tolerance of `k_needed`.
    pub nearby: Vec<NearbyFraction>,
}

/// `k·y / (k·y + t)` for an exact `k`.
fn normalised_ratio(k: Rational64, traces: &Traces) -> Rational64 {
    let ky = k * traces.sum_half_y_sq;
    let denom = ky + traces.sum_t3_sq;
    if denom.is_zero() {
        Rational64::zero()
    } else {
        ky / denom
    }
}

fn to_f64(r: Rational64) -> f64 {
    *r.numer() as f64 / *r.denom() as f64
}

impl WeinbergAnalysis {
    /// Analyses the valid spectrum against `target`.
    #[must_use]
    pub fn compute(target: f64) -> Self {
        let traces = Traces::over(valid_states());
        let gut_ratio = if traces.sum_q2.is_zero() {
            Rational64::zero()
        } else {
            traces.sum_t3_sq / traces.sum_q2
        };
        let t3 = to_f64(traces.sum_t3_sq);
        let hy = to_f64(traces.sum_half_y_sq);
        let k_needed = target * t3 / ((1.0 - target) * hy);

        let mut nearby = Vec::new();
        for d in 2..FRACTION_MAX_DENOMINATOR {
            for n in 1..d {
                let k = n as f64 / d as f64;
                if (k - k_needed).abs() < FRACTION_TOLERANCE {
                    let sin2 = k * hy / (k * hy + t3);
                    nearby.push(NearbyFraction {
                        k: Rational64::new(n, d),
                        sin2,
                        deviation: (sin2 - target).abs() / target,
                    });
                }
            }
        }
        nearby.sort_by(|a, b| a.deviation.total_cmp(&b.deviation));
        nearby.dedup_by_key(|f| f.k);

        Self {
            traces,
            gut_ratio,
            hypercharge_ratio: normalised_ratio(Rational64::from_integer(1), &traces),
            su5_ratio: normalised_ratio(Rational64::new(3, 5), &traces),
            target,
            k_needed,
            nearby,
        }
    }

    /// Analysis against the measured value.
    #[must_use]
    pub fn experimental() -> Self {
        Self::compute(SIN2_THETA_W_EXPERIMENTAL)
    }
}

/// Smallest-denominator fraction `n/d` (`d < 100`) equal to `value`.
#[must_use]
pub fn simple_fraction(value: Rational64) -> Option<(i64, i64)> {
    (2..FRACTION_MAX_DENOMINATOR)
        .flat_map(|d| (1..d).map(move |n| (n, d)))
        .find(|&(n, d)| Rational64::new(n, d) == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Catalogue;

    fn r(n: i64, d: i64) -> Rational64 {
        Rational64::new(n, d)
    }

    #[test]
    fn quantum_numbers_of_first_generation() {
        let cat = Catalogue::global();
        let by_name = |name: &str| {
            cat.iter()
                .find(|p| p.name == name)
                .map(|p| QuantumNumbers::of(p.state))
                .expect("named state")
        };
        assert_eq!(by_name("νe_L").y, r(-1, 1));
        assert_eq!(by_name("e⁻_L").y, r(-1, 1));
        assert_eq!(by_name("e⁻_R").y, r(-2, 1));
        assert_eq!(by_name("u_r_L").y, r(1, 3));
        assert_eq!(by_name("d_g_L").t3, r(-1, 2));
        assert_eq!(by_name("u_b_R").y, r(4, 3));
        assert_eq!(by_name("d_r_R").y, r(-2, 3));
        assert_eq!(by_name("d_r_R").t3, r(0, 1));
    }

    #[test]
    fn traces_over_spectrum() {
        let t = Traces::over(valid_states());
        assert_eq!(t.sum_q, r(0, 1));
        assert_eq!(t.sum_q2, r(16, 1));
        assert_eq!(t.sum_t3_sq, r(6, 1));
        assert_eq!(t.sum_half_y_sq, r(10, 1));
    }

    #[test]
    fn anomalies_cancel() {
        assert!(AnomalySums::over(valid_states()).cancels());
        for (g, sums) in anomalies_by_generation().iter().enumerate() {
            assert!(sums.cancels(), "generation {} does not cancel: {sums:?}", g + 1);
        }
    }

    #[test]
    fn leptons_alone_do_not_cancel() {
        let sums = AnomalySums::over(crate::constraint::leptons());
        assert!(!sums.cancels());
    }

    #[test]
    fn weinberg_ratios() {
        let w = WeinbergAnalysis::experimental();
        assert_eq!(w.gut_ratio, r(3, 8));
        assert_eq!(w.hypercharge_ratio, r(5, 8));
        assert_eq!(w.su5_ratio, r(1, 2));
        assert_eq!(simple_fraction(w.gut_ratio), Some((3, 8)));
        assert!((w.k_needed - 0.23122 * 6.0 / (0.76878 * 10.0)).abs() < 1e-12);
        assert!(!w.nearby.is_empty());
        for f in &w.nearby {
            assert!((to_f64(f.k) - w.k_needed).abs() < FRACTION_TOLERANCE);
        }
        assert!(w.nearby.windows(2).all(|p| p[0].deviation <= p[1].deviation));
    }
}
