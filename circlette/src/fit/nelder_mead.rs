//! Derivative-free simplex minimiser.

use serde::{Deserialize, Serialize};

use super::{Minimizer, Minimum, Objective};

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Relative step for the initial simplex.
const NONZERO_STEP: f64 = 0.05;
/// Absolute step for coordinates starting at zero.
const ZERO_STEP: f64 = 0.00025;

/// Nelder–Mead with the standard coefficients.
///
/// Stops when both the simplex spread (`xatol`) and the spread of
/// objective values (`fatol`) fall below tolerance, or after `max_iter`
/// iterations. NaN objective values are treated as `+∞`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMead {
    /// Iteration limit.
    pub max_iter: usize,
    /// Absolute tolerance on vertex coordinates.
    pub xatol: f64,
    /// Absolute tolerance on objective values.
    pub fatol: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iter: 5000,
            xatol: 1e-10,
            fatol: 1e-12,
        }
    }
}

fn eval<O: Objective + ?Sized>(f: &O, x: &[f64]) -> f64 {
    let v = f.evaluate(x);
    if v.is_nan() {
        f64::INFINITY
    } else {
        v
    }
}

/// `a + t·(b − a)` componentwise.
fn lerp(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    a.iter().zip(b).map(|(a, b)| a + t * (b - a)).collect()
}

impl Minimizer for NelderMead {
    fn minimize<O: Objective + ?Sized>(&self, f: &O, start: &[f64]) -> Minimum {
        let n = start.len();
        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
        simplex.push((start.to_vec(), eval(f, start)));
        for i in 0..n {
            let mut x = start.to_vec();
            x[i] = if x[i] == 0.0 {
                ZERO_STEP
            } else {
                x[i] * (1.0 + NONZERO_STEP)
            };
            let fx = eval(f, &x);
            simplex.push((x, fx));
        }

        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.max_iter {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
            let (best_x, best_f) = (&simplex[0].0, simplex[0].1);
            let x_spread = simplex[1..]
                .iter()
                .flat_map(|(x, _)| x.iter().zip(best_x).map(|(a, b)| (a - b).abs()))
                .fold(0.0, f64::max);
            let f_spread = simplex[1..]
                .iter()
                .map(|(_, fx)| (fx - best_f).abs())
                .fold(0.0, f64::max);
            if x_spread <= self.xatol && f_spread <= self.fatol {
                converged = true;
                break;
            }
            iterations += 1;

            let mut centroid = vec![0.0; n];
            for (x, _) in &simplex[..n] {
                for (c, xi) in centroid.iter_mut().zip(x) {
                    *c += xi / n as f64;
                }
            }
            let (worst_x, worst_f) = simplex[n].clone();
            let second_worst_f = simplex[n.saturating_sub(1)].1;

            let reflected = lerp(&centroid, &worst_x, -REFLECT);
            let f_reflected = eval(f, &reflected);

            if f_reflected < best_f {
                let expanded = lerp(&centroid, &worst_x, -REFLECT * EXPAND);
                let f_expanded = eval(f, &expanded);
                simplex[n] = if f_expanded < f_reflected {
                    (expanded, f_expanded)
                } else {
                    (reflected, f_reflected)
                };
                continue;
            }
            if f_reflected < second_worst_f {
                simplex[n] = (reflected, f_reflected);
                continue;
            }

            // Outside contraction if the reflection beat the worst vertex,
            // inside contraction otherwise.
            let (contracted, accept_below) = if f_reflected < worst_f {
                (lerp(&centroid, &worst_x, -REFLECT * CONTRACT), f_reflected)
            } else {
                (lerp(&centroid, &worst_x, CONTRACT), worst_f)
            };
            let f_contracted = eval(f, &contracted);
            if f_contracted <= accept_below {
                simplex[n] = (contracted, f_contracted);
                continue;
            }

            let anchor = simplex[0].0.clone();
            for vertex in simplex.iter_mut().skip(1) {
                let x = lerp(&anchor, &vertex.0, SHRINK);
                vertex.1 = eval(f, &x);
                vertex.0 = x;
            }
        }

        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (x, value) = simplex.swap_remove(0);
        Minimum {
            x,
            value,
            iterations,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Quadratic {
        centre: Vec<f64>,
    }

    impl Objective for Quadratic {
        fn dimension(&self) -> usize {
            self.centre.len()
        }

        fn evaluate(&self, x: &[f64]) -> f64 {
            x.iter()
                .zip(&self.centre)
                .enumerate()
                .map(|(i, (a, c))| (i + 1) as f64 * (a - c) * (a - c))
                .sum()
        }
    }

    struct Rosenbrock;

    impl Objective for Rosenbrock {
        fn dimension(&self) -> usize {
            2
        }

        fn evaluate(&self, x: &[f64]) -> f64 {
            (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
        }
    }

    #[test]
    fn finds_quadratic_minimum() {
        let f = Quadratic {
            centre: vec![1.5, -2.0, 0.25],
        };
        let m = NelderMead::default().minimize(&f, &[0.0, 0.0, 0.0]);
        assert!(m.converged);
        assert!(m.value < 1e-10);
        for (x, c) in m.x.iter().zip(&f.centre) {
            assert!((x - c).abs() < 1e-4);
        }
    }

    #[test]
    fn rosenbrock_valley() {
        let m = NelderMead::default().minimize(&Rosenbrock, &[-1.2, 1.0]);
        assert!(m.value < 1e-8, "value {}", m.value);
        assert!((m.x[0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn respects_iteration_limit() {
        let nm = NelderMead {
            max_iter: 3,
            ..NelderMead::default()
        };
        let m = nm.minimize(&Rosenbrock, &[-1.2, 1.0]);
        assert_eq!(m.iterations, 3);
        assert!(!m.converged);
    }

    #[test]
    fn nan_region_is_avoided() {
        struct Walled;
        impl Objective for Walled {
            fn dimension(&self) -> usize {
                1
            }
            fn evaluate(&self, x: &[f64]) -> f64 {
                if x[0] < 0.0 {
                    f64::NAN
                } else {
                    (x[0] - 2.0).powi(2)
                }
            }
        }
        let m = NelderMead::default().minimize(&Walled, &[1.0]);
        assert!((m.x[0] - 2.0).abs() < 1e-4);
        assert!(m.value.is_finite());
    }
}
