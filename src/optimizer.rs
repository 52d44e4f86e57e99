//! # Optimizer
//!
//! A derivative-free [Nelder-Mead](https://en.wikipedia.org/wiki/Nelder%E2%80%93Mead_method)
//! minimizer and the transformations that map the (unconstrained) search
//! space to the parameter domain of each family.
//!
//! The objective is usually the negative log-likelihood or the KS statistic.
//! Non-finite objective values (NaN, `inf`) are not errors: they are treated as
//! `+inf`, so the simplex simply moves away from those points.

use crate::configuration::optimizer;

/// The settings of a single minimization.
#[derive(Debug, Clone, Copy, PartialEq, bon::Builder)]
pub struct Settings {
    /// Iteration cap. Reaching it means the minimization did not converge.
    #[builder(default = optimizer::MAX_ITERATIONS)]
    pub max_iterations: usize,
    /// The minimization converges when the spread of the objective values in
    /// the simplex is below `relative_tolerance * |best value|`
    /// (plus [optimizer::ABSOLUTE_TOLERANCE]).
    #[builder(default = optimizer::RELATIVE_TOLERANCE)]
    pub relative_tolerance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        return Settings::builder().build();
    }
}

/// The result of a minimization.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// The best point found.
    pub point: Vec<f64>,
    /// The value of the objective at `point`. `inf` if no finite value was found.
    pub value: f64,
    /// Number of Nelder-Mead iterations done.
    pub iterations: usize,
    /// If the convergence criterion was met before the iteration cap.
    pub converged: bool,
}

/// Evaluates the objective, mapping any non-finite value to `+inf`.
fn evaluate<F: Fn(&[f64]) -> f64>(objective: &F, point: &[f64]) -> f64 {
    let value: f64 = objective(point);
    if value.is_finite() {
        return value;
    }
    return f64::INFINITY;
}

/// Minimizes `objective` with the Nelder-Mead method starting from `initial`.
///
/// The initial simplex is `initial` plus a small step in each coordinate (5% of
/// the coordinate, or [optimizer::INITIAL_STEP_AT_ZERO] if it is `0.0`).
///
/// If `initial` is empty, the objective is evaluated once and returned as converged.
pub fn minimize<F: Fn(&[f64]) -> f64>(objective: F, initial: &[f64], settings: &Settings) -> Minimum {
    let dimension: usize = initial.len();
    if dimension == 0 {
        return Minimum {
            point: Vec::new(),
            value: evaluate(&objective, initial),
            iterations: 0,
            converged: true,
        };
    }

    // Build the initial simplex
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dimension + 1);
    simplex.push((initial.to_vec(), evaluate(&objective, initial)));
    for i in 0..dimension {
        let mut vertex: Vec<f64> = initial.to_vec();
        if vertex[i] == 0.0 {
            vertex[i] = optimizer::INITIAL_STEP_AT_ZERO;
        } else {
            vertex[i] = vertex[i] * (1.0 + optimizer::INITIAL_STEP);
        }
        let value: f64 = evaluate(&objective, &vertex);
        simplex.push((vertex, value));
    }

    let mut iterations: usize = 0;
    let mut converged: bool = false;

    loop {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

        let best: f64 = simplex[0].1;
        let worst: f64 = simplex[dimension].1;

        if best.is_finite() && worst.is_finite() {
            let spread: f64 = worst - best;
            if spread <= settings.relative_tolerance * best.abs() + optimizer::ABSOLUTE_TOLERANCE {
                converged = true;
                break;
            }
        }

        if settings.max_iterations <= iterations {
            break;
        }
        iterations += 1;

        // centroid of every vertex except the worst
        let mut centroid: Vec<f64> = vec![0.0; dimension];
        for (vertex, _) in &simplex[..dimension] {
            for (c, v) in centroid.iter_mut().zip(vertex) {
                *c += v;
            }
        }
        for c in &mut centroid {
            *c = *c / dimension as f64;
        }

        // `centroid + coefitient * (worst - centroid)`
        let along = |coefitient: f64, towards: &[f64]| -> Vec<f64> {
            return centroid
                .iter()
                .zip(towards)
                .map(|(c, t)| c + coefitient * (t - c))
                .collect::<Vec<f64>>();
        };

        let worst_vertex: Vec<f64> = simplex[dimension].0.clone();
        let second_worst: f64 = simplex[dimension - 1].1;

        let reflected: Vec<f64> = along(-optimizer::REFLECTION, &worst_vertex);
        let reflected_value: f64 = evaluate(&objective, &reflected);

        if reflected_value < best {
            let expanded: Vec<f64> =
                along(-optimizer::REFLECTION * optimizer::EXPANSION, &worst_vertex);
            let expanded_value: f64 = evaluate(&objective, &expanded);
            simplex[dimension] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
            continue;
        }

        if reflected_value < second_worst {
            simplex[dimension] = (reflected, reflected_value);
            continue;
        }

        if reflected_value < worst {
            // outside contraction
            let contracted: Vec<f64> =
                along(-optimizer::REFLECTION * optimizer::CONTRACTION, &worst_vertex);
            let contracted_value: f64 = evaluate(&objective, &contracted);
            if contracted_value <= reflected_value {
                simplex[dimension] = (contracted, contracted_value);
                continue;
            }
        } else {
            // inside contraction
            let contracted: Vec<f64> = along(optimizer::CONTRACTION, &worst_vertex);
            let contracted_value: f64 = evaluate(&objective, &contracted);
            if contracted_value < worst {
                simplex[dimension] = (contracted, contracted_value);
                continue;
            }
        }

        // shrink towards the best vertex
        let best_vertex: Vec<f64> = simplex[0].0.clone();
        for (vertex, value) in simplex.iter_mut().skip(1) {
            for (v, b) in vertex.iter_mut().zip(&best_vertex) {
                *v = b + optimizer::SHRINK * (*v - b);
            }
            *value = evaluate(&objective, &*vertex);
        }
    }

    let (point, value): (Vec<f64>, f64) = simplex.swap_remove(0);
    return Minimum {
        point,
        value,
        iterations,
        converged,
    };
}

/// Maps a real number to `(lower, inf)`: `lower + exp(t)`.
#[must_use]
pub fn to_greater_than(t: f64, lower: f64) -> f64 {
    return lower + t.exp();
}

/// Inverse of [to_greater_than]: `ln(x - lower)`.
///
/// Returns `-inf` if `x <= lower`.
#[must_use]
pub fn from_greater_than(x: f64, lower: f64) -> f64 {
    if x <= lower {
        return f64::NEG_INFINITY;
    }
    return (x - lower).ln();
}
