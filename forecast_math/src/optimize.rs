//! Derivative-free minimisation used to tune model parameters

/// Settings for [`nelder_mead`]
#[derive(Debug, Clone, Copy)]
pub struct NelderMeadOptions {
    /// Maximum number of simplex iterations
    pub max_iterations: usize,
    /// Stop once the spread of objective values across the simplex falls below this
    pub tolerance: f64,
    /// Size of the initial simplex step, relative to each starting coordinate
    pub initial_step: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-10,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a minimisation
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the tolerance was reached before the iteration limit
    pub converged: bool,
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimise `objective` with the Nelder-Mead simplex method.
///
/// `bounds` is either empty (unconstrained) or holds one `(min, max)` pair per
/// coordinate; every candidate point is clamped into the box before it is
/// evaluated. Non-finite objective values are treated as +infinity.
pub fn nelder_mead<F>(
    objective: F,
    start: &[f64],
    bounds: &[(f64, f64)],
    options: NelderMeadOptions,
) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let evaluate = |point: &[f64]| {
        let value = objective(point);
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    };

    let n = start.len();
    if n == 0 {
        return Minimum {
            point: Vec::new(),
            value: evaluate(&[]),
            iterations: 0,
            converged: true,
        };
    }

    // Initial simplex: the start point plus one step along each axis
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    let origin = project(start.to_vec(), bounds);
    let origin_value = evaluate(&origin);
    simplex.push((origin.clone(), origin_value));

    for i in 0..n {
        let mut vertex = origin.clone();
        let step = if vertex[i].abs() > 1e-10 {
            options.initial_step * vertex[i].abs()
        } else {
            options.initial_step
        };
        vertex[i] += step;
        let mut vertex = project(vertex, bounds);
        // Stepping into a bound can collapse the vertex onto the origin
        if vertex == origin {
            vertex[i] -= 2.0 * step;
            vertex = project(vertex, bounds);
        }
        let value = evaluate(&vertex);
        simplex.push((vertex, value));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

        let best = simplex[0].1;
        let worst = simplex[n].1;
        if (worst - best).abs() <= options.tolerance {
            converged = true;
            break;
        }

        iterations += 1;

        let centroid = centroid(&simplex[..n]);
        let worst_point = simplex[n].0.clone();

        let reflected = project(along(&centroid, &worst_point, -REFLECTION), bounds);
        let reflected_value = evaluate(&reflected);

        if reflected_value < best {
            let expanded = project(along(&centroid, &reflected, EXPANSION), bounds);
            let expanded_value = evaluate(&expanded);
            simplex[n] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
            continue;
        }

        if reflected_value < simplex[n - 1].1 {
            simplex[n] = (reflected, reflected_value);
            continue;
        }

        let (contracted, contracted_value) = if reflected_value < worst {
            let point = project(along(&centroid, &reflected, CONTRACTION), bounds);
            let value = evaluate(&point);
            (point, value)
        } else {
            let point = project(along(&centroid, &worst_point, CONTRACTION), bounds);
            let value = evaluate(&point);
            (point, value)
        };

        if contracted_value < reflected_value.min(worst) {
            simplex[n] = (contracted, contracted_value);
            continue;
        }

        // Shrink every vertex towards the best one
        let best_point = simplex[0].0.clone();
        for vertex in simplex.iter_mut().skip(1) {
            let shrunk = project(along(&best_point, &vertex.0, SHRINK), bounds);
            let value = evaluate(&shrunk);
            *vertex = (shrunk, value);
        }
    }

    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (point, value) = simplex.swap_remove(0);

    Minimum {
        point,
        value,
        iterations,
        converged,
    }
}

/// `from + factor * (towards - from)`
fn along(from: &[f64], towards: &[f64], factor: f64) -> Vec<f64> {
    from.iter()
        .zip(towards)
        .map(|(f, t)| f + factor * (t - f))
        .collect()
}

fn centroid(vertices: &[(Vec<f64>, f64)]) -> Vec<f64> {
    let dims = vertices[0].0.len();
    let count = vertices.len() as f64;
    (0..dims)
        .map(|d| vertices.iter().map(|(p, _)| p[d]).sum::<f64>() / count)
        .collect()
}

fn project(mut point: Vec<f64>, bounds: &[(f64, f64)]) -> Vec<f64> {
    if bounds.len() == point.len() {
        for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(lo, hi);
        }
    }
    point
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_minimises_quadratic() {
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] + 3.0).powi(2),
            &[0.0, 0.0],
            &[],
            NelderMeadOptions::default(),
        );

        assert!(result.converged);
        assert_abs_diff_eq!(result.point[0], 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.point[1], -3.0, epsilon = 1e-3);
        assert!(result.value < 1e-6);
    }

    #[test]
    fn test_respects_bounds() {
        // Unconstrained optimum at 5.0 lies outside the box
        let result = nelder_mead(
            |x| (x[0] - 5.0).powi(2),
            &[0.5],
            &[(0.0, 1.0)],
            NelderMeadOptions::default(),
        );

        assert!(result.point[0] <= 1.0);
        assert_abs_diff_eq!(result.point[0], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_non_finite_objective_is_avoided() {
        let result = nelder_mead(
            |x| if x[0] < 0.0 { f64::NAN } else { (x[0] - 1.0).powi(2) },
            &[0.2],
            &[],
            NelderMeadOptions::default(),
        );

        assert!(result.value.is_finite());
        assert_abs_diff_eq!(result.point[0], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_empty_start() {
        let result = nelder_mead(|_| 4.0, &[], &[], NelderMeadOptions::default());
        assert!(result.point.is_empty());
        assert_eq!(result.value, 4.0);
        assert_eq!(result.iterations, 0);
    }
}
