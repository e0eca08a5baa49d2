//! Brent-Dekker root finding.

use crate::error::{MathError, MathResult};
use crate::solvers::{changes_sign, SolverConfig, SolverResult};

/// Finds a root of `f` in `[lower, upper]` with the Brent-Dekker method.
///
/// Keeps a bracketing pair `(b, c)` with `b` the best estimate and takes an
/// inverse quadratic (or secant) step when it lands well inside the bracket,
/// falling back to bisection otherwise.
///
/// # Errors
///
/// - `InvalidBracket` if `f(lower)` and `f(upper)` have the same sign
/// - `ConvergenceFailed` if `config.max_iterations` is exhausted
///
/// # Example
///
/// ```rust
/// use hazard_math::solvers::{brent, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
pub fn brent<F>(f: F, lower: f64, upper: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (lower, upper);
    let (mut fa, mut fb) = (f(a), f(b));

    if !changes_sign(fa, fb) {
        return Err(MathError::InvalidBracket { a, b, fa, fb });
    }
    if fa == 0.0 {
        return Ok(SolverResult {
            root: a,
            iterations: 0,
            residual: fa,
        });
    }

    let (mut c, mut fc) = (b, fb);
    let mut step = b - a;
    let mut prev_step = step;

    for iteration in 1..=config.max_iterations {
        // Keep the root between b and c
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            step = b - a;
            prev_step = step;
        }
        // b is always the best estimate
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.tolerance;
        let half_width = 0.5 * (c - b);

        if fb.abs() < config.tolerance || half_width.abs() <= tol {
            return Ok(SolverResult {
                root: b,
                iterations: iteration,
                residual: fb,
            });
        }

        if prev_step.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant
                (2.0 * half_width * s, 1.0 - s)
            } else {
                // Inverse quadratic
                let qa = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * half_width * qa * (qa - r) - (b - a) * (r - 1.0)),
                    (qa - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }

            let max_interp = 3.0 * half_width * q - (tol * q).abs();
            if 2.0 * p < max_interp.min((prev_step * q).abs()) {
                prev_step = step;
                step = p / q;
            } else {
                step = half_width;
                prev_step = step;
            }
        } else {
            step = half_width;
            prev_step = step;
        }

        a = b;
        fa = fb;
        b += if step.abs() > tol {
            step
        } else {
            tol.copysign(half_width)
        };
        fb = f(b);
    }

    Err(MathError::convergence_failed(config.max_iterations, fb.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_reversed_bracket() {
        let f = |x: f64| x.cos() - x;
        let result = brent(f, 1.0, 0.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 0.739_085_133_215_160_6, epsilon = 1e-9);
    }

    #[test]
    fn test_root_at_endpoint() {
        let f = |x: f64| x - 1.0;
        let result = brent(f, 1.0, 3.0, &SolverConfig::default()).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;
        let err = brent(f, 2.0, 3.0, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::InvalidBracket { .. }));
    }

    #[test]
    fn test_iteration_cap() {
        let f = |x: f64| x.powi(3) - 0.5;
        let config = SolverConfig::default().with_max_iterations(2);
        let err = brent(f, -10.0, 10.0, &config).unwrap_err();
        assert!(matches!(err, MathError::ConvergenceFailed { iterations: 2, .. }));
    }

    #[test]
    fn test_faster_than_halving() {
        let f = |x: f64| x * x - 2.0;
        let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
        // Halving would need ~34 steps for 1e-10
        assert!(result.iterations < 20);
    }

    #[test]
    fn test_steep_discount_function() {
        // Price of a 30y zero against a spread: very flat for large spreads
        let f = |s: f64| 100.0 * (-(0.04 + s) * 30.0).exp() - 5.0;
        let result = brent(f, -0.05, 0.5, &SolverConfig::default()).unwrap();
        assert!(f(result.root).abs() < 1e-9);
    }
}
