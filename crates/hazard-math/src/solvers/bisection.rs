//! Interval halving.

use crate::error::{MathError, MathResult};
use crate::solvers::{changes_sign, SolverConfig, SolverResult};

/// Finds a root of `f` in `[a, b]` by repeated halving.
///
/// Slow but unconditionally convergent once the root is bracketed; each
/// step gains one bit of precision.
///
/// # Errors
///
/// - `InvalidBracket` if `f(a)` and `f(b)` have the same sign
/// - `ConvergenceFailed` if `config.max_iterations` is exhausted
///
/// # Example
///
/// ```rust
/// use hazard_math::solvers::{bisection, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if !changes_sign(f_lo, f_hi) {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }
    for (x, fx) in [(lo, f_lo), (hi, f_hi)] {
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: 0,
                residual: fx,
            });
        }
    }

    let mut last = f_lo;
    for iteration in 1..=config.max_iterations {
        let mid = lo + 0.5 * (hi - lo);
        let f_mid = f(mid);
        last = f_mid;

        if f_mid.abs() < config.tolerance || 0.5 * (hi - lo) < config.tolerance {
            return Ok(SolverResult {
                root: mid,
                iterations: iteration,
                residual: f_mid,
            });
        }

        if (f_mid < 0.0) == (f_lo < 0.0) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(MathError::convergence_failed(config.max_iterations, last.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_decreasing_function() {
        // Price falls as spread rises
        let f = |s: f64| 100.0 * (-(0.02 + s) * 3.0).exp() - 90.0;
        let result = bisection(f, 0.5, -0.05, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, (100.0f64 / 90.0).ln() / 3.0 - 0.02, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x + 1.0;
        assert!(bisection(f, -1.0, 1.0, &SolverConfig::default()).is_err());
    }

    #[test]
    fn test_iteration_cap() {
        let f = |x: f64| x - 0.123_456_789;
        let config = SolverConfig::default().with_max_iterations(5);
        let err = bisection(f, 0.0, 1.0, &config).unwrap_err();
        assert!(matches!(err, MathError::ConvergenceFailed { iterations: 5, .. }));
    }
}
