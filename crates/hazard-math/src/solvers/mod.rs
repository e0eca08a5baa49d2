//! Bracketing root finders.
//!
//! Both solvers need an interval over which the function changes sign:
//!
//! | Solver | Convergence | Evaluations per step |
//! |--------|-------------|----------------------|
//! | [`brent`] | superlinear | 1 |
//! | [`bisection`] | linear (one bit per step) | 1 |
//!
//! When only a guess of the interval is known, [`expand_bracket`] widens it
//! geometrically until a sign change appears.
//!
//! # Example
//!
//! ```rust
//! use hazard_math::solvers::{brent, expand_bracket, SolverConfig};
//!
//! // Flat 3% curve, 5y zero bond priced at 80: solve the spread.
//! let price = |s: f64| 100.0 * (-(0.03 + s) * 5.0).exp() - 80.0;
//!
//! let (lo, hi) = expand_bracket(price, 0.0, 0.01, 2.0, 10).unwrap();
//! let result = brent(price, lo, hi, &SolverConfig::default()).unwrap();
//! assert!(price(result.root).abs() < 1e-9);
//! ```

mod bisection;
mod brent;

pub use bisection::bisection;
pub use brent::brent;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MathError, MathResult};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Tolerance and iteration cap for a solve.
///
/// A solve stops when either `|f(x)| < tolerance` or the bracket has shrunk
/// below `tolerance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a successful solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Function value at the root.
    pub residual: f64,
}

/// Runtime choice of bracketing solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SolverMethod {
    /// Brent-Dekker
    #[default]
    Brent,
    /// Interval halving
    Bisection,
}

impl SolverMethod {
    /// Solves `f(x) = 0` on `[a, b]` with the selected method.
    pub fn solve<F>(self, f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
    {
        match self {
            SolverMethod::Brent => brent(f, a, b, config),
            SolverMethod::Bisection => bisection(f, a, b, config),
        }
    }
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverMethod::Brent => write!(f, "Brent"),
            SolverMethod::Bisection => write!(f, "Bisection"),
        }
    }
}

impl FromStr for SolverMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brent" => Ok(SolverMethod::Brent),
            "bisection" => Ok(SolverMethod::Bisection),
            _ => Err(MathError::invalid_input(format!("unknown solver method: {s}"))),
        }
    }
}

/// Widens `[a, b]` until `f` changes sign over it.
///
/// Each step pushes out the end whose function value is smaller in
/// magnitude, by `factor` times the current width.
///
/// # Errors
///
/// `InvalidInput` for an empty interval or non-positive factor,
/// `InvalidBracket` if no sign change is found within `max_expansions`.
pub fn expand_bracket<F>(
    f: F,
    a: f64,
    b: f64,
    factor: f64,
    max_expansions: u32,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if !(a < b) {
        return Err(MathError::invalid_input(format!(
            "bracket lower bound {a} must be below upper bound {b}"
        )));
    }
    if !(factor > 0.0) {
        return Err(MathError::invalid_input(format!(
            "expansion factor must be positive, got {factor}"
        )));
    }

    let (mut lo, mut hi) = (a, b);
    let (mut f_lo, mut f_hi) = (f(lo), f(hi));

    for expansion in 0..max_expansions {
        if changes_sign(f_lo, f_hi) {
            if expansion > 0 {
                log::debug!("bracket expanded {expansion} times to [{lo}, {hi}]");
            }
            return Ok((lo, hi));
        }
        let width = hi - lo;
        if f_lo.abs() < f_hi.abs() {
            lo -= factor * width;
            f_lo = f(lo);
        } else {
            hi += factor * width;
            f_hi = f(hi);
        }
    }

    if changes_sign(f_lo, f_hi) {
        Ok((lo, hi))
    } else {
        log::warn!("no sign change found in [{lo}, {hi}] after {max_expansions} expansions");
        Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        })
    }
}

/// True when a root lies in a closed interval with these end values.
pub(crate) fn changes_sign(fa: f64, fb: f64) -> bool {
    fa == 0.0 || fb == 0.0 || (fa < 0.0) != (fb < 0.0)
}
