//! Log-linear interpolation.
//!
//! Interpolating `ln(y)` keeps values positive and, for discount factors or
//! survival probabilities, gives piecewise constant forward (or hazard) rates.

use crate::error::{MathError, MathResult};
use crate::interpolation::{check_range, segment_index, validate_nodes, Interpolator};

/// Linear interpolation of `ln(y)`.
///
/// ```text
/// y(x) = exp(linear_interpolate(x, ln(y)))
/// ```
///
/// # Example
///
/// ```rust
/// use hazard_math::interpolation::{Interpolator, LogLinearInterpolator};
///
/// let times = vec![0.0, 1.0, 2.0];
/// let survival = vec![1.0, 0.98, 0.95];
///
/// let interp = LogLinearInterpolator::new(times, survival).unwrap();
/// let p = interp.interpolate(1.5).unwrap();
/// assert!(p < 0.98 && p > 0.95);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    log_ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Fails on fewer than 2 points, mismatched lengths, unsorted `xs`, or
    /// any non-positive y value.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys)?;
        let log_ys = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| {
                if y > 0.0 {
                    Ok(y.ln())
                } else {
                    Err(MathError::invalid_input(format!(
                        "log-linear interpolation requires positive values, got y[{i}] = {y}"
                    )))
                }
            })
            .collect::<MathResult<Vec<_>>>()?;

        Ok(Self {
            xs,
            log_ys,
            allow_extrapolation: false,
        })
    }

    /// Extends the end segments beyond the data.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(self, x)?;
        let i = segment_index(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (l0, l1) = (self.log_ys[i], self.log_ys[i + 1]);
        Ok((l0 + (l1 - l0) * (x - x0) / (x1 - x0)).exp())
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}
