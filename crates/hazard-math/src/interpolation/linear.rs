//! Piecewise linear interpolation.

use crate::error::MathResult;
use crate::interpolation::{check_range, segment_index, validate_nodes, Interpolator};

/// Piecewise linear interpolation between data points.
///
/// # Example
///
/// ```rust
/// use hazard_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let zero_rates = LinearInterpolator::new(vec![1.0, 2.0], vec![0.03, 0.04]).unwrap();
/// assert!((zero_rates.interpolate(1.5).unwrap() - 0.035).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// `xs` must be strictly increasing and the same length as `ys`, with at
    /// least two points.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys)?;
        Ok(Self {
            xs,
            ys,
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

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(self, x)?;
        let i = segment_index(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
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
