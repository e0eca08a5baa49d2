//! Interpolation for term structures.
//!
//! | Method | Interpolates | Typical use |
//! |--------|--------------|-------------|
//! | [`LinearInterpolator`] | y | zero rates |
//! | [`LogLinearInterpolator`] | ln(y) | discount factors, survival probabilities |
//!
//! Both extrapolate by extending the first or last segment when built with
//! `with_extrapolation()`, and return
//! [`MathError::ExtrapolationNotAllowed`](crate::error::MathError) otherwise.

mod linear;
mod log_linear;

pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use crate::error::{MathError, MathResult};

/// Common interface for one-dimensional interpolators.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Validates abscissae and ordinates shared by all interpolators.
fn validate_nodes(xs: &[f64], ys: &[f64]) -> MathResult<()> {
    if xs.len() < 2 {
        return Err(MathError::insufficient_data(2, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(MathError::invalid_input(
            "x values must be strictly increasing",
        ));
    }
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i + 1]]` used for `x`.
///
/// Points outside the data map to the first or last segment.
fn segment_index(xs: &[f64], x: f64) -> usize {
    let upper = xs.partition_point(|&node| node <= x);
    upper.saturating_sub(1).min(xs.len() - 2)
}

/// Fails when `x` is outside the data and extrapolation is off.
fn check_range<I: Interpolator + ?Sized>(interp: &I, x: f64) -> MathResult<()> {
    if interp.allows_extrapolation() || interp.in_range(x) {
        Ok(())
    } else {
        Err(MathError::ExtrapolationNotAllowed {
            x,
            min: interp.min_x(),
            max: interp.max_x(),
        })
    }
}
