//! Term structure traits.
//!
//! Both curve kinds are functions of date measured from their own
//! reference date with their own day count. Times at or before the
//! reference date map to a factor of 1.

use hazard_core::daycounts::{DayCount, DayCountConvention};
use hazard_core::types::Date;

use crate::error::CurveResult;
use crate::observer::Observed;

/// Step used for numerical hazard and short-rate estimates.
const ONE_DAY: f64 = 1.0 / 365.0;

/// A discount curve: date to discount factor.
///
/// # Example
///
/// ```rust
/// use hazard_core::prelude::*;
/// use hazard_curves::{DiscountCurve, FlatForward};
///
/// let today = Date::from_ymd(2025, 1, 1).unwrap();
/// let curve = FlatForward::new(today, 0.05, DayCountConvention::Act365Fixed);
///
/// let df = curve.discount(today.add_days(730)).unwrap();
/// assert!((df - (-0.10f64).exp()).abs() < 1e-12);
/// ```
pub trait DiscountCurve: Observed {
    /// The date at which discount factors equal 1.
    fn reference_date(&self) -> Date;

    /// Day count used to turn dates into times.
    fn day_count(&self) -> DayCountConvention;

    /// Discount factor at time `t` (years from the reference date).
    fn discount_t(&self, t: f64) -> CurveResult<f64>;

    /// Year fraction from the reference date to `date`.
    fn time_from_reference(&self, date: Date) -> f64 {
        self.day_count()
            .year_fraction_f64(self.reference_date(), date)
    }

    /// Discount factor at `date`.
    fn discount(&self, date: Date) -> CurveResult<f64> {
        let t = self.time_from_reference(date);
        if t <= 0.0 {
            return Ok(1.0);
        }
        self.discount_t(t)
    }

    /// Continuously compounded zero rate to `date`.
    ///
    /// At or before the reference date this is the one-day rate.
    fn zero_rate(&self, date: Date) -> CurveResult<f64> {
        let t = self.time_from_reference(date).max(ONE_DAY);
        Ok(-self.discount_t(t)?.ln() / t)
    }
}

/// A survival curve: date to probability of no default.
pub trait SurvivalCurve: Observed {
    /// The date at which survival equals 1.
    fn reference_date(&self) -> Date;

    /// Day count used to turn dates into times.
    fn day_count(&self) -> DayCountConvention;

    /// Survival probability at time `t` (years from the reference date).
    fn survival_probability_t(&self, t: f64) -> CurveResult<f64>;

    /// Year fraction from the reference date to `date`.
    fn time_from_reference(&self, date: Date) -> f64 {
        self.day_count()
            .year_fraction_f64(self.reference_date(), date)
    }

    /// Survival probability at `date`, 1 at or before the reference date.
    fn survival_probability(&self, date: Date) -> CurveResult<f64> {
        let t = self.time_from_reference(date);
        if t <= 0.0 {
            return Ok(1.0);
        }
        self.survival_probability_t(t)
    }

    /// Unconditional probability of default in `(start, end]`.
    fn default_probability(&self, start: Date, end: Date) -> CurveResult<f64> {
        Ok(self.survival_probability(start)? - self.survival_probability(end)?)
    }

    /// Instantaneous default intensity at time `t`.
    fn hazard_rate_t(&self, t: f64) -> CurveResult<f64> {
        let t = t.max(0.0);
        let s0 = if t > 0.0 {
            self.survival_probability_t(t)?
        } else {
            1.0
        };
        let s1 = self.survival_probability_t(t + ONE_DAY)?;
        Ok((s0.ln() - s1.ln()) / ONE_DAY)
    }

    /// Instantaneous default intensity at `date`.
    fn hazard_rate(&self, date: Date) -> CurveResult<f64> {
        self.hazard_rate_t(self.time_from_reference(date))
    }
}
