//! Constant hazard rate survival curve.

use hazard_core::daycounts::DayCountConvention;
use hazard_core::types::Date;

use crate::error::{CurveError, CurveResult};
use crate::observer::{Observable, Observed};
use crate::traits::SurvivalCurve;

/// Survival under a constant default intensity.
///
/// `S(t) = exp(-h * t)`
///
/// # Example
///
/// ```rust
/// use hazard_core::prelude::*;
/// use hazard_curves::{FlatHazardRate, SurvivalCurve};
///
/// let today = Date::from_ymd(2025, 1, 1).unwrap();
/// let curve = FlatHazardRate::new(today, 0.02, DayCountConvention::Act365Fixed).unwrap();
///
/// let s = curve.survival_probability(today.add_days(365)).unwrap();
/// assert!((s - (-0.02f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct FlatHazardRate {
    reference_date: Date,
    hazard_rate: f64,
    day_count: DayCountConvention,
    observable: Observable,
}

impl FlatHazardRate {
    /// Creates a flat hazard curve.
    ///
    /// # Errors
    ///
    /// Fails if `hazard_rate` is negative or not finite.
    pub fn new(
        reference_date: Date,
        hazard_rate: f64,
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        if !(hazard_rate.is_finite() && hazard_rate >= 0.0) {
            return Err(CurveError::invalid_value(format!(
                "hazard rate must be finite and non-negative, got {hazard_rate}"
            )));
        }
        Ok(Self {
            reference_date,
            hazard_rate,
            day_count,
            observable: Observable::new(),
        })
    }

    /// Certain survival: `S(t) = 1` everywhere.
    #[must_use]
    pub fn no_default(reference_date: Date, day_count: DayCountConvention) -> Self {
        Self {
            reference_date,
            hazard_rate: 0.0,
            day_count,
            observable: Observable::new(),
        }
    }

    /// The hazard rate.
    pub fn rate(&self) -> f64 {
        self.hazard_rate
    }
}

impl Observed for FlatHazardRate {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl SurvivalCurve for FlatHazardRate {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn survival_probability_t(&self, t: f64) -> CurveResult<f64> {
        Ok((-self.hazard_rate * t.max(0.0)).exp())
    }

    fn hazard_rate_t(&self, _t: f64) -> CurveResult<f64> {
        Ok(self.hazard_rate)
    }
}
