//! Flat continuously compounded discount curve.

use hazard_core::daycounts::DayCountConvention;
use hazard_core::types::Date;

use crate::error::CurveResult;
use crate::observer::{Observable, Observed};
use crate::traits::DiscountCurve;

/// A discount curve with a single continuously compounded zero rate.
///
/// `DF(t) = exp(-r * t)`
#[derive(Debug)]
pub struct FlatForward {
    reference_date: Date,
    rate: f64,
    day_count: DayCountConvention,
    observable: Observable,
}

impl FlatForward {
    /// Creates a flat curve.
    #[must_use]
    pub fn new(reference_date: Date, rate: f64, day_count: DayCountConvention) -> Self {
        Self {
            reference_date,
            rate,
            day_count,
            observable: Observable::new(),
        }
    }

    /// The zero rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Observed for FlatForward {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl DiscountCurve for FlatForward {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn discount_t(&self, t: f64) -> CurveResult<f64> {
        Ok((-self.rate * t).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_forward() {
        let today = Date::from_ymd(2025, 1, 1).unwrap();
        let curve = FlatForward::new(today, 0.04, DayCountConvention::Act365Fixed);

        assert_relative_eq!(curve.discount(today).unwrap(), 1.0);
        assert_relative_eq!(
            curve.discount(today.add_days(365)).unwrap(),
            (-0.04f64).exp(),
            epsilon = 1e-14
        );
        assert_relative_eq!(curve.zero_rate(today.add_days(1000)).unwrap(), 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_before_reference_date() {
        let today = Date::from_ymd(2025, 1, 1).unwrap();
        let curve = FlatForward::new(today, 0.04, DayCountConvention::Act360);
        assert_relative_eq!(curve.discount(today.add_days(-30)).unwrap(), 1.0);
    }
}
