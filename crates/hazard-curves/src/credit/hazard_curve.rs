//! Survival curve through pillar survival probabilities.

use hazard_core::daycounts::{DayCount, DayCountConvention};
use hazard_core::types::Date;
use hazard_math::interpolation::{Interpolator, LogLinearInterpolator};

use crate::error::{CurveError, CurveResult};
use crate::observer::{Observable, Observed};
use crate::traits::SurvivalCurve;

/// Survival curve with piecewise constant hazard between pillars.
///
/// Survival probabilities are interpolated log-linearly, which is the same
/// as holding the hazard rate constant on each segment. The last segment's
/// hazard rate is held beyond the final pillar.
#[derive(Debug)]
pub struct HazardRateCurve {
    reference_date: Date,
    day_count: DayCountConvention,
    pillars: Vec<(Date, f64)>,
    interpolator: LogLinearInterpolator,
    observable: Observable,
}

impl HazardRateCurve {
    /// Builds the curve from `(date, survival probability)` pillars.
    ///
    /// # Errors
    ///
    /// Fails when there are no pillars, when dates are not strictly
    /// increasing after the reference date, or when probabilities leave
    /// `(0, 1]` or increase.
    pub fn new(
        reference_date: Date,
        pillars: Vec<(Date, f64)>,
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        if pillars.is_empty() {
            return Err(CurveError::InsufficientPoints {
                required: 1,
                got: 0,
            });
        }

        let mut times = vec![0.0];
        let mut survival = vec![1.0];
        let mut previous_date = reference_date;
        for (index, &(date, probability)) in pillars.iter().enumerate() {
            if date <= previous_date {
                return Err(CurveError::PillarOutOfOrder {
                    index,
                    date,
                    reference: reference_date,
                });
            }
            let previous = survival[survival.len() - 1];
            if !(probability > 0.0 && probability <= previous) {
                return Err(CurveError::invalid_value(format!(
                    "survival probability at {date} must be in (0, {previous}], got {probability}"
                )));
            }
            times.push(day_count.year_fraction_f64(reference_date, date));
            survival.push(probability);
            previous_date = date;
        }

        let interpolator = LogLinearInterpolator::new(times, survival)?.with_extrapolation();
        log::debug!(
            "built survival curve from {reference_date} with {} pillars",
            pillars.len()
        );
        Ok(Self {
            reference_date,
            day_count,
            pillars,
            interpolator,
            observable: Observable::new(),
        })
    }

    /// Builds the curve from the hazard rate applying up to each pillar date.
    ///
    /// # Errors
    ///
    /// Fails on negative or non-finite hazard rates, or on bad pillar dates.
    pub fn from_hazard_rates(
        reference_date: Date,
        hazard_rates: &[(Date, f64)],
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        let mut survival = 1.0;
        let mut previous_time = 0.0;
        let mut pillars = Vec::with_capacity(hazard_rates.len());
        for &(date, rate) in hazard_rates {
            if !(rate.is_finite() && rate >= 0.0) {
                return Err(CurveError::invalid_value(format!(
                    "hazard rate to {date} must be finite and non-negative, got {rate}"
                )));
            }
            let t = day_count.year_fraction_f64(reference_date, date);
            survival *= (-rate * (t - previous_time).max(0.0)).exp();
            pillars.push((date, survival));
            previous_time = t;
        }
        Self::new(reference_date, pillars, day_count)
    }

    /// The pillars the curve was built from.
    pub fn pillars(&self) -> &[(Date, f64)] {
        &self.pillars
    }
}

impl Observed for HazardRateCurve {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl SurvivalCurve for HazardRateCurve {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn survival_probability_t(&self, t: f64) -> CurveResult<f64> {
        if t <= 0.0 {
            return Ok(1.0);
        }
        Ok(self.interpolator.interpolate(t)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn today() -> Date {
        Date::from_ymd(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_piecewise_hazard() {
        let one = today().add_days(365);
        let two = one.add_days(365);
        let curve = HazardRateCurve::from_hazard_rates(
            today(),
            &[(one, 0.01), (two, 0.03)],
            DayCountConvention::Act365Fixed,
        )
        .unwrap();

        assert_relative_eq!(curve.survival_probability(one).unwrap(), (-0.01f64).exp(), epsilon = 1e-14);
        assert_relative_eq!(curve.survival_probability(two).unwrap(), (-0.04f64).exp(), epsilon = 1e-14);

        // Hazard inside each segment
        assert_relative_eq!(curve.hazard_rate(today().add_days(100)).unwrap(), 0.01, epsilon = 1e-9);
        assert_relative_eq!(curve.hazard_rate(one.add_days(100)).unwrap(), 0.03, epsilon = 1e-9);
        // Held flat beyond the last pillar
        assert_relative_eq!(
            curve.survival_probability(two.add_days(365)).unwrap(),
            (-0.07f64).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rejects_increasing_survival() {
        let one = today().add_days(365);
        let two = one.add_days(365);
        let result = HazardRateCurve::new(
            today(),
            vec![(one, 0.95), (two, 0.97)],
            DayCountConvention::Act365Fixed,
        );
        assert!(matches!(result, Err(CurveError::InvalidValue { .. })));
    }

    #[test]
    fn test_rejects_pillar_on_reference_date() {
        let result = HazardRateCurve::new(
            today(),
            vec![(today(), 1.0)],
            DayCountConvention::Act365Fixed,
        );
        assert!(matches!(result, Err(CurveError::PillarOutOfOrder { .. })));
    }
}
