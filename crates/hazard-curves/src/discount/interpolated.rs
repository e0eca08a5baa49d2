//! Discount curve interpolated between pillar dates.

use serde::{Deserialize, Serialize};

use hazard_core::daycounts::{DayCount, DayCountConvention};
use hazard_core::types::Date;
use hazard_math::interpolation::{Interpolator, LinearInterpolator, LogLinearInterpolator};

use crate::error::{CurveError, CurveResult};
use crate::observer::{Observable, Observed};
use crate::traits::DiscountCurve;

/// What is interpolated between pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiscountInterpolation {
    /// Log-linear on discount factors (piecewise flat forwards).
    #[default]
    LogLinearDiscount,
    /// Linear on continuously compounded zero rates.
    LinearZeroRate,
}

#[derive(Debug, Clone)]
enum Nodes {
    LogDiscount(LogLinearInterpolator),
    ZeroRate(LinearInterpolator),
}

/// A discount curve through `(date, discount factor)` pillars.
///
/// The reference date is an implicit pillar with discount factor 1. Beyond
/// the last pillar the final segment is extended.
///
/// # Example
///
/// ```rust
/// use hazard_core::prelude::*;
/// use hazard_curves::discount::{DiscountInterpolation, InterpolatedDiscountCurve};
/// use hazard_curves::DiscountCurve;
///
/// let today = Date::from_ymd(2025, 1, 1).unwrap();
/// let curve = InterpolatedDiscountCurve::new(
///     today,
///     vec![(today.add_days(365), 0.97), (today.add_days(730), 0.94)],
///     DayCountConvention::Act365Fixed,
///     DiscountInterpolation::LogLinearDiscount,
/// )
/// .unwrap();
///
/// let df = curve.discount(today.add_days(500)).unwrap();
/// assert!(df < 0.97 && df > 0.94);
/// ```
#[derive(Debug)]
pub struct InterpolatedDiscountCurve {
    reference_date: Date,
    day_count: DayCountConvention,
    pillars: Vec<(Date, f64)>,
    method: DiscountInterpolation,
    nodes: Nodes,
    observable: Observable,
}

impl InterpolatedDiscountCurve {
    /// Builds the curve.
    ///
    /// # Errors
    ///
    /// Fails when there are no pillars, when pillar dates are not strictly
    /// increasing after the reference date, or when a discount factor is not
    /// positive.
    pub fn new(
        reference_date: Date,
        pillars: Vec<(Date, f64)>,
        day_count: DayCountConvention,
        method: DiscountInterpolation,
    ) -> CurveResult<Self> {
        if pillars.is_empty() {
            return Err(CurveError::InsufficientPoints {
                required: 1,
                got: 0,
            });
        }

        let mut previous = reference_date;
        let mut times = Vec::with_capacity(pillars.len() + 1);
        times.push(0.0);
        for (index, &(date, df)) in pillars.iter().enumerate() {
            if date <= previous {
                return Err(CurveError::PillarOutOfOrder {
                    index,
                    date,
                    reference: reference_date,
                });
            }
            if !(df > 0.0) {
                return Err(CurveError::invalid_value(format!(
                    "discount factor at {date} must be positive, got {df}"
                )));
            }
            times.push(day_count.year_fraction_f64(reference_date, date));
            previous = date;
        }

        let nodes = match method {
            DiscountInterpolation::LogLinearDiscount => {
                let dfs = std::iter::once(1.0).chain(pillars.iter().map(|p| p.1)).collect();
                Nodes::LogDiscount(LogLinearInterpolator::new(times, dfs)?.with_extrapolation())
            }
            DiscountInterpolation::LinearZeroRate => {
                let rates: Vec<f64> = pillars
                    .iter()
                    .zip(&times[1..])
                    .map(|(&(_, df), &t)| -df.ln() / t)
                    .collect();
                // Flat short end
                let zeros = std::iter::once(rates[0]).chain(rates.iter().copied()).collect();
                Nodes::ZeroRate(LinearInterpolator::new(times, zeros)?.with_extrapolation())
            }
        };

        log::debug!(
            "built {method:?} discount curve from {reference_date} with {} pillars",
            pillars.len()
        );
        Ok(Self {
            reference_date,
            day_count,
            pillars,
            method,
            nodes,
            observable: Observable::new(),
        })
    }

    /// The pillars the curve was built from.
    pub fn pillars(&self) -> &[(Date, f64)] {
        &self.pillars
    }

    /// The interpolation scheme.
    pub fn method(&self) -> DiscountInterpolation {
        self.method
    }
}

impl Observed for InterpolatedDiscountCurve {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl DiscountCurve for InterpolatedDiscountCurve {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn discount_t(&self, t: f64) -> CurveResult<f64> {
        match &self.nodes {
            Nodes::LogDiscount(interp) => Ok(interp.interpolate(t)?),
            Nodes::ZeroRate(interp) => Ok((-interp.interpolate(t)? * t).exp()),
        }
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
    fn test_reprices_pillars() {
        let pillars = vec![(today().add_days(365), 0.97), (today().add_days(1095), 0.90)];
        for method in [
            DiscountInterpolation::LogLinearDiscount,
            DiscountInterpolation::LinearZeroRate,
        ] {
            let curve = InterpolatedDiscountCurve::new(
                today(),
                pillars.clone(),
                DayCountConvention::Act365Fixed,
                method,
            )
            .unwrap();
            for &(date, df) in &pillars {
                assert_relative_eq!(curve.discount(date).unwrap(), df, epsilon = 1e-12);
            }
            assert_relative_eq!(curve.discount(today()).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_log_linear_midpoint() {
        let curve = InterpolatedDiscountCurve::new(
            today(),
            vec![(today().add_days(730), 0.81)],
            DayCountConvention::Act365Fixed,
            DiscountInterpolation::LogLinearDiscount,
        )
        .unwrap();
        assert_relative_eq!(curve.discount(today().add_days(365)).unwrap(), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolates_last_forward() {
        let curve = InterpolatedDiscountCurve::new(
            today(),
            vec![(today().add_days(365), (-0.03f64).exp())],
            DayCountConvention::Act365Fixed,
            DiscountInterpolation::LogLinearDiscount,
        )
        .unwrap();
        assert_relative_eq!(
            curve.discount(today().add_days(730)).unwrap(),
            (-0.06f64).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rejects_bad_pillars() {
        let dc = DayCountConvention::Act365Fixed;
        let method = DiscountInterpolation::default();

        assert!(InterpolatedDiscountCurve::new(today(), vec![], dc, method).is_err());
        assert!(matches!(
            InterpolatedDiscountCurve::new(today(), vec![(today(), 1.0)], dc, method),
            Err(CurveError::PillarOutOfOrder { index: 0, .. })
        ));
        assert!(InterpolatedDiscountCurve::new(
            today(),
            vec![(today().add_days(10), 0.0)],
            dc,
            method
        )
        .is_err());
    }
}
