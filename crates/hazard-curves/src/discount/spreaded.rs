//! Discount curve shifted by a continuously compounded spread.
//!
//! `DF'(d) = DF(d) * exp(-s * t(d))`, with `t` measured on the base curve's
//! reference date and day count, i.e. a parallel shift of the zero curve.

use std::fmt;
use std::sync::{Arc, Weak};

use hazard_core::daycounts::DayCountConvention;
use hazard_core::types::Date;

use crate::error::{CurveError, CurveResult};
use crate::observer::{Observable, Observed, Observer};
use crate::quote::SimpleQuote;
use crate::traits::DiscountCurve;

/// Where the spread comes from.
#[derive(Debug, Clone)]
pub enum SpreadSource {
    /// A constant spread.
    Fixed(f64),
    /// A live quote, read on every evaluation.
    Quote(Arc<SimpleQuote>),
}

impl SpreadSource {
    /// The current spread.
    pub fn value(&self) -> CurveResult<f64> {
        match self {
            SpreadSource::Fixed(spread) => Ok(*spread),
            SpreadSource::Quote(quote) => quote
                .value()
                .ok_or_else(|| CurveError::empty_quote("spread")),
        }
    }
}

/// A base discount curve under a parallel zero-rate shift.
///
/// Changes to the base curve or to a quoted spread are passed on to this
/// curve's observers.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use hazard_core::prelude::*;
/// use hazard_curves::prelude::*;
///
/// let today = Date::from_ymd(2025, 1, 1).unwrap();
/// let base: Arc<dyn DiscountCurve> =
///     Arc::new(FlatForward::new(today, 0.03, DayCountConvention::Act365Fixed));
/// let spreaded = SpreadedDiscountCurve::with_fixed_spread(base, 0.01);
///
/// let df = spreaded.discount(today.add_days(365)).unwrap();
/// assert!((df - (-0.04f64).exp()).abs() < 1e-12);
/// ```
pub struct SpreadedDiscountCurve {
    base: Arc<dyn DiscountCurve>,
    spread: SpreadSource,
    observable: Observable,
}

impl SpreadedDiscountCurve {
    /// Shifts `base` by `spread`.
    pub fn new(base: Arc<dyn DiscountCurve>, spread: SpreadSource) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let observer: Weak<dyn Observer> = weak.clone();
            base.observable().register_observer(observer.clone());
            if let SpreadSource::Quote(quote) = &spread {
                quote.observable().register_observer(observer);
            }
            Self {
                base,
                spread,
                observable: Observable::new(),
            }
        })
    }

    /// Shifts `base` by a constant spread.
    pub fn with_fixed_spread(base: Arc<dyn DiscountCurve>, spread: f64) -> Arc<Self> {
        Self::new(base, SpreadSource::Fixed(spread))
    }

    /// Shifts `base` by a quoted spread.
    pub fn with_quote(base: Arc<dyn DiscountCurve>, quote: Arc<SimpleQuote>) -> Arc<Self> {
        Self::new(base, SpreadSource::Quote(quote))
    }

    /// The unshifted curve.
    pub fn base(&self) -> &Arc<dyn DiscountCurve> {
        &self.base
    }

    /// The current spread.
    pub fn spread(&self) -> CurveResult<f64> {
        self.spread.value()
    }
}

impl Observer for SpreadedDiscountCurve {
    fn update(&self) {
        self.observable.notify_observers();
    }
}

impl Observed for SpreadedDiscountCurve {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl DiscountCurve for SpreadedDiscountCurve {
    fn reference_date(&self) -> Date {
        self.base.reference_date()
    }

    fn day_count(&self) -> DayCountConvention {
        self.base.day_count()
    }

    fn discount_t(&self, t: f64) -> CurveResult<f64> {
        let spread = self.spread.value()?;
        Ok(self.base.discount_t(t)? * (-spread * t).exp())
    }
}

impl fmt::Debug for SpreadedDiscountCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpreadedDiscountCurve")
            .field("reference_date", &self.base.reference_date())
            .field("spread", &self.spread)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::FlatForward;
    use crate::observer::tests::watch;
    use approx::assert_relative_eq;

    fn base() -> Arc<dyn DiscountCurve> {
        let today = Date::from_ymd(2025, 1, 1).unwrap();
        Arc::new(FlatForward::new(today, 0.02, DayCountConvention::Act365Fixed))
    }

    #[test]
    fn test_parallel_shift() {
        let base = base();
        let today = base.reference_date();
        let curve = SpreadedDiscountCurve::with_fixed_spread(Arc::clone(&base), 0.015);

        let date = today.add_days(730);
        let expected = base.discount(date).unwrap() * (-0.015f64 * 2.0).exp();
        assert_relative_eq!(curve.discount(date).unwrap(), expected, epsilon = 1e-14);
        assert_relative_eq!(curve.zero_rate(date).unwrap(), 0.035, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_spread_matches_base() {
        let base = base();
        let curve = SpreadedDiscountCurve::with_fixed_spread(Arc::clone(&base), 0.0);
        let date = base.reference_date().add_days(1234);
        assert_relative_eq!(curve.discount(date).unwrap(), base.discount(date).unwrap());
    }

    #[test]
    fn test_quoted_spread_notifies() {
        let quote = Arc::new(SimpleQuote::new(0.01));
        let curve = SpreadedDiscountCurve::with_quote(base(), Arc::clone(&quote));
        let counter = watch(curve.observable());

        quote.set_value(0.02);
        assert_eq!(counter.count(), 1);
        assert_relative_eq!(curve.spread().unwrap(), 0.02);
    }

    #[test]
    fn test_base_changes_are_forwarded() {
        let base = base();
        let curve = SpreadedDiscountCurve::with_fixed_spread(Arc::clone(&base), 0.01);
        let counter = watch(curve.observable());

        base.observable().notify_observers();
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_empty_quote_is_an_error() {
        let quote = Arc::new(SimpleQuote::empty());
        let curve = SpreadedDiscountCurve::with_quote(base(), quote);
        let date = curve.reference_date().add_days(100);
        assert!(matches!(curve.discount(date), Err(CurveError::EmptyQuote { .. })));
    }
}
