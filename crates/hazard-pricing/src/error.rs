//! Error types for risky bond valuation.

use hazard_core::types::Period;
use hazard_core::CoreError;
use hazard_curves::{CurveError, PriceType};
use thiserror::Error;

/// A specialized Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors raised while configuring or running a risky bond engine.
///
/// Every variant is fatal to the valuation that raised it; absent optional
/// quotes never surface here because they resolve to defaults.
#[derive(Error, Debug, Clone)]
pub enum PricingError {
    /// The discount curve handle is empty.
    #[error("discounting term structure handle is empty")]
    MissingDiscountCurve,

    /// Both an explicit spread and a price were supplied.
    #[error("ambiguous spread: explicit security spread and implicit through security price")]
    AmbiguousSpreadConfiguration,

    /// More than one live cashflow and none of them a coupon.
    #[error("risky bond engine does not support bonds with multiple cashflows ({cashflows}) but no coupons")]
    UnsupportedCashflowStructure {
        /// Number of live cashflows.
        cashflows: usize,
    },

    /// The implied-spread engine needs a clean price.
    #[error("price-implied spread requires a Clean price quote, got {price_type}")]
    UnsupportedPriceType {
        /// The quote's price type.
        price_type: PriceType,
    },

    /// The implied-spread solve failed to bracket or converge.
    #[error("implied spread not found for target value {target:.6}: {reason}")]
    ImpliedSpreadNotFound {
        /// Dirty settlement value the solve tried to match.
        target: f64,
        /// Why the solve failed.
        reason: String,
    },

    /// A quote that must hold a value is empty.
    #[error("quote '{name}' is empty")]
    EmptyQuote {
        /// What the quote represents.
        name: String,
    },

    /// The zero-coupon integration step is not a positive period.
    #[error("timestep period {period} must be positive")]
    InvalidTimestep {
        /// The offending period.
        period: Period,
    },

    /// Curve evaluation error.
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    /// Date arithmetic error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl PricingError {
    /// Creates an empty quote error.
    #[must_use]
    pub fn empty_quote(name: impl Into<String>) -> Self {
        Self::EmptyQuote { name: name.into() }
    }

    /// Creates an implied spread failure.
    #[must_use]
    pub fn implied_spread_not_found(target: f64, reason: impl Into<String>) -> Self {
        Self::ImpliedSpreadNotFound {
            target,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            PricingError::MissingDiscountCurve.to_string(),
            "discounting term structure handle is empty"
        );
        let err = PricingError::UnsupportedCashflowStructure { cashflows: 2 };
        assert!(err.to_string().contains("multiple cashflows"));
        let err = PricingError::UnsupportedPriceType {
            price_type: PriceType::Dirty,
        };
        assert!(err.to_string().contains("Dirty"));
    }

    #[test]
    fn test_wraps_curve_errors() {
        let err: PricingError = CurveError::empty_quote("spread").into();
        assert!(matches!(err, PricingError::Curve(_)));
    }
}
