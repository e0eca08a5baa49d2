//! Error types for term structures and quotes.

use hazard_core::types::Date;
use hazard_core::CoreError;
use hazard_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve and quote operations.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// A curve parameter or node value is invalid.
    #[error("Invalid curve value: {reason}")]
    InvalidValue {
        /// Description of the problem.
        reason: String,
    },

    /// Not enough pillars to build the curve.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        got: usize,
    },

    /// Pillar dates are not strictly increasing or precede the reference date.
    #[error("Pillar date {date} at index {index} is out of order (reference date {reference})")]
    PillarOutOfOrder {
        /// Index of the offending pillar.
        index: usize,
        /// The offending pillar date.
        date: Date,
        /// Curve reference date.
        reference: Date,
    },

    /// A quote the curve depends on has no value.
    #[error("Quote '{name}' is empty")]
    EmptyQuote {
        /// What the quote represents.
        name: String,
    },

    /// Numerical error from interpolation.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Date or day count error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    /// Creates an empty quote error.
    #[must_use]
    pub fn empty_quote(name: impl Into<String>) -> Self {
        Self::EmptyQuote { name: name.into() }
    }
}
