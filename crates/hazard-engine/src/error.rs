//! Engine error types.

use thiserror::Error;

/// Result type for engine selection and trade building.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A curve or quote the builder needs is not in the market.
    #[error("market data error: {0}")]
    MarketDataError(String),

    /// Trade data cannot describe a bond.
    #[error("reference data error: {0}")]
    ReferenceDataError(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(#[from] hazard_config::ConfigError),

    /// Pricing error
    #[error("pricing error: {0}")]
    PricingError(#[from] hazard_pricing::PricingError),

    /// Date or cashflow construction error
    #[error("core error: {0}")]
    CoreError(#[from] hazard_core::CoreError),
}

impl EngineError {
    /// Creates a market data error.
    #[must_use]
    pub fn market_data(msg: impl Into<String>) -> Self {
        Self::MarketDataError(msg.into())
    }

    /// Creates a reference data error.
    #[must_use]
    pub fn reference_data(msg: impl Into<String>) -> Self {
        Self::ReferenceDataError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_errors_convert() {
        let err: EngineError = hazard_pricing::PricingError::MissingDiscountCurve.into();
        assert!(err.to_string().starts_with("pricing error:"));
    }
}
