//! Per-security market data configuration.

use serde::{Deserialize, Serialize};

use hazard_curves::PriceType;

use crate::error::{Validate, ValidationError};
use crate::file::ConfigFile;

/// Which quotes describe a security.
///
/// Every quote is optional: a missing spread means zero spread, a missing
/// recovery falls back to the issuer curve, and a missing price leaves the
/// engine on the curve-driven path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Security identifier.
    pub curve_id: String,

    /// Free-text description.
    #[serde(default)]
    pub description: String,

    /// Spread quote name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread_quote: Option<String>,

    /// Recovery rate quote name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_quote: Option<String>,

    /// Price quote name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_quote: Option<String>,

    /// How the price quote is expressed. Required with a price quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_type: Option<PriceType>,
}

impl SecurityConfig {
    /// Creates a configuration with no quotes.
    pub fn new(curve_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            curve_id: curve_id.into(),
            description: description.into(),
            spread_quote: None,
            recovery_quote: None,
            price_quote: None,
            price_type: None,
        }
    }

    /// Sets the spread quote.
    #[must_use]
    pub fn with_spread_quote(mut self, quote: impl Into<String>) -> Self {
        self.spread_quote = Some(quote.into());
        self
    }

    /// Sets the recovery rate quote.
    #[must_use]
    pub fn with_recovery_quote(mut self, quote: impl Into<String>) -> Self {
        self.recovery_quote = Some(quote.into());
        self
    }

    /// Sets the price quote and its type.
    #[must_use]
    pub fn with_price_quote(mut self, quote: impl Into<String>, price_type: PriceType) -> Self {
        self.price_quote = Some(quote.into());
        self.price_type = Some(price_type);
        self
    }

    /// Names of all quotes this security needs, in a fixed order.
    pub fn quotes(&self) -> Vec<&str> {
        [&self.spread_quote, &self.recovery_quote, &self.price_quote]
            .into_iter()
            .filter_map(|q| q.as_deref())
            .collect()
    }
}

impl Validate for SecurityConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.curve_id.trim().is_empty() {
            errors.push(ValidationError::with_rule(
                "curve_id",
                "Curve id cannot be empty",
                "non_empty",
            ));
        }

        for (field, quote) in [
            ("spread_quote", &self.spread_quote),
            ("recovery_quote", &self.recovery_quote),
            ("price_quote", &self.price_quote),
        ] {
            if quote.as_deref().is_some_and(|q| q.trim().is_empty()) {
                errors.push(ValidationError::with_rule(
                    field,
                    "Quote name cannot be blank",
                    "non_empty",
                ));
            }
        }

        match (&self.price_quote, self.price_type) {
            (Some(_), None) => errors.push(ValidationError::with_rule(
                "price_type",
                "A price quote needs a price type",
                "price_type_with_price",
            )),
            (None, Some(_)) => errors.push(ValidationError::with_rule(
                "price_type",
                "Price type given without a price quote",
                "price_type_with_price",
            )),
            _ => {}
        }

        errors
    }
}

impl ConfigFile for SecurityConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_in_order() {
        let config = SecurityConfig::new("SECURITY_A", "senior unsecured")
            .with_recovery_quote("RECOVERY_RATE/RATE/SECURITY_A")
            .with_price_quote("BOND/PRICE/SECURITY_A", PriceType::Clean)
            .with_spread_quote("BOND/YIELD_SPREAD/SECURITY_A");

        assert_eq!(
            config.quotes(),
            vec![
                "BOND/YIELD_SPREAD/SECURITY_A",
                "RECOVERY_RATE/RATE/SECURITY_A",
                "BOND/PRICE/SECURITY_A"
            ]
        );
        assert!(config.is_valid());
    }

    #[test]
    fn test_price_type_required_with_price() {
        let mut config = SecurityConfig::new("SECURITY_A", "");
        config.price_quote = Some("BOND/PRICE/SECURITY_A".into());

        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "price_type");
    }

    #[test]
    fn test_empty_curve_id_and_blank_quote() {
        let config = SecurityConfig::new(" ", "").with_spread_quote("");
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["curve_id", "spread_quote"]);
    }

    #[test]
    fn test_toml_with_price() {
        let config = SecurityConfig::from_toml_str(
            r#"
            curve_id = "SECURITY_A"
            description = "five year senior"
            recovery_quote = "RECOVERY_RATE/RATE/SECURITY_A"
            price_quote = "BOND/PRICE/SECURITY_A"
            price_type = "Clean"
            "#,
        )
        .unwrap();
        assert_eq!(config.price_type, Some(PriceType::Clean));
        assert_eq!(config.spread_quote, None);
    }

    #[test]
    fn test_json_rejects_invalid() {
        let err = SecurityConfig::from_json_str(r#"{"curve_id": "", "price_type": "Dirty"}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::ConfigError::MultipleValidationErrors(ref errs) if errs.len() == 2
        ));
    }
}
