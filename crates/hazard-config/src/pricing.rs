//! A complete pricing setup: one engine configuration plus securities.

use serde::{Deserialize, Serialize};

use crate::engine::BondEngineConfig;
use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::file::ConfigFile;
use crate::security::SecurityConfig;

/// Engine configuration and the securities priced under it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BondPricingConfig {
    /// Engine configuration.
    #[serde(default)]
    pub engine: BondEngineConfig,

    /// Security configurations.
    #[serde(default, rename = "security")]
    pub securities: Vec<SecurityConfig>,
}

impl BondPricingConfig {
    /// Adds a security.
    #[must_use]
    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.securities.push(security);
        self
    }

    /// Looks up a security by id.
    pub fn security(&self, id: &str) -> ConfigResult<&SecurityConfig> {
        self.securities
            .iter()
            .find(|s| s.curve_id == id)
            .ok_or_else(|| ConfigError::NotFound {
                key: id.to_string(),
            })
    }
}

impl Validate for BondPricingConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.engine.validate();
        for (i, security) in self.securities.iter().enumerate() {
            errors.extend(security.validate().into_iter().map(|e| ValidationError {
                field: format!("security[{i}].{}", e.field),
                ..e
            }));
            if self.securities[..i]
                .iter()
                .any(|s| s.curve_id == security.curve_id)
            {
                errors.push(ValidationError::with_rule(
                    format!("security[{i}].curve_id"),
                    format!("Duplicate security '{}'", security.curve_id),
                    "unique_security",
                ));
            }
        }
        errors
    }
}

impl ConfigFile for BondPricingConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let config = BondPricingConfig::default()
            .with_security(SecurityConfig::new("SECURITY_A", ""))
            .with_security(SecurityConfig::new("SECURITY_B", ""));

        assert_eq!(config.security("SECURITY_B").unwrap().curve_id, "SECURITY_B");
        assert!(matches!(
            config.security("SECURITY_C"),
            Err(ConfigError::NotFound { ref key }) if key == "SECURITY_C"
        ));
    }

    #[test]
    fn test_nested_field_names() {
        let config = BondPricingConfig::default()
            .with_security(SecurityConfig::new("SECURITY_A", ""))
            .with_security(SecurityConfig::new("", ""))
            .with_security(SecurityConfig::new("SECURITY_A", ""));

        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["security[1].curve_id", "security[2].curve_id"]);
    }
}
