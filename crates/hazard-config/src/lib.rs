//! # Hazard Configuration
//!
//! Configuration for the risky bond engines.
//!
//! - [`SecurityConfig`]: which spread, recovery and price quotes describe a
//!   security
//! - [`BondEngineConfig`]: model and engine names plus string parameters,
//!   read through typed accessors (`TimestepPeriod`, `PriceTreatment`, ...)
//! - [`BondPricingConfig`]: an engine configuration and its securities
//!
//! Every configuration is [`Validate`] and loads from TOML or JSON through
//! [`ConfigFile`].
//!
//! # Example
//!
//! ```rust
//! use hazard_config::{BondPricingConfig, ConfigFile, PriceTreatment};
//!
//! let config = BondPricingConfig::from_toml_str(
//!     r#"
//!     [engine.parameters]
//!     TimestepPeriod = "1M"
//!     PriceTreatment = "ImpliedSpread"
//!
//!     [[security]]
//!     curve_id = "SECURITY_A"
//!     price_quote = "BOND/PRICE/SECURITY_A"
//!     price_type = "Clean"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.engine.timestep_period().unwrap().to_string(), "1M");
//! assert_eq!(config.engine.price_treatment().unwrap(), PriceTreatment::ImpliedSpread);
//! assert!(config.security("SECURITY_A").is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod error;
pub mod file;
pub mod pricing;
pub mod security;

pub use engine::{BondEngineConfig, PriceTreatment};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use file::ConfigFile;
pub use pricing::BondPricingConfig;
pub use security::SecurityConfig;
