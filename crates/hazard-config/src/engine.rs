//! Engine configuration for risky bond pricing.
//!
//! The model and engine names select the builder; everything else the
//! builder needs is carried as string parameters, read through typed
//! accessors:
//!
//! | Parameter | Meaning | Default |
//! |-----------|---------|---------|
//! | `TimestepPeriod` | zero bond integration step | `3M` |
//! | `IncludeSettlementDateFlows` | reference-date policy override | process default |
//! | `PriceTreatment` | `PriceBased` or `ImpliedSpread` | `PriceBased` |
//! | `SolverMethod` | `Brent` or `Bisection` | `Brent` |
//! | `SolverTolerance` | price residual tolerance | `1e-10` |
//! | `SolverMaxIterations` | iteration cap | `100` |

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use hazard_core::types::Period;
use hazard_math::solvers::SolverMethod;
use hazard_pricing::ImpliedSpreadConfig;

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::file::ConfigFile;

/// Model name the discounting bond builder answers to.
pub const DISCOUNTED_CASHFLOWS: &str = "DiscountedCashflows";
/// Engine name the discounting bond builder answers to.
pub const DISCOUNTING_RISKY_BOND_ENGINE: &str = "DiscountingRiskyBondEngine";

/// Zero bond integration step parameter.
pub const TIMESTEP_PERIOD: &str = "TimestepPeriod";
/// Reference-date policy parameter.
pub const INCLUDE_SETTLEMENT_DATE_FLOWS: &str = "IncludeSettlementDateFlows";
/// Price treatment parameter.
pub const PRICE_TREATMENT: &str = "PriceTreatment";
/// Implied-spread solver method parameter.
pub const SOLVER_METHOD: &str = "SolverMethod";
/// Implied-spread tolerance parameter.
pub const SOLVER_TOLERANCE: &str = "SolverTolerance";
/// Implied-spread iteration cap parameter.
pub const SOLVER_MAX_ITERATIONS: &str = "SolverMaxIterations";

const DEFAULT_TIMESTEP_PERIOD: &str = "3M";

/// What to do with a security price quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriceTreatment {
    /// Take the price as given and discount on the curve alone.
    #[default]
    PriceBased,
    /// Solve the spread the price implies and discount at it.
    ImpliedSpread,
}

impl fmt::Display for PriceTreatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceTreatment::PriceBased => write!(f, "PriceBased"),
            PriceTreatment::ImpliedSpread => write!(f, "ImpliedSpread"),
        }
    }
}

impl FromStr for PriceTreatment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pricebased" | "price" => Ok(PriceTreatment::PriceBased),
            "impliedspread" | "spread" => Ok(PriceTreatment::ImpliedSpread),
            _ => Err(format!("unknown price treatment: {s}")),
        }
    }
}

/// Model, engine and parameters for the discounting bond builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondEngineConfig {
    /// Pricing model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Pricing engine name.
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Engine parameters.
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

fn default_model() -> String {
    DISCOUNTED_CASHFLOWS.to_string()
}

fn default_engine() -> String {
    DISCOUNTING_RISKY_BOND_ENGINE.to_string()
}

impl Default for BondEngineConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            engine: default_engine(),
            parameters: HashMap::new(),
        }
    }
}

impl BondEngineConfig {
    /// Sets a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Sets the integration step.
    #[must_use]
    pub fn with_timestep_period(self, period: Period) -> Self {
        self.with_parameter(TIMESTEP_PERIOD, period.to_string())
    }

    /// Sets the price treatment.
    #[must_use]
    pub fn with_price_treatment(self, treatment: PriceTreatment) -> Self {
        self.with_parameter(PRICE_TREATMENT, treatment.to_string())
    }

    /// Raw parameter value.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Zero bond integration step.
    pub fn timestep_period(&self) -> ConfigResult<Period> {
        let raw = self.parameter(TIMESTEP_PERIOD).unwrap_or(DEFAULT_TIMESTEP_PERIOD);
        let period: Period = raw
            .parse()
            .map_err(|e| ConfigError::invalid_parameter(TIMESTEP_PERIOD, raw, format!("{e}")))?;
        if period.is_positive() {
            Ok(period)
        } else {
            Err(ConfigError::invalid_parameter(
                TIMESTEP_PERIOD,
                raw,
                "period must be positive",
            ))
        }
    }

    /// Reference-date policy override, `None` to use the process default.
    pub fn include_settlement_date_flows(&self) -> ConfigResult<Option<bool>> {
        self.parameter(INCLUDE_SETTLEMENT_DATE_FLOWS)
            .map(|raw| parse_bool(INCLUDE_SETTLEMENT_DATE_FLOWS, raw))
            .transpose()
    }

    /// What to do with a price quote.
    pub fn price_treatment(&self) -> ConfigResult<PriceTreatment> {
        self.parameter(PRICE_TREATMENT).map_or(Ok(PriceTreatment::default()), |raw| {
            raw.parse()
                .map_err(|reason: String| ConfigError::invalid_parameter(PRICE_TREATMENT, raw, reason))
        })
    }

    /// Implied-spread solver settings, defaults overridden by parameters.
    pub fn implied_spread(&self) -> ConfigResult<ImpliedSpreadConfig> {
        let mut config = ImpliedSpreadConfig::default();
        if let Some(raw) = self.parameter(SOLVER_METHOD) {
            let method: SolverMethod = raw
                .parse()
                .map_err(|e| ConfigError::invalid_parameter(SOLVER_METHOD, raw, format!("{e}")))?;
            config = config.with_method(method);
        }
        if let Some(raw) = self.parameter(SOLVER_TOLERANCE) {
            let tolerance: f64 = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid_parameter(SOLVER_TOLERANCE, raw, format!("{e}")))?;
            if !(tolerance > 0.0) {
                return Err(ConfigError::invalid_parameter(
                    SOLVER_TOLERANCE,
                    raw,
                    "tolerance must be positive",
                ));
            }
            config = config.with_tolerance(tolerance);
        }
        if let Some(raw) = self.parameter(SOLVER_MAX_ITERATIONS) {
            let iterations: u32 = raw.trim().parse().map_err(|e| {
                ConfigError::invalid_parameter(SOLVER_MAX_ITERATIONS, raw, format!("{e}"))
            })?;
            if iterations == 0 {
                return Err(ConfigError::invalid_parameter(
                    SOLVER_MAX_ITERATIONS,
                    raw,
                    "at least one iteration is required",
                ));
            }
            config = config.with_max_iterations(iterations);
        }
        Ok(config)
    }
}

fn parse_bool(name: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "y" | "yes" | "1" => Ok(true),
        "false" | "n" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::invalid_parameter(name, raw, "expected a boolean")),
    }
}

impl Validate for BondEngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.model != DISCOUNTED_CASHFLOWS {
            errors.push(ValidationError::with_rule(
                "model",
                format!("Unsupported model '{}', expected {DISCOUNTED_CASHFLOWS}", self.model),
                "known_model",
            ));
        }
        if self.engine != DISCOUNTING_RISKY_BOND_ENGINE {
            errors.push(ValidationError::with_rule(
                "engine",
                format!(
                    "Unsupported engine '{}', expected {DISCOUNTING_RISKY_BOND_ENGINE}",
                    self.engine
                ),
                "known_engine",
            ));
        }

        let checks = [
            (TIMESTEP_PERIOD, self.timestep_period().err()),
            (
                INCLUDE_SETTLEMENT_DATE_FLOWS,
                self.include_settlement_date_flows().err(),
            ),
            (PRICE_TREATMENT, self.price_treatment().err()),
            ("implied_spread", self.implied_spread().err()),
        ];
        for (field, err) in checks {
            if let Some(err) = err {
                errors.push(ValidationError::with_rule(
                    field,
                    err.to_string(),
                    "valid_parameter",
                ));
            }
        }

        errors
    }
}

impl ConfigFile for BondEngineConfig {}
