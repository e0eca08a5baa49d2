//! Valuation output.

use serde::{Deserialize, Serialize};

use hazard_core::types::Date;

/// The two values a risky bond engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationResults {
    /// Date the value is expressed at.
    pub valuation_date: Date,
    /// Value at the valuation date.
    pub value: f64,
    /// Value at the settlement date.
    pub settlement_value: f64,
    /// Spread solved from the price quote, for the implied-spread engine.
    pub implied_spread: Option<f64>,
}
