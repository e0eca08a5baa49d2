//! # Hazard Pricing
//!
//! Discounting bond engines that account for issuer default risk.
//!
//! - [`compute_risky_pv`]: the survival-weighted value of a cashflow
//!   schedule, with recovery on default
//! - [`DiscountingRiskyBondEngine`]: values a schedule at a valuation and a
//!   settlement date, built from a spread and survival curve, from a price
//!   quote, or from the spread implied by a clean price
//! - [`RiskyBond`]: caches the engine's results until market data moves
//! - [`Settings`]: the process-wide default for reference-date cashflows
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use hazard_core::prelude::*;
//! use hazard_curves::prelude::*;
//! use hazard_pricing::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let today = Date::from_ymd(2025, 1, 1).unwrap();
//! let discount: Arc<dyn DiscountCurve> =
//!     Arc::new(FlatForward::new(today, 0.0, DayCountConvention::Act365Fixed));
//! let survival: Arc<dyn SurvivalCurve> =
//!     Arc::new(FlatHazardRate::new(today, 0.02, DayCountConvention::Act365Fixed).unwrap());
//!
//! let engine = DiscountingRiskyBondEngine::new(
//!     Handle::new(discount),
//!     Handle::new(survival),
//!     Handle::new(Arc::new(SimpleQuote::new(0.4))),
//!     Handle::empty(),
//!     "1Y".parse().unwrap(),
//!     Some(false),
//! )
//! .unwrap();
//!
//! let schedule = CashFlowSchedule::new(vec![CashFlow::redemption(today.add_days(730), dec!(100))]);
//! let bond = RiskyBond::new(engine, schedule, today);
//! assert!((bond.value().unwrap() - 97.6472).abs() < 1e-3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod engine;
pub mod error;
pub mod implied_spread;
pub mod instrument;
pub mod results;
pub mod risky_pv;
pub mod settings;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::{DiscountingRiskyBondEngine, EngineInputs, EngineVariant};
    pub use crate::error::{PricingError, PricingResult};
    pub use crate::implied_spread::{ImpliedSpreadConfig, ImpliedSpreadSolver};
    pub use crate::instrument::RiskyBond;
    pub use crate::results::ValuationResults;
    pub use crate::risky_pv::{compute_risky_pv, CreditModel, RiskyPv};
    pub use crate::settings::Settings;
}

pub use engine::{DiscountingRiskyBondEngine, EngineInputs, EngineVariant, DEFAULT_TIMESTEP};
pub use error::{PricingError, PricingResult};
pub use implied_spread::{ImpliedSpreadConfig, ImpliedSpreadSolver};
pub use instrument::RiskyBond;
pub use results::ValuationResults;
pub use risky_pv::{compute_risky_pv, CreditModel, RiskyPv};
pub use settings::Settings;
