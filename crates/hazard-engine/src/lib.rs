//! # Hazard Engine
//!
//! Turns trades and market data into priced risky bonds.
//!
//! - [`Market`] / [`InMemoryMarket`]: curves and quotes by identifier
//! - [`BondEngineBuilder`]: picks the engine variant from the quotes
//!   available for a security and caches one engine per
//!   `{currency}_{creditCurve}_{security}_{referenceCurve}`
//! - [`BondData`]: trade data that produces a cashflow schedule and a
//!   [`RiskyBond`](hazard_pricing::RiskyBond)
//!
//! Recovery resolves to the security's own quote, falling back to the
//! credit curve's with a warning. Spread and price are optional.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use hazard_config::BondEngineConfig;
//! use hazard_core::prelude::*;
//! use hazard_curves::prelude::*;
//! use hazard_engine::{BondEngineBuilder, InMemoryMarket};
//!
//! let today = Date::from_ymd(2025, 1, 1).unwrap();
//! let market = Arc::new(InMemoryMarket::new());
//! let curve: Arc<dyn DiscountCurve> =
//!     Arc::new(FlatForward::new(today, 0.03, DayCountConvention::Act365Fixed));
//! market.add_yield_curve("USD-SOFR", curve);
//!
//! let builder = BondEngineBuilder::new(market, BondEngineConfig::default()).unwrap();
//! let engine = builder.engine(Currency::USD, "", "SECURITY_A", "USD-SOFR").unwrap();
//! let again = builder.engine(Currency::USD, "", "SECURITY_A", "USD-SOFR").unwrap();
//! assert!(Arc::ptr_eq(&engine, &again));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bond;
pub mod builder;
pub mod error;
pub mod market;

pub use bond::BondData;
pub use builder::BondEngineBuilder;
pub use error::{EngineError, EngineResult};
pub use market::{InMemoryMarket, Market};
