//! # Hazard Curves
//!
//! Term structures and market quotes consumed by the risky bond engines.
//!
//! - **Discount curves**: [`FlatForward`], [`InterpolatedDiscountCurve`] and the
//!   spread-adjusted [`SpreadedDiscountCurve`]
//! - **Survival curves**: [`FlatHazardRate`] and [`HazardRateCurve`]
//! - **Quotes**: [`SimpleQuote`] and [`PriceQuote`]
//! - **Handles**: relinkable, possibly-empty references ([`Handle`])
//! - **Notification**: [`Observable`] / [`Observer`], so that dependents can
//!   invalidate cached results when market data moves
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use hazard_core::prelude::*;
//! use hazard_curves::prelude::*;
//!
//! let today = Date::from_ymd(2025, 1, 1).unwrap();
//! let curve: Arc<dyn DiscountCurve> =
//!     Arc::new(FlatForward::new(today, 0.03, DayCountConvention::Act365Fixed));
//! let handle = Handle::new(curve);
//!
//! let df = handle.current().unwrap().discount(today.add_days(365)).unwrap();
//! assert!((df - (-0.03f64).exp()).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod credit;
pub mod discount;
pub mod error;
pub mod handle;
pub mod observer;
pub mod quote;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::credit::{FlatHazardRate, HazardRateCurve};
    pub use crate::discount::{
        DiscountInterpolation, FlatForward, InterpolatedDiscountCurve, SpreadSource,
        SpreadedDiscountCurve,
    };
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::handle::Handle;
    pub use crate::observer::{Observable, Observed, Observer};
    pub use crate::quote::{PriceQuote, PriceType, SimpleQuote};
    pub use crate::traits::{DiscountCurve, SurvivalCurve};
}

pub use credit::{FlatHazardRate, HazardRateCurve};
pub use discount::{FlatForward, InterpolatedDiscountCurve, SpreadedDiscountCurve};
pub use error::{CurveError, CurveResult};
pub use handle::Handle;
pub use observer::{Observable, Observed, Observer};
pub use quote::{PriceQuote, PriceType, SimpleQuote};
pub use traits::{DiscountCurve, SurvivalCurve};
