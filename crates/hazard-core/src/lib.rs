//! # Hazard Core
//!
//! Core types for the Hazard credit-risky bond valuation library.
//!
//! This crate provides the building blocks shared by every other crate:
//!
//! - **Types**: [`Date`], [`Period`], [`Currency`], [`Frequency`]
//! - **Cashflows**: the closed [`CashFlow`] variant (coupon or redemption)
//!   and the ordered [`CashFlowSchedule`]
//! - **Day Count Conventions**: year fractions for accrual and term structures
//!
//! ## Example
//!
//! ```rust
//! use hazard_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let maturity = Date::from_ymd(2027, 6, 15).unwrap();
//! let schedule: CashFlowSchedule = vec![CashFlow::redemption(maturity, dec!(100))]
//!     .into_iter()
//!     .collect();
//!
//! let step: Period = "3M".parse().unwrap();
//! assert_eq!(schedule.maturity_date(), Some(maturity));
//! assert_eq!(step.to_string(), "3M");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::match_same_arms)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{
        CashFlow, CashFlowSchedule, Coupon, Currency, Date, Frequency, Period, Redemption,
        TimeUnit,
    };
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{CashFlow, CashFlowSchedule, Currency, Date, Period};
