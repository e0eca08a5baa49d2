//! Domain types.
//!
//! - [`Date`]: calendar date
//! - [`Period`]: tenor such as `3M`
//! - [`CashFlow`] / [`CashFlowSchedule`]: what a bond pays
//! - [`Currency`]: ISO currency codes
//! - [`Frequency`]: coupon frequency

mod cashflow;
mod currency;
mod date;
mod frequency;
mod period;

pub use cashflow::{CashFlow, CashFlowSchedule, Coupon, Redemption};
pub use currency::Currency;
pub use date::Date;
pub use frequency::Frequency;
pub use period::{Period, TimeUnit};
