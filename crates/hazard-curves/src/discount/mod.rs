//! Discount curves.

mod flat;
mod interpolated;
mod spreaded;

pub use flat::FlatForward;
pub use interpolated::{DiscountInterpolation, InterpolatedDiscountCurve};
pub use spreaded::{SpreadSource, SpreadedDiscountCurve};
