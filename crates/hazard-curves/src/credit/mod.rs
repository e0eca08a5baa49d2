//! Survival curves.

mod flat_hazard;
mod hazard_curve;

pub use flat_hazard::FlatHazardRate;
pub use hazard_curve::HazardRateCurve;
