//! # Hazard Math
//!
//! Numerical building blocks for the Hazard library:
//!
//! - **Solvers**: bracketing root finders ([`solvers::brent`], [`solvers::bisection`])
//!   and bracket expansion
//! - **Interpolation**: linear and log-linear interpolation for term structures

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{Interpolator, LinearInterpolator, LogLinearInterpolator};
    pub use crate::solvers::{
        bisection, brent, expand_bracket, SolverConfig, SolverMethod, SolverResult,
    };
}

pub use error::{MathError, MathResult};
