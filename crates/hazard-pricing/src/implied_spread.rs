//! Spread implied by a clean price quote.
//!
//! Finds the constant continuously compounded spread over the discount
//! curve at which the bond's settlement value equals the dirty value
//! implied by the quoted clean price. Value falls strictly as the spread
//! rises, so a bracketing solver applies once a sign change is found.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use hazard_core::types::{CashFlowSchedule, Date};
use hazard_math::solvers::{expand_bracket, SolverConfig, SolverMethod};

use crate::error::{PricingError, PricingResult};
use crate::risky_pv::to_f64;

/// Settings for the implied-spread solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpliedSpreadConfig {
    /// Root finder.
    #[serde(default)]
    pub method: SolverMethod,
    /// Initial lower spread bound.
    #[serde(default = "default_lower_bound")]
    pub lower_bound: f64,
    /// Initial upper spread bound.
    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,
    /// Bracket growth per expansion.
    #[serde(default = "default_expansion_factor")]
    pub expansion_factor: f64,
    /// Maximum bracket expansions.
    #[serde(default = "default_max_expansions")]
    pub max_expansions: u32,
    /// Convergence tolerance on the value residual.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration cap for the root finder.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_lower_bound() -> f64 {
    -0.05
}

fn default_upper_bound() -> f64 {
    0.50
}

fn default_expansion_factor() -> f64 {
    2.0
}

fn default_max_expansions() -> u32 {
    10
}

fn default_tolerance() -> f64 {
    1e-10
}

fn default_max_iterations() -> u32 {
    100
}

impl Default for ImpliedSpreadConfig {
    fn default() -> Self {
        Self {
            method: SolverMethod::default(),
            lower_bound: default_lower_bound(),
            upper_bound: default_upper_bound(),
            expansion_factor: default_expansion_factor(),
            max_expansions: default_max_expansions(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl ImpliedSpreadConfig {
    /// Sets the root finder.
    #[must_use]
    pub fn with_method(mut self, method: SolverMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the initial bracket.
    #[must_use]
    pub fn with_bracket(mut self, lower_bound: f64, upper_bound: f64) -> Self {
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
        self
    }

    /// Sets how far the bracket may grow.
    #[must_use]
    pub fn with_expansion(mut self, factor: f64, max_expansions: u32) -> Self {
        self.expansion_factor = factor;
        self.max_expansions = max_expansions;
        self
    }
}

/// Solves for the spread that reproduces a target value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImpliedSpreadSolver {
    config: ImpliedSpreadConfig,
}

impl ImpliedSpreadSolver {
    /// Creates a solver.
    #[must_use]
    pub fn new(config: ImpliedSpreadConfig) -> Self {
        Self { config }
    }

    /// The solver settings.
    pub fn config(&self) -> &ImpliedSpreadConfig {
        &self.config
    }

    /// Finds `s` with `value_at_spread(s) == target`.
    ///
    /// The first error raised by `value_at_spread` aborts the solve and is
    /// returned as is.
    ///
    /// # Errors
    ///
    /// `ImpliedSpreadNotFound` if no bracket is found or the root finder
    /// does not converge.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hazard_pricing::implied_spread::ImpliedSpreadSolver;
    ///
    /// // 5y zero on a flat 3% curve, priced at 80
    /// let solver = ImpliedSpreadSolver::default();
    /// let spread = solver
    ///     .solve(80.0, |s| Ok(100.0 * (-(0.03 + s) * 5.0).exp()))
    ///     .unwrap();
    /// assert!((spread - ((100.0f64 / 80.0).ln() / 5.0 - 0.03)).abs() < 1e-9);
    /// ```
    pub fn solve<F>(&self, target: f64, value_at_spread: F) -> PricingResult<f64>
    where
        F: Fn(f64) -> PricingResult<f64>,
    {
        let config = &self.config;
        let failure: RefCell<Option<PricingError>> = RefCell::new(None);
        let objective = |spread: f64| match value_at_spread(spread) {
            Ok(value) => value - target,
            Err(err) => {
                failure.borrow_mut().get_or_insert(err);
                f64::NAN
            }
        };

        let bracket = expand_bracket(
            &objective,
            config.lower_bound,
            config.upper_bound,
            config.expansion_factor,
            config.max_expansions,
        );
        if let Some(err) = failure.take() {
            return Err(err);
        }
        let (lower, upper) =
            bracket.map_err(|e| PricingError::implied_spread_not_found(target, e.to_string()))?;

        let solver_config = SolverConfig::new(config.tolerance, config.max_iterations);
        let result = config.method.solve(&objective, lower, upper, &solver_config);
        if let Some(err) = failure.take() {
            return Err(err);
        }
        let result =
            result.map_err(|e| PricingError::implied_spread_not_found(target, e.to_string()))?;

        log::debug!(
            "implied spread {:.8} from {} after {} iterations (residual {:.2e})",
            result.root,
            config.method,
            result.iterations,
            result.residual
        );
        Ok(result.root)
    }
}

/// Dirty settlement value implied by a clean price per 100 of notional.
///
/// `clean / 100 * outstanding notional + accrued interest`, both at
/// `settlement`.
pub fn target_dirty_value(clean_price: f64, schedule: &CashFlowSchedule, settlement: Date) -> f64 {
    clean_price / 100.0 * to_f64(schedule.outstanding_notional(settlement))
        + to_f64(schedule.accrued_amount(settlement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hazard_core::types::CashFlow;
    use rust_decimal_macros::dec;

    fn zero_value(spread: f64) -> f64 {
        100.0 * (-(0.02 + spread) * 3.0).exp()
    }

    #[test]
    fn test_both_methods_recover_spread() {
        let target = zero_value(0.0125);
        for method in [SolverMethod::Brent, SolverMethod::Bisection] {
            let solver = ImpliedSpreadSolver::new(ImpliedSpreadConfig::default().with_method(method));
            let spread = solver.solve(target, |s| Ok(zero_value(s))).unwrap();
            assert_relative_eq!(spread, 0.0125, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_bracket_expands_for_distressed_prices() {
        // Spread far above the initial upper bound
        let target = zero_value(1.2);
        let spread = ImpliedSpreadSolver::default()
            .solve(target, |s| Ok(zero_value(s)))
            .unwrap();
        assert_relative_eq!(spread, 1.2, epsilon = 1e-8);
    }

    #[test]
    fn test_unreachable_target() {
        let config = ImpliedSpreadConfig::default().with_expansion(2.0, 2);
        let err = ImpliedSpreadSolver::new(config)
            .solve(-5.0, |s| Ok(zero_value(s)))
            .unwrap_err();
        assert!(matches!(err, PricingError::ImpliedSpreadNotFound { .. }));
    }

    #[test]
    fn test_iteration_cap() {
        let config = ImpliedSpreadConfig::default()
            .with_method(SolverMethod::Bisection)
            .with_max_iterations(3);
        let err = ImpliedSpreadSolver::new(config)
            .solve(zero_value(0.01), |s| Ok(zero_value(s)))
            .unwrap_err();
        assert!(matches!(err, PricingError::ImpliedSpreadNotFound { .. }));
    }

    #[test]
    fn test_valuation_errors_propagate() {
        let err = ImpliedSpreadSolver::default()
            .solve(90.0, |_| Err(PricingError::empty_quote("spread")))
            .unwrap_err();
        assert!(matches!(err, PricingError::EmptyQuote { .. }));
    }

    #[test]
    fn test_target_dirty_value() {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = start.add_days(365);
        let schedule = CashFlowSchedule::new(vec![
            CashFlow::coupon(dec!(1000), start, end, end, dec!(50)).unwrap(),
            CashFlow::redemption(end, dec!(1000)),
        ]);
        let settlement = start.add_days(73);
        // 98 per 100 on 1000 notional plus 73/365 of the coupon
        assert_relative_eq!(
            target_dirty_value(98.0, &schedule, settlement),
            980.0 + 10.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = ImpliedSpreadConfig::default();
        assert_eq!(config.method, SolverMethod::Brent);
        assert_relative_eq!(config.lower_bound, -0.05);
        assert_relative_eq!(config.upper_bound, 0.50);
        assert_eq!(config.max_expansions, 10);
        assert_eq!(config.max_iterations, 100);
    }
}
