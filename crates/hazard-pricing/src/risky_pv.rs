//! Risky present value of a cashflow schedule.
//!
//! Each live cashflow is weighted by the probability of surviving to its
//! payment date. Coupons add the expected recovery on default during their
//! accrual period, assumed to happen at the period midpoint. A bond whose
//! only live cashflow is a redemption integrates recovery over the remaining
//! life in fixed steps instead.
//!
//! All factors are taken relative to the reference date:
//!
//! ```text
//! PV = Σ A_i · S(T_i)/S(ref) · DF(T_i)/DF(ref)
//!    + Σ N_j · R · [S(a_j) - S(b_j)]/S(ref) · DF(m_j)/DF(ref)
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use hazard_core::types::{CashFlow, CashFlowSchedule, Date, Period, Redemption};
use hazard_curves::{DiscountCurve, SurvivalCurve};

use crate::error::{PricingError, PricingResult};

/// The credit picture a valuation runs under.
#[derive(Clone, Copy)]
pub struct CreditModel<'a> {
    /// Discounting curve.
    pub discount: &'a dyn DiscountCurve,
    /// Issuer survival curve.
    pub survival: &'a dyn SurvivalCurve,
    /// Fraction of notional recovered on default.
    pub recovery: f64,
}

/// Contributions to a risky present value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiskyPv {
    /// Survival-weighted value of scheduled payments.
    pub cashflow_value: f64,
    /// Expected value recovered on default.
    pub recovery_value: f64,
}

impl RiskyPv {
    /// Sum of both contributions.
    pub fn total(&self) -> f64 {
        self.cashflow_value + self.recovery_value
    }
}

/// Risky present value of `schedule` as of `reference`.
///
/// `include_reference_date` decides whether a cashflow paid exactly on
/// `reference` is still live. `timestep` drives the recovery integration
/// of a single remaining redemption.
///
/// # Errors
///
/// `UnsupportedCashflowStructure` when more than one cashflow is live and
/// none is a coupon; curve errors are propagated.
///
/// # Example
///
/// ```rust
/// use hazard_core::prelude::*;
/// use hazard_curves::{FlatForward, FlatHazardRate};
/// use hazard_pricing::risky_pv::{compute_risky_pv, CreditModel};
/// use rust_decimal_macros::dec;
///
/// let today = Date::from_ymd(2025, 1, 1).unwrap();
/// let discount = FlatForward::new(today, 0.0, DayCountConvention::Act365Fixed);
/// let survival = FlatHazardRate::new(today, 0.02, DayCountConvention::Act365Fixed).unwrap();
/// let model = CreditModel { discount: &discount, survival: &survival, recovery: 0.4 };
///
/// let schedule = CashFlowSchedule::new(vec![CashFlow::redemption(today.add_days(730), dec!(100))]);
/// let pv = compute_risky_pv(&model, today, &schedule, false, "1Y".parse().unwrap()).unwrap();
/// assert!((pv.total() - 97.6472).abs() < 1e-3);
/// ```
pub fn compute_risky_pv(
    model: &CreditModel<'_>,
    reference: Date,
    schedule: &CashFlowSchedule,
    include_reference_date: bool,
    timestep: Period,
) -> PricingResult<RiskyPv> {
    let df_ref = model.discount.discount(reference)?;
    let sp_ref = model.survival.survival_probability(reference)?;

    let mut pv = RiskyPv::default();
    let mut live = 0_usize;
    let mut coupons = 0_usize;
    let mut last_live = None;

    for cf in schedule.live_cashflows(reference, include_reference_date) {
        live += 1;
        last_live = Some(cf);

        let paid = cf.date();
        let survival = model.survival.survival_probability(paid)? / sp_ref;
        pv.cashflow_value += to_f64(cf.amount()) * survival * model.discount.discount(paid)? / df_ref;

        if let CashFlow::Coupon(coupon) = cf {
            coupons += 1;
            let end = coupon.accrual_end();
            let start = coupon.accrual_start().max(reference).min(end);
            let default_date = start.midpoint(&end);
            let default_probability = model.survival.default_probability(start, end)? / sp_ref;
            pv.recovery_value += to_f64(coupon.nominal())
                * model.recovery
                * default_probability
                * model.discount.discount(default_date)?
                / df_ref;
        }
    }

    if live == 0 {
        log::debug!("no live cashflows as of {reference}, risky pv is zero");
        return Ok(RiskyPv::default());
    }
    if live > 1 && coupons == 0 {
        return Err(PricingError::UnsupportedCashflowStructure { cashflows: live });
    }
    if let (1, Some(CashFlow::Redemption(redemption))) = (live, last_live) {
        pv.recovery_value += redemption_recovery(model, reference, redemption, timestep, df_ref, sp_ref)?;
    }

    Ok(pv)
}

/// Expected recovery on a lone redemption, integrated in `timestep` steps
/// from `reference`, the last step clipped to the redemption date.
fn redemption_recovery(
    model: &CreditModel<'_>,
    reference: Date,
    redemption: &Redemption,
    timestep: Period,
    df_ref: f64,
    sp_ref: f64,
) -> PricingResult<f64> {
    if !timestep.is_positive() {
        return Err(PricingError::InvalidTimestep { period: timestep });
    }

    let maturity = redemption.payment_date();
    let amount = to_f64(redemption.amount());
    let mut value = 0.0;
    let mut start = reference;
    while start < maturity {
        let step = start.add_period(timestep)?;
        let end = step.min(maturity);
        let default_probability = model.survival.default_probability(start, end)? / sp_ref;
        value += amount
            * model.recovery
            * default_probability
            * model.discount.discount(start.midpoint(&end))?
            / df_ref;
        start = step;
    }
    Ok(value)
}

pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hazard_core::daycounts::DayCountConvention;
    use hazard_core::CoreError;
    use hazard_curves::{FlatForward, FlatHazardRate};
    use rust_decimal_macros::dec;

    fn today() -> Date {
        Date::from_ymd(2025, 1, 1).unwrap()
    }

    fn curves(rate: f64, hazard: f64) -> (FlatForward, FlatHazardRate) {
        (
            FlatForward::new(today(), rate, DayCountConvention::Act365Fixed),
            FlatHazardRate::new(today(), hazard, DayCountConvention::Act365Fixed).unwrap(),
        )
    }

    fn annual_coupon_bond() -> CashFlowSchedule {
        let mut flows = Vec::new();
        let mut start = today();
        for _ in 0..3 {
            let end = start.add_days(365);
            flows.push(CashFlow::coupon(dec!(100), start, end, end, dec!(5)).unwrap());
            start = end;
        }
        flows.push(CashFlow::redemption(start, dec!(100)));
        CashFlowSchedule::new(flows)
    }

    #[test]
    fn test_zero_bond_stepped_recovery() {
        let (discount, survival) = curves(0.0, 0.02);
        let model = CreditModel {
            discount: &discount,
            survival: &survival,
            recovery: 0.4,
        };
        let schedule =
            CashFlowSchedule::new(vec![CashFlow::redemption(today().add_days(730), dec!(100))]);

        let pv = compute_risky_pv(&model, today(), &schedule, false, "1Y".parse().unwrap()).unwrap();

        assert_relative_eq!(pv.cashflow_value, 100.0 * (-0.04f64).exp(), epsilon = 1e-10);
        assert_relative_eq!(
            pv.recovery_value,
            40.0 * (1.0 - (-0.04f64).exp()),
            epsilon = 1e-10
        );
        assert_relative_eq!(pv.total(), 97.6472, epsilon = 5e-4);
    }

    #[test]
    fn test_last_step_is_clipped() {
        let (discount, survival) = curves(0.0, 0.02);
        let model = CreditModel {
            discount: &discount,
            survival: &survival,
            recovery: 1.0,
        };
        // 500 days with 1Y steps: one full step and a 135-day stub
        let maturity = today().add_days(500);
        let schedule = CashFlowSchedule::new(vec![CashFlow::redemption(maturity, dec!(100))]);
        let pv = compute_risky_pv(&model, today(), &schedule, false, "1Y".parse().unwrap()).unwrap();

        let s_end = (-0.02f64 * 500.0 / 365.0).exp();
        assert_relative_eq!(pv.recovery_value, 100.0 * (1.0 - s_end), epsilon = 1e-10);
    }

    #[test]
    fn test_coupon_recovery_uses_midpoint_discount() {
        let (discount, survival) = curves(0.03, 0.01);
        let model = CreditModel {
            discount: &discount,
            survival: &survival,
            recovery: 0.5,
        };
        let end = today().add_days(365);
        let schedule = CashFlowSchedule::new(vec![
            CashFlow::coupon(dec!(100), today(), end, end, dec!(4)).unwrap(),
            CashFlow::redemption(end, dec!(100)),
        ]);

        let pv = compute_risky_pv(&model, today(), &schedule, false, "3M".parse().unwrap()).unwrap();

        let s1 = (-0.01f64).exp();
        let df1 = (-0.03f64).exp();
        let df_mid = (-0.03f64 * 182.0 / 365.0).exp();
        assert_relative_eq!(pv.cashflow_value, 104.0 * s1 * df1, epsilon = 1e-10);
        assert_relative_eq!(pv.recovery_value, 100.0 * 0.5 * (1.0 - s1) * df_mid, epsilon = 1e-10);
    }

    #[test]
    fn test_partially_elapsed_coupon_is_clipped() {
        let (discount, survival) = curves(0.0, 0.02);
        let model = CreditModel {
            discount: &discount,
            survival: &survival,
            recovery: 1.0,
        };
        let start = today().add_days(-100);
        let end = today().add_days(265);
        let schedule = CashFlowSchedule::new(vec![
            CashFlow::coupon(dec!(100), start, end, end, dec!(2)).unwrap(),
            CashFlow::redemption(end, dec!(100)),
        ]);

        let pv = compute_risky_pv(&model, today(), &schedule, false, "3M".parse().unwrap()).unwrap();
        let s_end = (-0.02f64 * 265.0 / 365.0).exp();
        assert_relative_eq!(pv.recovery_value, 100.0 * (1.0 - s_end), epsilon = 1e-10);
    }

    #[test]
    fn test_expired_schedule_is_worth_zero() {
        let (discount, survival) = curves(0.02, 0.01);
        let model = CreditModel {
            discount: &discount,
            survival: &survival,
            recovery: 0.4,
        };
        let schedule = annual_coupon_bond();
        let after = schedule.maturity_date().unwrap().add_days(1);
        let pv = compute_risky_pv(&model, after, &schedule, false, "3M".parse().unwrap()).unwrap();
        assert_eq!(pv, RiskyPv::default());
    }

    #[test]
    fn test_reference_date_cashflow_inclusion() {
        let (discount, survival) = curves(0.0, 0.0);
        let model = CreditModel {
            discount: &discount,
            survival: &survival,
            recovery: 0.0,
        };
        let schedule = annual_coupon_bond();
        let first_payment = today().add_days(365);

        let excluded =
            compute_risky_pv(&model, first_payment, &schedule, false, "3M".parse().unwrap()).unwrap();
        let included =
            compute_risky_pv(&model, first_payment, &schedule, true, "3M".parse().unwrap()).unwrap();
        assert_relative_eq!(included.total() - excluded.total(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_multiple_redemptions_rejected() {
        let (discount, survival) = curves(0.0, 0.0);
        let model = CreditModel {
            discount: &discount,
            survival: &survival,
            recovery: 0.0,
        };
        let schedule = CashFlowSchedule::new(vec![
            CashFlow::redemption(today().add_days(365), dec!(50)),
            CashFlow::redemption(today().add_days(730), dec!(50)),
        ]);
        let err = compute_risky_pv(&model, today(), &schedule, false, "3M".parse().unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            PricingError::UnsupportedCashflowStructure { cashflows: 2 }
        ));
    }

    #[test]
    fn test_zero_timestep_rejected_for_zero_bond() {
        let (discount, survival) = curves(0.0, 0.01);
        let model = CreditModel {
            discount: &discount,
            survival: &survival,
            recovery: 0.4,
        };
        let schedule =
            CashFlowSchedule::new(vec![CashFlow::redemption(today().add_days(365), dec!(100))]);
        let result = compute_risky_pv(&model, today(), &schedule, false, "0D".parse().unwrap());
        assert!(matches!(result, Err(PricingError::InvalidTimestep { .. })));
    }

    #[test]
    fn test_oversized_timestep_is_a_date_error() {
        let (discount, survival) = curves(0.0, 0.01);
        let model = CreditModel {
            discount: &discount,
            survival: &survival,
            recovery: 0.4,
        };
        let schedule =
            CashFlowSchedule::new(vec![CashFlow::redemption(today().add_days(730), dec!(100))]);
        for tenor in ["100000000D", "20000000W", "200000000Y"] {
            let result = compute_risky_pv(&model, today(), &schedule, false, tenor.parse().unwrap());
            assert!(
                matches!(result, Err(PricingError::Core(CoreError::InvalidDate { .. }))),
                "{tenor}: {result:?}"
            );
        }
    }

    #[test]
    fn test_recovery_scales_only_recovery_value() {
        let (discount, survival) = curves(0.03, 0.04);
        let schedule = annual_coupon_bond();
        let pv_at = |recovery: f64| {
            let model = CreditModel {
                discount: &discount,
                survival: &survival,
                recovery,
            };
            compute_risky_pv(&model, today(), &schedule, false, "3M".parse().unwrap()).unwrap()
        };

        let base = pv_at(0.2);
        let scaled = pv_at(0.6);
        assert_eq!(scaled.cashflow_value, base.cashflow_value);
        assert_relative_eq!(scaled.recovery_value, 3.0 * base.recovery_value, epsilon = 1e-12);
    }
}
