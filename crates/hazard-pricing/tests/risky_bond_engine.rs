//! End-to-end valuation through the engine and the bond.

use std::sync::Arc;

use approx::assert_relative_eq;
use hazard_core::prelude::*;
use hazard_curves::prelude::*;
use hazard_pricing::prelude::*;
use hazard_pricing::DEFAULT_TIMESTEP;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

fn today() -> Date {
    Date::from_ymd(2025, 1, 1).unwrap()
}

fn flat_discount(rate: f64) -> Handle<dyn DiscountCurve> {
    let curve: Arc<dyn DiscountCurve> =
        Arc::new(FlatForward::new(today(), rate, DayCountConvention::Act365Fixed));
    Handle::new(curve)
}

fn flat_survival(hazard: f64) -> Handle<dyn SurvivalCurve> {
    let curve: Arc<dyn SurvivalCurve> =
        Arc::new(FlatHazardRate::new(today(), hazard, DayCountConvention::Act365Fixed).unwrap());
    Handle::new(curve)
}

fn quote(value: f64) -> Handle<SimpleQuote> {
    Handle::new(Arc::new(SimpleQuote::new(value)))
}

/// Three annual 5% coupons on 100 plus the redemption.
fn coupon_bond() -> CashFlowSchedule {
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

fn curve_engine(
    rate: f64,
    survival: Handle<dyn SurvivalCurve>,
    recovery: Handle<SimpleQuote>,
    spread: Handle<SimpleQuote>,
    include: Option<bool>,
) -> Arc<DiscountingRiskyBondEngine> {
    DiscountingRiskyBondEngine::new(
        flat_discount(rate),
        survival,
        recovery,
        spread,
        DEFAULT_TIMESTEP,
        include,
    )
    .unwrap()
}

#[test]
fn test_two_year_zero_with_annual_steps() {
    let engine = DiscountingRiskyBondEngine::new(
        flat_discount(0.0),
        flat_survival(0.02),
        quote(0.4),
        Handle::empty(),
        "1Y".parse().unwrap(),
        Some(false),
    )
    .unwrap();
    let schedule =
        CashFlowSchedule::new(vec![CashFlow::redemption(today().add_days(730), dec!(100))]);

    let results = engine.calculate(today(), today(), &schedule).unwrap();

    // 100·S(2) + 40·(1 - S(2)) with S(2) = exp(-0.04)
    assert_relative_eq!(results.value, 97.6472, epsilon = 5e-4);
    assert_eq!(results.value, results.settlement_value);
    assert_eq!(results.implied_spread, None);
}

#[test]
fn test_without_credit_inputs_is_plain_discounting() {
    let engine = curve_engine(0.03, Handle::empty(), Handle::empty(), Handle::empty(), Some(false));
    let schedule = coupon_bond();

    let results = engine.calculate(today(), today(), &schedule).unwrap();

    let expected: f64 = schedule
        .iter()
        .map(|cf| {
            let t = today().days_between(&cf.date()) as f64 / 365.0;
            cf.amount().to_f64().unwrap() * (-0.03 * t).exp()
        })
        .sum();
    assert_relative_eq!(results.value, expected, epsilon = 1e-9);
}

#[test]
fn test_zero_hazard_matches_no_survival_curve() {
    let with_curve = curve_engine(0.03, flat_survival(0.0), quote(0.4), Handle::empty(), Some(false));
    let without = curve_engine(0.03, Handle::empty(), Handle::empty(), Handle::empty(), Some(false));
    let schedule = coupon_bond();

    let a = with_curve.calculate(today(), today(), &schedule).unwrap();
    let b = without.calculate(today(), today(), &schedule).unwrap();
    assert_relative_eq!(a.value, b.value, epsilon = 1e-9);
}

#[test]
fn test_reference_date_flow_policy() {
    let flows = vec![
        CashFlow::coupon(dec!(100), today().add_days(-365), today(), today(), dec!(5)).unwrap(),
        CashFlow::coupon(dec!(100), today(), today().add_days(365), today().add_days(365), dec!(5))
            .unwrap(),
        CashFlow::redemption(today().add_days(365), dec!(100)),
    ];
    let schedule = CashFlowSchedule::new(flows);

    let excluded = curve_engine(0.0, Handle::empty(), Handle::empty(), Handle::empty(), Some(false))
        .calculate(today(), today(), &schedule)
        .unwrap();
    let included = curve_engine(0.0, Handle::empty(), Handle::empty(), Handle::empty(), Some(true))
        .calculate(today(), today(), &schedule)
        .unwrap();

    assert_relative_eq!(excluded.value, 105.0, epsilon = 1e-12);
    assert_relative_eq!(included.value - excluded.value, 5.0, epsilon = 1e-12);
}

#[test]
fn test_settlement_value_rolls_forward() {
    let engine = curve_engine(0.03, Handle::empty(), Handle::empty(), Handle::empty(), Some(false));
    let schedule =
        CashFlowSchedule::new(vec![CashFlow::redemption(today().add_days(730), dec!(100))]);
    let settlement = today().add_days(2);

    let results = engine.calculate(today(), settlement, &schedule).unwrap();

    assert_relative_eq!(
        results.settlement_value,
        results.value * (0.03 * 2.0 / 365.0f64).exp(),
        epsilon = 1e-9
    );
}

#[test]
fn test_settlement_recomputed_when_reference_flows_included() {
    let engine = curve_engine(0.0, Handle::empty(), Handle::empty(), Handle::empty(), Some(true));
    let schedule = CashFlowSchedule::new(vec![
        CashFlow::redemption(today().add_days(1), dec!(100)),
    ]);
    let settlement = today().add_days(1);

    let results = engine.calculate(today(), settlement, &schedule).unwrap();
    assert_relative_eq!(results.value, 100.0, epsilon = 1e-12);
    assert_relative_eq!(results.settlement_value, 100.0, epsilon = 1e-12);

    let excluding = curve_engine(0.0, Handle::empty(), Handle::empty(), Handle::empty(), Some(false))
        .calculate(today(), settlement, &schedule)
        .unwrap();
    assert_eq!(excluding.settlement_value, 0.0);
}

#[test]
fn test_recovery_is_linear() {
    let schedule = coupon_bond();
    let value_at = |r: f64| {
        curve_engine(0.03, flat_survival(0.03), quote(r), Handle::empty(), Some(false))
            .calculate(today(), today(), &schedule)
            .unwrap()
            .value
    };

    let (low, mid, high) = (value_at(0.2), value_at(0.4), value_at(0.6));
    assert_relative_eq!(low + high, 2.0 * mid, epsilon = 1e-9);
    assert!(high > mid && mid > low);
}

#[test]
fn test_higher_hazard_lowers_value() {
    let schedule = coupon_bond();
    let value_at = |h: f64| {
        curve_engine(0.03, flat_survival(h), quote(0.4), Handle::empty(), Some(false))
            .calculate(today(), today(), &schedule)
            .unwrap()
            .value
    };
    assert!(value_at(0.01) > value_at(0.05));
}

#[test]
fn test_implied_spread_round_trip() {
    let schedule = coupon_bond();
    let settlement = today().add_days(73);
    let spread = 0.015;

    let priced = curve_engine(0.03, Handle::empty(), Handle::empty(), quote(spread), Some(false))
        .calculate(today(), settlement, &schedule)
        .unwrap();
    // Accrued at settlement is 5 · 73/365 = 1 on a notional of 100
    let clean = priced.settlement_value - 1.0;

    let engine = DiscountingRiskyBondEngine::price_implied_spread(
        flat_discount(0.03),
        Handle::new(Arc::new(PriceQuote::clean(clean))),
        DEFAULT_TIMESTEP,
        Some(false),
        ImpliedSpreadConfig::default(),
    )
    .unwrap();
    let implied = engine.calculate(today(), settlement, &schedule).unwrap();

    let solved = implied.implied_spread.unwrap();
    assert_relative_eq!(solved, spread, epsilon = 1e-8);
    assert_relative_eq!(implied.settlement_value, priced.settlement_value, epsilon = 1e-7);
    assert_relative_eq!(implied.value, priced.value, epsilon = 1e-7);
}

#[test]
fn test_price_input_ignores_credit_inputs() {
    let schedule = coupon_bond();
    let price = Handle::new(Arc::new(PriceQuote::clean(97.0)));
    let inputs = EngineInputs {
        discount_curve: flat_discount(0.03),
        default_curve: flat_survival(0.05),
        recovery_rate: quote(0.4),
        security_price: price.clone(),
        ..EngineInputs::default()
    };
    let from_inputs = DiscountingRiskyBondEngine::from_inputs(inputs).unwrap();
    let plain = DiscountingRiskyBondEngine::price_based(
        flat_discount(0.03),
        price,
        DEFAULT_TIMESTEP,
        None,
    )
    .unwrap();

    assert_eq!(from_inputs.variant(), EngineVariant::PriceBased);
    let a = from_inputs.calculate(today(), today(), &schedule).unwrap();
    let b = plain.calculate(today(), today(), &schedule).unwrap();
    assert_relative_eq!(a.value, b.value, epsilon = 1e-12);
}

#[test]
fn test_redemptions_only_schedule_rejected() {
    let engine = curve_engine(0.03, Handle::empty(), Handle::empty(), Handle::empty(), Some(false));
    let schedule = CashFlowSchedule::new(vec![
        CashFlow::redemption(today().add_days(365), dec!(50)),
        CashFlow::redemption(today().add_days(730), dec!(50)),
    ]);

    let err = engine.calculate(today(), today(), &schedule).unwrap_err();
    assert!(matches!(err, PricingError::UnsupportedCashflowStructure { cashflows: 2 }));
}

#[test]
fn test_matured_bond_is_worth_nothing() {
    let engine = curve_engine(0.03, flat_survival(0.02), quote(0.4), Handle::empty(), Some(false));
    let schedule = coupon_bond();
    let after = today().add_days(3 * 365 + 10);

    let results = engine.calculate(after, after, &schedule).unwrap();
    assert_eq!(results.value, 0.0);
    assert_eq!(results.settlement_value, 0.0);
}

#[test]
fn test_bond_recomputes_after_relink() {
    let engine = curve_engine(0.03, Handle::empty(), Handle::empty(), Handle::empty(), Some(false));
    let schedule = coupon_bond();
    let bond = RiskyBond::new(Arc::clone(&engine), schedule, today());

    let before = bond.value().unwrap();
    let riskier: Arc<dyn SurvivalCurve> =
        Arc::new(FlatHazardRate::new(today(), 0.05, DayCountConvention::Act365Fixed).unwrap());
    engine.default_curve().link_to(Some(riskier));

    assert!(bond.is_stale());
    assert!(bond.value().unwrap() < before);
}

#[test]
fn test_empty_discount_handle_fails_at_valuation() {
    let engine = curve_engine(0.03, Handle::empty(), Handle::empty(), Handle::empty(), Some(false));
    engine.discount_curve().link_to(None);

    let bond = RiskyBond::new(Arc::clone(&engine), coupon_bond(), today());
    assert!(matches!(bond.value(), Err(PricingError::MissingDiscountCurve)));
}

#[test]
fn test_notional_is_scaled_linearly() {
    let engine = curve_engine(0.03, flat_survival(0.02), quote(0.4), Handle::empty(), Some(false));
    let scaled: CashFlowSchedule = coupon_bond()
        .iter()
        .map(|cf| match cf {
            CashFlow::Coupon(c) => CashFlow::coupon(
                c.nominal() * dec!(2),
                c.accrual_start(),
                c.accrual_end(),
                c.payment_date(),
                c.amount() * dec!(2),
            )
            .unwrap(),
            CashFlow::Redemption(r) => CashFlow::redemption(r.payment_date(), r.amount() * dec!(2)),
        })
        .collect();

    let base = engine.calculate(today(), today(), &coupon_bond()).unwrap();
    let doubled = engine.calculate(today(), today(), &scaled).unwrap();
    assert_relative_eq!(doubled.value, 2.0 * base.value, epsilon = 1e-9);
}
