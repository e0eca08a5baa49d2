//! The discounting risky bond engine.
//!
//! One engine type with three construction strategies:
//!
//! | Variant | Inputs | Numerics |
//! |---------|--------|----------|
//! | [`EngineVariant::SpreadCurve`] | discount, survival, recovery, spread | full risky PV |
//! | [`EngineVariant::PriceBased`] | discount, price | plain discounting |
//! | [`EngineVariant::PriceImpliedSpread`] | discount, clean price | discounting at the solved spread |
//!
//! Inputs are held through [`Handle`]s. The engine observes each of them
//! and re-notifies its own observers on any change, so instruments priced
//! by it know when their cached values are stale.

use std::fmt;
use std::sync::{Arc, Weak};

use hazard_core::daycounts::DayCountConvention;
use hazard_core::types::{CashFlowSchedule, Date, Period, TimeUnit};
use hazard_curves::{
    DiscountCurve, FlatHazardRate, Handle, Observable, Observed, Observer, PriceQuote, PriceType,
    SimpleQuote, SpreadedDiscountCurve, SurvivalCurve,
};

use crate::error::{PricingError, PricingResult};
use crate::implied_spread::{target_dirty_value, ImpliedSpreadConfig, ImpliedSpreadSolver};
use crate::results::ValuationResults;
use crate::risky_pv::{compute_risky_pv, CreditModel};
use crate::settings;

/// Default zero-coupon integration step.
pub const DEFAULT_TIMESTEP: Period = Period::new(3, TimeUnit::Months);

/// Which construction strategy an engine was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineVariant {
    /// Discount curve with optional survival, recovery and spread.
    SpreadCurve,
    /// Price quote taken as given; discount curve only.
    PriceBased,
    /// Spread solved from a clean price quote.
    PriceImpliedSpread,
}

/// Every input an engine can be built from. Unused inputs stay empty.
#[derive(Debug, Clone)]
pub struct EngineInputs {
    /// Discounting curve. Required at valuation time.
    pub discount_curve: Handle<dyn DiscountCurve>,
    /// Issuer survival curve. Empty means certain survival.
    pub default_curve: Handle<dyn SurvivalCurve>,
    /// Recovery rate. Empty means zero recovery.
    pub recovery_rate: Handle<SimpleQuote>,
    /// Security spread over the discount curve. Empty means no spread.
    pub security_spread: Handle<SimpleQuote>,
    /// Security price.
    pub security_price: Handle<PriceQuote>,
    /// Integration step for lone redemptions.
    pub timestep_period: Period,
    /// Override of the process-wide reference-date policy.
    pub include_settlement_date_flows: Option<bool>,
}

impl Default for EngineInputs {
    fn default() -> Self {
        Self {
            discount_curve: Handle::empty(),
            default_curve: Handle::empty(),
            recovery_rate: Handle::empty(),
            security_spread: Handle::empty(),
            security_price: Handle::empty(),
            timestep_period: DEFAULT_TIMESTEP,
            include_settlement_date_flows: None,
        }
    }
}

/// Values bond cashflows under discounting and issuer default risk.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use hazard_core::prelude::*;
/// use hazard_curves::prelude::*;
/// use hazard_pricing::DiscountingRiskyBondEngine;
/// use rust_decimal_macros::dec;
///
/// let today = Date::from_ymd(2025, 1, 1).unwrap();
/// let discount: Arc<dyn DiscountCurve> =
///     Arc::new(FlatForward::new(today, 0.03, DayCountConvention::Act365Fixed));
/// let survival: Arc<dyn SurvivalCurve> =
///     Arc::new(FlatHazardRate::new(today, 0.02, DayCountConvention::Act365Fixed).unwrap());
///
/// let engine = DiscountingRiskyBondEngine::new(
///     Handle::new(discount),
///     Handle::new(survival),
///     Handle::new(Arc::new(SimpleQuote::new(0.4))),
///     Handle::empty(),
///     "3M".parse().unwrap(),
///     None,
/// )
/// .unwrap();
///
/// let schedule = CashFlowSchedule::new(vec![CashFlow::redemption(today.add_days(730), dec!(100))]);
/// let results = engine.calculate(today, today, &schedule).unwrap();
/// assert!(results.value < 100.0 * (-0.06f64).exp());
/// ```
pub struct DiscountingRiskyBondEngine {
    discount_curve: Handle<dyn DiscountCurve>,
    default_curve: Handle<dyn SurvivalCurve>,
    recovery_rate: Handle<SimpleQuote>,
    security_spread: Handle<SimpleQuote>,
    security_price: Handle<PriceQuote>,
    timestep_period: Period,
    include_settlement_date_flows: Option<bool>,
    variant: EngineVariant,
    solver: Option<ImpliedSpreadSolver>,
    observable: Observable,
}

impl DiscountingRiskyBondEngine {
    /// Spread/curve engine.
    ///
    /// # Errors
    ///
    /// `InvalidTimestep` for a non-positive timestep.
    pub fn new(
        discount_curve: Handle<dyn DiscountCurve>,
        default_curve: Handle<dyn SurvivalCurve>,
        recovery_rate: Handle<SimpleQuote>,
        security_spread: Handle<SimpleQuote>,
        timestep_period: Period,
        include_settlement_date_flows: Option<bool>,
    ) -> PricingResult<Arc<Self>> {
        let inputs = EngineInputs {
            discount_curve,
            default_curve,
            recovery_rate,
            security_spread,
            security_price: Handle::empty(),
            timestep_period,
            include_settlement_date_flows,
        };
        Self::build(inputs, EngineVariant::SpreadCurve, None)
    }

    /// Price-based engine: discounts on the discount curve alone.
    ///
    /// # Errors
    ///
    /// `InvalidTimestep` for a non-positive timestep.
    pub fn price_based(
        discount_curve: Handle<dyn DiscountCurve>,
        security_price: Handle<PriceQuote>,
        timestep_period: Period,
        include_settlement_date_flows: Option<bool>,
    ) -> PricingResult<Arc<Self>> {
        let inputs = EngineInputs {
            discount_curve,
            security_price,
            timestep_period,
            include_settlement_date_flows,
            ..EngineInputs::default()
        };
        Self::build(inputs, EngineVariant::PriceBased, None)
    }

    /// Price-implied-spread engine.
    ///
    /// # Errors
    ///
    /// `UnsupportedPriceType` if the price quote is not a clean price,
    /// `InvalidTimestep` for a non-positive timestep.
    pub fn price_implied_spread(
        discount_curve: Handle<dyn DiscountCurve>,
        security_price: Handle<PriceQuote>,
        timestep_period: Period,
        include_settlement_date_flows: Option<bool>,
        solver: ImpliedSpreadConfig,
    ) -> PricingResult<Arc<Self>> {
        if let Some(price) = security_price.current() {
            check_clean(&price)?;
        }
        let inputs = EngineInputs {
            discount_curve,
            security_price,
            timestep_period,
            include_settlement_date_flows,
            ..EngineInputs::default()
        };
        Self::build(
            inputs,
            EngineVariant::PriceImpliedSpread,
            Some(ImpliedSpreadSolver::new(solver)),
        )
    }

    /// Builds whichever engine the inputs describe: price-based when a
    /// price is present, spread/curve otherwise.
    ///
    /// # Errors
    ///
    /// `AmbiguousSpreadConfiguration` when both a spread and a price are
    /// present.
    pub fn from_inputs(inputs: EngineInputs) -> PricingResult<Arc<Self>> {
        if inputs.security_price.is_empty() {
            return Self::build(inputs, EngineVariant::SpreadCurve, None);
        }
        if !inputs.default_curve.is_empty() || !inputs.recovery_rate.is_empty() {
            log::warn!("price-based engine ignores the supplied default curve and recovery rate");
        }
        Self::build(inputs, EngineVariant::PriceBased, None)
    }

    fn build(
        inputs: EngineInputs,
        variant: EngineVariant,
        solver: Option<ImpliedSpreadSolver>,
    ) -> PricingResult<Arc<Self>> {
        if !inputs.security_spread.is_empty() && !inputs.security_price.is_empty() {
            return Err(PricingError::AmbiguousSpreadConfiguration);
        }
        if !inputs.timestep_period.is_positive() {
            return Err(PricingError::InvalidTimestep {
                period: inputs.timestep_period,
            });
        }

        Ok(Arc::new_cyclic(|weak: &Weak<Self>| {
            let observer: Weak<dyn Observer> = weak.clone();
            inputs.discount_curve.observable().register_observer(observer.clone());
            inputs.default_curve.observable().register_observer(observer.clone());
            inputs.recovery_rate.observable().register_observer(observer.clone());
            inputs.security_spread.observable().register_observer(observer.clone());
            inputs.security_price.observable().register_observer(observer);

            Self {
                discount_curve: inputs.discount_curve,
                default_curve: inputs.default_curve,
                recovery_rate: inputs.recovery_rate,
                security_spread: inputs.security_spread,
                security_price: inputs.security_price,
                timestep_period: inputs.timestep_period,
                include_settlement_date_flows: inputs.include_settlement_date_flows,
                variant,
                solver,
                observable: Observable::new(),
            }
        }))
    }

    /// Values `schedule` at `valuation_date` and at `settlement_date`.
    ///
    /// # Errors
    ///
    /// `MissingDiscountCurve`, `AmbiguousSpreadConfiguration`,
    /// `UnsupportedCashflowStructure`, `UnsupportedPriceType`,
    /// `ImpliedSpreadNotFound`, and curve or quote evaluation errors.
    pub fn calculate(
        &self,
        valuation_date: Date,
        settlement_date: Date,
        schedule: &CashFlowSchedule,
    ) -> PricingResult<ValuationResults> {
        let discount = self
            .discount_curve
            .current()
            .ok_or(PricingError::MissingDiscountCurve)?;
        if !self.security_spread.is_empty() && !self.security_price.is_empty() {
            return Err(PricingError::AmbiguousSpreadConfiguration);
        }

        let include = settings::include_reference_date_events(self.include_settlement_date_flows);
        let (curve, implied_spread) =
            self.pricing_curve(discount, settlement_date, schedule, include)?;

        let survival = self.survival_curve(valuation_date, curve.day_count());
        let model = CreditModel {
            discount: curve.as_ref(),
            survival: survival.as_ref(),
            recovery: self.recovery()?,
        };

        let value =
            compute_risky_pv(&model, valuation_date, schedule, include, self.timestep_period)?
                .total();
        let settlement_value = if !include && valuation_date == settlement_date {
            value
        } else {
            compute_risky_pv(&model, settlement_date, schedule, include, self.timestep_period)?
                .total()
        };

        Ok(ValuationResults {
            valuation_date,
            value,
            settlement_value,
            implied_spread,
        })
    }

    /// [`calculate`](Self::calculate) at the discount curve's reference date.
    pub fn valuation_results_at_curve_date(
        &self,
        settlement_date: Date,
        schedule: &CashFlowSchedule,
    ) -> PricingResult<ValuationResults> {
        let valuation_date = self
            .discount_curve
            .current()
            .ok_or(PricingError::MissingDiscountCurve)?
            .reference_date();
        self.calculate(valuation_date, settlement_date, schedule)
    }

    /// The curve cashflows are discounted on, and the spread solved for it.
    fn pricing_curve(
        &self,
        discount: Arc<dyn DiscountCurve>,
        settlement_date: Date,
        schedule: &CashFlowSchedule,
        include: bool,
    ) -> PricingResult<(Arc<dyn DiscountCurve>, Option<f64>)> {
        match self.variant {
            EngineVariant::SpreadCurve => match self.security_spread.current() {
                Some(quote) => {
                    if !quote.is_valid() {
                        return Err(PricingError::empty_quote("security spread"));
                    }
                    let curve: Arc<dyn DiscountCurve> =
                        SpreadedDiscountCurve::with_quote(discount, quote);
                    Ok((curve, None))
                }
                None => Ok((discount, None)),
            },
            EngineVariant::PriceBased => Ok((discount, None)),
            EngineVariant::PriceImpliedSpread => {
                let spread =
                    self.solve_implied_spread(&discount, settlement_date, schedule, include)?;
                let curve: Arc<dyn DiscountCurve> =
                    SpreadedDiscountCurve::with_fixed_spread(discount, spread);
                Ok((curve, Some(spread)))
            }
        }
    }

    fn solve_implied_spread(
        &self,
        discount: &Arc<dyn DiscountCurve>,
        settlement_date: Date,
        schedule: &CashFlowSchedule,
        include: bool,
    ) -> PricingResult<f64> {
        let price = self
            .security_price
            .current()
            .ok_or_else(|| PricingError::empty_quote("security price"))?;
        check_clean(&price)?;
        let clean = price
            .value()
            .ok_or_else(|| PricingError::empty_quote("security price"))?;

        let target = target_dirty_value(clean, schedule, settlement_date);
        let survival = FlatHazardRate::no_default(settlement_date, discount.day_count());
        let solver = self.solver.unwrap_or_default();

        solver.solve(target, |spread| {
            let curve = SpreadedDiscountCurve::with_fixed_spread(Arc::clone(discount), spread);
            let model = CreditModel {
                discount: curve.as_ref(),
                survival: &survival,
                recovery: 0.0,
            };
            Ok(
                compute_risky_pv(&model, settlement_date, schedule, include, self.timestep_period)?
                    .total(),
            )
        })
    }

    /// The survival curve in effect, or certain survival anchored at
    /// `reference`. Price-driven variants never use a survival curve.
    fn survival_curve(
        &self,
        reference: Date,
        day_count: DayCountConvention,
    ) -> Arc<dyn SurvivalCurve> {
        match (self.variant, self.default_curve.current()) {
            (EngineVariant::SpreadCurve, Some(curve)) => curve,
            _ => Arc::new(FlatHazardRate::no_default(reference, day_count)),
        }
    }

    /// Recovery in effect; zero without a quote.
    fn recovery(&self) -> PricingResult<f64> {
        if self.variant != EngineVariant::SpreadCurve {
            return Ok(0.0);
        }
        match self.recovery_rate.current() {
            Some(quote) => quote
                .value()
                .ok_or_else(|| PricingError::empty_quote("recovery rate")),
            None => Ok(0.0),
        }
    }

    /// Discounting curve handle.
    pub fn discount_curve(&self) -> &Handle<dyn DiscountCurve> {
        &self.discount_curve
    }

    /// Survival curve handle.
    pub fn default_curve(&self) -> &Handle<dyn SurvivalCurve> {
        &self.default_curve
    }

    /// Recovery rate handle.
    pub fn recovery_rate(&self) -> &Handle<SimpleQuote> {
        &self.recovery_rate
    }

    /// Security spread handle.
    pub fn security_spread(&self) -> &Handle<SimpleQuote> {
        &self.security_spread
    }

    /// Security price handle.
    pub fn security_price(&self) -> &Handle<PriceQuote> {
        &self.security_price
    }

    /// Zero-coupon integration step.
    pub fn timestep_period(&self) -> Period {
        self.timestep_period
    }

    /// Engine-level reference-date policy, if set.
    pub fn include_settlement_date_flows(&self) -> Option<bool> {
        self.include_settlement_date_flows
    }

    /// Construction strategy.
    pub fn variant(&self) -> EngineVariant {
        self.variant
    }

    /// Implied-spread solver settings, for the implied-spread variant.
    pub fn implied_spread_config(&self) -> Option<&ImpliedSpreadConfig> {
        self.solver.as_ref().map(ImpliedSpreadSolver::config)
    }
}

fn check_clean(price: &PriceQuote) -> PricingResult<()> {
    match price.price_type() {
        PriceType::Clean => Ok(()),
        price_type => Err(PricingError::UnsupportedPriceType { price_type }),
    }
}

impl Observer for DiscountingRiskyBondEngine {
    fn update(&self) {
        self.observable.notify_observers();
    }
}

impl Observed for DiscountingRiskyBondEngine {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for DiscountingRiskyBondEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscountingRiskyBondEngine")
            .field("variant", &self.variant)
            .field("timestep_period", &self.timestep_period)
            .field(
                "include_settlement_date_flows",
                &self.include_settlement_date_flows,
            )
            .finish_non_exhaustive()
    }
}
