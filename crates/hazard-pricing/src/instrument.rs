//! A bond priced lazily by a risky bond engine.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use hazard_core::types::{CashFlowSchedule, Date};
use hazard_curves::{Observable, Observed, Observer};

use crate::engine::DiscountingRiskyBondEngine;
use crate::error::PricingResult;
use crate::results::ValuationResults;

/// A cashflow schedule bound to an engine and a settlement date.
///
/// Results are computed on first request and cached until the engine, or
/// anything the engine observes, reports a change.
pub struct RiskyBond {
    engine: Arc<DiscountingRiskyBondEngine>,
    schedule: CashFlowSchedule,
    settlement_date: Date,
    valuation_date: Option<Date>,
    cached: Mutex<Option<ValuationResults>>,
    stale: AtomicBool,
    observable: Observable,
}

impl RiskyBond {
    /// Binds `schedule` to `engine`. Valuation happens at the discount
    /// curve's reference date unless [`with_valuation_date`](Self::with_valuation_date)
    /// says otherwise.
    pub fn new(
        engine: Arc<DiscountingRiskyBondEngine>,
        schedule: CashFlowSchedule,
        settlement_date: Date,
    ) -> Arc<Self> {
        Self::build(engine, schedule, settlement_date, None)
    }

    /// Binds `schedule` to `engine` with a fixed valuation date.
    pub fn with_valuation_date(
        engine: Arc<DiscountingRiskyBondEngine>,
        schedule: CashFlowSchedule,
        settlement_date: Date,
        valuation_date: Date,
    ) -> Arc<Self> {
        Self::build(engine, schedule, settlement_date, Some(valuation_date))
    }

    fn build(
        engine: Arc<DiscountingRiskyBondEngine>,
        schedule: CashFlowSchedule,
        settlement_date: Date,
        valuation_date: Option<Date>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let observer: Weak<dyn Observer> = weak.clone();
            engine.observable().register_observer(observer);
            Self {
                engine,
                schedule,
                settlement_date,
                valuation_date,
                cached: Mutex::new(None),
                stale: AtomicBool::new(true),
                observable: Observable::new(),
            }
        })
    }

    /// Valuation results, recomputed if any input changed since the last call.
    ///
    /// # Errors
    ///
    /// Whatever the engine reports. A failed calculation leaves the bond stale.
    pub fn results(&self) -> PricingResult<ValuationResults> {
        let mut cached = self.cached.lock();
        if let Some(results) = *cached {
            if !self.stale.load(Ordering::Acquire) {
                return Ok(results);
            }
        }

        // Clear before computing so a notification during the run re-marks it
        self.stale.store(false, Ordering::Release);
        let computed = match self.valuation_date {
            Some(date) => self
                .engine
                .calculate(date, self.settlement_date, &self.schedule),
            None => self
                .engine
                .valuation_results_at_curve_date(self.settlement_date, &self.schedule),
        };
        match computed {
            Ok(results) => {
                *cached = Some(results);
                Ok(results)
            }
            Err(e) => {
                self.stale.store(true, Ordering::Release);
                *cached = None;
                Err(e)
            }
        }
    }

    /// Value at the valuation date.
    pub fn value(&self) -> PricingResult<f64> {
        Ok(self.results()?.value)
    }

    /// Value at the settlement date.
    pub fn settlement_value(&self) -> PricingResult<f64> {
        Ok(self.results()?.settlement_value)
    }

    /// True when the next request will recompute.
    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    /// Cashflows being valued.
    pub fn schedule(&self) -> &CashFlowSchedule {
        &self.schedule
    }

    /// Settlement date.
    pub fn settlement_date(&self) -> Date {
        self.settlement_date
    }

    /// Engine doing the valuation.
    pub fn engine(&self) -> &Arc<DiscountingRiskyBondEngine> {
        &self.engine
    }

    /// Date of the last cashflow.
    pub fn maturity_date(&self) -> Option<Date> {
        self.schedule.maturity_date()
    }
}

impl Observer for RiskyBond {
    fn update(&self) {
        self.stale.store(true, Ordering::Release);
        self.observable.notify_observers();
    }
}

impl Observed for RiskyBond {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

impl fmt::Debug for RiskyBond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiskyBond")
            .field("settlement_date", &self.settlement_date)
            .field("valuation_date", &self.valuation_date)
            .field("cashflows", &self.schedule.len())
            .field("stale", &self.is_stale())
            .finish_non_exhaustive()
    }
}
