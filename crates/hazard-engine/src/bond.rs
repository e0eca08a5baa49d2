//! Bond trade data.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hazard_core::daycounts::{DayCount, DayCountConvention};
use hazard_core::types::{CashFlow, CashFlowSchedule, Currency, Date, Frequency, Period};
use hazard_pricing::RiskyBond;

use crate::builder::BondEngineBuilder;
use crate::error::{EngineError, EngineResult};

/// A fixed-rate bullet bond as it appears in a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondData {
    /// Issuer identifier.
    pub issuer_id: String,
    /// Issuer survival curve. Empty when the bond is priced without one.
    #[serde(default)]
    pub credit_curve_id: String,
    /// Security identifier for recovery, spread and price lookups.
    pub security_id: String,
    /// Discounting curve.
    pub reference_curve_id: String,
    /// Business days from trade to settlement.
    #[serde(default)]
    pub settlement_days: u32,
    /// Start of the first accrual period.
    pub issue_date: Date,
    /// Notional.
    pub face_amount: Decimal,
    /// Final payment date.
    pub maturity_date: Date,
    /// Currency of the cashflows.
    pub currency: Currency,
    /// Annual coupon rate as a fraction.
    #[serde(default)]
    pub coupon_rate: Decimal,
    /// Coupon frequency.
    #[serde(default)]
    pub frequency: Frequency,
    /// Accrual day count.
    #[serde(default)]
    pub day_count: DayCountConvention,
    /// Pays only the face amount at maturity.
    #[serde(default)]
    pub zero_bond: bool,
}

impl BondData {
    /// Coupons rolled back from maturity, first period short, plus the
    /// redemption. A zero bond has only the redemption.
    ///
    /// # Errors
    ///
    /// `ReferenceDataError` for a non-positive face amount or a maturity not
    /// after issue.
    pub fn cashflows(&self) -> EngineResult<CashFlowSchedule> {
        if self.face_amount <= Decimal::ZERO {
            return Err(EngineError::reference_data(format!(
                "face amount must be positive for {}, got {}",
                self.security_id, self.face_amount
            )));
        }
        if self.maturity_date <= self.issue_date {
            return Err(EngineError::reference_data(format!(
                "maturity {} is not after issue {} for {}",
                self.maturity_date, self.issue_date, self.security_id
            )));
        }

        let redemption = CashFlow::redemption(self.maturity_date, self.face_amount);
        if self.zero_bond || self.frequency.is_zero() {
            return Ok(CashFlowSchedule::new(vec![redemption]));
        }

        let dates = self.coupon_dates()?;
        let mut flows: Vec<CashFlow> = dates
            .windows(2)
            .map(|w| {
                let amount =
                    self.face_amount * self.coupon_rate * self.day_count.year_fraction(w[0], w[1]);
                CashFlow::coupon(self.face_amount, w[0], w[1], w[1], amount)
            })
            .collect::<Result<_, _>>()?;
        flows.push(redemption);
        Ok(CashFlowSchedule::new(flows))
    }

    /// Issue date, then every period end up to maturity.
    fn coupon_dates(&self) -> EngineResult<Vec<Date>> {
        let period = self.frequency.period().ok_or_else(|| {
            EngineError::reference_data(format!(
                "{} frequency has no coupon period for {}",
                self.frequency, self.security_id
            ))
        })?;

        let mut dates = vec![self.maturity_date];
        for k in 1.. {
            let back = Period::new(-k * period.length(), period.unit());
            let date = self.maturity_date.add_period(back)?;
            if date <= self.issue_date {
                break;
            }
            dates.push(date);
        }
        dates.push(self.issue_date);
        dates.reverse();
        Ok(dates)
    }

    /// Settlement for a trade on `as_of`, counting weekdays only.
    pub fn settlement_date(&self, as_of: Date) -> Date {
        as_of.add_business_days(self.settlement_days)
    }

    /// Binds the bond to its engine, valued at `as_of`.
    pub fn build(&self, builder: &BondEngineBuilder, as_of: Date) -> EngineResult<Arc<RiskyBond>> {
        let engine = builder.engine(
            self.currency,
            &self.credit_curve_id,
            &self.security_id,
            &self.reference_curve_id,
        )?;
        let schedule = self.cashflows()?;
        tracing::debug!(
            security_id = %self.security_id,
            cashflows = schedule.len(),
            "built risky bond"
        );
        Ok(RiskyBond::with_valuation_date(
            engine,
            schedule,
            self.settlement_date(as_of),
            as_of,
        ))
    }
}
