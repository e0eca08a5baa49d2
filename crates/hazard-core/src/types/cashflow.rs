//! Bond cashflows: coupons and redemptions.
//!
//! A schedule is the ordered list of cashflows a bond still has to pay.
//! The valuation engine dispatches on the [`CashFlow`] variant: coupons carry
//! an accrual period and a nominal (used for default recovery), redemptions
//! only a date and an amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Date;
use crate::error::{CoreError, CoreResult};

/// One interest period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    nominal: Decimal,
    accrual_start: Date,
    accrual_end: Date,
    payment_date: Date,
    amount: Decimal,
}

impl Coupon {
    /// Creates a coupon.
    ///
    /// # Errors
    ///
    /// Fails unless `accrual_start <= accrual_end <= payment_date` and the
    /// nominal is positive.
    pub fn new(
        nominal: Decimal,
        accrual_start: Date,
        accrual_end: Date,
        payment_date: Date,
        amount: Decimal,
    ) -> CoreResult<Self> {
        if nominal <= Decimal::ZERO {
            return Err(CoreError::invalid_cashflow(format!(
                "coupon nominal must be positive, got {nominal}"
            )));
        }
        if accrual_start > accrual_end || accrual_end > payment_date {
            return Err(CoreError::invalid_cashflow(format!(
                "coupon dates out of order: accrual {accrual_start}..{accrual_end}, paid {payment_date}"
            )));
        }
        Ok(Self {
            nominal,
            accrual_start,
            accrual_end,
            payment_date,
            amount,
        })
    }

    /// Notional the coupon accrues on.
    #[must_use]
    pub fn nominal(&self) -> Decimal {
        self.nominal
    }

    /// First day of the accrual period.
    #[must_use]
    pub fn accrual_start(&self) -> Date {
        self.accrual_start
    }

    /// Last day of the accrual period.
    #[must_use]
    pub fn accrual_end(&self) -> Date {
        self.accrual_end
    }

    /// Payment date.
    #[must_use]
    pub fn payment_date(&self) -> Date {
        self.payment_date
    }

    /// Payment amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Interest accrued at `date`, linear in calendar days.
    ///
    /// Zero on or before the accrual start and on or after the accrual end.
    #[must_use]
    pub fn accrued_amount(&self, date: Date) -> Decimal {
        if date <= self.accrual_start || date >= self.accrual_end {
            return Decimal::ZERO;
        }
        let elapsed = self.accrual_start.days_between(&date);
        let total = self.accrual_start.days_between(&self.accrual_end);
        self.amount * Decimal::from(elapsed) / Decimal::from(total)
    }
}

/// A principal repayment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    payment_date: Date,
    amount: Decimal,
}

impl Redemption {
    /// Creates a redemption.
    #[must_use]
    pub fn new(payment_date: Date, amount: Decimal) -> Self {
        Self {
            payment_date,
            amount,
        }
    }

    /// Payment date.
    #[must_use]
    pub fn payment_date(&self) -> Date {
        self.payment_date
    }

    /// Principal repaid.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// A bond cashflow.
///
/// # Example
///
/// ```rust
/// use hazard_core::types::{CashFlow, Date};
/// use rust_decimal_macros::dec;
///
/// let start = Date::from_ymd(2025, 1, 15).unwrap();
/// let end = Date::from_ymd(2025, 7, 15).unwrap();
/// let cf = CashFlow::coupon(dec!(100), start, end, end, dec!(2.5)).unwrap();
/// assert!(cf.is_coupon());
/// assert_eq!(cf.date(), end);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CashFlow {
    /// Interest payment with an accrual period
    Coupon(Coupon),
    /// Principal repayment
    Redemption(Redemption),
}

impl CashFlow {
    /// Creates a validated coupon cashflow.
    pub fn coupon(
        nominal: Decimal,
        accrual_start: Date,
        accrual_end: Date,
        payment_date: Date,
        amount: Decimal,
    ) -> CoreResult<Self> {
        Coupon::new(nominal, accrual_start, accrual_end, payment_date, amount).map(Self::Coupon)
    }

    /// Creates a redemption cashflow.
    #[must_use]
    pub fn redemption(payment_date: Date, amount: Decimal) -> Self {
        Self::Redemption(Redemption::new(payment_date, amount))
    }

    /// Payment date.
    #[must_use]
    pub fn date(&self) -> Date {
        match self {
            CashFlow::Coupon(c) => c.payment_date,
            CashFlow::Redemption(r) => r.payment_date,
        }
    }

    /// Payment amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        match self {
            CashFlow::Coupon(c) => c.amount,
            CashFlow::Redemption(r) => r.amount,
        }
    }

    /// True for coupons.
    #[must_use]
    pub fn is_coupon(&self) -> bool {
        matches!(self, CashFlow::Coupon(_))
    }

    /// The coupon, if this is one.
    #[must_use]
    pub fn as_coupon(&self) -> Option<&Coupon> {
        match self {
            CashFlow::Coupon(c) => Some(c),
            CashFlow::Redemption(_) => None,
        }
    }

    /// Whether the cashflow is already paid as of `reference`.
    ///
    /// A flow dated before the reference date has always occurred. A flow on
    /// the reference date has occurred unless reference-date flows are
    /// included.
    #[must_use]
    pub fn has_occurred(&self, reference: Date, include_reference_date: bool) -> bool {
        let date = self.date();
        if include_reference_date {
            date < reference
        } else {
            date <= reference
        }
    }
}

impl fmt::Display for CashFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashFlow::Coupon(c) => write!(
                f,
                "{}: coupon {} on {} ({}..{})",
                c.payment_date, c.amount, c.nominal, c.accrual_start, c.accrual_end
            ),
            CashFlow::Redemption(r) => write!(f, "{}: redemption {}", r.payment_date, r.amount),
        }
    }
}

/// Cashflows ordered by payment date.
///
/// Ordering is stable: flows sharing a payment date keep their insertion
/// order, so a final coupon stays ahead of the redemption it pays with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSchedule {
    flows: Vec<CashFlow>,
}

impl CashFlowSchedule {
    /// Creates a schedule, sorting by payment date.
    #[must_use]
    pub fn new(mut flows: Vec<CashFlow>) -> Self {
        flows.sort_by_key(CashFlow::date);
        Self { flows }
    }

    /// Adds a cashflow, keeping date order.
    pub fn push(&mut self, cf: CashFlow) {
        let at = self.flows.partition_point(|existing| existing.date() <= cf.date());
        self.flows.insert(at, cf);
    }

    /// Iterates in payment-date order.
    pub fn iter(&self) -> std::slice::Iter<'_, CashFlow> {
        self.flows.iter()
    }

    /// All cashflows as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[CashFlow] {
        &self.flows
    }

    /// Number of cashflows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// True when the schedule holds no cashflows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Number of coupons.
    #[must_use]
    pub fn coupon_count(&self) -> usize {
        self.flows.iter().filter(|cf| cf.is_coupon()).count()
    }

    /// Payment date of the last cashflow.
    #[must_use]
    pub fn maturity_date(&self) -> Option<Date> {
        self.flows.last().map(CashFlow::date)
    }

    /// Cashflows that have not occurred as of `reference`.
    pub fn live_cashflows(
        &self,
        reference: Date,
        include_reference_date: bool,
    ) -> impl Iterator<Item = &CashFlow> + '_ {
        self.flows
            .iter()
            .filter(move |cf| !cf.has_occurred(reference, include_reference_date))
    }

    /// Interest accrued at `date` across all coupons.
    #[must_use]
    pub fn accrued_amount(&self, date: Date) -> Decimal {
        self.flows
            .iter()
            .filter_map(CashFlow::as_coupon)
            .map(|c| c.accrued_amount(date))
            .sum()
    }

    /// Notional outstanding at `date`.
    ///
    /// The nominal of the first coupon still accruing or unpaid at `date`;
    /// for a coupon-free schedule, the amount of the first unpaid redemption.
    /// Zero once everything has been paid.
    #[must_use]
    pub fn outstanding_notional(&self, date: Date) -> Decimal {
        let unpaid = move || self.flows.iter().filter(move |cf| cf.date() > date);
        if let Some(c) = unpaid().find_map(CashFlow::as_coupon) {
            return c.nominal;
        }
        unpaid().map(CashFlow::amount).next().unwrap_or(Decimal::ZERO)
    }
}

impl FromIterator<CashFlow> for CashFlowSchedule {
    fn from_iter<I: IntoIterator<Item = CashFlow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for CashFlowSchedule {
    type Item = CashFlow;
    type IntoIter = std::vec::IntoIter<CashFlow>;

    fn into_iter(self) -> Self::IntoIter {
        self.flows.into_iter()
    }
}

impl<'a> IntoIterator for &'a CashFlowSchedule {
    type Item = &'a CashFlow;
    type IntoIter = std::slice::Iter<'a, CashFlow>;

    fn into_iter(self) -> Self::IntoIter {
        self.flows.iter()
    }
}
