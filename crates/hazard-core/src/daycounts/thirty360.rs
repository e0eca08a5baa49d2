//! 30/360 US (bond basis).

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// 30/360 US bond basis.
///
/// Each month counts as 30 days:
///
/// - if D1 is 31, set D1 to 30
/// - if D2 is 31 and D1 is 30 or 31, set D2 to 30
///
/// February end-of-month adjustments are not applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360US;

impl DayCount for Thirty360US {
    fn name(&self) -> &'static str {
        "30/360 US"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let mut d1 = i64::from(start.day());
        let mut d2 = i64::from(end.day());
        if d1 == 31 {
            d1 = 30;
        }
        if d2 == 31 && d1 == 30 {
            d2 = 30;
        }

        let years = i64::from(end.year() - start.year());
        let months = i64::from(end.month()) - i64::from(start.month());
        360 * years + 30 * months + (d2 - d1)
    }
}
