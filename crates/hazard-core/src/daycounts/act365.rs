//! Actual/365 Fixed.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/365 Fixed: actual days over a 365-day year, leap years ignored.
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{365}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(start.days_between(&end)) / Decimal::from(365)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }

    fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / 365.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_leap_year_not_special() {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 1, 1).unwrap();
        assert_eq!(Act365Fixed.day_count(start, end), 366);
        assert_eq!(Act365Fixed.year_fraction(start, end), dec!(366) / dec!(365));
    }

    #[test]
    fn test_f64_agrees_with_decimal() {
        let start = Date::from_ymd(2025, 3, 10).unwrap();
        let end = Date::from_ymd(2031, 11, 2).unwrap();
        let exact = DayCount::year_fraction(&Act365Fixed, start, end);
        let fast = Act365Fixed.year_fraction_f64(start, end);
        assert_relative_eq!(fast, exact.to_string().parse::<f64>().unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_negative_when_reversed() {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2024, 1, 1).unwrap();
        assert!(Act365Fixed.year_fraction_f64(start, end) < 0.0);
    }
}
