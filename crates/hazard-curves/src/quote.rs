//! Market quotes.
//!
//! A quote holds a single scalar that may be absent. Setting a new value
//! notifies observers; setting the same value again does not.

use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::CurveError;
use crate::observer::{Observable, Observed};

/// A settable scalar quote (recovery rate, spread).
#[derive(Debug, Default)]
pub struct SimpleQuote {
    value: RwLock<Option<f64>>,
    observable: Observable,
}

impl SimpleQuote {
    /// Creates a quote holding `value`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value: RwLock::new(Some(value)),
            observable: Observable::new(),
        }
    }

    /// Creates a quote with no value.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Current value, if any.
    pub fn value(&self) -> Option<f64> {
        *self.value.read()
    }

    /// Returns true if the quote holds a value.
    pub fn is_valid(&self) -> bool {
        self.value.read().is_some()
    }

    /// Sets the value and notifies observers if it changed.
    ///
    /// Returns the difference from the previous value (zero if there was none).
    pub fn set_value(&self, value: f64) -> f64 {
        let previous = self.value.write().replace(value);
        if previous != Some(value) {
            self.observable.notify_observers();
        }
        previous.map_or(0.0, |p| value - p)
    }

    /// Clears the value and notifies observers if there was one.
    pub fn reset(&self) {
        if self.value.write().take().is_some() {
            self.observable.notify_observers();
        }
    }
}

impl Observed for SimpleQuote {
    fn observable(&self) -> &Observable {
        &self.observable
    }
}

/// How a bond price is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriceType {
    /// Excluding accrued interest.
    #[default]
    Clean,
    /// Including accrued interest.
    Dirty,
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceType::Clean => write!(f, "Clean"),
            PriceType::Dirty => write!(f, "Dirty"),
        }
    }
}

impl FromStr for PriceType {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clean" => Ok(PriceType::Clean),
            "dirty" => Ok(PriceType::Dirty),
            _ => Err(CurveError::invalid_value(format!("unknown price type: {s}"))),
        }
    }
}

/// A bond price quote, per 100 of outstanding notional.
#[derive(Debug)]
pub struct PriceQuote {
    quote: SimpleQuote,
    price_type: PriceType,
}

impl PriceQuote {
    /// Creates a price quote.
    #[must_use]
    pub fn new(value: f64, price_type: PriceType) -> Self {
        Self {
            quote: SimpleQuote::new(value),
            price_type,
        }
    }

    /// Creates a clean price quote.
    #[must_use]
    pub fn clean(value: f64) -> Self {
        Self::new(value, PriceType::Clean)
    }

    /// Creates a dirty price quote.
    #[must_use]
    pub fn dirty(value: f64) -> Self {
        Self::new(value, PriceType::Dirty)
    }

    /// The quoting convention.
    pub fn price_type(&self) -> PriceType {
        self.price_type
    }

    /// Current price, if any.
    pub fn value(&self) -> Option<f64> {
        self.quote.value()
    }

    /// Sets the price and notifies observers if it changed.
    pub fn set_value(&self, value: f64) -> f64 {
        self.quote.set_value(value)
    }
}

impl Observed for PriceQuote {
    fn observable(&self) -> &Observable {
        self.quote.observable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::tests::watch;

    #[test]
    fn test_set_value_notifies_on_change_only() {
        let quote = SimpleQuote::new(0.4);
        let counter = watch(quote.observable());

        quote.set_value(0.4);
        assert_eq!(counter.count(), 0);

        let diff = quote.set_value(0.35);
        assert!((diff + 0.05).abs() < 1e-15);
        assert_eq!(counter.count(), 1);
        assert_eq!(quote.value(), Some(0.35));
    }

    #[test]
    fn test_empty_quote() {
        let quote = SimpleQuote::empty();
        assert!(!quote.is_valid());
        assert_eq!(quote.value(), None);

        let counter = watch(quote.observable());
        quote.reset();
        assert_eq!(counter.count(), 0);
        quote.set_value(0.01);
        quote.reset();
        assert_eq!(counter.count(), 2);
        assert!(!quote.is_valid());
    }

    #[test]
    fn test_price_quote() {
        let price = PriceQuote::clean(99.5);
        assert_eq!(price.price_type(), PriceType::Clean);
        assert_eq!(price.value(), Some(99.5));

        let counter = watch(price.observable());
        price.set_value(100.25);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_price_type_parsing() {
        assert_eq!("clean".parse::<PriceType>().unwrap(), PriceType::Clean);
        assert_eq!("DIRTY".parse::<PriceType>().unwrap(), PriceType::Dirty);
        assert!("mid".parse::<PriceType>().is_err());
        assert_eq!(PriceType::Dirty.to_string(), "Dirty");
    }
}
