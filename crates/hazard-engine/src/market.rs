//! Market data lookup.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use hazard_config::SecurityConfig;
use hazard_curves::{DiscountCurve, Handle, Observed, PriceQuote, SimpleQuote, SurvivalCurve};

use crate::error::{EngineError, EngineResult};

/// Curves and quotes by identifier.
///
/// Lookups return handles, so engines built from them follow later
/// relinks of the same identifier.
pub trait Market: Send + Sync {
    /// Discounting curve.
    fn yield_curve(&self, id: &str) -> EngineResult<Handle<dyn DiscountCurve>>;

    /// Issuer survival curve.
    fn default_curve(&self, id: &str) -> EngineResult<Handle<dyn SurvivalCurve>>;

    /// Recovery rate for a security or a credit curve.
    fn recovery_rate(&self, id: &str) -> EngineResult<Handle<SimpleQuote>>;

    /// Security spread.
    fn security_spread(&self, id: &str) -> EngineResult<Handle<SimpleQuote>>;

    /// Security price.
    fn security_price(&self, id: &str) -> EngineResult<Handle<PriceQuote>>;
}

/// A [`Market`] held in memory.
///
/// Adding an identifier a second time relinks its existing handle, which
/// notifies every engine already built on it.
#[derive(Default)]
pub struct InMemoryMarket {
    yield_curves: DashMap<String, Handle<dyn DiscountCurve>>,
    default_curves: DashMap<String, Handle<dyn SurvivalCurve>>,
    recovery_rates: DashMap<String, Handle<SimpleQuote>>,
    security_spreads: DashMap<String, Handle<SimpleQuote>>,
    security_prices: DashMap<String, Handle<PriceQuote>>,
}

/// Inserts a new handle, or relinks the existing one after releasing the
/// map's shard lock so observers may read the market while notified.
fn link<T: Observed + ?Sized + 'static>(map: &DashMap<String, Handle<T>>, id: &str, target: Arc<T>) {
    let existing = match map.entry(id.to_string()) {
        Entry::Occupied(entry) => entry.get().clone(),
        Entry::Vacant(slot) => {
            slot.insert(Handle::new(target));
            return;
        }
    };
    existing.link_to(Some(target));
}

fn lookup<T: ?Sized>(
    map: &DashMap<String, Handle<T>>,
    kind: &str,
    id: &str,
) -> EngineResult<Handle<T>> {
    map.get(id)
        .map(|h| h.value().clone())
        .ok_or_else(|| EngineError::market_data(format!("no {kind} for '{id}'")))
}

impl InMemoryMarket {
    /// Creates an empty market.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or relinks a discounting curve.
    pub fn add_yield_curve(&self, id: &str, curve: Arc<dyn DiscountCurve>) {
        link(&self.yield_curves, id, curve);
    }

    /// Adds or relinks a survival curve.
    pub fn add_default_curve(&self, id: &str, curve: Arc<dyn SurvivalCurve>) {
        link(&self.default_curves, id, curve);
    }

    /// Adds or relinks a recovery rate.
    pub fn add_recovery_rate(&self, id: &str, quote: Arc<SimpleQuote>) {
        link(&self.recovery_rates, id, quote);
    }

    /// Adds or relinks a security spread.
    pub fn add_security_spread(&self, id: &str, quote: Arc<SimpleQuote>) {
        link(&self.security_spreads, id, quote);
    }

    /// Adds or relinks a security price.
    pub fn add_security_price(&self, id: &str, quote: Arc<PriceQuote>) {
        link(&self.security_prices, id, quote);
    }

    /// Registers the quotes a security configuration names, reading their
    /// values from `quote_value`.
    ///
    /// # Errors
    ///
    /// `MarketDataError` if a named quote has no value.
    pub fn add_security(
        &self,
        config: &SecurityConfig,
        quote_value: impl Fn(&str) -> Option<f64>,
    ) -> EngineResult<()> {
        let value = |name: &str| {
            quote_value(name).ok_or_else(|| {
                EngineError::market_data(format!(
                    "quote '{name}' for security '{}' not found",
                    config.curve_id
                ))
            })
        };

        let id = config.curve_id.as_str();
        if let Some(name) = &config.spread_quote {
            self.add_security_spread(id, Arc::new(SimpleQuote::new(value(name)?)));
        }
        if let Some(name) = &config.recovery_quote {
            self.add_recovery_rate(id, Arc::new(SimpleQuote::new(value(name)?)));
        }
        if let (Some(name), Some(price_type)) = (&config.price_quote, config.price_type) {
            self.add_security_price(id, Arc::new(PriceQuote::new(value(name)?, price_type)));
        }
        Ok(())
    }
}

impl Market for InMemoryMarket {
    fn yield_curve(&self, id: &str) -> EngineResult<Handle<dyn DiscountCurve>> {
        lookup(&self.yield_curves, "yield curve", id)
    }

    fn default_curve(&self, id: &str) -> EngineResult<Handle<dyn SurvivalCurve>> {
        lookup(&self.default_curves, "default curve", id)
    }

    fn recovery_rate(&self, id: &str) -> EngineResult<Handle<SimpleQuote>> {
        lookup(&self.recovery_rates, "recovery rate", id)
    }

    fn security_spread(&self, id: &str) -> EngineResult<Handle<SimpleQuote>> {
        lookup(&self.security_spreads, "security spread", id)
    }

    fn security_price(&self, id: &str) -> EngineResult<Handle<PriceQuote>> {
        lookup(&self.security_prices, "security price", id)
    }
}
