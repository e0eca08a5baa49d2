//! Engine selection and caching for bonds.
//!
//! One engine is built per currency, credit curve, security and reference
//! curve, and shared by every bond with the same combination.

use std::sync::Arc;

use dashmap::DashMap;

use hazard_config::{BondEngineConfig, PriceTreatment, Validate};
use hazard_core::types::Currency;
use hazard_curves::{Handle, SimpleQuote};
use hazard_pricing::DiscountingRiskyBondEngine;

use crate::error::EngineResult;
use crate::market::Market;

/// Builds and caches [`DiscountingRiskyBondEngine`]s from market data.
pub struct BondEngineBuilder {
    market: Arc<dyn Market>,
    config: BondEngineConfig,
    cache: DashMap<String, Arc<DiscountingRiskyBondEngine>>,
}

impl BondEngineBuilder {
    /// Creates a builder over `market`.
    ///
    /// # Errors
    ///
    /// `ConfigError` if `config` does not validate.
    pub fn new(market: Arc<dyn Market>, config: BondEngineConfig) -> EngineResult<Self> {
        config.validate_or_error()?;
        Ok(Self {
            market,
            config,
            cache: DashMap::new(),
        })
    }

    /// Model name.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Engine name.
    pub fn engine_name(&self) -> &str {
        &self.config.engine
    }

    /// Engine configuration.
    pub fn config(&self) -> &BondEngineConfig {
        &self.config
    }

    /// Cache key for an engine.
    pub fn key(
        ccy: Currency,
        credit_curve_id: &str,
        security_id: &str,
        reference_curve_id: &str,
    ) -> String {
        format!("{ccy}_{credit_curve_id}_{security_id}_{reference_curve_id}")
    }

    /// The engine for a bond, built on first request.
    ///
    /// An empty `credit_curve_id` means no survival curve.
    ///
    /// # Errors
    ///
    /// `MarketDataError` if the reference curve, the credit curve, or the
    /// fallback recovery rate is missing; pricing and configuration errors
    /// from engine construction.
    pub fn engine(
        &self,
        ccy: Currency,
        credit_curve_id: &str,
        security_id: &str,
        reference_curve_id: &str,
    ) -> EngineResult<Arc<DiscountingRiskyBondEngine>> {
        let key = Self::key(ccy, credit_curve_id, security_id, reference_curve_id);
        if let Some(engine) = self.cache.get(&key) {
            return Ok(Arc::clone(engine.value()));
        }

        let engine = self.build(credit_curve_id, security_id, reference_curve_id)?;
        tracing::debug!(key = %key, variant = ?engine.variant(), "built bond engine");
        Ok(Arc::clone(self.cache.entry(key).or_insert(engine).value()))
    }

    fn build(
        &self,
        credit_curve_id: &str,
        security_id: &str,
        reference_curve_id: &str,
    ) -> EngineResult<Arc<DiscountingRiskyBondEngine>> {
        let discount = self.market.yield_curve(reference_curve_id)?;
        let survival = if credit_curve_id.is_empty() {
            Handle::empty()
        } else {
            self.market.default_curve(credit_curve_id)?
        };
        let recovery = self.recovery_rate(credit_curve_id, security_id)?;

        let spread = self.market.security_spread(security_id).ok();
        if let Some(spread) = &spread {
            tracing::debug!(
                security_id = %security_id,
                spread = ?spread.current().and_then(|q| q.value()),
                "using security spread"
            );
        }
        let price = self.market.security_price(security_id).ok();
        if let Some(price) = &price {
            tracing::debug!(
                security_id = %security_id,
                price = ?price.current().and_then(|q| q.value()),
                "using security price"
            );
        }

        let timestep = self.config.timestep_period()?;
        let include = self.config.include_settlement_date_flows()?;

        let engine = match price {
            None => DiscountingRiskyBondEngine::new(
                discount,
                survival,
                recovery,
                spread.unwrap_or_default(),
                timestep,
                include,
            )?,
            Some(price) => {
                if spread.is_some() {
                    tracing::debug!(security_id = %security_id, "price quote takes precedence over spread");
                }
                match self.config.price_treatment()? {
                    PriceTreatment::PriceBased => {
                        DiscountingRiskyBondEngine::price_based(discount, price, timestep, include)?
                    }
                    PriceTreatment::ImpliedSpread => DiscountingRiskyBondEngine::price_implied_spread(
                        discount,
                        price,
                        timestep,
                        include,
                        self.config.implied_spread()?,
                    )?,
                }
            }
        };
        Ok(engine)
    }

    /// Security recovery if quoted, else the credit curve's.
    fn recovery_rate(
        &self,
        credit_curve_id: &str,
        security_id: &str,
    ) -> EngineResult<Handle<SimpleQuote>> {
        if let Ok(recovery) = self.market.recovery_rate(security_id) {
            return Ok(recovery);
        }
        tracing::warn!(
            security_id = %security_id,
            credit_curve_id = %credit_curve_id,
            "security specific recovery rate not found, falling back on the credit curve recovery rate"
        );
        if credit_curve_id.is_empty() {
            Ok(Handle::empty())
        } else {
            self.market.recovery_rate(credit_curve_id)
        }
    }

    /// Drops every cached engine.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of cached engines.
    pub fn cached_engines(&self) -> usize {
        self.cache.len()
    }
}
