//! Exposure Aggregator
//!
//! Dollarizes open interest into dealer exposure per strike:
//!
//! - GEX: `OI · Γ · S² · multiplier / 1e9`, put leg negated
//! - DEX: `OI · Δ · S · multiplier / 1e9`, put delta already ≤ 0
//! - Vanna / Charm (optional): `OI · greek · S · multiplier / 1e9`
//!
//! Every record uses the same assumed time to expiry
//! ([`ExposureConfig::time_to_expiry`], 7 days by default) because rolling
//! quotes carry no per-record expiry date.

use crate::config::ExposureConfig;
use crate::core::{ExposureRecord, Greeks, QuoteRecord, SideExposure};
use crate::models::black_scholes;

/// Scale from currency units to billions
pub const BILLION: f64 = 1e9;

/// Computes exposure records from quote records
#[derive(Debug, Clone, Default)]
pub struct ExposureAggregator {
    config: ExposureConfig,
}

impl ExposureAggregator {
    pub fn new(config: ExposureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExposureConfig {
        &self.config
    }

    /// Exposure for one quote
    pub fn aggregate(&self, quote: &QuoteRecord) -> ExposureRecord {
        compute_exposure(quote, &self.config)
    }

    /// Exposure for every quote, in input order
    pub fn aggregate_all(&self, quotes: &[QuoteRecord]) -> Vec<ExposureRecord> {
        quotes.iter().map(|q| self.aggregate(q)).collect()
    }
}

/// Exposure for one quote under `config`
pub fn compute_exposure(quote: &QuoteRecord, config: &ExposureConfig) -> ExposureRecord {
    let spot = quote.spot;
    let time = config.time_to_expiry();
    let rate = config.risk_free_rate;
    let multiplier = config.contract_multiplier;

    let call = black_scholes::greeks(spot, quote.strike, time, rate, quote.call_iv_decimal());
    let put = black_scholes::greeks(spot, quote.strike, time, rate, quote.put_iv_decimal());

    let call_oi = quote.call_oi as f64;
    let put_oi = quote.put_oi as f64;

    let gex = SideExposure::new(
        (call_oi * call.gamma * spot * spot * multiplier) / BILLION,
        -(put_oi * put.gamma * spot * spot * multiplier) / BILLION,
    );

    let dex = SideExposure::new(
        (call_oi * call.call_delta * spot * multiplier) / BILLION,
        (put_oi * put.put_delta * spot * multiplier) / BILLION,
    );

    let (vanna, charm) = if config.second_order {
        (
            Some(first_order_style(call_oi, put_oi, &call, &put, spot, multiplier, |g| g.vanna)),
            Some(first_order_style(call_oi, put_oi, &call, &put, spot, multiplier, |g| g.charm)),
        )
    } else {
        (None, None)
    };

    ExposureRecord {
        quote: quote.clone(),
        gex,
        dex,
        vanna,
        charm,
    }
}

/// `OI · greek · S · multiplier / 1e9` on both legs
fn first_order_style(
    call_oi: f64,
    put_oi: f64,
    call: &Greeks,
    put: &Greeks,
    spot: f64,
    multiplier: f64,
    greek: impl Fn(&Greeks) -> f64,
) -> SideExposure {
    SideExposure::new(
        (call_oi * greek(call) * spot * multiplier) / BILLION,
        (put_oi * greek(put) * spot * multiplier) / BILLION,
    )
}
