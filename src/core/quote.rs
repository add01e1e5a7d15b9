//! Per-strike quote records
//!
//! One row per (strike, timestamp) with the call and put legs merged.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Implied volatility as a decimal
///
/// Feeds report IV either as a decimal (0.15) or as a percentage (15.0).
/// Values above 1 are read as percentages. Negative or non-finite input is
/// clamped to 0, which the Greek engine treats as "model inapplicable".
pub fn normalize_iv(iv: f64) -> f64 {
    if !iv.is_finite() || iv < 0.0 {
        return 0.0;
    }
    if iv > 1.0 {
        iv / 100.0
    } else {
        iv
    }
}

/// Merged call/put quote at one strike and one timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Exchange-local timestamp
    pub timestamp: DateTime<FixedOffset>,
    /// Feed strike label (e.g. "ATM", "ATM+2")
    pub strike_label: String,
    /// Underlying spot price
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    pub call_oi: u64,
    pub put_oi: u64,
    pub call_volume: u64,
    pub put_volume: u64,
    /// Call IV as received (decimal or percent)
    pub call_iv: f64,
    /// Put IV as received (decimal or percent)
    pub put_iv: f64,
}

impl QuoteRecord {
    /// Combined call and put volume
    pub fn total_volume(&self) -> u64 {
        self.call_volume.saturating_add(self.put_volume)
    }

    /// Call IV as a decimal
    pub fn call_iv_decimal(&self) -> f64 {
        normalize_iv(self.call_iv)
    }

    /// Put IV as a decimal
    pub fn put_iv_decimal(&self) -> f64 {
        normalize_iv(self.put_iv)
    }

    /// Spot and strike must both be strictly positive and finite
    pub fn is_valid(&self) -> bool {
        self.spot.is_finite() && self.spot > 0.0 && self.strike.is_finite() && self.strike > 0.0
    }
}
