//! Option Greeks
//!
//! The subset of Black-Scholes sensitivities needed for dealer exposure.

use serde::{Deserialize, Serialize};

/// Greeks for one (spot, strike, expiry, rate, vol) point
///
/// Gamma, vanna and charm are side-independent; delta is carried for both
/// sides so a single evaluation serves the call and the put leg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Gamma: d²V/dS²
    pub gamma: f64,
    /// Call delta: Φ(d1)
    pub call_delta: f64,
    /// Put delta: Φ(d1) - 1
    pub put_delta: f64,
    /// Vanna: d²V/dSdσ (sensitivity of delta to vol)
    pub vanna: f64,
    /// Charm: d²V/dSdt (delta decay)
    pub charm: f64,
}

impl Greeks {
    /// All-zero Greeks, returned whenever the model is inapplicable
    pub const ZERO: Greeks = Greeks {
        gamma: 0.0,
        call_delta: 0.0,
        put_delta: 0.0,
        vanna: 0.0,
        charm: 0.0,
    };

    /// True when every sensitivity is exactly zero
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}
