//! Stage 2: Proximity
//!
//! Distance of a level from spot, measured in strike intervals.

use super::FlipZone;
use crate::config::ProximityConfig;

/// Compute median strike spacing from a sorted strike array
pub fn compute_strike_spacing(strikes: &[f64]) -> f64 {
    if strikes.len() < 2 {
        return 1.0;
    }

    let mut diffs: Vec<f64> = strikes
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .filter(|&d| d > 1e-10) // duplicates
        .collect();

    if diffs.is_empty() {
        return 1.0;
    }

    diffs.sort_by(|a, b| a.total_cmp(b));

    if diffs.len() % 2 == 0 {
        let mid = diffs.len() / 2;
        (diffs[mid - 1] + diffs[mid]) / 2.0
    } else {
        diffs[diffs.len() / 2]
    }
}

/// Strike interval to measure distances in
///
/// The configured listing interval wins; otherwise the median spacing of
/// `strikes`.
pub fn resolve_strike_spacing(strikes: &[f64], config: &ProximityConfig) -> f64 {
    config
        .strike_interval
        .unwrap_or_else(|| compute_strike_spacing(strikes))
}

/// `(level - spot) / spacing`, or the raw difference without a usable spacing
pub fn distance_in_strikes(level: f64, spot: f64, strike_spacing: f64) -> f64 {
    if strike_spacing > 0.0 {
        (level - spot) / strike_spacing
    } else {
        level - spot
    }
}

/// Whether `strike` lies within the band around `spot`
pub fn within_band(strike: f64, spot: f64, strike_spacing: f64, config: &ProximityConfig) -> bool {
    distance_in_strikes(strike, spot, strike_spacing).abs() <= config.band_strikes
}

/// Re-evaluate distances and near-spot flags
///
/// Call this when spot moves or the strike interval changes.
pub fn update_proximity(
    zones: &mut [FlipZone],
    spot: f64,
    strike_spacing: f64,
    config: &ProximityConfig,
) {
    for zone in zones.iter_mut() {
        zone.distance_strikes = distance_in_strikes(zone.flip_strike, spot, strike_spacing);
        zone.near_spot = zone.distance_strikes.abs() <= config.band_strikes;
    }
}
