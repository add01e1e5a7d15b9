//! Stage 1: Sign-Change Scan
//!
//! Walks adjacent strike pairs of a net GEX curve and reports each interval
//! where the sign flips.

use super::{compute_strike_spacing, distance_in_strikes, FlipDirection, FlipType, FlipZone, SpotPosition};
use crate::config::ProximityConfig;

/// Detect flip zones on a net GEX curve
///
/// # Arguments
/// * `strikes` - Strike prices (sorted ascending)
/// * `net_gex` - Net GEX at each strike
/// * `spot` - Spot price at the same timestamp
///
/// # Returns
/// Flip zones ordered by strike. Distances use the median strike spacing
/// and the default proximity band; see [`update_proximity`](super::update_proximity)
/// to apply another interval or band. Extra entries in the longer slice are
/// ignored.
pub fn detect_flip_zones(strikes: &[f64], net_gex: &[f64], spot: f64) -> Vec<FlipZone> {
    let n = strikes.len().min(net_gex.len());
    if n < 2 {
        return Vec::new();
    }

    let spacing = compute_strike_spacing(&strikes[..n]);
    let band = ProximityConfig::default().band_strikes;
    let mut zones = Vec::new();

    for i in 0..n - 1 {
        let (g0, g1) = (net_gex[i], net_gex[i + 1]);
        if !opposite_signs(g0, g1) {
            continue;
        }

        let (k0, k1) = (strikes[i], strikes[i + 1]);
        let flip_strike = interpolate_flip(k0, k1, g0, g1);
        let spot_position = SpotPosition::of(spot, flip_strike);
        let distance_strikes = distance_in_strikes(flip_strike, spot, spacing);

        zones.push(FlipZone {
            flip_strike,
            lower_strike: k0,
            upper_strike: k1,
            lower_gex: g0,
            upper_gex: g1,
            flip_type: FlipType::from_lower(g0),
            direction: FlipDirection::classify(spot_position, g0),
            spot_position,
            distance_strikes,
            near_spot: distance_strikes.abs() <= band,
        });
    }

    zones
}

/// Strictly opposite, non-zero signs (NaN never matches)
fn opposite_signs(a: f64, b: f64) -> bool {
    (a > 0.0 && b < 0.0) || (a < 0.0 && b > 0.0)
}

/// Zero crossing by magnitude-weighted linear interpolation
///
/// `k0 + (k1 - k0) · |g0| / (|g0| + |g1|)`
pub fn interpolate_flip(k0: f64, k1: f64, g0: f64, g1: f64) -> f64 {
    let total = g0.abs() + g1.abs();
    if total > 0.0 {
        k0 + (k1 - k0) * g0.abs() / total
    } else {
        k0
    }
}
