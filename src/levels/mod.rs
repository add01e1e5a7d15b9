//! Gamma Flip Zones
//!
//! Locates strikes where aggregate net GEX changes sign. Positive net GEX
//! means dealers dampen moves (suppression); negative net GEX means they
//! chase them (amplification). The strike where the curve crosses zero
//! separates the two regimes.
//!
//! Two-stage pipeline:
//! 1. **Sign-change scan**: adjacent strikes with opposite non-zero net GEX,
//!    flip level by magnitude-weighted linear interpolation
//! 2. **Proximity**: distance from spot in strike intervals, near-spot flag
//!
//! Known limitation: a strike whose net GEX is exactly zero breaks the
//! adjacent-pair test, so a crossing that passes through an exact zero is
//! not reported.

mod detection;
mod detector;
mod proximity;

pub use detection::*;
pub use detector::*;
pub use proximity::*;

use serde::{Deserialize, Serialize};

/// Which way net GEX changes sign going up the strikes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipType {
    /// Positive at the lower strike, negative at the upper
    PositiveToNegative,
    /// Negative at the lower strike, positive at the upper
    NegativeToPositive,
}

impl FlipType {
    /// Classify from the net GEX at the lower strike
    pub fn from_lower(lower_gex: f64) -> Self {
        if lower_gex > 0.0 {
            FlipType::PositiveToNegative
        } else {
            FlipType::NegativeToPositive
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlipType::PositiveToNegative => "Positive → Negative",
            FlipType::NegativeToPositive => "Negative → Positive",
        }
    }
}

/// Where spot sits relative to the interpolated flip level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpotPosition {
    BelowFlip,
    AtOrAboveFlip,
}

impl SpotPosition {
    pub fn of(spot: f64, flip_strike: f64) -> Self {
        if spot < flip_strike {
            SpotPosition::BelowFlip
        } else {
            SpotPosition::AtOrAboveFlip
        }
    }
}

/// Direction label of a flip zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipDirection {
    /// Amplification above the flip level
    Upward,
    /// Suppression below the flip level
    Downward,
}

impl FlipDirection {
    /// Decision table over spot position and the sign at the lower strike
    ///
    /// | spot vs flip | lower net GEX | direction |
    /// |--------------|---------------|-----------|
    /// | below        | > 0           | upward    |
    /// | below        | < 0           | downward  |
    /// | at/above     | < 0           | downward  |
    /// | at/above     | > 0           | upward    |
    pub fn classify(position: SpotPosition, lower_gex: f64) -> Self {
        match (position, lower_gex > 0.0) {
            (SpotPosition::BelowFlip, true) => FlipDirection::Upward,
            (SpotPosition::BelowFlip, false) => FlipDirection::Downward,
            (SpotPosition::AtOrAboveFlip, false) => FlipDirection::Downward,
            (SpotPosition::AtOrAboveFlip, true) => FlipDirection::Upward,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlipDirection::Upward => "Upward flip",
            FlipDirection::Downward => "Downward flip",
        }
    }

    /// Regime implied on the far side of the flip
    pub fn regime(&self) -> &'static str {
        match self {
            FlipDirection::Upward => "Amplification above",
            FlipDirection::Downward => "Suppression below",
        }
    }

    /// Display tone: amplification reads negative, suppression positive
    pub fn tone(&self) -> &'static str {
        match self {
            FlipDirection::Upward => "negative",
            FlipDirection::Downward => "positive",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            FlipDirection::Upward => "▲",
            FlipDirection::Downward => "▼",
        }
    }
}

/// Interval between two adjacent strikes where net GEX changes sign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipZone {
    /// Interpolated zero-crossing level
    pub flip_strike: f64,
    pub lower_strike: f64,
    pub upper_strike: f64,
    /// Net GEX at the lower strike
    pub lower_gex: f64,
    /// Net GEX at the upper strike
    pub upper_gex: f64,
    pub flip_type: FlipType,
    pub direction: FlipDirection,
    pub spot_position: SpotPosition,
    /// Distance from spot in strike intervals (positive = above spot)
    pub distance_strikes: f64,
    /// Within the proximity band around spot
    pub near_spot: bool,
}

impl FlipZone {
    /// One-line description, e.g. for a chart annotation
    pub fn tooltip(&self) -> String {
        format!(
            "Flip {:.2} {} | {} | {} | [{:.0}: {:+.4}B, {:.0}: {:+.4}B] | Distance: {:+.1}",
            self.flip_strike,
            self.direction.arrow(),
            self.flip_type.label(),
            self.direction.regime(),
            self.lower_strike,
            self.lower_gex,
            self.upper_strike,
            self.upper_gex,
            self.distance_strikes
        )
    }
}

/// Flip zones of one cross-section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipZoneResult {
    /// Zones ordered by strike ascending
    pub zones: Vec<FlipZone>,
    /// Spot used
    pub spot: f64,
    /// Strike interval used for distances
    pub strike_spacing: f64,
}

impl FlipZoneResult {
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zone whose flip level is closest to spot
    pub fn nearest(&self) -> Option<&FlipZone> {
        self.zones.iter().min_by(|a, b| {
            (a.flip_strike - self.spot)
                .abs()
                .total_cmp(&(b.flip_strike - self.spot).abs())
        })
    }

    /// Zones inside the proximity band
    pub fn near_spot(&self) -> Vec<&FlipZone> {
        self.zones.iter().filter(|z| z.near_spot).collect()
    }
}
