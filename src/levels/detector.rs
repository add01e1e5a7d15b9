//! FlipZoneDetector - facade over the flip zone pipeline
//!
//! Takes one timestamp's cross-section of exposure records, orders it by
//! strike and runs both stages.

use super::{detect_flip_zones, resolve_strike_spacing, update_proximity, FlipZoneResult};
use crate::config::ProximityConfig;
use crate::core::AsExposure;

/// Flip zone detector with a proximity band
#[derive(Debug, Clone, Default)]
pub struct FlipZoneDetector {
    config: ProximityConfig,
}

impl FlipZoneDetector {
    /// Create a new detector with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: ProximityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    /// Detect flip zones in a cross-section
    ///
    /// # Arguments
    /// * `cross_section` - Records of a single timestamp, any order
    /// * `spot` - Spot price at that timestamp
    pub fn detect<R: AsExposure>(&self, cross_section: &[R], spot: f64) -> FlipZoneResult {
        let mut curve: Vec<(f64, f64)> = cross_section
            .iter()
            .map(|r| {
                let e = r.exposure();
                (e.strike(), e.gex.net)
            })
            .collect();
        curve.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (strikes, net_gex): (Vec<f64>, Vec<f64>) = curve.into_iter().unzip();
        let strike_spacing = resolve_strike_spacing(&strikes, &self.config);

        let mut zones = detect_flip_zones(&strikes, &net_gex, spot);
        update_proximity(&mut zones, spot, strike_spacing, &self.config);

        FlipZoneResult {
            zones,
            spot,
            strike_spacing,
        }
    }

    /// Detect using the spot carried by the records themselves
    ///
    /// Returns an empty result for an empty cross-section.
    pub fn detect_at_spot<R: AsExposure>(&self, cross_section: &[R]) -> FlipZoneResult {
        let spot = cross_section
            .first()
            .map(|r| r.exposure().spot())
            .unwrap_or(0.0);
        self.detect(cross_section, spot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExposureRecord, QuoteRecord, SideExposure};
    use crate::levels::FlipType;
    use chrono::{FixedOffset, TimeZone};

    fn record(strike: f64, net_gex: f64) -> ExposureRecord {
        let ist = FixedOffset::east_opt(19_800).unwrap();
        ExposureRecord {
            quote: QuoteRecord {
                timestamp: ist.with_ymd_and_hms(2025, 1, 15, 11, 0, 0).unwrap(),
                strike_label: format!("K{strike}"),
                spot: 23_040.0,
                strike,
                call_oi: 0,
                put_oi: 0,
                call_volume: 0,
                put_volume: 0,
                call_iv: 0.0,
                put_iv: 0.0,
            },
            gex: SideExposure::new(net_gex.max(0.0), net_gex.min(0.0)),
            dex: SideExposure::default(),
            vanna: None,
            charm: None,
        }
    }

    #[test]
    fn test_unsorted_cross_section() {
        let cross_section = vec![
            record(23_100.0, -1.0),
            record(23_000.0, 2.0),
            record(23_050.0, 1.0),
            record(23_150.0, -0.5),
        ];
        let result = FlipZoneDetector::new().detect(&cross_section, 23_040.0);

        assert_eq!(result.zones.len(), 1);
        let zone = &result.zones[0];
        assert_eq!(zone.lower_strike, 23_050.0);
        assert_eq!(zone.upper_strike, 23_100.0);
        assert_eq!(zone.flip_type, FlipType::PositiveToNegative);
        assert_eq!(result.strike_spacing, 50.0);
        assert!(zone.near_spot);
        assert_eq!(result.near_spot().len(), 1);
    }

    #[test]
    fn test_near_spot_filters_band() {
        // Crossings at 23025 and 23325; spot 23040 with a 3-strike band of 50
        let cross_section = vec![
            record(23_000.0, 1.0),
            record(23_050.0, -1.0),
            record(23_300.0, -1.0),
            record(23_350.0, 1.0),
        ];
        let result = FlipZoneDetector::new().detect(&cross_section, 23_040.0);
        assert_eq!(result.zones.len(), 2);

        let near = result.near_spot();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].lower_strike, 23_000.0);
        assert!(!result.zones[1].near_spot);
    }

    #[test]
    fn test_configured_interval() {
        let cross_section = vec![record(23_000.0, 1.0), record(23_100.0, -1.0)];
        let detector = FlipZoneDetector::with_config(ProximityConfig {
            band_strikes: 0.5,
            strike_interval: Some(25.0),
        });
        let result = detector.detect_at_spot(&cross_section);
        assert_eq!(result.strike_spacing, 25.0);
        // flip at 23050, spot 23040: 10 / 25
        assert!((result.zones[0].distance_strikes - 0.4).abs() < 1e-12);
        assert!(result.zones[0].near_spot);
        assert!(result.nearest().is_some());
    }

    #[test]
    fn test_empty_cross_section() {
        let empty: Vec<ExposureRecord> = Vec::new();
        let result = FlipZoneDetector::new().detect_at_spot(&empty);
        assert!(result.is_empty());
    }
}
