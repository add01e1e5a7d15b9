//! Configuration for the exposure pipeline

use std::fs;
use std::path::Path;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{GexError, GexResult};
use crate::data::SymbolSpec;

/// Configuration for the full pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Greek and dollarization parameters
    pub exposure: ExposureConfig,
    /// Exchange clock and session bucketing
    pub session: SessionConfig,
    /// Strike band around spot for headline metrics and flip zones
    pub proximity: ProximityConfig,
}

impl PipelineConfig {
    /// Defaults with the contract size and strike interval of `symbol`
    ///
    /// Unknown symbols use NIFTY's specification.
    pub fn for_symbol(symbol: &str) -> Self {
        let spec = SymbolSpec::lookup_or_default(symbol);
        Self {
            exposure: ExposureConfig {
                contract_multiplier: spec.contract_size,
                ..Default::default()
            },
            proximity: ProximityConfig {
                strike_interval: Some(spec.strike_interval),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Also compute vanna and charm exposures
    pub fn with_second_order(mut self) -> Self {
        self.exposure.second_order = true;
        self
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> GexResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> GexResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::info!("Loaded pipeline config from {:?}", path);
        Ok(config)
    }

    /// Write as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> GexResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> GexResult<()> {
        self.exposure.validate()?;
        self.session.validate()?;
        self.proximity.validate()
    }
}

/// Greek engine inputs and dollarization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    /// Units of underlying per contract
    /// Default: 25 (NIFTY)
    pub contract_multiplier: f64,

    /// Assumed days to expiry for every record
    ///
    /// Rolling feeds do not carry a per-record expiry date, so a fixed
    /// horizon is used regardless of the contract actually selected.
    /// Default: 7
    pub days_to_expiry: f64,

    /// Day count for converting days to a year fraction
    /// Default: 365
    pub days_per_year: f64,

    /// Annual risk-free rate
    /// Default: 0.07
    pub risk_free_rate: f64,

    /// Compute vanna and charm exposures as well
    /// Default: false
    pub second_order: bool,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: 25.0,
            days_to_expiry: 7.0,
            days_per_year: 365.0,
            risk_free_rate: 0.07,
            second_order: false,
        }
    }
}

impl ExposureConfig {
    /// Time to expiry in years
    pub fn time_to_expiry(&self) -> f64 {
        self.days_to_expiry / self.days_per_year
    }

    fn validate(&self) -> GexResult<()> {
        if !(self.contract_multiplier.is_finite() && self.contract_multiplier > 0.0) {
            return Err(GexError::config("contract_multiplier must be positive"));
        }
        if !(self.days_per_year.is_finite() && self.days_per_year > 0.0) {
            return Err(GexError::config("days_per_year must be positive"));
        }
        if !self.days_to_expiry.is_finite() {
            return Err(GexError::config("days_to_expiry must be finite"));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(GexError::config("risk_free_rate must be finite"));
        }
        Ok(())
    }
}

/// Exchange clock and intraday bucketing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Exchange offset from UTC in minutes
    /// Default: 330 (IST, +05:30)
    pub utc_offset_minutes: i32,

    /// First local hour counted as afternoon
    /// Default: 12
    pub afternoon_start_hour: u32,

    /// Spot range (as % of mean spot) above which a session is flagged
    /// Default: 2.0
    pub spot_variation_warn_pct: f64,

    /// Peak |net GEX| that hedging pressure is scaled against
    /// Default: Session
    pub pressure_scope: PressureScope,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 330,
            afternoon_start_hour: 12,
            spot_variation_warn_pct: 2.0,
            pressure_scope: PressureScope::Session,
        }
    }
}

/// Normalisation window for hedging pressure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureScope {
    /// Largest |net GEX| over the whole session; only the peak snapshot reaches ±100
    #[default]
    Session,
    /// Largest |net GEX| within each timestamp
    Timestamp,
}

impl SessionConfig {
    /// Exchange-local offset; UTC if the configured value is out of range
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
    }

    fn validate(&self) -> GexResult<()> {
        if FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).is_none() {
            return Err(GexError::config(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )));
        }
        if self.afternoon_start_hour > 23 {
            return Err(GexError::config("afternoon_start_hour must be 0..=23"));
        }
        Ok(())
    }
}

/// Strike band around spot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Half-width of the band in strike intervals
    /// Strikes within ±band_strikes of spot count as near spot
    /// Default: 3
    pub band_strikes: f64,

    /// Listed strike interval; None uses the median spacing of the cross-section
    /// Default: None
    pub strike_interval: Option<f64>,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            band_strikes: 3.0,
            strike_interval: None,
        }
    }
}

impl ProximityConfig {
    fn validate(&self) -> GexResult<()> {
        if !(self.band_strikes.is_finite() && self.band_strikes >= 0.0) {
            return Err(GexError::config("band_strikes must be non-negative"));
        }
        if let Some(interval) = self.strike_interval {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(GexError::config("strike_interval must be positive"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert!((config.exposure.time_to_expiry() - 7.0 / 365.0).abs() < 1e-15);
        assert_eq!(config.session.offset().local_minus_utc(), 19_800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_symbol() {
        let config = PipelineConfig::for_symbol("BANKNIFTY");
        assert_eq!(config.exposure.contract_multiplier, 15.0);
        assert_eq!(config.proximity.strike_interval, Some(100.0));

        let unknown = PipelineConfig::for_symbol("XYZ");
        assert_eq!(unknown.exposure.contract_multiplier, 25.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            PipelineConfig::from_json(r#"{"exposure": {"second_order": true}}"#).unwrap();
        assert!(config.exposure.second_order);
        assert_eq!(config.exposure.days_to_expiry, 7.0);
        assert_eq!(config.session.pressure_scope, PressureScope::Session);

        let config =
            PipelineConfig::from_json(r#"{"session": {"pressure_scope": "timestamp"}}"#).unwrap();
        assert_eq!(config.session.pressure_scope, PressureScope::Timestamp);
        assert_eq!(config.proximity.band_strikes, 3.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = PipelineConfig::from_json(r#"{"exposure": {"contract_multiplier": 0.0}}"#);
        assert!(matches!(err, Err(GexError::Config(_))));

        let err = PipelineConfig::from_json(r#"{"session": {"utc_offset_minutes": 100000}}"#);
        assert!(matches!(err, Err(GexError::Config(_))));

        let err = PipelineConfig::from_json("not json");
        assert!(matches!(err, Err(GexError::Serialization(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.json");

        let config = PipelineConfig::for_symbol("FINNIFTY").with_second_order();
        config.save(&path).unwrap();

        let loaded = PipelineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        let missing = PipelineConfig::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(GexError::IO(_))));
    }
}
