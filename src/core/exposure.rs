//! Exposure and flow records
//!
//! All exposure values are dollarized and scaled to billions of currency
//! units. Records are immutable values produced by the aggregator and the
//! flow differencer.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::quote::QuoteRecord;

/// Call, put and net values of one exposure kind
///
/// `net` is always `call + put`; the put leg already carries its sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SideExposure {
    pub call: f64,
    pub put: f64,
    pub net: f64,
}

impl SideExposure {
    pub fn new(call: f64, put: f64) -> Self {
        Self {
            call,
            put,
            net: call + put,
        }
    }

    /// Field-wise difference `self - previous`
    pub fn diff(&self, previous: &SideExposure) -> Self {
        Self {
            call: self.call - previous.call,
            put: self.put - previous.put,
            net: self.net - previous.net,
        }
    }
}

/// Quote record extended with dealer exposures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRecord {
    #[serde(flatten)]
    pub quote: QuoteRecord,
    /// Gamma exposure
    pub gex: SideExposure,
    /// Delta exposure
    pub dex: SideExposure,
    /// Vanna exposure (only when second-order exposures are enabled)
    pub vanna: Option<SideExposure>,
    /// Charm exposure (only when second-order exposures are enabled)
    pub charm: Option<SideExposure>,
}

impl ExposureRecord {
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.quote.timestamp
    }

    pub fn strike(&self) -> f64 {
        self.quote.strike
    }

    pub fn spot(&self) -> f64 {
        self.quote.spot
    }
}

/// Per-strike change of every exposure field since the previous timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowFields {
    pub gex: SideExposure,
    pub dex: SideExposure,
    pub vanna: Option<SideExposure>,
    pub charm: Option<SideExposure>,
}

impl FlowFields {
    /// Zero flows shaped like `record` (vanna/charm present iff present there)
    pub fn zero_for(record: &ExposureRecord) -> Self {
        Self {
            gex: SideExposure::default(),
            dex: SideExposure::default(),
            vanna: record.vanna.map(|_| SideExposure::default()),
            charm: record.charm.map(|_| SideExposure::default()),
        }
    }

    /// Flows between two records of the same strike
    pub fn between(current: &ExposureRecord, previous: &ExposureRecord) -> Self {
        Self {
            gex: current.gex.diff(&previous.gex),
            dex: current.dex.diff(&previous.dex),
            vanna: diff_optional(current.vanna, previous.vanna),
            charm: diff_optional(current.charm, previous.charm),
        }
    }
}

fn diff_optional(current: Option<SideExposure>, previous: Option<SideExposure>) -> Option<SideExposure> {
    match (current, previous) {
        (Some(c), Some(p)) => Some(c.diff(&p)),
        (Some(_), None) => Some(SideExposure::default()),
        (None, _) => None,
    }
}

/// Exposure record extended with flows and hedging pressure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    #[serde(flatten)]
    pub exposure: ExposureRecord,
    pub flow: FlowFields,
    /// Net GEX as a percentage of the largest |net GEX| in the configured scope
    pub hedging_pressure: f64,
}

/// Anything that exposes an [`ExposureRecord`]
///
/// Lets the reducers and the flip detector work on exposure and flow tables
/// alike.
pub trait AsExposure {
    fn exposure(&self) -> &ExposureRecord;
}

impl AsExposure for ExposureRecord {
    fn exposure(&self) -> &ExposureRecord {
        self
    }
}

impl AsExposure for FlowRecord {
    fn exposure(&self) -> &ExposureRecord {
        &self.exposure
    }
}

impl<T: AsExposure> AsExposure for &T {
    fn exposure(&self) -> &ExposureRecord {
        (*self).exposure()
    }
}
