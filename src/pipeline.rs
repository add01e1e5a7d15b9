//! GexPipeline - main facade
//!
//! Runs a raw batch through every stage:
//!
//! 1. Feed merge (local time, date filter, call/put pairing)
//! 2. Exposure aggregation
//! 3. Flow differencing per strike
//! 4. Hedging pressure against the session (or per-timestamp) peak
//!
//! and reduces the resulting session on demand for a chosen timestamp.
//! The pipeline holds no state between batches.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::core::{FlowRecord, GexError, GexResult};
use crate::data::{merge_batch, RawBatch};
use crate::exposure::{compute_flows, ExposureAggregator, StrikeKey};
use crate::levels::{FlipZoneDetector, FlipZoneResult};
use crate::reduce::{
    fill_hedging_pressure, nearest_timestamp, session_averages, strike_history, summarize,
    timeline, SessionAverages, SnapshotSummary, TimelinePoint,
};

/// Descriptive statistics of a processed batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub symbol: String,
    pub date: NaiveDate,
    /// Spot of the latest record
    pub spot: f64,
    pub spot_min: f64,
    pub spot_max: f64,
    /// (max - min) / mean of the distinct spot values, in percent
    pub spot_variation_pct: f64,
    pub total_records: usize,
    pub strikes_count: usize,
    pub timestamps_count: usize,
    pub first_timestamp: DateTime<FixedOffset>,
    pub last_timestamp: DateTime<FixedOffset>,
    pub interval_minutes: Option<u32>,
    pub expiry_code: Option<u32>,
    /// Raw entries the feed merger discarded
    pub dropped_records: usize,
}

impl SessionMetadata {
    /// Spot moved more than `warn_pct` percent over the session
    pub fn has_wide_spot_range(&self, warn_pct: f64) -> bool {
        self.spot_variation_pct > warn_pct
    }

    /// "HH:MM:SS - HH:MM:SS" in exchange-local time
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            self.first_timestamp.format("%H:%M:%S"),
            self.last_timestamp.format("%H:%M:%S")
        )
    }
}

/// Flow table of one symbol and trading date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Sorted by strike, then timestamp
    pub records: Vec<FlowRecord>,
    pub metadata: SessionMetadata,
}

impl Session {
    /// Distinct timestamps, ascending
    pub fn timestamps(&self) -> Vec<DateTime<FixedOffset>> {
        let mut timestamps: Vec<_> = self.records.iter().map(|r| r.exposure.timestamp()).collect();
        timestamps.sort();
        timestamps.dedup();
        timestamps
    }

    pub fn latest_timestamp(&self) -> DateTime<FixedOffset> {
        self.metadata.last_timestamp
    }

    /// Records at exactly `timestamp`, sorted by strike
    pub fn cross_section(&self, timestamp: DateTime<FixedOffset>) -> Vec<FlowRecord> {
        // records are strike-major, so the filter keeps strike order
        self.records
            .iter()
            .filter(|r| r.exposure.timestamp() == timestamp)
            .cloned()
            .collect()
    }

    /// Records at the timestamp nearest to `target`
    pub fn nearest_cross_section(&self, target: DateTime<FixedOffset>) -> Vec<FlowRecord> {
        match nearest_timestamp(&self.timestamps(), target) {
            Some(ts) => self.cross_section(ts),
            None => Vec::new(),
        }
    }

    /// Per-timestamp sums
    pub fn timeline(&self) -> Vec<TimelinePoint> {
        timeline(&self.records)
    }

    /// Morning and afternoon mean net GEX
    pub fn session_averages(&self, boundary_hour: u32) -> SessionAverages {
        session_averages(&self.timeline(), boundary_hour)
    }

    /// Chronological records of one strike
    pub fn strike_history(&self, strike: f64) -> Vec<&FlowRecord> {
        strike_history(&self.records, strike)
    }
}

/// Result of processing a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProcessOutcome {
    Data(Session),
    /// Nothing usable in the batch; not an error
    NoData { reason: String },
}

impl ProcessOutcome {
    pub fn session(&self) -> Option<&Session> {
        match self {
            ProcessOutcome::Data(session) => Some(session),
            ProcessOutcome::NoData { .. } => None,
        }
    }

    pub fn into_session(self) -> Option<Session> {
        match self {
            ProcessOutcome::Data(session) => Some(session),
            ProcessOutcome::NoData { .. } => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ProcessOutcome::NoData { .. })
    }

    /// For callers that cannot proceed without data
    pub fn into_result(self) -> GexResult<Session> {
        match self {
            ProcessOutcome::Data(session) => Ok(session),
            ProcessOutcome::NoData { reason } => Err(GexError::data(reason)),
        }
    }
}

/// One timestamp of a session, reduced for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub summary: SnapshotSummary,
    pub flip_zones: FlipZoneResult,
    /// (strike, hedging pressure) ascending by strike
    pub pressures: Vec<(f64, f64)>,
}

/// Stateless batch processor
#[derive(Debug, Clone, Default)]
pub struct GexPipeline {
    config: PipelineConfig,
}

impl GexPipeline {
    /// Create a pipeline with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Pipeline configured for a listed symbol
    pub fn for_symbol(symbol: &str) -> Self {
        Self::with_config(PipelineConfig::for_symbol(symbol))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process a batch end to end
    pub fn process(&self, batch: &RawBatch) -> ProcessOutcome {
        let merged = merge_batch(batch, self.config.session.offset());
        if merged.quotes.is_empty() {
            let reason = if batch.series.is_empty() {
                format!("no series for {} on {}", batch.symbol, batch.target_date)
            } else {
                format!(
                    "no usable records for {} on {} ({} dropped)",
                    batch.symbol,
                    batch.target_date,
                    merged.stats.dropped()
                )
            };
            tracing::warn!("{}", reason);
            return ProcessOutcome::NoData { reason };
        }

        let aggregator = ExposureAggregator::new(self.config.exposure.clone());
        let exposures = aggregator.aggregate_all(&merged.quotes);
        let mut records = compute_flows(exposures);
        fill_hedging_pressure(&mut records, self.config.session.pressure_scope);

        let Some(metadata) = build_metadata(batch, &records, merged.stats.dropped()) else {
            return ProcessOutcome::NoData {
                reason: "empty flow table".to_string(),
            };
        };

        tracing::info!(
            "Processed {} {}: {} records, {} strikes, {} timestamps ({})",
            metadata.symbol,
            metadata.date,
            metadata.total_records,
            metadata.strikes_count,
            metadata.timestamps_count,
            metadata.time_range()
        );
        if metadata.has_wide_spot_range(self.config.session.spot_variation_warn_pct) {
            tracing::warn!(
                "Spot varied {:.2}% over the session ({:.2} - {:.2})",
                metadata.spot_variation_pct,
                metadata.spot_min,
                metadata.spot_max
            );
        }

        ProcessOutcome::Data(Session { records, metadata })
    }

    /// Reduce the session at `timestamp`
    ///
    /// Uses the nearest available timestamp; `None` only for an empty session.
    pub fn snapshot(&self, session: &Session, timestamp: DateTime<FixedOffset>) -> Option<Snapshot> {
        let cross_section = session.nearest_cross_section(timestamp);
        let summary = summarize(&cross_section, &self.config.proximity)?;

        let detector = FlipZoneDetector::with_config(self.config.proximity.clone());
        let flip_zones = detector.detect(&cross_section, summary.spot);
        let pressures = cross_section
            .iter()
            .map(|r| (r.exposure.strike(), r.hedging_pressure))
            .collect();

        Some(Snapshot {
            summary,
            flip_zones,
            pressures,
        })
    }

    /// Reduce the session at its last timestamp
    pub fn latest_snapshot(&self, session: &Session) -> Option<Snapshot> {
        self.snapshot(session, session.latest_timestamp())
    }
}

fn build_metadata(
    batch: &RawBatch,
    records: &[FlowRecord],
    dropped_records: usize,
) -> Option<SessionMetadata> {
    let first = records.first()?;

    let mut latest = first;
    let mut first_timestamp = first.exposure.timestamp();
    let mut spot_min = f64::INFINITY;
    let mut spot_max = f64::NEG_INFINITY;
    let mut distinct_spots: HashSet<u64> = HashSet::new();
    let mut strikes: HashSet<StrikeKey> = HashSet::new();
    let mut timestamps: HashSet<DateTime<FixedOffset>> = HashSet::new();

    for r in records {
        let e = &r.exposure;
        let ts = e.timestamp();
        if ts >= latest.exposure.timestamp() {
            latest = r;
        }
        first_timestamp = first_timestamp.min(ts);
        spot_min = spot_min.min(e.spot());
        spot_max = spot_max.max(e.spot());
        distinct_spots.insert(e.spot().to_bits());
        strikes.insert(StrikeKey::new(e.strike()));
        timestamps.insert(ts);
    }

    let spot_mean =
        distinct_spots.iter().map(|&b| f64::from_bits(b)).sum::<f64>() / distinct_spots.len() as f64;
    let spot_variation_pct = if spot_mean > 0.0 {
        (spot_max - spot_min) / spot_mean * 100.0
    } else {
        0.0
    };

    Some(SessionMetadata {
        symbol: batch.symbol.clone(),
        date: batch.target_date,
        spot: latest.exposure.spot(),
        spot_min,
        spot_max,
        spot_variation_pct,
        total_records: records.len(),
        strikes_count: strikes.len(),
        timestamps_count: timestamps.len(),
        first_timestamp,
        last_timestamp: latest.exposure.timestamp(),
        interval_minutes: batch.interval_minutes,
        expiry_code: batch.expiry_code,
        dropped_records,
    })
}

/// Convenience function: process with the symbol's default configuration
pub fn process_batch(batch: &RawBatch) -> ProcessOutcome {
    GexPipeline::for_symbol(&batch.symbol).process(batch)
}
