//! Raw quote feed merging
//!
//! The retrieval layer delivers one series per (strike label, side) with
//! parallel arrays. This module converts those into [`QuoteRecord`]s:
//! - epoch seconds (UTC) to exchange-local time
//! - keep only the target trading date
//! - merge call and put arrays by index position
//! - drop misaligned or invalid entries (never interpolate)

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::{GexResult, OptionSide, QuoteRecord};

/// Parallel arrays for one strike label and one side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSideSeries {
    /// Strike label, e.g. "ATM", "ATM-1"
    pub strike_label: String,
    pub side: OptionSide,
    /// Epoch seconds, UTC
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub spot: Vec<f64>,
    #[serde(default)]
    pub strike: Vec<f64>,
    #[serde(default)]
    pub oi: Vec<f64>,
    #[serde(default)]
    pub volume: Vec<f64>,
    #[serde(default)]
    pub iv: Vec<f64>,
}

impl RawSideSeries {
    pub fn len(&self) -> usize {
        self.timestamp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamp.is_empty()
    }
}

/// One fetch: a symbol, a trading date and the raw series for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBatch {
    pub symbol: String,
    /// Trading date in exchange-local time
    pub target_date: NaiveDate,
    /// Sampling interval of the feed in minutes
    #[serde(default)]
    pub interval_minutes: Option<u32>,
    /// Feed expiry selector (1 = nearest)
    #[serde(default)]
    pub expiry_code: Option<u32>,
    #[serde(default)]
    pub series: Vec<RawSideSeries>,
}

impl RawBatch {
    pub fn new(symbol: impl Into<String>, target_date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            target_date,
            interval_minutes: None,
            expiry_code: None,
            series: Vec::new(),
        }
    }

    /// Parse a batch from JSON
    pub fn from_json(json: &str) -> GexResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add one raw series
    pub fn push(&mut self, series: RawSideSeries) {
        self.series.push(series);
    }

    /// Strike labels in first-seen order
    pub fn strike_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for s in &self.series {
            if !labels.contains(&s.strike_label.as_str()) {
                labels.push(&s.strike_label);
            }
        }
        labels
    }

    fn find(&self, label: &str, side: OptionSide) -> Option<&RawSideSeries> {
        self.series
            .iter()
            .find(|s| s.strike_label == label && s.side == side)
    }
}

/// Counters describing what the merge kept and dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedStats {
    /// Records produced
    pub merged: usize,
    /// Entries outside the target trading date
    pub outside_date: usize,
    /// Entries with no partner at the same index and timestamp
    pub misaligned: usize,
    /// Entries with zero/negative spot or strike, or bad OI/volume/IV values
    pub invalid: usize,
    /// Call entries whose strike label has no put series (or vice versa)
    pub unpaired: usize,
}

impl FeedStats {
    /// Entries dropped for data-quality reasons (date filtering excluded)
    pub fn dropped(&self) -> usize {
        self.misaligned + self.invalid + self.unpaired
    }
}

/// Output of [`merge_batch`]
#[derive(Debug, Clone, Default)]
pub struct MergedQuotes {
    pub quotes: Vec<QuoteRecord>,
    pub stats: FeedStats,
}

/// Merge a raw batch into quote records in exchange-local time
pub fn merge_batch(batch: &RawBatch, offset: FixedOffset) -> MergedQuotes {
    let mut merged = MergedQuotes::default();

    for label in batch.strike_labels() {
        let call = batch.find(label, OptionSide::Call);
        let put = batch.find(label, OptionSide::Put);

        let (call, put) = match (call, put) {
            (Some(c), Some(p)) => (c, p),
            (Some(c), None) => {
                tracing::warn!("Strike {} has call data but no put series", label);
                merged.stats.unpaired += c.len();
                continue;
            }
            (None, Some(p)) => {
                tracing::warn!("Strike {} has put data but no call series", label);
                merged.stats.unpaired += p.len();
                continue;
            }
            (None, None) => continue,
        };

        // Put entries past the end of the call series have no partner
        merged.stats.misaligned += put.len().saturating_sub(call.len());

        for i in 0..call.len() {
            let ts = call.timestamp[i];
            let Some(local) = to_local(ts, offset) else {
                merged.stats.invalid += 1;
                continue;
            };

            if local.date_naive() != batch.target_date {
                merged.stats.outside_date += 1;
                continue;
            }

            if put.timestamp.get(i) != Some(&ts) {
                merged.stats.misaligned += 1;
                continue;
            }

            match merge_entry(label, local, call, put, i) {
                Some(quote) => {
                    merged.quotes.push(quote);
                    merged.stats.merged += 1;
                }
                None => merged.stats.invalid += 1,
            }
        }
    }

    tracing::debug!(
        "Merged {} quotes for {} ({} outside date, {} misaligned, {} invalid, {} unpaired)",
        merged.stats.merged,
        batch.symbol,
        merged.stats.outside_date,
        merged.stats.misaligned,
        merged.stats.invalid,
        merged.stats.unpaired
    );

    merged
}

/// Epoch seconds to exchange-local time
pub fn to_local(epoch_seconds: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(epoch_seconds, 0).map(|utc| utc.with_timezone(&offset))
}

/// Build one quote from index `i` of a call/put pair; None if any field is unusable
fn merge_entry(
    label: &str,
    timestamp: DateTime<FixedOffset>,
    call: &RawSideSeries,
    put: &RawSideSeries,
    i: usize,
) -> Option<QuoteRecord> {
    let quote = QuoteRecord {
        timestamp,
        strike_label: label.to_string(),
        spot: *call.spot.get(i)?,
        strike: *call.strike.get(i)?,
        call_oi: to_count(*call.oi.get(i)?)?,
        put_oi: to_count(*put.oi.get(i)?)?,
        call_volume: to_count(*call.volume.get(i)?)?,
        put_volume: to_count(*put.volume.get(i)?)?,
        call_iv: *call.iv.get(i)?,
        put_iv: *put.iv.get(i)?,
    };

    quote.is_valid().then_some(quote)
}

/// Feed counts arrive as floats; reject negative and non-finite values
fn to_count(x: f64) -> Option<u64> {
    if x.is_finite() && x >= 0.0 {
        Some(x.round() as u64)
    } else {
        None
    }
}
