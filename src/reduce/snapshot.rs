//! Cross-sectional reduction of one timestamp

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::config::ProximityConfig;
use crate::core::{AsExposure, FlowRecord};
use crate::levels::{resolve_strike_spacing, within_band};

/// Put/call ratio above which sentiment is bearish
pub const PCR_BEARISH_ABOVE: f64 = 1.2;
/// Put/call ratio below which sentiment is bullish
pub const PCR_BULLISH_BELOW: f64 = 0.8;

/// Summed exposure over a set of strikes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureTotals {
    pub net_gex: f64,
    pub net_dex: f64,
    /// net_gex + net_dex
    pub combined: f64,
    pub call_oi: u64,
    pub put_oi: u64,
    /// put OI / call OI; exactly 1 when call OI is 0
    pub put_call_ratio: f64,
    /// Sum of strictly positive per-strike net GEX
    pub positive_gex: f64,
    /// Sum of strictly negative per-strike net GEX
    pub negative_gex: f64,
    pub positive_dex: f64,
    pub negative_dex: f64,
    pub strike_count: usize,
}

impl ExposureTotals {
    pub fn from_records<R: AsExposure>(records: &[R]) -> Self {
        let mut totals = Self::default();

        for r in records {
            let e = r.exposure();
            let (gex, dex) = (e.gex.net, e.dex.net);

            totals.net_gex += gex;
            totals.net_dex += dex;
            totals.call_oi = totals.call_oi.saturating_add(e.quote.call_oi);
            totals.put_oi = totals.put_oi.saturating_add(e.quote.put_oi);

            if gex > 0.0 {
                totals.positive_gex += gex;
            } else if gex < 0.0 {
                totals.negative_gex += gex;
            }
            if dex > 0.0 {
                totals.positive_dex += dex;
            } else if dex < 0.0 {
                totals.negative_dex += dex;
            }
        }

        totals.combined = totals.net_gex + totals.net_dex;
        totals.put_call_ratio = put_call_ratio(totals.call_oi, totals.put_oi);
        totals.strike_count = records.len();
        totals
    }
}

/// Put OI over call OI, or exactly 1 without call OI
pub fn put_call_ratio(call_oi: u64, put_oi: u64) -> f64 {
    if call_oi > 0 {
        put_oi as f64 / call_oi as f64
    } else {
        1.0
    }
}

/// Combined reading of GEX and DEX flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowRegime {
    BullishLowVol,
    BullishHighVol,
    BearishLowVol,
    BearishHighVol,
}

impl FlowRegime {
    /// Classify from net GEX flow and net DEX flow
    pub fn classify(gex_flow: f64, dex_flow: f64) -> Self {
        if gex_flow > 0.0 && dex_flow > 0.0 {
            FlowRegime::BullishLowVol
        } else if gex_flow < 0.0 && dex_flow > 0.0 {
            FlowRegime::BullishHighVol
        } else if gex_flow > 0.0 && dex_flow < 0.0 {
            FlowRegime::BearishLowVol
        } else {
            FlowRegime::BearishHighVol
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlowRegime::BullishLowVol => "Bullish + Low Vol",
            FlowRegime::BullishHighVol => "Bullish + High Vol",
            FlowRegime::BearishLowVol => "Bearish + Low Vol",
            FlowRegime::BearishHighVol => "Bearish + High Vol",
        }
    }
}

/// Inflow / outflow split of the flow columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowTotals {
    /// Sum of positive net GEX flow
    pub gex_inflow: f64,
    /// Sum of negative net GEX flow
    pub gex_outflow: f64,
    pub gex_net: f64,
    pub dex_inflow: f64,
    pub dex_outflow: f64,
    pub dex_net: f64,
    pub regime: FlowRegime,
}

impl FlowTotals {
    pub fn from_records(records: &[FlowRecord]) -> Self {
        let (gex_inflow, gex_outflow) = split_sum(records.iter().map(|r| r.flow.gex.net));
        let (dex_inflow, dex_outflow) = split_sum(records.iter().map(|r| r.flow.dex.net));
        let gex_net = gex_inflow + gex_outflow;
        let dex_net = dex_inflow + dex_outflow;

        Self {
            gex_inflow,
            gex_outflow,
            gex_net,
            dex_inflow,
            dex_outflow,
            dex_net,
            regime: FlowRegime::classify(gex_net, dex_net),
        }
    }
}

/// (sum of positives, sum of negatives)
fn split_sum(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((0.0, 0.0), |(pos, neg), v| {
        if v > 0.0 {
            (pos + v, neg)
        } else if v < 0.0 {
            (pos, neg + v)
        } else {
            (pos, neg)
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GexRegime {
    /// Dealers long gamma, moves dampened
    Suppression,
    /// Dealers short gamma, moves amplified
    Amplification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DexBias {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PcrSentiment {
    Bullish,
    Neutral,
    Bearish,
}

/// Headline labels derived from the totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signals {
    pub gex_regime: GexRegime,
    pub dex_bias: DexBias,
    pub pcr_sentiment: PcrSentiment,
}

impl Signals {
    pub fn from_totals(totals: &ExposureTotals) -> Self {
        let gex_regime = if totals.net_gex > 0.0 {
            GexRegime::Suppression
        } else {
            GexRegime::Amplification
        };
        let dex_bias = if totals.net_dex > 0.0 {
            DexBias::Bullish
        } else {
            DexBias::Bearish
        };
        let pcr_sentiment = if totals.put_call_ratio > PCR_BEARISH_ABOVE {
            PcrSentiment::Bearish
        } else if totals.put_call_ratio < PCR_BULLISH_BELOW {
            PcrSentiment::Bullish
        } else {
            PcrSentiment::Neutral
        };

        Self {
            gex_regime,
            dex_bias,
            pcr_sentiment,
        }
    }
}

/// Everything the headline view shows for one timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub timestamp: DateTime<FixedOffset>,
    /// Spot of the first record at this timestamp
    pub spot: f64,
    /// Totals over every strike
    pub all_strikes: ExposureTotals,
    /// Totals over strikes within the proximity band of spot
    pub near_spot: ExposureTotals,
    pub flows: FlowTotals,
    /// Labels from the all-strike totals
    pub signals: Signals,
    /// Strike with the largest absolute hedging pressure
    pub max_pressure_strike: Option<f64>,
}

/// Reduce one timestamp's cross-section
///
/// Returns `None` for an empty cross-section. The records are expected to
/// share a timestamp; the first record supplies timestamp and spot.
pub fn summarize(cross_section: &[FlowRecord], config: &ProximityConfig) -> Option<SnapshotSummary> {
    let first = cross_section.first()?;
    let timestamp = first.exposure.timestamp();
    let spot = first.exposure.spot();

    let strikes: Vec<f64> = {
        let mut s: Vec<f64> = cross_section.iter().map(|r| r.exposure.strike()).collect();
        s.sort_by(|a, b| a.total_cmp(b));
        s
    };
    let spacing = resolve_strike_spacing(&strikes, config);

    let band: Vec<&FlowRecord> = cross_section
        .iter()
        .filter(|r| within_band(r.exposure.strike(), spot, spacing, config))
        .collect();

    let all_strikes = ExposureTotals::from_records(cross_section);
    let near_spot = ExposureTotals::from_records(&band);
    let signals = Signals::from_totals(&all_strikes);

    Some(SnapshotSummary {
        timestamp,
        spot,
        all_strikes,
        near_spot,
        flows: FlowTotals::from_records(cross_section),
        signals,
        max_pressure_strike: max_pressure_strike(cross_section),
    })
}

/// Strike whose hedging pressure has the largest magnitude
///
/// Ties resolve to the first such record in input order.
pub fn max_pressure_strike(cross_section: &[FlowRecord]) -> Option<f64> {
    let mut best: Option<&FlowRecord> = None;
    for r in cross_section {
        match best {
            Some(b) if r.hedging_pressure.abs() <= b.hedging_pressure.abs() => {}
            _ => best = Some(r),
        }
    }
    best.map(|r| r.exposure.strike())
}
