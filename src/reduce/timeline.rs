//! Temporal reduction over a session

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::PressureScope;
use crate::core::FlowRecord;
use crate::exposure::StrikeKey;

/// Aggregates of one timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub timestamp: DateTime<FixedOffset>,
    /// Spot of the first record at this timestamp
    pub spot: f64,
    pub net_gex: f64,
    pub net_dex: f64,
    pub net_gex_flow: f64,
    pub net_dex_flow: f64,
}

/// Per-timestamp sums, ascending by timestamp
pub fn timeline(records: &[FlowRecord]) -> Vec<TimelinePoint> {
    let mut points: BTreeMap<DateTime<FixedOffset>, TimelinePoint> = BTreeMap::new();

    for r in records {
        let e = &r.exposure;
        let point = points
            .entry(e.timestamp())
            .or_insert_with(|| TimelinePoint {
                timestamp: e.timestamp(),
                spot: e.spot(),
                net_gex: 0.0,
                net_dex: 0.0,
                net_gex_flow: 0.0,
                net_dex_flow: 0.0,
            });
        point.net_gex += e.gex.net;
        point.net_dex += e.dex.net;
        point.net_gex_flow += r.flow.gex.net;
        point.net_dex_flow += r.flow.dex.net;
    }

    points.into_values().collect()
}

/// Mean per-timestamp net GEX before and after the afternoon boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionAverages {
    /// Local hour < boundary; None without such timestamps
    pub morning: Option<f64>,
    /// Local hour >= boundary; None without such timestamps
    pub afternoon: Option<f64>,
}

/// Split the timeline at `boundary_hour` (exchange-local) and average each half
pub fn session_averages(points: &[TimelinePoint], boundary_hour: u32) -> SessionAverages {
    let (morning, afternoon): (Vec<&TimelinePoint>, Vec<&TimelinePoint>) = points
        .iter()
        .partition(|p| p.timestamp.hour() < boundary_hour);

    SessionAverages {
        morning: mean(morning.iter().map(|p| p.net_gex)),
        afternoon: mean(afternoon.iter().map(|p| p.net_gex)),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Hedging pressure of a cross-section's net GEX values
///
/// `net_gex / max|net_gex| · 100`, so values lie in [-100, 100]. All zeros
/// when the maximum magnitude is 0.
pub fn hedging_pressure(net_gex: &[f64]) -> Vec<f64> {
    let max_abs = net_gex
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, |m, v| m.max(v.abs()));

    if max_abs > 0.0 {
        net_gex
            .iter()
            .map(|v| if v.is_finite() { v / max_abs * 100.0 } else { 0.0 })
            .collect()
    } else {
        vec![0.0; net_gex.len()]
    }
}

/// Fill `hedging_pressure` on every record
///
/// With [`PressureScope::Session`] every record is scaled against the
/// session's peak |net GEX|; with [`PressureScope::Timestamp`] each
/// timestamp's cross-section is scaled on its own.
pub fn fill_hedging_pressure(records: &mut [FlowRecord], scope: PressureScope) {
    if scope == PressureScope::Session {
        let net_gex: Vec<f64> = records.iter().map(|r| r.exposure.gex.net).collect();
        for (r, pressure) in records.iter_mut().zip(hedging_pressure(&net_gex)) {
            r.hedging_pressure = pressure;
        }
        return;
    }

    let mut by_timestamp: BTreeMap<DateTime<FixedOffset>, Vec<usize>> = BTreeMap::new();
    for (i, r) in records.iter().enumerate() {
        by_timestamp.entry(r.exposure.timestamp()).or_default().push(i);
    }

    for indices in by_timestamp.values() {
        let net_gex: Vec<f64> = indices.iter().map(|&i| records[i].exposure.gex.net).collect();
        for (&i, pressure) in indices.iter().zip(hedging_pressure(&net_gex)) {
            records[i].hedging_pressure = pressure;
        }
    }
}

/// Chronological records of one strike
pub fn strike_history(records: &[FlowRecord], strike: f64) -> Vec<&FlowRecord> {
    let key = StrikeKey::new(strike);
    let mut history: Vec<&FlowRecord> = records
        .iter()
        .filter(|r| StrikeKey::new(r.exposure.strike()) == key)
        .collect();
    history.sort_by_key(|r| r.exposure.timestamp());
    history
}

/// Timestamp closest to `target`; the earlier one on a tie
pub fn nearest_timestamp(
    timestamps: &[DateTime<FixedOffset>],
    target: DateTime<FixedOffset>,
) -> Option<DateTime<FixedOffset>> {
    timestamps
        .iter()
        .copied()
        .min_by_key(|ts| ((*ts - target).num_milliseconds().unsigned_abs(), *ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExposureRecord, FlowFields, QuoteRecord, SideExposure};
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(19_800)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 15, hour, minute, 0)
            .unwrap()
    }

    fn flow_record(ts: DateTime<FixedOffset>, strike: f64, spot: f64, gex: f64) -> FlowRecord {
        FlowRecord {
            exposure: ExposureRecord {
                quote: QuoteRecord {
                    timestamp: ts,
                    strike_label: "ATM".into(),
                    spot,
                    strike,
                    call_oi: 0,
                    put_oi: 0,
                    call_volume: 0,
                    put_volume: 0,
                    call_iv: 0.0,
                    put_iv: 0.0,
                },
                gex: SideExposure::new(gex, 0.0),
                dex: SideExposure::new(gex * 2.0, 0.0),
                vanna: None,
                charm: None,
            },
            flow: FlowFields {
                gex: SideExposure::new(1.0, 0.0),
                dex: SideExposure::new(-1.0, 0.0),
                vanna: None,
                charm: None,
            },
            hedging_pressure: 0.0,
        }
    }

    #[test]
    fn test_hedging_pressure_scaling() {
        assert_eq!(hedging_pressure(&[-50.0, 0.0, 50.0]), vec![-100.0, 0.0, 100.0]);
        assert_eq!(hedging_pressure(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(hedging_pressure(&[2.0, -1.0]), vec![100.0, -50.0]);
        assert!(hedging_pressure(&[]).is_empty());
    }

    fn two_snapshots() -> Vec<FlowRecord> {
        vec![
            flow_record(at(10, 0), 100.0, 100.0, 4.0),
            flow_record(at(10, 0), 110.0, 100.0, -2.0),
            flow_record(at(10, 15), 100.0, 100.0, 1.0),
            flow_record(at(10, 15), 110.0, 100.0, -0.5),
        ]
    }

    #[test]
    fn test_fill_against_session_peak() {
        let mut records = two_snapshots();
        fill_hedging_pressure(&mut records, PressureScope::Session);
        let pressures: Vec<f64> = records.iter().map(|r| r.hedging_pressure).collect();
        // The quieter 10:15 snapshot stays well inside ±100
        assert_eq!(pressures, vec![100.0, -50.0, 25.0, -12.5]);
    }

    #[test]
    fn test_fill_per_timestamp() {
        let mut records = two_snapshots();
        fill_hedging_pressure(&mut records, PressureScope::Timestamp);
        let pressures: Vec<f64> = records.iter().map(|r| r.hedging_pressure).collect();
        assert_eq!(pressures, vec![100.0, -50.0, 100.0, -50.0]);
    }

    #[test]
    fn test_timeline_sums_and_first_spot() {
        let records = vec![
            flow_record(at(10, 15), 100.0, 101.0, 1.0),
            flow_record(at(10, 0), 100.0, 100.0, 1.0),
            flow_record(at(10, 0), 110.0, 100.5, 2.0),
        ];
        let points = timeline(&records);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].timestamp, at(10, 0));
        assert_eq!(points[0].spot, 100.0);
        assert_eq!(points[0].net_gex, 3.0);
        assert_eq!(points[0].net_dex, 6.0);
        assert_eq!(points[0].net_gex_flow, 2.0);
        assert_eq!(points[0].net_dex_flow, -2.0);
        assert_eq!(points[1].spot, 101.0);
    }

    #[test]
    fn test_session_averages() {
        let records = vec![
            flow_record(at(9, 30), 100.0, 100.0, 1.0),
            flow_record(at(11, 45), 100.0, 100.0, 3.0),
            flow_record(at(12, 0), 100.0, 100.0, -4.0),
        ];
        let averages = session_averages(&timeline(&records), 12);
        assert_eq!(averages.morning, Some(2.0));
        assert_eq!(averages.afternoon, Some(-4.0));

        let morning_only = session_averages(&timeline(&records[..2]), 12);
        assert_eq!(morning_only.afternoon, None);
    }

    #[test]
    fn test_strike_history() {
        let records = vec![
            flow_record(at(10, 15), 100.0, 100.0, 2.0),
            flow_record(at(10, 0), 110.0, 100.0, 9.0),
            flow_record(at(10, 0), 100.0, 100.0, 1.0),
        ];
        let history = strike_history(&records, 100.0);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].exposure.timestamp(), at(10, 0));
        assert_eq!(history[1].exposure.gex.net, 2.0);
        assert!(strike_history(&records, 120.0).is_empty());
    }

    #[test]
    fn test_nearest_timestamp() {
        let timestamps = vec![at(10, 0), at(10, 15), at(10, 30)];
        assert_eq!(nearest_timestamp(&timestamps, at(10, 20)), Some(at(10, 15)));
        assert_eq!(nearest_timestamp(&timestamps, at(11, 0)), Some(at(10, 30)));
        // Equidistant: earlier wins
        assert_eq!(nearest_timestamp(&timestamps, at(10, 7) + chrono::Duration::seconds(30)), Some(at(10, 0)));
        assert_eq!(nearest_timestamp(&[], at(10, 0)), None);
    }
}
