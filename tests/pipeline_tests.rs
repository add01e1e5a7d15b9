//! End-to-end tests: raw batch JSON through to snapshots

use approx::assert_relative_eq;
use chrono::{NaiveDate, Timelike};
use gex_flow::prelude::*;
use serde_json::json;

// 2025-01-15 09:15 IST
const T0: i64 = 1_736_912_700;
const STEP: i64 = 15 * 60;

/// 3 strikes x 5 snapshots; put OI grows on the lowest strike, call OI on the
/// highest, and ATM leans slightly to puts so no strike nets to exactly zero
fn batch_json() -> String {
    let spots = [23_000.0, 23_015.0, 23_030.0, 23_010.0, 23_040.0];
    let strikes = [("ATM-1", 22_950.0), ("ATM", 23_000.0), ("ATM+1", 23_050.0)];

    let mut series = Vec::new();
    for (k, (label, strike)) in strikes.iter().enumerate() {
        for side in ["CE", "PE"] {
            let oi: Vec<f64> = (0..5)
                .map(|i| {
                    let base = 100_000.0;
                    match (side, k) {
                        ("PE", 0) => base * 3.0 + 20_000.0 * i as f64,
                        ("CE", 2) => base * 3.0 + 20_000.0 * i as f64,
                        ("PE", 1) => base * 1.1,
                        _ => base,
                    }
                })
                .collect();
            series.push(json!({
                "strike_label": label,
                "side": side,
                "timestamp": (0..5).map(|i| T0 + i * STEP).collect::<Vec<_>>(),
                "spot": spots,
                "strike": vec![*strike; 5],
                "oi": oi,
                "volume": vec![1_000.0; 5],
                "iv": vec![13.5; 5],
            }));
        }
    }

    json!({
        "symbol": "NIFTY",
        "target_date": "2025-01-15",
        "interval_minutes": 15,
        "expiry_code": 1,
        "series": series,
    })
    .to_string()
}

fn session() -> (GexPipeline, Session) {
    let batch = RawBatch::from_json(&batch_json()).unwrap();
    let pipeline = GexPipeline::for_symbol(&batch.symbol);
    let session = pipeline.process(&batch).into_session().unwrap();
    (pipeline, session)
}

#[test]
fn test_three_strikes_five_timestamps() {
    let (_, session) = session();
    let meta = &session.metadata;

    assert_eq!(session.records.len(), 15);
    assert_eq!(meta.total_records, 15);
    assert_eq!(meta.strikes_count, 3);
    assert_eq!(meta.timestamps_count, 5);
    assert_eq!(meta.symbol, "NIFTY");
    assert_eq!(meta.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    assert_eq!(meta.spot, 23_040.0);
    assert_eq!(meta.expiry_code, Some(1));
    assert_eq!(meta.first_timestamp.hour(), 9);
    assert_eq!(meta.first_timestamp.minute(), 15);

    for r in &session.records {
        let e = &r.exposure;
        assert_eq!(e.gex.net, e.gex.call + e.gex.put);
        assert_eq!(e.dex.net, e.dex.call + e.dex.put);
    }
}

#[test]
fn test_records_ordered_and_flows_differenced() {
    let (_, session) = session();

    let keys: Vec<(f64, i64)> = session
        .records
        .iter()
        .map(|r| (r.exposure.strike(), r.exposure.timestamp().timestamp()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    assert_eq!(keys, sorted);

    for strike in [22_950.0, 23_000.0, 23_050.0] {
        let history = session.strike_history(strike);
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].flow.gex, SideExposure::default());
        for pair in history.windows(2) {
            let (prev, cur) = (&pair[0].exposure, &pair[1].exposure);
            assert_eq!(pair[1].flow.gex.net, cur.gex.net - prev.gex.net);
            assert_eq!(pair[1].flow.dex.call, cur.dex.call - prev.dex.call);
        }
    }
}

#[test]
fn test_latest_snapshot() {
    let (pipeline, session) = session();
    let snapshot = pipeline.latest_snapshot(&session).unwrap();
    let s = &snapshot.summary;

    assert_eq!(s.timestamp, session.metadata.last_timestamp);
    assert_eq!(s.spot, 23_040.0);
    assert_eq!(s.all_strikes.strike_count, 3);
    // NIFTY strikes are 50 apart, all three lie within 3 intervals of spot
    assert_eq!(s.near_spot.strike_count, 3);
    assert_eq!(s.all_strikes.call_oi, 100_000 + 100_000 + 380_000);
    assert_eq!(s.all_strikes.put_oi, 380_000 + 110_000 + 100_000);
    assert_relative_eq!(s.all_strikes.put_call_ratio, 590_000.0 / 580_000.0);

    // Lowest strike is put-heavy, highest call-heavy: net GEX flips once going up
    assert_eq!(snapshot.flip_zones.zones.len(), 1);
    let zone = &snapshot.flip_zones.zones[0];
    assert_eq!(zone.flip_type, FlipType::NegativeToPositive);
    assert_eq!(zone.direction, FlipDirection::Downward);
    assert!(zone.flip_strike > 22_950.0 && zone.flip_strike < 23_050.0);
    assert_eq!(snapshot.flip_zones.strike_spacing, 50.0);

    // Pressure is scaled against the whole session, not this snapshot
    assert_eq!(snapshot.pressures.len(), 3);
    for (_, p) in &snapshot.pressures {
        assert!(p.abs() <= 100.0 + 1e-9);
    }
    let session_max = session
        .records
        .iter()
        .map(|r| r.hedging_pressure.abs())
        .fold(0.0, f64::max);
    assert_relative_eq!(session_max, 100.0, epsilon = 1e-9);
}

#[test]
fn test_pressure_scope_from_config() {
    let batch = RawBatch::from_json(&batch_json()).unwrap();
    let config =
        PipelineConfig::from_json(r#"{"session": {"pressure_scope": "timestamp"}}"#).unwrap();
    let pipeline = GexPipeline::with_config(config);
    let session = pipeline.process(&batch).into_result().unwrap();

    for ts in session.timestamps() {
        let peak = session
            .cross_section(ts)
            .iter()
            .map(|r| r.hedging_pressure.abs())
            .fold(0.0, f64::max);
        assert_relative_eq!(peak, 100.0, epsilon = 1e-9);
    }
}

#[test]
fn test_timeline_and_averages() {
    let (_, session) = session();
    let points = session.timeline();
    assert_eq!(points.len(), 5);
    assert_eq!(points[0].net_gex_flow, 0.0);
    assert_eq!(points[0].spot, 23_000.0);

    let averages = session.session_averages(12);
    assert!(averages.morning.is_some());
    assert!(averages.afternoon.is_none());
}

#[test]
fn test_misaligned_and_unpaired_are_dropped() {
    let mut batch = RawBatch::from_json(&batch_json()).unwrap();
    // Shift one put timestamp at index 2 of the ATM strike
    for s in batch.series.iter_mut() {
        if s.strike_label == "ATM" && s.side == OptionSide::Put {
            s.timestamp[2] += 60;
        }
    }
    // A call-only label
    let mut orphan = batch.series[0].clone();
    orphan.strike_label = "ATM+2".to_string();
    orphan.side = OptionSide::Call;
    batch.push(orphan);

    let session = GexPipeline::new().process(&batch).into_session().unwrap();
    assert_eq!(session.metadata.total_records, 14);
    assert_eq!(session.metadata.strikes_count, 3);
    assert_eq!(session.metadata.dropped_records, 1 + 5);
}

#[test]
fn test_no_data_outcomes() {
    let empty = RawBatch::new("BANKNIFTY", NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    assert!(process_batch(&empty).is_no_data());

    let mut other_day = RawBatch::from_json(&batch_json()).unwrap();
    other_day.target_date = NaiveDate::from_ymd_opt(2025, 1, 14).unwrap();
    let outcome = GexPipeline::new().process(&other_day);
    assert!(outcome.session().is_none());
    assert!(matches!(outcome.into_result(), Err(GexError::Data(_))));
}

#[test]
fn test_invalid_batch_json_is_an_error() {
    let err = RawBatch::from_json("{\"symbol\": 5}");
    assert!(matches!(err, Err(GexError::Serialization(_))));
}
