//! Flow Differencer
//!
//! Flow is the change of each exposure field between consecutive
//! timestamps of the same strike. State is an explicit map from strike to the
//! last record seen, so the same tracker serves a whole batch or a live
//! stream of records.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::{ExposureRecord, FlowFields, FlowRecord};

/// Hashable, ordered key for a strike price
///
/// Strikes are positive, and positive IEEE-754 doubles order the same way
/// as their bit patterns, so the key sorts like the strike itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StrikeKey(u64);

impl StrikeKey {
    pub fn new(strike: f64) -> Self {
        // Collapse -0.0 onto 0.0
        Self((strike + 0.0).to_bits())
    }

    pub fn strike(&self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl From<f64> for StrikeKey {
    fn from(strike: f64) -> Self {
        Self::new(strike)
    }
}

/// Per-strike "last seen" state
#[derive(Debug, Clone, Default)]
pub struct FlowTracker {
    last: HashMap<StrikeKey, ExposureRecord>,
}

impl FlowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `record` against the previous record of its strike and remember it
    ///
    /// Records of one strike must arrive in ascending timestamp order. The
    /// first record of a strike gets zero flows. Hedging pressure is left at
    /// 0; it depends on the whole cross-section and is filled in later.
    pub fn push(&mut self, record: ExposureRecord) -> FlowRecord {
        let key = StrikeKey::new(record.strike());
        let flow = match self.last.get(&key) {
            Some(previous) => FlowFields::between(&record, previous),
            None => FlowFields::zero_for(&record),
        };
        self.last.insert(key, record.clone());

        FlowRecord {
            exposure: record,
            flow,
            hedging_pressure: 0.0,
        }
    }

    /// Number of strikes seen so far
    pub fn strikes_seen(&self) -> usize {
        self.last.len()
    }
}

/// Compute flows for a whole batch
///
/// Groups records by strike, sorts each group by timestamp ascending and
/// differences within the group only. Output is ordered by strike, then by
/// timestamp.
pub fn compute_flows(records: Vec<ExposureRecord>) -> Vec<FlowRecord> {
    let mut by_strike: BTreeMap<StrikeKey, Vec<ExposureRecord>> = BTreeMap::new();
    for record in records {
        by_strike
            .entry(StrikeKey::new(record.strike()))
            .or_default()
            .push(record);
    }

    let mut tracker = FlowTracker::new();
    let mut flows = Vec::new();

    for (_, mut group) in by_strike {
        // Stable: ties keep input order
        group.sort_by_key(|r| r.timestamp());
        flows.extend(group.into_iter().map(|r| tracker.push(r)));
    }

    flows
}
