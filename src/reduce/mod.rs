//! Reductions over flow records
//!
//! - **Snapshot**: one timestamp's cross-section reduced to totals, flow
//!   split, signal labels and the peak hedging-pressure strike
//! - **Timeline**: per-timestamp sums, morning/afternoon averages, hedging
//!   pressure, single-strike history and timestamp selection

mod snapshot;
mod timeline;

pub use snapshot::*;
pub use timeline::*;
