//! Exposure and flow computation
//!
//! Two-stage transform over a batch of quote records:
//! 1. **Aggregation**: Greeks per leg, dollarized into GEX / DEX (and
//!    optionally vanna / charm) exposure
//! 2. **Differencing**: per-strike change between consecutive timestamps

mod aggregator;
mod flow;

pub use aggregator::*;
pub use flow::*;
