//! Quote feed input
//!
//! Handles:
//! - Raw per-strike, per-side series from the retrieval layer
//! - Merging into per-strike quote records in exchange-local time
//! - Contract specifications for index underlyings

pub mod feed;
pub mod symbols;

pub use feed::*;
pub use symbols::*;
