//! # GEX Flow - Dealer Exposure Analytics
//!
//! Computes Gamma Exposure (GEX), Delta Exposure (DEX) and optional
//! Vanna/Charm exposure per strike from an intraday series of index option
//! quotes, tracks how each changes between snapshots (flow), and locates the
//! strikes where aggregate GEX changes sign (gamma flip zones).
//!
//! ## Overview
//!
//! Raw per-strike call and put series are merged into quote records,
//! dollarized through Black-Scholes Greeks, differenced per strike and
//! reduced per timestamp:
//!
//! - **Positive net GEX**: dealers long gamma, moves are suppressed
//! - **Negative net GEX**: dealers short gamma, moves are amplified
//! - **Flip zone**: the interpolated strike between the two regimes
//!
//! ## Key Components
//!
//! - **Data**: raw feed merge (IST clock, date filter, call/put pairing), symbol registry
//! - **Black-Scholes**: gamma, delta, vanna, charm
//! - **Exposure**: per-strike GEX/DEX and per-strike flows
//! - **Levels**: gamma flip zone detection
//! - **Reduce**: snapshot totals, signals, timeline, hedging pressure
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gex_flow::prelude::*;
//!
//! let json = std::fs::read_to_string("batch.json").unwrap();
//! let batch = RawBatch::from_json(&json).unwrap();
//!
//! let pipeline = GexPipeline::for_symbol(&batch.symbol);
//! if let ProcessOutcome::Data(session) = pipeline.process(&batch) {
//!     let snapshot = pipeline.latest_snapshot(&session).unwrap();
//!     println!("Net GEX: {:.4}B", snapshot.summary.all_strikes.net_gex);
//!     for zone in &snapshot.flip_zones.zones {
//!         println!("{}", zone.tooltip());
//!     }
//! }
//! ```
//!
//! ## Modelling Assumptions
//!
//! - Every record is valued with the same time to expiry (7 days by
//!   default, see [`config::ExposureConfig`]), whatever contract it belongs to
//! - Dealers are assumed long calls and short puts, so put GEX is negative
//! - Implied volatility above 1 is read as a percentage
//!
//! ## What This Crate Does NOT Do
//!
//! - Fetch data or retry requests
//! - Render charts or manage UI state
//! - Cache batches between calls

pub mod config;
pub mod core;
pub mod data;
pub mod exposure;
pub mod levels;
pub mod models;
pub mod pipeline;
pub mod reduce;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        AsExposure, ExposureRecord, FlowFields, FlowRecord, GexError, GexResult, Greeks,
        OptionSide, QuoteRecord, SideExposure,
    };

    // Configuration
    pub use crate::config::{
        ExposureConfig, PipelineConfig, PressureScope, ProximityConfig, SessionConfig,
    };

    // Feed
    pub use crate::data::{merge_batch, FeedStats, RawBatch, RawSideSeries, SymbolSpec};

    // Models
    pub use crate::models::{greeks as bs_greeks, norm_cdf, norm_pdf};

    // Exposure
    pub use crate::exposure::{compute_exposure, compute_flows, ExposureAggregator, FlowTracker};

    // Flip zones
    pub use crate::levels::{
        detect_flip_zones, FlipDirection, FlipType, FlipZone, FlipZoneDetector, FlipZoneResult,
        SpotPosition,
    };

    // Reductions
    pub use crate::reduce::{
        hedging_pressure, ExposureTotals, FlowRegime, FlowTotals, SessionAverages, Signals,
        SnapshotSummary, TimelinePoint,
    };

    // Pipeline
    pub use crate::pipeline::{
        process_batch, GexPipeline, ProcessOutcome, Session, SessionMetadata, Snapshot,
    };
}

// Re-export main types at crate root
pub use crate::core::{GexError, GexResult};
pub use crate::pipeline::{GexPipeline, ProcessOutcome};
