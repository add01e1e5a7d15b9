//! Core data types for GEX flow analytics
//!
//! Defines fundamental types:
//! - OptionSide: call or put leg
//! - QuoteRecord: merged call/put quote at one strike and timestamp
//! - ExposureRecord / FlowRecord: dollarized exposures and their flows
//! - Greeks: Black-Scholes sensitivities used for exposure

pub mod error;
pub mod exposure;
pub mod greeks;
pub mod option;
pub mod quote;

pub use error::*;
pub use exposure::*;
pub use greeks::*;
pub use option::*;
pub use quote::*;
