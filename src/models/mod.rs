//! Pricing Models
//!
//! Implements:
//! - Black-Scholes closed-form Greeks (gamma, delta, vanna, charm)

pub mod black_scholes;

pub use black_scholes::*;
