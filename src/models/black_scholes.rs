//! Black-Scholes Greek Engine
//!
//! Closed-form sensitivities used to dollarize open interest:
//! - Gamma
//! - Call / put delta
//! - Vanna
//! - Charm
//!
//! Every function is pure. When the model is inapplicable (T <= 0, vol <= 0,
//! spot <= 0, strike <= 0, or any non-finite input) the result is exactly 0.
//! A zero therefore means "model inapplicable", never "unknown".

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf::erfc;

use crate::core::Greeks;

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Whether the Black-Scholes inputs are inside the model's domain
pub fn is_applicable(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> bool {
    // Written as positive comparisons so NaN falls through to `false`
    spot > 0.0
        && strike > 0.0
        && time > 0.0
        && vol > 0.0
        && spot.is_finite()
        && strike.is_finite()
        && time.is_finite()
        && vol.is_finite()
        && rate.is_finite()
}

/// Black-Scholes d1 parameter (no dividend yield)
///
/// Callers must check [`is_applicable`] first.
pub fn d1(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    d1(spot, strike, time, rate, vol) - vol * time.sqrt()
}

/// Gamma (same for call and put)
pub fn gamma(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    if !is_applicable(spot, strike, time, rate, vol) {
        return 0.0;
    }
    let d1 = d1(spot, strike, time, rate, vol);
    finite_or_zero(norm_pdf(d1) / (spot * vol * time.sqrt()))
}

/// Call delta: Φ(d1)
pub fn call_delta(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    if !is_applicable(spot, strike, time, rate, vol) {
        return 0.0;
    }
    finite_or_zero(norm_cdf(d1(spot, strike, time, rate, vol)))
}

/// Put delta: Φ(d1) - 1
pub fn put_delta(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    if !is_applicable(spot, strike, time, rate, vol) {
        return 0.0;
    }
    finite_or_zero(norm_cdf(d1(spot, strike, time, rate, vol)) - 1.0)
}

/// Vanna: d(delta)/d(vol) = -φ(d1) d2 / σ
pub fn vanna(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    if !is_applicable(spot, strike, time, rate, vol) {
        return 0.0;
    }
    let d1 = d1(spot, strike, time, rate, vol);
    let d2 = d1 - vol * time.sqrt();
    finite_or_zero(-norm_pdf(d1) * d2 / vol)
}

/// Charm: d(delta)/dt = -φ(d1) (2rT - d2 σ√T) / (2T σ√T)
pub fn charm(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    if !is_applicable(spot, strike, time, rate, vol) {
        return 0.0;
    }
    let sqrt_t = time.sqrt();
    let d1 = d1(spot, strike, time, rate, vol);
    let d2 = d1 - vol * sqrt_t;
    let numerator = 2.0 * rate * time - d2 * vol * sqrt_t;
    let denominator = 2.0 * time * vol * sqrt_t;
    finite_or_zero(-norm_pdf(d1) * numerator / denominator)
}

/// All exposure Greeks in one evaluation
pub fn greeks(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> Greeks {
    if !is_applicable(spot, strike, time, rate, vol) {
        return Greeks::ZERO;
    }

    let sqrt_t = time.sqrt();
    let vol_sqrt_t = vol * sqrt_t;
    let d1 = d1(spot, strike, time, rate, vol);
    let d2 = d1 - vol_sqrt_t;
    let pdf_d1 = norm_pdf(d1);
    let cdf_d1 = norm_cdf(d1);

    Greeks {
        gamma: finite_or_zero(pdf_d1 / (spot * vol_sqrt_t)),
        call_delta: finite_or_zero(cdf_d1),
        put_delta: finite_or_zero(cdf_d1 - 1.0),
        vanna: finite_or_zero(-pdf_d1 * d2 / vol),
        charm: finite_or_zero(
            -pdf_d1 * (2.0 * rate * time - d2 * vol_sqrt_t) / (2.0 * time * vol_sqrt_t),
        ),
    }
}

/// Underflow/overflow in extreme corners still yields a well-defined zero
fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}
