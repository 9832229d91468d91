//! Fixed-precision rounding shared by the index calculation.
//!
//! Values are scaled, rounded half-to-even and scaled back.

pub const INDEX_DECIMALS: i32 = 3;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

pub fn round3(value: f64) -> f64 {
    round_to(value, INDEX_DECIMALS)
}
