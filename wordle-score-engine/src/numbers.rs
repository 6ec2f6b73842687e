//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round to two decimal places, returning 0.0 for non-finite values.
#[must_use]
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn count_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(f64::MAX)
}

/// `3^exponent` as f64; saturates to infinity for huge exponents.
#[must_use]
pub fn pow3(exponent: u32) -> f64 {
    let exponent = i32::try_from(exponent).unwrap_or(i32::MAX);
    3.0_f64.powi(exponent)
}
