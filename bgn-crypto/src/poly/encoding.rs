use crate::errors::BgnError;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};

/// Largest power of the scale base a key may encode fractions with.
pub const MAX_SCALE_FACTOR: u32 = 64;

/// Smallest `s` with `fp_scale_base^s · precision ≥ 1`.
///
/// Rounding at this scale is off by at most `precision / 2`, so the sum of
/// two encodings stays within `precision` of the true sum. Every fresh
/// fractional encoding under one key uses this same scale.
pub fn fixed_point_scale(fp_scale_base: u32, precision: f64) -> Result<u32, BgnError> {
    if fp_scale_base < 2 || !(precision > 0.0 && precision < 1.0) {
        return Err(BgnError::InvalidParameters(format!(
            "No fixed-point scale for base {} and precision {}",
            fp_scale_base, precision
        )));
    }

    let base = f64::from(fp_scale_base);
    let mut factor = 1.0;
    for scale in 0..=MAX_SCALE_FACTOR {
        if factor * precision >= 1.0 {
            return Ok(scale);
        }
        factor *= base;
    }

    Err(BgnError::InvalidParameters(format!(
        "Precision {} needs more than {} fractional digits of base {}",
        precision, MAX_SCALE_FACTOR, fp_scale_base
    )))
}

/// Scales `value` by `fp_scale_base^s`, with `s` from [`fixed_point_scale`],
/// and rounds to the nearest integer.
///
/// Returns the scaled integer and the exponent used.
pub fn to_fixed_point(value: f64, fp_scale_base: u32, precision: f64) -> Result<(BigInt, u32), BgnError> {
    if !value.is_finite() {
        return Err(BgnError::InvalidParameters(format!(
            "Cannot encode non-finite value {}",
            value
        )));
    }

    let scale = fixed_point_scale(fp_scale_base, precision)?;
    let scaled = (value * f64::from(fp_scale_base).powi(scale as i32)).round();
    let integer = BigInt::from_f64(scaled).ok_or_else(|| {
        BgnError::InvalidParameters(format!("Value {} does not fit at scale {}", value, scale))
    })?;

    Ok((integer, scale))
}

pub fn from_fixed_point(value: &BigInt, fp_scale_base: u32, scale: u32) -> f64 {
    let numerator = value.to_f64().unwrap_or(f64::NAN);
    numerator / f64::from(fp_scale_base).powi(scale as i32)
}

/// Signed base-`base` digits of `value`, least significant first.
///
/// Every digit carries the sign of `value`, so `|digit| < base`. Zero encodes
/// as a single zero digit.
pub fn to_digits(value: &BigInt, base: u32) -> Vec<i64> {
    if value.is_zero() {
        return vec![0];
    }

    let negative = value.is_negative();
    let radix = BigInt::from(base);
    let mut remaining = value.abs();
    let mut digits = Vec::new();
    while !remaining.is_zero() {
        let (quotient, digit) = remaining.div_rem(&radix);
        // digit < base ≤ u32::MAX
        let digit = digit.to_i64().unwrap_or_default();
        digits.push(if negative { -digit } else { digit });
        remaining = quotient;
    }

    digits
}

/// `Σ digits[i] · base^i`. Digits may lie outside `(-base, base)`, as they do
/// after homomorphic additions.
pub fn from_digits(digits: &[BigInt], base: u32) -> BigInt {
    let radix = BigInt::from(base);
    digits
        .iter()
        .rev()
        .fold(BigInt::zero(), |acc, digit| acc * &radix + digit)
}
