//! Fixed-point arithmetic helpers
//!
//! `value * mul / div` where `value` is 128-bit and the scale factors fit in
//! 64 bits. The full product can need up to 192 bits, so it is never
//! materialized: the value is split into `q * div + r` first, which gives
//!
//! ```text
//! floor(value * mul / div) = q * mul + floor(r * mul / div)
//! ```
//!
//! with `r < div < 2^64`, so `r * mul` always fits in 128 bits. Only the
//! final quotient can overflow, and that is reported rather than clipped.

use thiserror::Error;

/// Arithmetic failures in share/amount conversion
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Arithmetic overflow: result does not fit in 128 bits")]
    Overflow,

    #[error("Division by zero")]
    DivisionByZero,
}

/// Compute `floor(value * mul / div)` without intermediate overflow.
///
/// # Example
/// ```
/// use elastic_core::math::mul_div_floor;
///
/// // 10^30 * 10^18 overflows u128, the quotient does not
/// let big = 10u128.pow(30);
/// assert_eq!(mul_div_floor(big, 1_000_000_000_000_000_000, 990_000_000_000_000_000).unwrap(),
///            big * 100 / 99);
/// ```
pub fn mul_div_floor(value: u128, mul: u64, div: u64) -> Result<u128, ArithmeticError> {
    if div == 0 {
        return Err(ArithmeticError::DivisionByZero);
    }

    let mul = u128::from(mul);
    let div = u128::from(div);

    let q = value / div;
    let r = value % div;

    // r < 2^64 and mul < 2^64
    let tail = r * mul / div;

    q.checked_mul(mul)
        .and_then(|head| head.checked_add(tail))
        .ok_or(ArithmeticError::Overflow)
}
