//! FILENAME: core/engine/src/numeric.rs
//! PURPOSE: The coalesce-to-zero and guarded-division policy shared by every
//! derived metric.
//! CONTEXT: Inputs arrive as nullable numbers from the data-entry layer. The
//! calculation engine never validates them; instead every read goes through
//! `num` and every ratio goes through `safe_div`, so degenerate scenarios
//! produce zeros instead of NaN or Infinity.

/// Coalesces a nullable input to a finite number. `None`, NaN and the
/// infinities all become `0.0`.
#[inline]
pub fn num(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Divides `numerator` by `denominator`, returning `0.0` when the
/// denominator is zero or the quotient is not finite.
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let result = numerator / denominator;
    if result.is_finite() {
        result
    } else {
        0.0
    }
}

/// Sums a coalesced value extracted from each item.
pub fn sum_by<T, F>(items: &[T], mut f: F) -> f64
where
    F: FnMut(&T) -> f64,
{
    items.iter().map(|item| finite_or_zero(f(item))).sum()
}

/// Replaces a non-finite intermediate with zero.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
