//! Pearson correlation coefficient over two equal-length sequences.
//!
//! The coefficient is computed from raw sums rather than centered moments
//! because each intermediate quantity (sums, sums of squares, sum of
//! products, numerator, denominator) is part of the public contract and
//! exposed as its own function.

use crate::core::errors::{CredenceError, Result};

/// Module identity used to prefix validation error messages.
pub const NAME: &str = "pearson";

/// Sum of all elements.
pub fn simple_sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Sum of the squares of all elements.
pub fn square_sum(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

/// Sum over `i` of `x[i] * y[i]`.
///
/// Returns a validation error when the sequences differ in length.
pub fn sum_of_products(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(CredenceError::validation_field(
            format!(
                "{NAME}: sequences must have equal length ({} vs {})",
                x.len(),
                y.len()
            ),
            "y",
        ));
    }

    Ok(x.iter().zip(y).map(|(a, b)| a * b).sum())
}

/// Correlation numerator: `sum_prod - sum_x * sum_y / n`.
///
/// `n = 0` divides by zero and propagates `NaN`.
pub fn numerator(sum_prod: f64, sum_x: f64, sum_y: f64, n: usize) -> f64 {
    sum_prod - (sum_x * sum_y / n as f64)
}

/// Correlation denominator:
/// `sqrt((sum_x_sq - sum_x²/n) * (sum_y_sq - sum_y²/n))`.
///
/// A negative radicand (possible with pathological input) propagates `NaN`.
pub fn denominator(sum_x_sq: f64, sum_y_sq: f64, sum_x: f64, sum_y: f64, n: usize) -> f64 {
    let n = n as f64;
    ((sum_x_sq - sum_x * sum_x / n) * (sum_y_sq - sum_y * sum_y / n)).sqrt()
}

/// Pearson correlation coefficient between `x` and `y`, in [-1, 1] for
/// well-formed input.
///
/// A denominator of exactly zero (constant input) means no correlation is
/// computable and yields `0.0` instead of a division anomaly. Length
/// mismatch is a validation error; all other numeric edge cases propagate
/// `NaN`.
pub fn calculate(x: &[f64], y: &[f64]) -> Result<f64> {
    let n = x.len();

    let sum_x = simple_sum(x);
    let sum_y = simple_sum(y);

    let sum_x_sq = square_sum(x);
    let sum_y_sq = square_sum(y);

    let sum_prod = sum_of_products(x, y)?;

    let num = numerator(sum_prod, sum_x, sum_y, n);
    let den = denominator(sum_x_sq, sum_y_sq, sum_x, sum_y, n);

    if den == 0.0 {
        Ok(0.0)
    } else {
        Ok(num / den)
    }
}
