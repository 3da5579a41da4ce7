//! Miscellaneous numerical algorithms.
//!
//! Currently this is 1-D linear interpolation with boundary clamping, the
//! same semantics as numpy's `interp`: queries left of the first knot take
//! the first value, queries right of the last knot take the last value.

use std::cmp::Ordering;

use thiserror::Error;

/// Errors that can occur during interpolation operations.
#[derive(Error, Debug, PartialEq)]
pub enum InterpError {
    #[error("Input vectors must have at least 2 points")]
    InsufficientData,
    #[error("Input vectors must have the same length ({0} x values, {1} y values)")]
    MismatchedLengths(usize, usize),
    #[error("X values must be strictly increasing (violated at index {0})")]
    UnsortedData(usize),
}

/// Check that `xs`/`ys` form a usable interpolation table
pub fn validate_table(xs: &[f64], ys: &[f64]) -> Result<(), InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::MismatchedLengths(xs.len(), ys.len()));
    }

    if xs.len() < 2 {
        return Err(InterpError::InsufficientData);
    }

    // NaN knots compare as None and are rejected here too
    for i in 1..xs.len() {
        if xs[i].partial_cmp(&xs[i - 1]) != Some(Ordering::Greater) {
            return Err(InterpError::UnsortedData(i));
        }
    }

    Ok(())
}

/// Linearly interpolate `ys` at `x`, clamping outside the table.
///
/// Uses binary search to find the bracketing interval, then
/// y = y₁ + t(y₂ - y₁) with t = (x - x₁)/(x₂ - x₁).
/// A query exactly on a knot returns that knot's value without arithmetic.
/// A NaN query yields NaN.
///
/// # Examples
///
/// ```rust
/// use spectral_filter::algo::misc::interp;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// assert_eq!(interp(1.5, &xs, &ys)?, 2.5);
/// assert_eq!(interp(2.0, &xs, &ys)?, 4.0);
/// assert_eq!(interp(-5.0, &xs, &ys)?, 0.0);
/// assert_eq!(interp(50.0, &xs, &ys)?, 9.0);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// * `InterpError::InsufficientData` - Less than 2 data points provided
/// * `InterpError::MismatchedLengths` - xs and ys have different lengths
/// * `InterpError::UnsortedData` - xs is not strictly increasing
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    validate_table(xs, ys)?;
    Ok(interp_unchecked(x, xs, ys))
}

/// Interpolate every value of `queries`, validating the table once.
///
/// An empty `queries` slice yields an empty vector.
pub fn interp_all(queries: &[f64], xs: &[f64], ys: &[f64]) -> Result<Vec<f64>, InterpError> {
    validate_table(xs, ys)?;
    Ok(queries
        .iter()
        .map(|&x| interp_unchecked(x, xs, ys))
        .collect())
}

/// Interpolation against a table already known to pass [`validate_table`]
pub(crate) fn interp_unchecked(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let last = xs.len() - 1;

    if x.is_nan() {
        return f64::NAN;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }

    // First knot >= x; in 1..=last because of the clamps above
    let idx = xs.partition_point(|&knot| knot < x);
    if xs[idx] == x {
        return ys[idx];
    }

    let (x1, x2) = (xs[idx - 1], xs[idx]);
    let (y1, y2) = (ys[idx - 1], ys[idx]);
    let t = (x - x1) / (x2 - x1);
    y1 + t * (y2 - y1)
}
