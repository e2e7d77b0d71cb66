//! Lag windows over a series
//!
//! A lag window pairs `lags` consecutive values with the value that follows
//! them. Sliding one step at a time over a series of length `D` yields
//! `D - lags` windows, in order.

use crate::{MathError, Result};

/// A borrowed window of consecutive values and the value right after it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagWindow<'a> {
    /// Index in the source series of the first feature value
    pub start: usize,
    /// The `lags` values starting at `start`
    pub features: &'a [f64],
    /// The value at `start + lags`
    pub label: f64,
}

/// Slide a window of length `lags` over `series`.
///
/// Window `i` covers `series[i..i + lags]` and is labelled with
/// `series[i + lags]`. Windows are returned in chronological order.
///
/// # Errors
///
/// `MathError::InvalidInput` if `lags` is zero, and
/// `MathError::InsufficientData` if `lags >= series.len()` (no window has a
/// label).
pub fn lag_windows(series: &[f64], lags: usize) -> Result<Vec<LagWindow<'_>>> {
    if lags == 0 {
        return Err(MathError::InvalidInput(
            "Lag count must be at least 1".to_string(),
        ));
    }

    if lags >= series.len() {
        return Err(MathError::InsufficientData(format!(
            "Lag count {} leaves no labelled window in a series of length {}",
            lags,
            series.len()
        )));
    }

    Ok(series
        .windows(lags + 1)
        .enumerate()
        .map(|(start, w)| LagWindow {
            start,
            features: &w[..lags],
            label: w[lags],
        })
        .collect())
}
