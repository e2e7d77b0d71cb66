//! First differences of a level series

use crate::{MathError, Result};

/// Month-over-month changes of `levels`.
///
/// Element `i` of the output is `levels[i + 1] - levels[i]`, so the output is
/// one element shorter than the input.
///
/// # Errors
///
/// Returns `MathError::InsufficientData` for fewer than two levels and
/// `MathError::InvalidInput` if any level is NaN or infinite.
pub fn difference(levels: &[f64]) -> Result<Vec<f64>> {
    if levels.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Differencing needs at least 2 values, got {}",
            levels.len()
        )));
    }

    if let Some(pos) = levels.iter().position(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(format!(
            "Non-finite value {} at position {}",
            levels[pos], pos
        )));
    }

    Ok(levels.windows(2).map(|w| w[1] - w[0]).collect())
}
