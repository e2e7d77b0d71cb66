//! Metrics for evaluating forecast performance

use crate::error::{ForecastError, Result};
use serde::Serialize;
use series_math::Direction;

/// Scores of a set of predictions against the actual changes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Percentage of predictions with the same sign as the actual change
    pub directional_ratio: f64,
    /// Number of evaluated predictions
    pub samples: usize,
}

fn check_pairs(predictions: &[f64], labels: &[f64]) -> Result<()> {
    if predictions.len() != labels.len() {
        return Err(ForecastError::InvalidInput(format!(
            "{} predictions for {} labels",
            predictions.len(),
            labels.len()
        )));
    }

    if predictions.is_empty() {
        return Err(ForecastError::InvalidInput(
            "cannot evaluate an empty test set".to_string(),
        ));
    }

    if predictions.iter().chain(labels).any(|v| !v.is_finite()) {
        return Err(ForecastError::Numerical(
            "predictions or labels contain non-finite values".to_string(),
        ));
    }

    Ok(())
}

/// Root mean squared error
pub fn root_mean_squared_error(predictions: &[f64], labels: &[f64]) -> Result<f64> {
    check_pairs(predictions, labels)?;

    let mse = predictions
        .iter()
        .zip(labels)
        .map(|(p, y)| (p - y).powi(2))
        .sum::<f64>()
        / predictions.len() as f64;

    Ok(mse.sqrt())
}

/// Percentage of predictions whose sign matches the actual sign.
///
/// Zero is a sign class of its own and only matches zero.
pub fn directional_ratio(predictions: &[f64], labels: &[f64]) -> Result<f64> {
    check_pairs(predictions, labels)?;

    let agreeing = predictions
        .iter()
        .zip(labels)
        .filter(|(p, y)| Direction::agree(**p, **y))
        .count();

    Ok(agreeing as f64 / predictions.len() as f64 * 100.0)
}

/// Score predictions against labels
pub fn evaluate(predictions: &[f64], labels: &[f64]) -> Result<EvaluationResult> {
    Ok(EvaluationResult {
        rmse: root_mean_squared_error(predictions, labels)?,
        directional_ratio: directional_ratio(predictions, labels)?,
        samples: predictions.len(),
    })
}

impl std::fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Performance Metrics:")?;
        writeln!(f, "  Samples:   {}", self.samples)?;
        writeln!(f, "  RMSE:      {:.4}", self.rmse)?;
        writeln!(f, "  Direction: {:.2}%", self.directional_ratio)?;
        Ok(())
    }
}
