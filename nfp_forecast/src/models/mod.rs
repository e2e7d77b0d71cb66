//! Forecasting models over lagged datasets

use crate::dataset::WindowedDataset;
use crate::error::{ForecastError, Result};
use std::fmt::Debug;

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Number of lagged features the model expects
    fn lags(&self) -> usize;

    /// Predict the label for one feature vector
    fn predict_one(&self, features: &[f64]) -> Result<f64>;

    /// Predict the label for each feature vector, in order
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        features
            .iter()
            .map(|f| self.predict_one(f))
            .collect()
    }

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be fitted to a lagged dataset
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Fit the model to a training block
    fn fit(&self, data: &WindowedDataset) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Reject a feature vector of the wrong length
pub(crate) fn check_width(expected: usize, features: &[f64]) -> Result<()> {
    if features.len() != expected {
        return Err(ForecastError::InvalidInput(format!(
            "feature vector has length {}, model expects {}",
            features.len(),
            expected
        )));
    }
    Ok(())
}

pub mod linear;
