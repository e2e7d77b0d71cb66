//! End-to-end forecasting run
//!
//! difference → window → split → fit → predict → evaluate, failing fast on
//! the first error. Every error leaving [`Pipeline::run`] is tagged with the
//! [`Stage`] that raised it.

use crate::config::PipelineConfig;
use crate::data::{LoadOptions, RawSeries, SeriesLoader};
use crate::dataset::WindowedDataset;
use crate::error::{ForecastError, Result, Stage};
use crate::metrics::{self, EvaluationResult};
use crate::models::linear::{FittedLinearModel, LinearRegression};
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::utils::{next_month, SeriesSummary};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// One test-set prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    /// Position within the test set
    pub position: usize,
    /// Month of the predicted change, when the source was dated
    pub month: Option<NaiveDate>,
    pub actual: f64,
    pub predicted: f64,
}

/// One-step-ahead forecast past the last observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextMonthForecast {
    pub month: Option<NaiveDate>,
    /// Predicted change from the last observed level
    pub change: f64,
    /// Last observed level plus the predicted change
    pub level: f64,
}

/// Everything a run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub column: String,
    pub lags: usize,
    pub train_fraction: f64,
    pub n_levels: usize,
    pub n_pairs: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub cut: usize,
    pub model: FittedLinearModel,
    pub evaluation: EvaluationResult,
    pub predictions: Vec<PredictionRecord>,
    pub next_month: NextMonthForecast,
}

/// Configured forecasting pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    model: LinearRegression,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let model = LinearRegression::with_rcond(config.rcond)?;
        Ok(Self { config, model })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load a CSV source and run on it
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn run_file(&self, path: &Path, options: &LoadOptions) -> Result<PipelineReport> {
        let raw = SeriesLoader::from_csv(path, options).map_err(|e| e.at(Stage::Load))?;
        self.run(&raw)
    }

    /// Run every stage on a loaded series
    #[tracing::instrument(skip_all, fields(n_levels = raw.len(), lags = self.config.lags))]
    pub fn run(&self, raw: &RawSeries) -> Result<PipelineReport> {
        let lags = self.config.lags;

        let diffs = raw.difference().map_err(|e| e.at(Stage::Difference))?;
        if let Ok(summary) = SeriesSummary::of(diffs.values()) {
            debug!(
                mean = summary.mean,
                std_dev = summary.std_dev,
                min = summary.min,
                max = summary.max,
                "difference series"
            );
        }

        let dataset = WindowedDataset::build(&diffs, lags).map_err(|e| e.at(Stage::Window))?;
        let split = dataset
            .split(self.config.train_fraction)
            .map_err(|e| e.at(Stage::Window))?;
        info!(
            n_pairs = dataset.len(),
            train = split.train.len(),
            test = split.test.len(),
            cut = split.cut,
            "built lagged dataset"
        );

        let fitted = self
            .model
            .fit(&split.train)
            .map_err(|e| e.at(Stage::Fit))?;

        let predictions = fitted
            .predict(split.test.features())
            .map_err(|e| e.at(Stage::Predict))?;

        let evaluation = metrics::evaluate(&predictions, split.test.labels())
            .map_err(|e| e.at(Stage::Evaluate))?;
        info!(
            rmse = evaluation.rmse,
            directional_ratio = evaluation.directional_ratio,
            "evaluated test set"
        );

        let records = predictions
            .iter()
            .zip(split.test.labels())
            .enumerate()
            .map(|(position, (&predicted, &actual))| PredictionRecord {
                position,
                month: diffs.month(split.cut + position + lags),
                actual,
                predicted,
            })
            .collect();

        let change = fitted
            .predict_one(diffs.tail(lags))
            .map_err(|e| e.at(Stage::Predict))?;
        let last_level = raw.last().ok_or_else(|| {
            ForecastError::InvalidInput("empty level series".to_string()).at(Stage::Difference)
        })?;
        let next_month = NextMonthForecast {
            month: raw.last_month().and_then(next_month),
            change,
            level: last_level + change,
        };

        Ok(PipelineReport {
            column: raw.column().to_string(),
            lags,
            train_fraction: self.config.train_fraction,
            n_levels: raw.len(),
            n_pairs: dataset.len(),
            train_size: split.train.len(),
            test_size: split.test.len(),
            cut: split.cut,
            model: fitted,
            evaluation,
            predictions: records,
            next_month,
        })
    }
}

impl PipelineReport {
    /// The last `n` test predictions, oldest first
    pub fn recent(&self, n: usize) -> &[PredictionRecord] {
        &self.predictions[self.predictions.len().saturating_sub(n)..]
    }
}

impl fmt::Display for NextMonthForecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(month) => writeln!(f, "Next month ({}):", month.format("%Y-%m"))?,
            None => writeln!(f, "Next month:")?,
        }
        writeln!(f, "  Change: {:+.2}", self.change)?;
        writeln!(f, "  Level:  {:.2}", self.level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_run_small_series() {
        let raw = RawSeries::from_values(vec![
            100.0, 102.0, 101.0, 105.0, 108.0, 107.0, 110.0, 109.0, 113.0, 116.0,
        ]);
        let pipeline = Pipeline::new(PipelineConfig::new(2, 0.75).unwrap()).unwrap();
        let report = pipeline.run(&raw).unwrap();

        // 9 changes, 7 pairs, floor(0.75 * 7) = 5
        assert_eq!(report.n_pairs, 7);
        assert_eq!(report.cut, 5);
        assert_eq!(report.train_size, 5);
        assert_eq!(report.test_size, 2);
        assert_eq!(report.predictions.len(), 2);
        assert_eq!(report.predictions[0].actual, 4.0);
        assert_eq!(report.predictions[1].actual, 3.0);
        assert!(report.evaluation.rmse >= 0.0);
        assert_approx_eq!(report.next_month.level, 116.0 + report.next_month.change);
    }

    #[test]
    fn test_recent() {
        let raw = RawSeries::from_values((0..30).map(|i| (i * i % 7) as f64).collect());
        let pipeline = Pipeline::new(PipelineConfig::new(3, 0.5).unwrap()).unwrap();
        let report = pipeline.run(&raw).unwrap();

        let recent = report.recent(4);
        assert_eq!(recent.len(), 4);
        assert_eq!(recent[3], *report.predictions.last().unwrap());
        assert_eq!(report.recent(1000).len(), report.predictions.len());
    }

    #[test]
    fn test_window_stage_is_named() {
        let raw = RawSeries::from_values(vec![1.0, 2.0, 3.0]);
        let pipeline = Pipeline::new(PipelineConfig::new(5, 0.8).unwrap()).unwrap();
        let err = pipeline.run(&raw).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Window));
        assert!(matches!(err.root(), ForecastError::InvalidInput(_)));
    }
}
