//! Error types for the nfp_forecast crate

use polars::prelude::PolarsError;
use series_math::MathError;
use std::fmt;
use thiserror::Error;

/// Pipeline stage an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Difference,
    Window,
    Fit,
    Predict,
    Evaluate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Difference => "difference",
            Stage::Window => "window",
            Stage::Fit => "fit",
            Stage::Predict => "predict",
            Stage::Evaluate => "evaluate",
        };
        f.write_str(name)
    }
}

/// Custom error types for the nfp_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The source is missing, unreadable or holds non-numeric cells
    #[error("Load error: {0}")]
    Load(String),

    /// Too little data, a degenerate split or an empty evaluation set
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An ill-posed fit or non-finite numbers
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure writing a report or predictions file
    #[error("Output error: {0}")]
    Output(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error tagged with the pipeline stage that raised it.
    ///
    /// The cause is only reachable through `source()`, so `{:#}` on an
    /// `anyhow::Error` prints it once.
    #[error("{stage} stage failed")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<ForecastError>,
    },
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// Tag this error with the stage it was raised in
    pub fn at(self, stage: Stage) -> Self {
        match self {
            already @ ForecastError::Stage { .. } => already,
            other => ForecastError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error was tagged with, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ForecastError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The underlying error with any stage tags removed
    pub fn root(&self) -> &ForecastError {
        match self {
            ForecastError::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::Load(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) | MathError::InvalidInput(msg) => {
                ForecastError::InvalidInput(msg)
            }
            MathError::CalculationError(msg) => ForecastError::Numerical(msg),
        }
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Output(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::Output(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::Config(err.to_string())
    }
}
