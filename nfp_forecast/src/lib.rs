//! # NFP Forecast
//!
//! Forecast monthly U.S. Non-Farm Payroll changes with ordinary least
//! squares over lagged month-over-month differences.
//!
//! ## Pipeline
//!
//! - Load a CSV column of monthly payroll levels
//! - Difference it into month-over-month changes
//! - Build lag windows of `L` changes, each labelled with the next change
//! - Split chronologically into a training and a test block
//! - Fit an affine least-squares model on the training block
//! - Score test predictions with RMSE and a directional ratio
//!
//! ## Quick Start
//!
//! ```no_run
//! use nfp_forecast::{LoadOptions, Pipeline, PipelineConfig};
//! use std::path::Path;
//!
//! let pipeline = Pipeline::new(PipelineConfig::new(5, 0.8)?)?;
//! let report = pipeline.run_file(Path::new("payems.csv"), &LoadOptions::default())?;
//!
//! println!("{}", report.evaluation);
//! println!("{}", report.next_month);
//! # Ok::<(), nfp_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{ConfigOverrides, PipelineConfig, ProjectConfig};
pub use crate::data::{DiffSeries, LoadOptions, RawSeries, SeriesLoader};
pub use crate::dataset::{TrainTestSplit, WindowedDataset};
pub use crate::error::{ForecastError, Stage};
pub use crate::metrics::EvaluationResult;
pub use crate::models::linear::{FittedLinearModel, LinearRegression};
pub use crate::models::{ForecastModel, TrainedForecastModel};
pub use crate::pipeline::{Pipeline, PipelineReport, PredictionRecord};
