//! Run configuration
//!
//! The lag count and split fraction have no defaults: they must come from
//! the `[model]` table of the TOML file or from the command line.

use crate::data::LoadOptions;
use crate::error::{ForecastError, Result};
use crate::models::linear::DEFAULT_RCOND;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Validated model parameters for one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Number of lagged changes per feature vector
    pub lags: usize,
    /// Share of the lagged pairs used for training
    pub train_fraction: f64,
    /// Relative singular-value cut-off of the least-squares solver
    pub rcond: f64,
}

impl PipelineConfig {
    pub fn new(lags: usize, train_fraction: f64) -> Result<Self> {
        let config = Self {
            lags,
            train_fraction,
            rcond: DEFAULT_RCOND,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_rcond(mut self, rcond: f64) -> Result<Self> {
        self.rcond = rcond;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lags == 0 {
            return Err(ForecastError::Config(
                "lags must be at least 1".to_string(),
            ));
        }

        if !self.train_fraction.is_finite()
            || self.train_fraction <= 0.0
            || self.train_fraction >= 1.0
        {
            return Err(ForecastError::Config(format!(
                "train_fraction must lie in (0, 1), got {}",
                self.train_fraction
            )));
        }

        if !self.rcond.is_finite() || !(0.0..1.0).contains(&self.rcond) {
            return Err(ForecastError::Config(format!(
                "rcond must lie in [0, 1), got {}",
                self.rcond
            )));
        }

        Ok(())
    }
}

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub data: DataToml,

    #[serde(default)]
    pub model: ModelToml,

    #[serde(default)]
    pub output: OutputToml,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataToml {
    pub input: Option<PathBuf>,
    pub value_column: Option<String>,
    pub date_column: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    pub lags: Option<usize>,
    pub train_fraction: Option<f64>,
    pub rcond: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    /// JSON report path
    pub report: Option<PathBuf>,
    /// Predictions CSV path
    pub predictions: Option<PathBuf>,
    /// Number of most recent test rows written to the predictions CSV
    pub recent: Option<usize>,
}

/// Command-line values that take precedence over the TOML file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub value_column: Option<String>,
    pub date_column: Option<String>,
    pub lags: Option<usize>,
    pub train_fraction: Option<f64>,
    pub report: Option<PathBuf>,
    pub predictions: Option<PathBuf>,
    pub recent: Option<usize>,
}

impl ProjectConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ForecastError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Model parameters, failing if the lag count or split fraction is unset
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let lags = self.model.lags.ok_or_else(|| {
            ForecastError::Config("lag count not set: use --lags or [model].lags".to_string())
        })?;
        let train_fraction = self.model.train_fraction.ok_or_else(|| {
            ForecastError::Config(
                "split fraction not set: use --train-fraction or [model].train_fraction"
                    .to_string(),
            )
        })?;

        PipelineConfig::new(lags, train_fraction)?.with_rcond(self.model.rcond.unwrap_or(DEFAULT_RCOND))
    }

    /// Replace every value the overrides set, keeping the rest
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(input) = overrides.input {
            self.data.input = Some(input);
        }
        if let Some(column) = overrides.value_column {
            self.data.value_column = Some(column);
        }
        if let Some(column) = overrides.date_column {
            self.data.date_column = Some(column);
        }
        if let Some(lags) = overrides.lags {
            self.model.lags = Some(lags);
        }
        if let Some(fraction) = overrides.train_fraction {
            self.model.train_fraction = Some(fraction);
        }
        if let Some(report) = overrides.report {
            self.output.report = Some(report);
        }
        if let Some(predictions) = overrides.predictions {
            self.output.predictions = Some(predictions);
        }
        if let Some(recent) = overrides.recent {
            self.output.recent = Some(recent);
        }
        self
    }

    /// Source CSV path, failing if neither the file nor the command line set one
    pub fn input(&self) -> Result<&Path> {
        self.data.input.as_deref().ok_or_else(|| {
            ForecastError::Config(
                "no input path: set [data].input in config or use --input".to_string(),
            )
        })
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            value_column: self.data.value_column.clone(),
            date_column: self.data.date_column.clone(),
        }
    }
}
