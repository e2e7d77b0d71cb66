//! Utility functions for the nfp_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Months, NaiveDate};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Parse a month written as `YYYY-MM-DD` or `YYYY-MM`.
///
/// `YYYY-MM` maps to the first day of the month.
pub fn parse_month(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d"))
        .ok()
}

/// The same day one calendar month later
pub fn next_month(month: NaiveDate) -> Option<NaiveDate> {
    month.checked_add_months(Months::new(1))
}

/// Descriptive statistics of a series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, zero for a single value
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesSummary {
    /// Summarise a non-empty series
    pub fn of(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::InvalidInput(
                "Cannot summarise an empty series".to_string(),
            ));
        }

        let std_dev = if values.len() > 1 {
            Statistics::std_dev(values.iter())
        } else {
            0.0
        };

        Ok(Self {
            count: values.len(),
            mean: Statistics::mean(values.iter()),
            std_dev,
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
        })
    }
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Count:   {}", self.count)?;
        writeln!(f, "  Mean:    {:.4}", self.mean)?;
        writeln!(f, "  Std Dev: {:.4}", self.std_dev)?;
        writeln!(f, "  Min:     {:.4}", self.min)?;
        writeln!(f, "  Max:     {:.4}", self.max)?;
        Ok(())
    }
}
