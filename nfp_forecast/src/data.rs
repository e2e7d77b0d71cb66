//! Monthly level series and their differences

use crate::error::{ForecastError, Result};
use crate::utils::parse_month;
use chrono::NaiveDate;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Ordered monthly payroll levels
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    /// Level per month, in chronological order
    values: Vec<f64>,
    /// Calendar month of each value, when the source had a date column
    months: Option<Vec<NaiveDate>>,
    /// Name of the column the values came from
    column: String,
}

/// Month-over-month changes of a `RawSeries`
#[derive(Debug, Clone, PartialEq)]
pub struct DiffSeries {
    values: Vec<f64>,
    /// Month each change lands in (the later of the two months)
    months: Option<Vec<NaiveDate>>,
}

/// Column selection for `SeriesLoader`
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Column holding the levels. First non-date column when unset.
    pub value_column: Option<String>,
    /// Column holding the months. Detected by name when unset.
    pub date_column: Option<String>,
}

/// Data loader for monthly level series
#[derive(Debug)]
pub struct SeriesLoader;

impl SeriesLoader {
    /// Load a level series from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<RawSeries> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ForecastError::Load(format!("cannot open {}: {}", path.display(), e))
        })?;

        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        info!(path = %path.display(), rows = df.height(), "read source table");
        Self::from_dataframe(&df, options)
    }

    /// Extract a level series from an existing DataFrame
    pub fn from_dataframe(df: &DataFrame, options: &LoadOptions) -> Result<RawSeries> {
        let date_column = match &options.date_column {
            Some(name) => Some(Self::require_column(df, name)?),
            None => Self::detect_date_column(df),
        };

        let value_column = match &options.value_column {
            Some(name) => Self::require_column(df, name)?,
            None => Self::detect_value_column(df, date_column.as_deref())?,
        };

        let values = Self::column_values(df, &value_column)?;

        let months = match date_column {
            Some(name) => match Self::column_months(df, &name) {
                Ok(months) => Some(months),
                Err(e) if options.date_column.is_none() => {
                    warn!(column = %name, error = %e, "ignoring unparseable date column");
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };

        debug!(column = %value_column, n = values.len(), dated = months.is_some(), "loaded levels");

        match months {
            Some(months) => RawSeries::with_months(value_column, values, months),
            None => Ok(RawSeries::new(value_column, values)),
        }
    }

    fn require_column(df: &DataFrame, name: &str) -> Result<String> {
        if df.get_column_names().iter().any(|c| *c == name) {
            Ok(name.to_string())
        } else {
            Err(ForecastError::Load(format!(
                "column '{}' not found (available: {:?})",
                name,
                df.get_column_names()
            )))
        }
    }

    /// Detect the date column: a text or date column whose name mentions a date.
    ///
    /// Numeric columns are never dates, so a lone level column named
    /// `monthly_payrolls` stays the value column.
    fn detect_date_column(df: &DataFrame) -> Option<String> {
        df.get_columns()
            .iter()
            .filter(|s| matches!(s.dtype(), DataType::Utf8 | DataType::Date))
            .find(|s| {
                let lower = s.name().to_lowercase();
                lower.contains("date") || lower.contains("time") || lower.contains("month")
            })
            .map(|s| s.name().to_string())
    }

    /// Use the first column that is not the date column.
    ///
    /// Every such column must be numeric: a text column there means a level
    /// column failed to parse, so it is reported instead of skipped.
    fn detect_value_column(df: &DataFrame, date_column: Option<&str>) -> Result<String> {
        let candidates: Vec<&Series> = df
            .get_columns()
            .iter()
            .filter(|s| Some(s.name()) != date_column)
            .collect();

        if let Some(series) = candidates.iter().find(|s| !s.dtype().is_numeric()) {
            return Err(ForecastError::Load(format!(
                "column '{}' contains non-numeric cells",
                series.name()
            )));
        }

        match candidates.first() {
            Some(series) => Ok(series.name().to_string()),
            None => Err(ForecastError::Load(
                "no value column found in data".to_string(),
            )),
        }
    }

    fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        let series = df.column(name)?;
        if !series.dtype().is_numeric() {
            return Err(ForecastError::Load(format!(
                "column '{}' contains non-numeric cells",
                name
            )));
        }

        if series.null_count() > 0 {
            return Err(ForecastError::Load(format!(
                "column '{}' has {} empty or non-numeric cells",
                name,
                series.null_count()
            )));
        }

        let floats = series.cast(&DataType::Float64)?;
        let values: Vec<f64> = floats.f64()?.into_no_null_iter().collect();
        Ok(values)
    }

    fn column_months(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>> {
        let series = df.column(name)?;
        match series.dtype() {
            DataType::Utf8 => series
                .utf8()?
                .into_iter()
                .enumerate()
                .map(|(row, cell)| {
                    let cell = cell.ok_or_else(|| {
                        ForecastError::Load(format!("empty date in column '{}' at row {}", name, row))
                    })?;
                    parse_month(cell).ok_or_else(|| {
                        ForecastError::Load(format!(
                            "cannot parse '{}' as a month in column '{}' at row {}",
                            cell, name, row
                        ))
                    })
                })
                .collect(),
            DataType::Date => {
                let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
                    .ok_or_else(|| ForecastError::Load("invalid epoch".to_string()))?;
                series
                    .date()?
                    .into_iter()
                    .enumerate()
                    .map(|(row, days)| {
                        days.and_then(|d| {
                            epoch.checked_add_signed(chrono::Duration::days(d as i64))
                        })
                        .ok_or_else(|| {
                            ForecastError::Load(format!(
                                "empty date in column '{}' at row {}",
                                name, row
                            ))
                        })
                    })
                    .collect()
            }
            other => Err(ForecastError::Load(format!(
                "column '{}' has type {} and cannot hold dates",
                name, other
            ))),
        }
    }
}

impl RawSeries {
    /// Create an undated series
    pub fn new(column: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            values,
            months: None,
            column: column.into(),
        }
    }

    /// Create an undated series from bare values
    pub fn from_values(values: Vec<f64>) -> Self {
        Self::new("value", values)
    }

    /// Create a series with one calendar month per value.
    ///
    /// Months must be strictly increasing since row order is time order.
    pub fn with_months(
        column: impl Into<String>,
        values: Vec<f64>,
        months: Vec<NaiveDate>,
    ) -> Result<Self> {
        if months.len() != values.len() {
            return Err(ForecastError::Load(format!(
                "{} months for {} values",
                months.len(),
                values.len()
            )));
        }

        if let Some(i) = months.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ForecastError::Load(format!(
                "months are not strictly increasing: {} is followed by {}",
                months[i],
                months[i + 1]
            )));
        }

        Ok(Self {
            values,
            months: Some(months),
            column: column.into(),
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn months(&self) -> Option<&[NaiveDate]> {
        self.months.as_deref()
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recent level
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Most recent month, if dated
    pub fn last_month(&self) -> Option<NaiveDate> {
        self.months.as_ref().and_then(|m| m.last().copied())
    }

    /// Month-over-month changes
    pub fn difference(&self) -> Result<DiffSeries> {
        let values = series_math::difference(&self.values)?;
        let months = self.months.as_ref().map(|m| m[1..].to_vec());
        Ok(DiffSeries { values, months })
    }
}

impl DiffSeries {
    /// Create an undated difference series directly
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            values,
            months: None,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Month of the change at `index`
    pub fn month(&self, index: usize) -> Option<NaiveDate> {
        self.months.as_ref().and_then(|m| m.get(index).copied())
    }

    /// The last `n` changes, or all of them if there are fewer
    pub fn tail(&self, n: usize) -> &[f64] {
        &self.values[self.values.len().saturating_sub(n)..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_difference_carries_months() {
        let raw = RawSeries::with_months(
            "payems",
            vec![100.0, 102.0, 101.0],
            vec![month(2020, 1), month(2020, 2), month(2020, 3)],
        )
        .unwrap();

        let diff = raw.difference().unwrap();
        assert_eq!(diff.values(), &[2.0, -1.0]);
        assert_eq!(diff.month(0), Some(month(2020, 2)));
        assert_eq!(diff.month(1), Some(month(2020, 3)));
        assert_eq!(diff.month(2), None);
    }

    #[test]
    fn test_months_must_increase() {
        let result = RawSeries::with_months(
            "payems",
            vec![1.0, 2.0],
            vec![month(2020, 2), month(2020, 1)],
        );
        assert!(matches!(result, Err(ForecastError::Load(_))));
    }

    #[test]
    fn test_tail() {
        let diff = DiffSeries::from_values(vec![1.0, 2.0, 3.0]);
        assert_eq!(diff.tail(2), &[2.0, 3.0]);
        assert_eq!(diff.tail(10), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_dataframe_detects_columns() {
        let df = DataFrame::new(vec![
            Series::new("date", &["2021-01", "2021-02", "2021-03"]),
            Series::new("payems", &[142_000.0, 142_300.0, 143_100.0]),
        ])
        .unwrap();

        let raw = SeriesLoader::from_dataframe(&df, &LoadOptions::default()).unwrap();
        assert_eq!(raw.column(), "payems");
        assert_eq!(raw.len(), 3);
        assert_eq!(raw.last_month(), Some(month(2021, 3)));
    }

    #[test]
    fn test_from_dataframe_integer_levels() {
        let df = DataFrame::new(vec![Series::new("level", &[10i64, 12, 15])]).unwrap();
        let raw = SeriesLoader::from_dataframe(&df, &LoadOptions::default()).unwrap();
        assert_eq!(raw.values(), &[10.0, 12.0, 15.0]);
        assert!(raw.months().is_none());
    }
}
