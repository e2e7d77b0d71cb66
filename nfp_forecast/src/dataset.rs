//! Lagged supervised datasets and their chronological split
//!
//! Pair `i` of a [`WindowedDataset`] holds the `lags` changes starting at
//! difference index `i` as features and the change right after them as the
//! label. [`WindowedDataset::split`] cuts the pairs at `floor(f * M)` without
//! reordering, so every training pair precedes every test pair.

use crate::data::DiffSeries;
use crate::error::{ForecastError, Result};
use series_math::lag_windows;
use std::ops::Range;

/// Ordered (features, label) pairs with a fixed feature length
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedDataset {
    features: Vec<Vec<f64>>,
    labels: Vec<f64>,
    lags: usize,
}

/// Training block followed by test block
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: WindowedDataset,
    pub test: WindowedDataset,
    /// Index of the first test pair in the unsplit dataset
    pub cut: usize,
}

impl WindowedDataset {
    /// Slide a window of `lags` changes over `diffs`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `lags` is zero or `lags >= diffs.len()`.
    pub fn build(diffs: &DiffSeries, lags: usize) -> Result<Self> {
        let windows = lag_windows(diffs.values(), lags)?;

        let (features, labels): (Vec<Vec<f64>>, Vec<f64>) = windows
            .into_iter()
            .map(|w| (w.features.to_vec(), w.label))
            .unzip();

        Ok(Self {
            features,
            labels,
            lags,
        })
    }

    /// Assemble a dataset from pre-built pairs.
    ///
    /// Every feature vector must have the same length.
    pub fn from_pairs(features: Vec<Vec<f64>>, labels: Vec<f64>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(ForecastError::InvalidInput(format!(
                "{} feature vectors for {} labels",
                features.len(),
                labels.len()
            )));
        }

        let lags = features.first().map(Vec::len).unwrap_or(0);
        if let Some(i) = features.iter().position(|f| f.len() != lags) {
            return Err(ForecastError::InvalidInput(format!(
                "feature vector {} has length {}, expected {}",
                i,
                features[i].len(),
                lags
            )));
        }

        Ok(Self {
            features,
            labels,
            lags,
        })
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Feature vector length
    pub fn lags(&self) -> usize {
        self.lags
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Copy of the pairs in `range`
    fn slice(&self, range: Range<usize>) -> Self {
        Self {
            features: self.features[range.clone()].to_vec(),
            labels: self.labels[range].to_vec(),
            lags: self.lags,
        }
    }

    /// Split index for `fraction`, without building the blocks
    pub fn cut_index(&self, fraction: f64) -> Result<usize> {
        if !fraction.is_finite() || fraction <= 0.0 || fraction >= 1.0 {
            return Err(ForecastError::InvalidInput(format!(
                "split fraction must lie in (0, 1), got {}",
                fraction
            )));
        }

        let total = self.len();
        let cut = (fraction * total as f64).floor() as usize;

        if cut == 0 {
            return Err(ForecastError::InvalidInput(format!(
                "split fraction {} of {} pairs leaves an empty training set",
                fraction, total
            )));
        }
        if cut >= total {
            return Err(ForecastError::InvalidInput(format!(
                "split fraction {} of {} pairs leaves an empty test set",
                fraction, total
            )));
        }

        Ok(cut)
    }

    /// Cut into a leading training block and a trailing test block
    pub fn split(&self, fraction: f64) -> Result<TrainTestSplit> {
        let cut = self.cut_index(fraction)?;

        Ok(TrainTestSplit {
            train: self.slice(0..cut),
            test: self.slice(cut..self.len()),
            cut,
        })
    }
}

impl TrainTestSplit {
    /// Index range of the training pairs in the unsplit dataset
    pub fn train_range(&self) -> Range<usize> {
        0..self.cut
    }

    /// Index range of the test pairs in the unsplit dataset
    pub fn test_range(&self) -> Range<usize> {
        self.cut..self.cut + self.test.len()
    }
}
