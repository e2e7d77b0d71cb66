//! Ordinary least squares over lagged changes
//!
//! Features and labels are centred on their training means and the weights
//! are solved from the centred lag matrix with an SVD, treating singular
//! values below `rcond * sigma_max` as zero. The bias is then
//! `mean(y) - weights · mean(X)`, so it is never shrunk: collinear lags share
//! their weight at minimum norm while shifting a lag column by a constant
//! only moves the bias.

use crate::dataset::WindowedDataset;
use crate::error::{ForecastError, Result};
use crate::models::{check_width, ForecastModel, TrainedForecastModel};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use tracing::{debug, warn};

/// Default relative singular-value cut-off
pub const DEFAULT_RCOND: f64 = 1e-10;

/// Affine least-squares model
#[derive(Debug, Clone)]
pub struct LinearRegression {
    /// Name of the model
    name: String,
    /// Relative singular-value cut-off
    rcond: f64,
}

/// Fitted affine model: `weights · features + bias`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedLinearModel {
    #[serde(skip)]
    name: String,
    weights: Vec<f64>,
    bias: f64,
    /// Numerical rank of the centred lag matrix, at most `lags`
    rank: usize,
    rcond: f64,
}

impl LinearRegression {
    /// Create a model with the default cut-off
    pub fn new() -> Self {
        Self {
            name: "Linear Regression (OLS)".to_string(),
            rcond: DEFAULT_RCOND,
        }
    }

    /// Create a model with a custom relative singular-value cut-off
    pub fn with_rcond(rcond: f64) -> Result<Self> {
        if !rcond.is_finite() || !(0.0..1.0).contains(&rcond) {
            return Err(ForecastError::Config(format!(
                "rcond must lie in [0, 1), got {}",
                rcond
            )));
        }

        Ok(Self {
            rcond,
            ..Self::new()
        })
    }

    pub fn rcond(&self) -> f64 {
        self.rcond
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastModel for LinearRegression {
    type Trained = FittedLinearModel;

    #[tracing::instrument(skip_all, fields(n = data.len(), lags = data.lags()))]
    fn fit(&self, data: &WindowedDataset) -> Result<Self::Trained> {
        let n = data.len();
        let lags = data.lags();

        if n == 0 {
            return Err(ForecastError::Numerical(
                "cannot fit on an empty training set".to_string(),
            ));
        }
        if lags == 0 {
            return Err(ForecastError::Numerical(
                "cannot fit with zero lag features".to_string(),
            ));
        }

        let features = data.features();
        let labels = data.labels();

        if features.iter().flatten().chain(labels).any(|v| !v.is_finite()) {
            return Err(ForecastError::Numerical(
                "training set contains non-finite values".to_string(),
            ));
        }

        let feature_means: Vec<f64> = (0..lags)
            .map(|c| features.iter().map(|row| row[c]).sum::<f64>() / n as f64)
            .collect();
        let label_mean = labels.iter().sum::<f64>() / n as f64;

        let centred = DMatrix::from_fn(n, lags, |r, c| features[r][c] - feature_means[c]);
        let target = DVector::from_iterator(n, labels.iter().map(|y| y - label_mean));

        let svd = centred.svd(true, true);
        let tolerance = self.rcond * svd.singular_values.max();
        let rank = svd
            .singular_values
            .iter()
            .filter(|s| **s > tolerance)
            .count();

        if rank < lags {
            warn!(
                rank,
                columns = lags,
                "lag matrix is rank deficient, using minimum-norm weights"
            );
        }

        // Constant lags carry no signal: every weight is zero
        let weights: Vec<f64> = if rank == 0 {
            vec![0.0; lags]
        } else {
            svd.solve(&target, tolerance)
                .map_err(|e| ForecastError::Numerical(e.to_string()))?
                .iter()
                .copied()
                .collect()
        };

        let bias = label_mean
            - weights
                .iter()
                .zip(&feature_means)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        if !bias.is_finite() || weights.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::Numerical(
                "least-squares solution is not finite".to_string(),
            ));
        }

        debug!(bias, ?weights, rank, "fitted linear model");

        Ok(FittedLinearModel {
            name: self.name.clone(),
            weights,
            bias,
            rank,
            rcond: self.rcond,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedLinearModel {
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Numerical rank of the centred training lag matrix
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Whether the fit had to fall back to the minimum-norm solution
    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.weights.len()
    }
}

impl TrainedForecastModel for FittedLinearModel {
    fn lags(&self) -> usize {
        self.weights.len()
    }

    fn predict_one(&self, features: &[f64]) -> Result<f64> {
        check_width(self.weights.len(), features)?;

        Ok(self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_recovers_exact_coefficients() {
        // y = 1 + 2 * x0 - x1
        let features = vec![
            vec![1.0, 2.0],
            vec![2.0, 1.0],
            vec![3.0, 5.0],
            vec![0.0, 1.0],
            vec![4.0, 4.0],
        ];
        let labels: Vec<f64> = features.iter().map(|f| 1.0 + 2.0 * f[0] - f[1]).collect();
        let data = WindowedDataset::from_pairs(features, labels).unwrap();

        let model = LinearRegression::new().fit(&data).unwrap();
        assert_approx_eq!(model.bias(), 1.0, 1e-9);
        assert_approx_eq!(model.weights()[0], 2.0, 1e-9);
        assert_approx_eq!(model.weights()[1], -1.0, 1e-9);
        assert_eq!(model.rank(), 2);
        assert!(!model.is_rank_deficient());
    }

    #[test]
    fn test_duplicate_columns_share_weight() {
        // y = 1 + 2x with the same x fed twice
        let features = vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]];
        let labels = vec![3.0, 5.0, 7.0];
        let data = WindowedDataset::from_pairs(features, labels).unwrap();

        let model = LinearRegression::new().fit(&data).unwrap();
        assert_eq!(model.rank(), 1);
        assert!(model.is_rank_deficient());
        assert_approx_eq!(model.bias(), 1.0, 1e-8);
        assert_approx_eq!(model.weights()[0], 1.0, 1e-8);
        assert_approx_eq!(model.weights()[1], 1.0, 1e-8);
        assert_approx_eq!(model.predict_one(&[4.0, 4.0]).unwrap(), 9.0, 1e-8);
    }

    #[test]
    fn test_shifted_lag_only_moves_bias() {
        // y = 1 + 2x with the same x fed twice, then the second copy offset by 1000
        let labels = vec![3.0, 5.0, 7.0];
        let base = WindowedDataset::from_pairs(
            vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]],
            labels.clone(),
        )
        .unwrap();
        let shifted = WindowedDataset::from_pairs(
            vec![vec![1.0, 1001.0], vec![2.0, 1002.0], vec![3.0, 1003.0]],
            labels,
        )
        .unwrap();

        let base = LinearRegression::new().fit(&base).unwrap();
        let shifted = LinearRegression::new().fit(&shifted).unwrap();

        assert_approx_eq!(shifted.weights()[0], base.weights()[0], 1e-8);
        assert_approx_eq!(shifted.weights()[1], base.weights()[1], 1e-8);
        assert_approx_eq!(shifted.bias(), base.bias() - 1000.0 * base.weights()[1], 1e-6);
        assert_approx_eq!(
            shifted.predict_one(&[4.0, 1004.0]).unwrap(),
            base.predict_one(&[4.0, 4.0]).unwrap(),
            1e-6
        );
    }

    #[test]
    fn test_constant_lags_fit_the_mean() {
        let data = WindowedDataset::from_pairs(
            vec![vec![5.0, 5.0], vec![5.0, 5.0], vec![5.0, 5.0]],
            vec![1.0, 2.0, 6.0],
        )
        .unwrap();

        let model = LinearRegression::new().fit(&data).unwrap();
        assert_eq!(model.rank(), 0);
        assert_eq!(model.weights(), &[0.0, 0.0]);
        assert_approx_eq!(model.bias(), 3.0, 1e-12);
    }

    #[test]
    fn test_fit_errors() {
        let empty = WindowedDataset::from_pairs(vec![], vec![]).unwrap();
        assert!(matches!(
            LinearRegression::new().fit(&empty),
            Err(ForecastError::Numerical(_))
        ));

        let no_lags = WindowedDataset::from_pairs(vec![vec![], vec![]], vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            LinearRegression::new().fit(&no_lags),
            Err(ForecastError::Numerical(_))
        ));

        let nan = WindowedDataset::from_pairs(vec![vec![f64::NAN]], vec![1.0]).unwrap();
        assert!(matches!(
            LinearRegression::new().fit(&nan),
            Err(ForecastError::Numerical(_))
        ));
    }

    #[test]
    fn test_predict_width_mismatch() {
        let data =
            WindowedDataset::from_pairs(vec![vec![1.0], vec![2.0], vec![4.0]], vec![2.0, 4.0, 8.0])
                .unwrap();
        let model = LinearRegression::new().fit(&data).unwrap();
        assert!(matches!(
            model.predict_one(&[1.0, 2.0]),
            Err(ForecastError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rcond_validation() {
        assert!(LinearRegression::with_rcond(1e-6).is_ok());
        assert!(LinearRegression::with_rcond(-1.0).is_err());
        assert!(LinearRegression::with_rcond(f64::NAN).is_err());
    }
}
