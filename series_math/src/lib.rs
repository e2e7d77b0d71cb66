//! # Series Math
//!
//! Pure calculations over ordered numeric series.
//! This crate provides the building blocks used to turn a series of monthly
//! levels into a supervised regression problem: first differences, lag
//! windows and the sign classes used for directional scoring.

use thiserror::Error;

pub mod differencing;
pub mod direction;
pub mod lags;

pub use differencing::difference;
pub use direction::Direction;
pub use lags::{lag_windows, LagWindow};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
