//! Error types in capball
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error("point {row} has {found} coordinates, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Not enough samples to build a point set")]
    NotEnoughSamples,
}
