//! Provide traits for different classes of algorithms
//!

use crate::dataset::{DatasetBase, Records};

/// Fittable algorithms
///
/// A fittable algorithm takes a dataset and creates a concept of some kind about it. For example
/// an enclosing-ball solver takes a point set and returns the ball, its weights and the trace of
/// the optimization.
///
/// The returned `Object` is fallible: numeric breakdowns are reported through `E` instead of a
/// panic.
pub trait Fit<R: Records, T, E: std::error::Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, dataset: &DatasetBase<R, T>) -> Result<Self::Object, E>;
}

/// Predict with a fitted model
///
/// A fitted model maps new records to some output, e.g. whether a point lies inside an enclosing
/// ball.
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}
