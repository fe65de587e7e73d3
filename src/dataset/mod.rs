//! Datasets
//!
//! This module implements the dataset struct and the floating point bound shared by every crate
//! in the workspace.
use ndarray::{ArrayBase, ArrayView, Ix2, OwnedRepr, ScalarOperand};

use num_traits::{AsPrimitive, FromPrimitive, NumAssignOps, NumCast};
use rand::distributions::uniform::SampleUniform;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use std::cmp::PartialOrd;
use std::fmt;
use std::iter::Sum;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

mod impl_dataset;
mod impl_records;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. Point coordinates, weights and radii are
/// all expressed with it.
pub trait Float:
    FromPrimitive
    + num_traits::Float
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + Sum
    + NumAssignOps
    + AsPrimitive<usize>
    + for<'a> AddAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> DivAssign<&'a Self>
    + SampleUniform
    + ScalarOperand
    + approx::AbsDiffEq
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// DatasetBase
///
/// This is the fundamental structure of a dataset. It contains a number of records about the data
/// and may contain targets. Enclosing-ball problems are unsupervised, so the targets are usually
/// the unit type `()`.
///
/// # Fields
///
/// * `records`: a two-dimensional matrix with dimensionality (nsamples, nfeatures), one point per
/// row
/// * `targets`: anything attached to the records, `()` for plain point sets
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBase<R, T>
where
    R: Records,
{
    pub records: R,
    pub targets: T,
}

/// Dataset
///
/// The most commonly used typed of dataset. It contains a number of points stored as an `Array2`
/// and no targets.
pub type Dataset<F> = DatasetBase<ArrayBase<OwnedRepr<F>, Ix2>, ()>;

/// DatasetView
///
/// A read only view of a Dataset
pub type DatasetView<'a, F> = DatasetBase<ArrayView<'a, F, Ix2>, ()>;

/// Record trait
pub trait Records: Sized {
    type Elem;

    fn nsamples(&self) -> usize;
    fn nfeatures(&self) -> usize;
}
