use crate::SoftMdmParamsError;
use capball::{Float, ParamGuard};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [soft MDM solver](crate::SoftMdm).
pub struct SoftMdmValidParams<F: Float> {
    /// Upper bound on every point weight. With `capacity >= 1` the bound never binds and the
    /// solver returns the classical minimum enclosing ball.
    capacity: F,
    /// The run is considered complete once the duality gap between the pivot pair drops to or
    /// below `tolerance`.
    tolerance: F,
    /// Optional cap on the number of iterations. The algorithm itself has no count-based exit,
    /// running out of iterations is reported as an error.
    max_iterations: Option<u64>,
    /// Store the weight vector in every snapshot of the trace
    record_weights: bool,
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](SoftMdmValidParams) for
/// the [soft MDM solver](crate::SoftMdm) (using the builder pattern).
pub struct SoftMdmParams<F: Float>(SoftMdmValidParams<F>);

impl<F: Float> SoftMdmParams<F> {
    /// `new` configures the solver for a weight cap of `capacity`.
    ///
    /// Defaults are provided if optional parameters are not specified:
    /// * `tolerance = 0`, the run stops only once the gap is exactly zero
    /// * `max_iterations = None`
    /// * `record_weights = true`
    pub fn new(capacity: F) -> Self {
        Self(SoftMdmValidParams {
            capacity,
            tolerance: F::zero(),
            max_iterations: None,
            record_weights: true,
        })
    }

    /// Change the value of `capacity`
    pub fn capacity(mut self, capacity: F) -> Self {
        self.0.capacity = capacity;
        self
    }

    /// Change the value of `tolerance`
    ///
    /// With the default of zero convergence relies on the gap becoming exactly zero in floating
    /// point. Inputs without such symmetry usually need a small positive value.
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Change the value of `max_iterations`
    pub fn max_iterations(mut self, max_iterations: Option<u64>) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Keep or drop the weight vectors of the trace
    ///
    /// A weight vector has one entry per point, so storing it every iteration costs
    /// `O(iterations * npoints)` memory. Centers, gaps and radii are always recorded.
    pub fn record_weights(mut self, record_weights: bool) -> Self {
        self.0.record_weights = record_weights;
        self
    }
}

impl<F: Float> ParamGuard for SoftMdmParams<F> {
    type Checked = SoftMdmValidParams<F>;
    type Error = SoftMdmParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if !self.0.capacity.is_finite() || self.0.capacity <= F::zero() {
            Err(SoftMdmParamsError::Capacity(
                self.0.capacity.to_f64().unwrap_or(f64::NAN),
            ))
        } else if !self.0.tolerance.is_finite() || self.0.tolerance < F::zero() {
            Err(SoftMdmParamsError::Tolerance(
                self.0.tolerance.to_f64().unwrap_or(f64::NAN),
            ))
        } else if self.0.max_iterations == Some(0) {
            Err(SoftMdmParamsError::MaxIterations)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> SoftMdmValidParams<F> {
    /// Upper bound on every point weight
    pub fn capacity(&self) -> F {
        self.capacity
    }

    /// Stopping threshold on the duality gap
    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    /// Optional cap on the number of iterations
    pub fn max_iterations(&self) -> Option<u64> {
        self.max_iterations
    }

    /// Whether snapshots store the weight vector
    pub fn record_weights(&self) -> bool {
        self.record_weights
    }
}
