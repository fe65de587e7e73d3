use crate::trace::Trace;
use capball::Float;
use thiserror::Error;

pub type Result<T, F> = std::result::Result<T, SoftMdmError<F>>;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SoftMdmParamsError {
    #[error("capacity must be positive and finite, but is {0}")]
    Capacity(f64),
    #[error("tolerance must be non-negative and finite, but is {0}")]
    Tolerance(f64),
    #[error("max_iterations cannot be 0")]
    MaxIterations,
}

/// An error when solving a capped-weight enclosing-ball problem
///
/// Errors raised during the iteration carry the trace recorded up to the failing step, so the
/// run can be inspected afterwards.
#[derive(Error, Debug)]
pub enum SoftMdmError<F: Float> {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] SoftMdmParamsError),
    #[error("at least 2 points are required, but got {0}")]
    NotEnoughPoints(usize),
    #[error("points must have at least one coordinate")]
    EmptyDimension,
    #[error("point {0} has a non-finite coordinate")]
    NonFinitePoint(usize),
    /// The weight simplex capped at `capacity` is empty
    #[error("capacity {capacity} is infeasible for {npoints} points, it must be at least 1/{npoints}")]
    InfeasibleCapacity { capacity: F, npoints: usize },
    /// The squared distance between the pivot points is zero or not finite, so the line search
    /// is undefined
    #[error("line search between pivot points {receiver} and {donor} is undefined in iteration {iteration}")]
    DegeneratePivot {
        iteration: usize,
        receiver: usize,
        donor: usize,
        trace: Trace<F>,
    },
    /// No weight can be moved, even after relaxing the active set
    #[error("no pivot pair available in iteration {iteration}, weights left the feasible set")]
    InfeasibleOrDegenerate { iteration: usize, trace: Trace<F> },
    /// The caller-imposed iteration cap was hit before the gap closed
    #[error("gap did not close within {iterations} iterations")]
    NotConverged { iterations: usize, trace: Trace<F> },
    #[error(transparent)]
    BaseCrate(#[from] capball::Error),
}

impl<F: Float> SoftMdmError<F> {
    /// Returns the trace recorded before a numeric breakdown, if any
    pub fn trace(&self) -> Option<&Trace<F>> {
        match self {
            SoftMdmError::DegeneratePivot { trace, .. }
            | SoftMdmError::InfeasibleOrDegenerate { trace, .. }
            | SoftMdmError::NotConverged { trace, .. } => Some(trace),
            _ => None,
        }
    }
}
