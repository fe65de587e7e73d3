use std::fmt;

use crate::error::{Result, SoftMdmError};
use crate::hyperparams::{SoftMdmParams, SoftMdmValidParams};
use crate::pivot::is_free;
use crate::solver_mdm::SolverState;
use crate::trace::Trace;

use capball::{prelude::*, DatasetBase, Float};
use ndarray::{Array1, ArrayBase, Axis, Data, Ix1, Ix2};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Capped-weight minimum enclosing ball, fitted with the soft Minimal-Distance-Method
///
/// Every point `p_i` carries a weight `u_i` with `0 <= u_i <= c` and `sum(u) = 1`. The center
/// of the ball is the weighted centroid `x = sum(u_i p_i)` and the weights minimize the dual
/// objective
///
/// `Q(u) = |sum(u_i p_i)|^2 / 2 - sum(u_i |p_i|^2 / 2)`
///
/// whose optimum gives the squared radius `-2 Q(u)`. With `c >= 1` the cap never binds and the
/// ball is the classical minimum enclosing ball. Smaller caps bound the pull any single point
/// has on the ball, points far away from the bulk end up with weight `c` and outside the ball.
///
/// ## The solver
///
/// Starting from uniform weights `1 / m`, each iteration
///
/// 1. selects among the points with `0 < u_i < c` the one farthest from the center (receiver)
///    and the one closest to it (donor),
/// 2. stops if the gap of their distance proxies is within the tolerance,
/// 3. otherwise moves weight from the donor to the receiver with an exact line search, clipped so
///    that neither weight leaves `[0, c]`.
///
/// The state at the start of every iteration is recorded in a [`Trace`] for replay.
///
/// ## Example
///
/// ```
/// use capball::prelude::*;
/// use capball_mdm::SoftMdm;
/// use approx::assert_abs_diff_eq;
/// use ndarray::array;
///
/// let points = Dataset::from_rows(&[[0., 0.], [2., 0.], [0., 2.], [2., 2.]]).unwrap();
///
/// let ball = SoftMdm::params(1.0).fit(&points).unwrap();
///
/// assert_abs_diff_eq!(ball.center(), &array![1., 1.], epsilon = 1e-12);
/// assert_abs_diff_eq!(ball.radius(), 2f64.sqrt(), epsilon = 1e-12);
/// assert_eq!(ball.predict(array![[1., 2.], [3., 3.]]), array![true, false]);
/// ```
pub struct SoftMdm<F: Float> {
    center: Array1<F>,
    radius: F,
    weights: Array1<F>,
    objective: F,
    support_indices: Vec<usize>,
    capacity: F,
    trace: Trace<F>,
}

impl<F: Float> SoftMdm<F> {
    /// Create default hyperparameters for a weight cap of `capacity`
    pub fn params(capacity: F) -> SoftMdmParams<F> {
        SoftMdmParams::new(capacity)
    }

    /// Center of the ball
    pub fn center(&self) -> &Array1<F> {
        &self.center
    }

    /// Radius of the ball, `sqrt(-2 Q(u))`
    pub fn radius(&self) -> F {
        self.radius
    }

    /// Final weight of every point
    pub fn weights(&self) -> &Array1<F> {
        &self.weights
    }

    /// Value of the dual objective `Q(u)` at the final weights
    pub fn objective(&self) -> F {
        self.objective
    }

    /// Indices of the points whose weight lies strictly between zero and the capacity
    pub fn support_indices(&self) -> &[usize] {
        &self.support_indices
    }

    /// Returns the number of support points
    pub fn nsupport(&self) -> usize {
        self.support_indices.len()
    }

    /// Indices of the points whose weight sits on the capacity
    pub fn saturated_indices(&self) -> Vec<usize> {
        self.weights
            .iter()
            .enumerate()
            .filter(|(_, &u)| u >= self.capacity)
            .map(|(i, _)| i)
            .collect()
    }

    /// Weight cap used by the solver
    ///
    /// This can be slightly larger than the requested one, when the request was `1 / m` up to
    /// floating point round-off.
    pub fn capacity(&self) -> F {
        self.capacity
    }

    /// Snapshots of every iteration
    pub fn trace(&self) -> &Trace<F> {
        &self.trace
    }

    /// Number of executed iterations
    pub fn iterations(&self) -> usize {
        self.trace.len()
    }
}

/// Display solution
///
/// In order to understand the solution of the MDM solver the number of iterations, the
/// objective and the number of support points are printed here.
impl<F: Float> fmt::Display for SoftMdm<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Converged after {} iterations with radius = {}, objective = {} and {} support points",
            self.iterations(),
            self.radius,
            self.objective,
            self.nsupport()
        )
    }
}

impl<F: Float, D: Data<Elem = F>, T> Fit<ArrayBase<D, Ix2>, T, SoftMdmError<F>>
    for SoftMdmValidParams<F>
{
    type Object = SoftMdm<F>;

    /// Given a point set with `m` rows and `d` columns, computes the capped enclosing ball.
    ///
    /// The capacity is checked against the number of points: uniform weights `1 / m` must be
    /// feasible, so `capacity * m >= 1` is required.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object, F> {
        let points = dataset.records().view();
        let (npoints, nfeatures) = points.dim();

        if npoints < 2 {
            return Err(SoftMdmError::NotEnoughPoints(npoints));
        }
        if nfeatures == 0 {
            return Err(SoftMdmError::EmptyDimension);
        }
        if let Some(row) = points
            .axis_iter(Axis(0))
            .position(|p| p.iter().any(|x| !x.is_finite()))
        {
            return Err(SoftMdmError::NonFinitePoint(row));
        }

        let capacity = effective_capacity(self.capacity(), npoints)?;

        tracing::debug!(
            npoints,
            nfeatures,
            capacity = %capacity,
            tolerance = %self.tolerance(),
            "solve capped enclosing ball"
        );

        let mut solver = SolverState::new(points, capacity);
        let trace = solver.solve(self)?;

        let weights = solver.weights().clone();
        let objective = solver.objective(&weights);
        let radius = solver.radius(&weights);
        let support_indices = weights
            .iter()
            .enumerate()
            .filter(|(_, &u)| is_free(u, capacity))
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        tracing::debug!(
            iterations = trace.len(),
            radius = %radius,
            objective = %objective,
            nsupport = support_indices.len(),
            "converged"
        );

        Ok(SoftMdm {
            center: solver.center().clone(),
            radius,
            weights,
            objective,
            support_indices,
            capacity,
            trace,
        })
    }
}

/// Checks that `capacity * npoints >= 1` up to round-off and returns the capacity used by the
/// solver, at least `1 / npoints` so that uniform weights are feasible.
fn effective_capacity<F: Float>(capacity: F, npoints: usize) -> Result<F, F> {
    let m = F::cast(npoints);
    let slack = F::epsilon() * m;
    if capacity * m < F::one() - slack {
        return Err(SoftMdmError::InfeasibleCapacity { capacity, npoints });
    }

    let uniform = F::one() / m;
    if capacity < uniform {
        tracing::warn!(
            requested = %capacity,
            used = %uniform,
            "capacity below 1/m by round-off, raised to 1/m"
        );
        Ok(uniform)
    } else {
        Ok(capacity)
    }
}

/// Solve the capped enclosing-ball problem for the rows of `points`
///
/// This is a shorthand for `SoftMdm::params(capacity).tolerance(tolerance).fit(..)`. It keeps no
/// state between calls.
///
/// ```
/// use capball_mdm::soft_mdm;
/// use approx::assert_abs_diff_eq;
/// use ndarray::array;
///
/// let ball = soft_mdm(&array![[0., 0.], [10., 0.]], 1.0, 0.0).unwrap();
/// assert_abs_diff_eq!(ball.center(), &array![5., 0.]);
/// assert_abs_diff_eq!(ball.radius(), 5.);
/// ```
pub fn soft_mdm<F: Float, D: Data<Elem = F>>(
    points: &ArrayBase<D, Ix2>,
    capacity: F,
    tolerance: F,
) -> Result<SoftMdm<F>, F> {
    let dataset = DatasetBase::from(points.view());

    SoftMdm::params(capacity).tolerance(tolerance).fit(&dataset)
}

/// Returns true if the point lies inside or on the ball
impl<F: Float, D: Data<Elem = F>> Predict<&ArrayBase<D, Ix1>, bool> for SoftMdm<F> {
    fn predict(&self, point: &ArrayBase<D, Ix1>) -> bool {
        let dist = (point - &self.center).mapv(|x| x * x).sum().sqrt();
        dist <= self.radius
    }
}

/// Classify every row as inside (`true`) or outside the ball
impl<F: Float, D: Data<Elem = F>> Predict<&ArrayBase<D, Ix2>, Array1<bool>> for SoftMdm<F> {
    fn predict(&self, points: &ArrayBase<D, Ix2>) -> Array1<bool> {
        points
            .axis_iter(Axis(0))
            .map(|point| self.predict(&point))
            .collect()
    }
}

impl<F: Float, D: Data<Elem = F>> Predict<ArrayBase<D, Ix2>, Array1<bool>> for SoftMdm<F> {
    fn predict(&self, points: ArrayBase<D, Ix2>) -> Array1<bool> {
        self.predict(&points)
    }
}

impl<F: Float, D: Data<Elem = F>, T> Predict<&DatasetBase<ArrayBase<D, Ix2>, T>, Array1<bool>>
    for SoftMdm<F>
{
    fn predict(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Array1<bool> {
        self.predict(dataset.records())
    }
}
