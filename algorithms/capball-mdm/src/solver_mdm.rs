use crate::error::{Result, SoftMdmError};
use crate::pivot::{select_pivot, Pivot};
use crate::trace::{Clip, Snapshot, Trace};
use crate::SoftMdmValidParams;

use capball::Float;
use ndarray::{Array1, ArrayBase, ArrayView2, Axis, Data, Ix1};

/// Length of a weight transfer and the bound which decided it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step<F: Float> {
    pub size: F,
    pub clip: Clip,
}

/// Current state of the soft MDM solver
///
/// We are solving the dual problem of the capped enclosing ball
/// min_u Q(u) = u^T P P^T u / 2 - b^T u, s.t. sum(u) = 1, 0 <= u_i <= c
/// where b_i = |p_i|^2 / 2. The weighted centroid x = P^T u is the center of the ball and
/// -2 Q(u) its squared radius.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverState<'a, F: Float> {
    /// Point set, one point per row
    points: ArrayView2<'a, F>,
    /// Half squared norm of every point
    b: Array1<F>,
    /// Upper bound per weight
    capacity: F,

    /// Current weights, summing to one
    weights: Array1<F>,
    /// Weighted centroid of the current weights
    center: Array1<F>,
}

impl<'a, F: Float> SolverState<'a, F> {
    /// Initialize a solver state with uniform weights `1 / m`
    pub fn new(points: ArrayView2<'a, F>, capacity: F) -> SolverState<'a, F> {
        let npoints = points.nrows();
        let weights = Array1::from_elem(npoints, F::one() / F::cast(npoints));

        SolverState::from_weights(points, capacity, weights)
    }

    /// Initialize a solver state from given starting weights
    ///
    /// The weights should lie in the capped simplex. Weights which leave no pivot pair make
    /// `solve` fail with `InfeasibleOrDegenerate`.
    pub fn from_weights(
        points: ArrayView2<'a, F>,
        capacity: F,
        weights: Array1<F>,
    ) -> SolverState<'a, F> {
        let nfeatures = points.ncols();
        let b = points
            .axis_iter(Axis(0))
            .map(|p| F::cast(0.5) * p.dot(&p))
            .collect::<Array1<F>>();

        let mut state = SolverState {
            points,
            b,
            capacity,
            center: Array1::zeros(nfeatures),
            weights,
        };
        state.center = state.centroid(&state.weights);

        state
    }

    /// Return the current weights
    pub fn weights(&self) -> &Array1<F> {
        &self.weights
    }

    /// Return the current center
    pub fn center(&self) -> &Array1<F> {
        &self.center
    }

    /// Return the weight cap
    pub fn capacity(&self) -> F {
        self.capacity
    }

    /// Weighted centroid `sum(u_i p_i) / sum(u)`
    pub fn centroid<D: Data<Elem = F>>(&self, weights: &ArrayBase<D, Ix1>) -> Array1<F> {
        let total = weights.sum();
        debug_assert!(
            total.is_nan() || (total - F::one()).abs() < F::cast(1e-6),
            "weights drifted off the simplex, sum = {}",
            total
        );

        self.points.t().dot(weights) / total
    }

    /// Distance proxy `d_i = <p_i, x> - b_i` for every point
    ///
    /// Since `|p_i - x|^2 = 2 b_i - 2 d_i + |x|^2`, smaller values are farther from `x`.
    pub fn distances<D: Data<Elem = F>>(&self, center: &ArrayBase<D, Ix1>) -> Array1<F> {
        self.points.dot(center) - &self.b
    }

    /// Dual objective `Q(u) = |P^T u|^2 / 2 - b^T u`
    pub fn objective<D: Data<Elem = F>>(&self, weights: &ArrayBase<D, Ix1>) -> F {
        let x = self.points.t().dot(weights);
        F::cast(0.5) * x.dot(&x) - self.b.dot(weights)
    }

    /// Radius estimate `sqrt(-2 Q(u))`
    ///
    /// Round-off can push `Q` slightly above zero for tiny balls, the radius is clamped to zero
    /// in that case.
    pub fn radius<D: Data<Elem = F>>(&self, weights: &ArrayBase<D, Ix1>) -> F {
        let squared = -F::cast(2.) * self.objective(weights);
        squared.max(F::zero()).sqrt()
    }

    /// Exact line search along `e_receiver - e_donor`, clipped to the feasible box
    ///
    /// Returns `None` if both pivot points coincide or their squared distance is not finite.
    pub fn line_search(&self, pivot: &Pivot<F>) -> Option<Step<F>> {
        let diff = &self.points.row(pivot.receiver) - &self.points.row(pivot.donor);
        let curvature = diff.dot(&diff);
        if curvature <= F::zero() || !curvature.is_finite() {
            return None;
        }

        let optimal = pivot.gap / curvature;
        let available = self.weights[pivot.donor];
        let headroom = self.capacity - self.weights[pivot.receiver];

        let step = if available <= optimal && available <= headroom {
            Step {
                size: available,
                clip: Clip::DonorEmptied,
            }
        } else if headroom <= optimal {
            Step {
                size: headroom,
                clip: Clip::ReceiverSaturated,
            }
        } else {
            Step {
                size: optimal,
                clip: Clip::LineSearch,
            }
        };

        Some(step)
    }

    /// Move `step.size` weight from the donor to the receiver and refresh the center
    ///
    /// A bound that decided the step is hit exactly, so saturated weights stay on their bound.
    pub fn transfer(&mut self, pivot: &Pivot<F>, step: &Step<F>) {
        let mut weights = self.weights.clone();
        let (receiver, donor) = (pivot.receiver, pivot.donor);

        weights[receiver] += step.size;
        weights[donor] -= step.size;

        match step.clip {
            Clip::DonorEmptied => {
                weights[donor] = F::zero();
                if step.size == self.capacity - self.weights[receiver] {
                    weights[receiver] = self.capacity;
                }
            }
            Clip::ReceiverSaturated => weights[receiver] = self.capacity,
            Clip::LineSearch => {}
        }

        let center = self.centroid(&weights);
        self.weights = weights;
        self.center = center;
    }

    fn snapshot(&self, pivot: &Pivot<F>, clip: Option<Clip>, record_weights: bool) -> Snapshot<F> {
        Snapshot {
            weights: if record_weights {
                Some(self.weights.clone())
            } else {
                None
            },
            center: self.center.clone(),
            gap: pivot.gap,
            radius: self.radius(&self.weights),
            clip,
            fallback: pivot.fallback,
        }
    }

    /// Iterate until the duality gap is within the tolerance
    ///
    /// Every iteration records one snapshot before the stopping test, the last snapshot of a
    /// converged run therefore matches the final weights.
    pub fn solve(&mut self, params: &SoftMdmValidParams<F>) -> Result<Trace<F>, F> {
        let mut trace = Trace::default();
        let tolerance = params.tolerance();

        loop {
            let iteration = trace.len();
            let distances = self.distances(&self.center);
            let pivot = match select_pivot(&self.weights, &distances, self.capacity) {
                Some(pivot) => pivot,
                None => {
                    tracing::warn!(iteration, "no pivot pair left, weights are not feasible");
                    return Err(SoftMdmError::InfeasibleOrDegenerate { iteration, trace });
                }
            };
            if pivot.fallback {
                tracing::warn!(
                    iteration,
                    receiver = pivot.receiver,
                    donor = pivot.donor,
                    "active set is empty, pivot taken from weights on the bounds"
                );
            }

            if pivot.gap <= tolerance {
                trace.push(self.snapshot(&pivot, None, params.record_weights()));
                return Ok(trace);
            }

            let step = self.line_search(&pivot);
            trace.push(self.snapshot(
                &pivot,
                step.map(|s| s.clip),
                params.record_weights(),
            ));

            let step = match step {
                Some(step) => step,
                None => {
                    tracing::warn!(
                        iteration,
                        receiver = pivot.receiver,
                        donor = pivot.donor,
                        "pivot points coincide or are not finite, line search is undefined"
                    );
                    return Err(SoftMdmError::DegeneratePivot {
                        iteration,
                        receiver: pivot.receiver,
                        donor: pivot.donor,
                        trace,
                    });
                }
            };

            tracing::trace!(
                iteration,
                gap = %pivot.gap,
                receiver = pivot.receiver,
                donor = pivot.donor,
                step = %step.size,
                clip = ?step.clip,
                "transfer weight"
            );

            self.transfer(&pivot, &step);

            if let Some(max_iterations) = params.max_iterations() {
                if trace.len() as u64 >= max_iterations {
                    tracing::warn!(iterations = trace.len(), "iteration cap reached");
                    return Err(SoftMdmError::NotConverged {
                        iterations: trace.len(),
                        trace,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SolverState, Step};
    use crate::pivot::Pivot;
    use crate::trace::Clip;
    use crate::SoftMdm;
    use approx::assert_abs_diff_eq;
    use capball::ParamGuard;
    use ndarray::array;

    #[test]
    fn uniform_start() {
        let points = array![[0., 0.], [2., 0.], [0., 2.], [2., 2.]];
        let state = SolverState::new(points.view(), 1.);

        assert_abs_diff_eq!(state.weights(), &array![0.25, 0.25, 0.25, 0.25]);
        assert_abs_diff_eq!(state.center(), &array![1., 1.]);
    }

    #[test]
    fn distance_proxy_orders_by_distance() {
        let points = array![[0., 0.], [1., 0.], [5., 0.]];
        let state = SolverState::new(points.view(), 1.);
        let x = array![0., 0.];

        // d_i = -|p_i|^2 / 2 around the origin
        assert_abs_diff_eq!(state.distances(&x), array![0., -0.5, -12.5]);
    }

    #[test]
    fn derived_quantities_are_pure() {
        let points: ndarray::Array2<f64> = array![[0.3, -1.7, 2.2], [4.1, 0.9, -0.4], [-2.6, 3.3, 1.1]];
        let state = SolverState::new(points.view(), 0.5);
        let u = array![0.2, 0.5, 0.3];

        let x = state.centroid(&u);
        assert_eq!(x, state.centroid(&u));
        assert_eq!(state.distances(&x), state.distances(&x));
        assert_eq!(state.objective(&u).to_bits(), state.objective(&u).to_bits());
    }

    #[test]
    fn radius_matches_weighted_variance() {
        let points = array![[0., 0.], [10., 0.]];
        let state = SolverState::new(points.view(), 1.);

        assert_abs_diff_eq!(state.objective(state.weights()), -12.5);
        assert_abs_diff_eq!(state.radius(state.weights()), 5.);
    }

    #[test]
    fn line_search_takes_unconstrained_optimum() {
        let points = array![[0., 0.], [4., 0.], [1., 0.]];
        let state = SolverState::new(points.view(), 1.);
        let pivot = Pivot {
            receiver: 1,
            donor: 2,
            gap: 0.9,
            fallback: false,
        };

        let step = state.line_search(&pivot).unwrap();
        assert_eq!(step.clip, Clip::LineSearch);
        assert_abs_diff_eq!(step.size, 0.1);
    }

    #[test]
    fn line_search_clips_to_donor_mass() {
        let points = array![[0., 0.], [1., 0.]];
        let state = SolverState::new(points.view(), 1.);
        let pivot = Pivot {
            receiver: 1,
            donor: 0,
            gap: 10.,
            fallback: false,
        };

        let step = state.line_search(&pivot).unwrap();
        assert_eq!(step.clip, Clip::DonorEmptied);
        assert_abs_diff_eq!(step.size, 0.5);
    }

    #[test]
    fn line_search_clips_to_headroom() {
        let points = array![[0., 0.], [1., 0.], [2., 0.], [3., 0.]];
        let state = SolverState::new(points.view(), 0.3);
        let pivot = Pivot {
            receiver: 3,
            donor: 0,
            gap: 100.,
            fallback: false,
        };

        let step = state.line_search(&pivot).unwrap();
        assert_eq!(step.clip, Clip::ReceiverSaturated);
        assert_abs_diff_eq!(step.size, 0.05);
    }

    #[test]
    fn coinciding_pivots_have_no_step() {
        let points = array![[1., 1.], [1., 1.], [0., 0.]];
        let state = SolverState::new(points.view(), 1.);
        let pivot = Pivot {
            receiver: 0,
            donor: 1,
            gap: 1.,
            fallback: false,
        };

        assert_eq!(state.line_search(&pivot), None);
    }

    #[test]
    fn transfer_hits_bounds_exactly() {
        let points = array![[0., 0.], [1., 0.], [2., 0.], [3., 0.]];
        let mut state = SolverState::new(points.view(), 0.3);
        let pivot = Pivot {
            receiver: 3,
            donor: 0,
            gap: 100.,
            fallback: false,
        };

        state.transfer(
            &pivot,
            &Step {
                size: 0.05,
                clip: Clip::ReceiverSaturated,
            },
        );

        assert_eq!(state.weights()[3], 0.3);
        assert_abs_diff_eq!(state.weights()[0], 0.2);
        assert_abs_diff_eq!(state.weights().sum(), 1.);
        assert_abs_diff_eq!(state.center(), &array![1.65, 0.], epsilon = 1e-12);
    }

    #[test]
    fn solve_symmetric_square_in_one_iteration() {
        let points = array![[0., 0.], [2., 0.], [0., 2.], [2., 2.]];
        let params = SoftMdm::params(1.).check().unwrap();
        let mut state = SolverState::new(points.view(), 1.);

        let trace = state.solve(&params).unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.gaps(), array![0.]);
    }
}
