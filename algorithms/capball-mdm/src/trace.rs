//! Per-iteration record of a soft MDM run
//!
//! Every iteration of the solver appends one [`Snapshot`] before the stopping test is evaluated,
//! so the last snapshot of a converged run always describes the returned ball. The trace is
//! meant for replaying a run step by step, for example to draw the ball at iteration `k` and mark
//! which points it covers.
use capball::Float;
use ndarray::{Array1, ArrayBase, Axis, Data, Ix1, Ix2};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Which bound decided the length of a step
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clip {
    /// The unconstrained line-search optimum was feasible
    LineSearch,
    /// The donor ran out of weight and dropped to zero
    DonorEmptied,
    /// The receiver hit the capacity
    ReceiverSaturated,
}

/// State of the solver at the start of one iteration
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<F: Float> {
    pub(crate) weights: Option<Array1<F>>,
    pub(crate) center: Array1<F>,
    pub(crate) gap: F,
    pub(crate) radius: F,
    pub(crate) clip: Option<Clip>,
    pub(crate) fallback: bool,
}

impl<F: Float> Snapshot<F> {
    /// Weight vector of this iteration, `None` when weights were not recorded
    pub fn weights(&self) -> Option<&Array1<F>> {
        self.weights.as_ref()
    }

    /// Weighted centroid of the points
    pub fn center(&self) -> &Array1<F> {
        &self.center
    }

    /// Duality gap between the pivot pair
    pub fn gap(&self) -> F {
        self.gap
    }

    /// Radius estimate `sqrt(-2 Q(u))`
    pub fn radius(&self) -> F {
        self.radius
    }

    /// How the step leaving this iteration was bounded, `None` for the final iteration or a
    /// failed line search
    pub fn clip(&self) -> Option<Clip> {
        self.clip
    }

    /// Whether the pivot pair came from the relaxed selection over saturated weights
    pub fn fallback(&self) -> bool {
        self.fallback
    }

    /// Returns true if `point` lies inside or on the ball of this iteration
    pub fn contains<D: Data<Elem = F>>(&self, point: &ArrayBase<D, Ix1>) -> bool {
        let dist = (point - &self.center).mapv(|x| x * x).sum().sqrt();
        dist <= self.radius
    }
}

/// Ordered list of snapshots, one per executed iteration
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Trace<F: Float> {
    snapshots: Vec<Snapshot<F>>,
}

impl<F: Float> Default for Trace<F> {
    fn default() -> Self {
        Trace {
            snapshots: Vec::new(),
        }
    }
}

impl<F: Float> Trace<F> {
    pub(crate) fn push(&mut self, snapshot: Snapshot<F>) {
        self.snapshots.push(snapshot);
    }

    /// Number of recorded iterations
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot of iteration `step`
    pub fn get(&self, step: usize) -> Option<&Snapshot<F>> {
        self.snapshots.get(step)
    }

    /// Snapshot of the last executed iteration
    pub fn last(&self) -> Option<&Snapshot<F>> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot<F>> {
        self.snapshots.iter()
    }

    /// Duality gaps in iteration order
    pub fn gaps(&self) -> Array1<F> {
        self.snapshots.iter().map(|s| s.gap).collect()
    }

    /// Radius estimates in iteration order
    pub fn radii(&self) -> Array1<F> {
        self.snapshots.iter().map(|s| s.radius).collect()
    }

    /// Classify every row of `points` as inside (`true`) or outside the ball of iteration `step`
    ///
    /// Returns `None` if `step` is past the end of the trace.
    pub fn classify_at<D: Data<Elem = F>>(
        &self,
        step: usize,
        points: &ArrayBase<D, Ix2>,
    ) -> Option<Array1<bool>> {
        let snapshot = self.get(step)?;

        Some(
            points
                .axis_iter(Axis(0))
                .map(|point| snapshot.contains(&point))
                .collect(),
        )
    }
}

impl<'a, F: Float> IntoIterator for &'a Trace<F> {
    type Item = &'a Snapshot<F>;
    type IntoIter = std::slice::Iter<'a, Snapshot<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clip, Snapshot, Trace};
    use ndarray::array;

    fn snapshot(center: [f64; 2], gap: f64, radius: f64) -> Snapshot<f64> {
        Snapshot {
            weights: None,
            center: array![center[0], center[1]],
            gap,
            radius,
            clip: Some(Clip::LineSearch),
            fallback: false,
        }
    }

    #[test]
    fn contains_includes_boundary() {
        let s = snapshot([0., 0.], 0., 5.);

        assert!(s.contains(&array![3., 4.]));
        assert!(s.contains(&array![0., 0.]));
        assert!(!s.contains(&array![5., 0.1]));
    }

    #[test]
    fn classify_replays_each_step() {
        let mut trace = Trace::default();
        trace.push(snapshot([0., 0.], 2., 1.));
        trace.push(snapshot([1., 0.], 0., 2.));

        let points = array![[0., 0.], [2.5, 0.], [-0.5, 0.]];

        assert_eq!(trace.classify_at(0, &points), Some(array![true, false, true]));
        assert_eq!(trace.classify_at(1, &points), Some(array![true, true, true]));
        assert_eq!(trace.classify_at(2, &points), None);
    }

    #[test]
    fn gaps_and_radii_follow_iteration_order() {
        let mut trace = Trace::default();
        assert!(trace.is_empty());

        trace.push(snapshot([0., 0.], 3., 1.));
        trace.push(snapshot([0., 0.], 1., 1.5));
        trace.push(snapshot([0., 0.], 0., 2.));

        assert_eq!(trace.len(), 3);
        assert_eq!(trace.gaps(), array![3., 1., 0.]);
        assert_eq!(trace.radii(), array![1., 1.5, 2.]);
        assert_eq!(trace.last().map(|s| s.gap()), Some(0.));
        assert_eq!((&trace).into_iter().count(), 3);
    }
}
