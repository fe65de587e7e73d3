use capball::Float;
use ndarray::{ArrayBase, Data, Ix1};

/// Pair of points exchanging weight in one iteration
///
/// `receiver` is the point farthest from the current center among the candidates and gains
/// weight, `donor` is the closest one and loses the same amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pivot<F: Float> {
    pub receiver: usize,
    pub donor: usize,
    /// `d[donor] - d[receiver]`, zero certifies optimality
    pub gap: F,
    /// Selected from the relaxed candidate sets because no weight was strictly inside its bounds
    pub fallback: bool,
}

/// Returns true if `weight` lies strictly between zero and `capacity`
pub fn is_free<F: Float>(weight: F, capacity: F) -> bool {
    weight > F::zero() && weight < capacity
}

/// Select the pivot pair of the current iteration
///
/// `distances` holds the proxy `d_i = <p_i, x> - |p_i|^2 / 2`, smaller values mean the point is
/// farther away from the center. The receiver minimizes and the donor maximizes `d` over the
/// active set `{i : 0 < u_i < capacity}`. Ties go to the lowest index.
///
/// If the active set is empty every weight sits exactly on a bound. The selection is then
/// repeated with one-sided candidate sets: receivers are all weights below the capacity, donors
/// all weights above zero. Without any receiver (all weights equal `capacity`) the gap is zero.
///
/// Returns `None` if no donor exists, which is impossible for weights on the simplex.
pub fn select_pivot<F: Float, D1, D2>(
    weights: &ArrayBase<D1, Ix1>,
    distances: &ArrayBase<D2, Ix1>,
    capacity: F,
) -> Option<Pivot<F>>
where
    D1: Data<Elem = F>,
    D2: Data<Elem = F>,
{
    let active = |u: F| is_free(u, capacity);
    if let Some((receiver, donor)) = extremes(weights, distances, active, active) {
        return Some(Pivot {
            receiver,
            donor,
            gap: distances[donor] - distances[receiver],
            fallback: false,
        });
    }

    let can_grow = |u: F| u < capacity;
    let can_shrink = |u: F| u > F::zero();
    match extremes(weights, distances, can_grow, can_shrink) {
        Some((receiver, donor)) => Some(Pivot {
            receiver,
            donor,
            gap: distances[donor] - distances[receiver],
            fallback: true,
        }),
        None => {
            let donor = argmax_where(weights, distances, can_shrink)?;
            Some(Pivot {
                receiver: donor,
                donor,
                gap: F::zero(),
                fallback: true,
            })
        }
    }
}

fn extremes<F: Float, D1, D2>(
    weights: &ArrayBase<D1, Ix1>,
    distances: &ArrayBase<D2, Ix1>,
    receivers: impl Fn(F) -> bool,
    donors: impl Fn(F) -> bool,
) -> Option<(usize, usize)>
where
    D1: Data<Elem = F>,
    D2: Data<Elem = F>,
{
    let receiver = argmin_where(weights, distances, receivers)?;
    let donor = argmax_where(weights, distances, donors)?;

    Some((receiver, donor))
}

fn argmin_where<F: Float, D1, D2>(
    weights: &ArrayBase<D1, Ix1>,
    distances: &ArrayBase<D2, Ix1>,
    candidate: impl Fn(F) -> bool,
) -> Option<usize>
where
    D1: Data<Elem = F>,
    D2: Data<Elem = F>,
{
    let mut best: Option<(usize, F)> = None;
    for (i, (&u, &d)) in weights.iter().zip(distances.iter()).enumerate() {
        if !candidate(u) {
            continue;
        }
        match best {
            Some((_, b)) if d >= b => {}
            _ => best = Some((i, d)),
        }
    }

    best.map(|(i, _)| i)
}

fn argmax_where<F: Float, D1, D2>(
    weights: &ArrayBase<D1, Ix1>,
    distances: &ArrayBase<D2, Ix1>,
    candidate: impl Fn(F) -> bool,
) -> Option<usize>
where
    D1: Data<Elem = F>,
    D2: Data<Elem = F>,
{
    let mut best: Option<(usize, F)> = None;
    for (i, (&u, &d)) in weights.iter().zip(distances.iter()).enumerate() {
        if !candidate(u) {
            continue;
        }
        match best {
            Some((_, b)) if d <= b => {}
            _ => best = Some((i, d)),
        }
    }

    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::{is_free, select_pivot, Pivot};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn free_weights_exclude_bounds() {
        assert!(is_free(0.1, 0.5));
        assert!(!is_free(0.0, 0.5));
        assert!(!is_free(0.5, 0.5));
        assert!(!is_free(f64::NAN, 0.5));
    }

    #[test]
    fn picks_extremes_of_active_set() {
        let weights = array![0.25, 0.25, 0.25, 0.25];
        let distances = array![-3., 1., -1., 2.];

        let pivot = select_pivot(&weights, &distances, 1.).unwrap();
        assert_eq!(pivot.receiver, 0);
        assert_eq!(pivot.donor, 3);
        assert_abs_diff_eq!(pivot.gap, 5.);
        assert!(!pivot.fallback);
    }

    #[test]
    fn saturated_weights_are_skipped() {
        // point 0 is at the cap and point 3 is empty, neither may pivot
        let weights = array![0.4, 0.3, 0.3, 0.0];
        let distances = array![-9., -1., 1., 9.];

        let pivot = select_pivot(&weights, &distances, 0.4).unwrap();
        assert_eq!(
            pivot,
            Pivot {
                receiver: 1,
                donor: 2,
                gap: 2.,
                fallback: false
            }
        );
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let weights = array![0.2, 0.2, 0.2, 0.2, 0.2];
        let distances = array![1., -2., 4., -2., 4.];

        let pivot = select_pivot(&weights, &distances, 1.).unwrap();
        assert_eq!(pivot.receiver, 1);
        assert_eq!(pivot.donor, 2);
    }

    #[test]
    fn single_active_weight_has_zero_gap() {
        let weights = array![0.6, 0.4, 0.0];
        let distances = array![-1., 3., 7.];

        // only point 1 is strictly inside (0, 0.6)
        let pivot = select_pivot(&weights, &distances, 0.6).unwrap();
        assert_eq!(pivot.receiver, pivot.donor);
        assert_eq!(pivot.gap, 0.);
    }

    #[test]
    fn all_weights_at_capacity_converge() {
        let weights = array![0.25, 0.25, 0.25, 0.25];
        let distances = array![-3., 1., -1., 2.];

        let pivot = select_pivot(&weights, &distances, 0.25).unwrap();
        assert_eq!(pivot.gap, 0.);
        assert!(pivot.fallback);
    }

    #[test]
    fn fallback_moves_mass_between_bounds() {
        // every weight is on a bound, but point 2 can still receive from point 0
        let weights = array![0.5, 0.5, 0.0, 0.0];
        let distances = array![2., 1., -4., 0.];

        let pivot = select_pivot(&weights, &distances, 0.5).unwrap();
        assert_eq!(pivot.receiver, 2);
        assert_eq!(pivot.donor, 0);
        assert_abs_diff_eq!(pivot.gap, 6.);
        assert!(pivot.fallback);
    }

    #[test]
    fn broken_weights_have_no_pivot() {
        let weights = array![f64::NAN, f64::NAN];
        let distances = array![0., 1.];

        assert_eq!(select_pivot(&weights, &distances, 1.), None);
    }
}
