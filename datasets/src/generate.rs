//! Utility functions for randomly generating point sets

use capball::{Dataset, DatasetBase};
use ndarray::{concatenate, Array, Array2, ArrayBase, Axis, Data, Ix1, Ix2, Zip};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{Normal, Uniform},
    RandomExt,
};

/// Sample `npoints` points uniformly from the axis-aligned box spanned by `lower` and `upper`.
///
/// The dimensionality of the points is the length of `lower`.
///
/// # Panics
///
/// If `lower` and `upper` have different lengths, or `lower[k] > upper[k]` for any axis.
pub fn uniform_box(
    npoints: usize,
    lower: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    upper: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    rng: &mut impl Rng,
) -> Dataset<f64> {
    assert_eq!(lower.len(), upper.len(), "box corners differ in dimension");

    let mut records: Array2<f64> =
        Array::random_using((npoints, lower.len()), Uniform::new(0., 1.), rng);
    for mut point in records.rows_mut() {
        Zip::from(&mut point)
            .and(lower)
            .and(upper)
            .for_each(|x, &lo, &hi| *x = lo + *x * (hi - lo));
    }

    DatasetBase::from(records)
}

/// Generate `blob_size` data points (a "blob") around `blob_centroid`, drawn from a normal
/// distribution with standard deviation `spread` on every axis.
///
/// # Panics
///
/// If `spread` is negative or not finite.
pub fn blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    spread: f64,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let distribution = Normal::new(0., spread).expect("spread must be finite and non-negative");
    let origin_blob: Array2<f64> = Array::random_using(shape, distribution, rng);
    origin_blob + blob_centroid
}

/// A gaussian blob with a set of planted outliers appended after it.
///
/// The first `blob_size` rows are the blob, the remaining rows are exactly the rows of `outliers`
/// in order, so their indices are `blob_size..blob_size + outliers.nrows()`.
///
/// # Panics
///
/// If `outliers` and `blob_centroid` differ in dimension, or `spread` is negative.
pub fn blob_with_outliers(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    spread: f64,
    outliers: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Dataset<f64> {
    let inliers = blob(blob_size, blob_centroid, spread, rng);
    let records = concatenate(Axis(0), &[inliers.view(), outliers.view()])
        .expect("outliers must match the blob dimension");

    DatasetBase::from(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use capball::Records;
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn uniform_box_respects_bounds() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let lower = array![-15., 0.];
        let upper = array![15., 3.];
        let dataset = uniform_box(200, &lower, &upper, &mut rng);

        assert_eq!(dataset.nsamples(), 200);
        assert_eq!(dataset.nfeatures(), 2);
        for point in dataset.records().rows() {
            assert!(point[0] >= -15. && point[0] <= 15.);
            assert!(point[1] >= 0. && point[1] <= 3.);
        }
    }

    #[test]
    fn uniform_box_is_reproducible() {
        let lower = array![0., 0., 0.];
        let upper = array![1., 1., 1.];
        let first = uniform_box(10, &lower, &upper, &mut Xoshiro256Plus::seed_from_u64(7));
        let second = uniform_box(10, &lower, &upper, &mut Xoshiro256Plus::seed_from_u64(7));

        assert_eq!(first.records(), second.records());
    }

    #[test]
    fn outliers_are_appended_last() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let outliers = array![[100., 100.], [-80., 40.]];
        let dataset = blob_with_outliers(20, &array![0., 0.], 0.5, &outliers, &mut rng);

        assert_eq!(dataset.nsamples(), 22);
        assert_eq!(dataset.records().row(20), outliers.row(0));
        assert_eq!(dataset.records().row(21), outliers.row(1));
    }

    #[test]
    fn blob_is_centered() {
        let mut rng = Xoshiro256Plus::seed_from_u64(11);
        let centroid = array![5., -5.];
        let points = blob(2000, &centroid, 1., &mut rng);
        let mean = points.mean_axis(Axis(0)).unwrap();

        approx::assert_abs_diff_eq!(mean, centroid, epsilon = 0.1);
    }
}
