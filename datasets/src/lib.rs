//! `capball-datasets` provides synthetic point clouds ready to be used in tests, benchmarks and
//! demos.
//!
//! ## The Big Picture
//!
//! `capball-datasets` is a crate in the `capball` workspace. All generators take an explicit
//! random number generator, so a seeded generator always reproduces the same point set.
//!
//! ## Current State
//!
//! The following generators are provided in [`generate`]:
//!
//! * [`uniform_box`](generate::uniform_box): points sampled uniformly from an axis-aligned box
//! * [`blob`](generate::blob): a gaussian cloud around a centroid
//! * [`blob_with_outliers`](generate::blob_with_outliers): a gaussian cloud followed by planted
//! outliers at known indices
//!
//! ## Using a generator
//!
//! ```
//! use capball::Records;
//! use capball_datasets::generate;
//! use ndarray::array;
//! use ndarray_rand::rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256Plus;
//!
//! let mut rng = Xoshiro256Plus::seed_from_u64(42);
//! let points = generate::uniform_box(100, &array![-15., -15.], &array![15., 15.], &mut rng);
//! assert_eq!(points.nsamples(), 100);
//! ```

pub mod generate;
