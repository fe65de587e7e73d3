//! `capball` provides the shared building blocks for capped-weight enclosing-ball solvers
//! written in Rust.
//!
//! A capped (or "soft") enclosing ball is the smallest ball whose center is a weighted mean of
//! the input points, where no point may carry more than a fixed share `c` of the total weight.
//! With `c >= 1` the cap never binds and the problem is the classical minimum enclosing ball;
//! smaller caps limit the influence of any single point and make the ball robust to outliers.
//!
//! ## Crates
//!
//! * `capball` (this crate): the [`Float`] bound, point sets ([`Dataset`]), the [`Fit`] and
//! [`Predict`](traits::Predict) traits and hyperparameter checking with [`ParamGuard`].
//! * `capball-mdm`: the soft Minimal-Distance-Method solver.
//! * `capball-datasets`: seeded synthetic point clouds for tests and benchmarks.
//!
//! ## Example
//!
//! ```ignore
//! use capball::prelude::*;
//! use capball_mdm::SoftMdm;
//!
//! let points = Dataset::from_rows(&[[0., 0.], [2., 0.], [0., 2.], [2., 2.]])?;
//! let ball = SoftMdm::params(1.0).fit(&points)?;
//! println!("{}", ball);
//! ```

pub mod dataset;
pub mod error;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Dataset, DatasetBase, DatasetView, Float, Records};
pub use error::Error;
pub use param_guard::ParamGuard;
pub use traits::Fit;
