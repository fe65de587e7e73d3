//! # Soft Minimal-Distance-Method
//!
//! `capball-mdm` computes capped-weight minimum enclosing balls. Given `m` points and a capacity
//! `c` with `c * m >= 1`, it finds weights `0 <= u_i <= c` summing to one, whose weighted centroid
//! is the center of the smallest ball the weights can support. The problem is the one-class data
//! description quadratic program: with `c >= 1` it is the classical minimum enclosing ball, with
//! smaller `c` far away points are capped and left outside.
//!
//! More details on the underlying Minimal-Distance-Method can be found in the documentation of
//! [`SoftMdm`].
//!
//! # The solver
//! The dual is solved with an active-set pairwise method, similar in spirit to Sequential
//! Minimal Optimization. In each step it performs:
//!
//! 1. Find the free points (weight strictly inside `(0, c)`) farthest from and closest to the
//!    current center
//! 2. Stop if their duality gap is within the tolerance
//! 3. Move weight from the closest to the farthest point with an exact, box-clipped line search
//!
//! Every iteration is recorded in a [`Trace`], so runs can be replayed step by step.
//!
//! # Example
//! ```
//! use capball::prelude::*;
//! use capball_mdm::SoftMdm;
//! use ndarray::array;
//!
//! // a tight cluster and one far outlier
//! let points = array![[0., 0.], [1., 0.], [0., 1.], [1., 1.], [0.5, 0.5], [40., 40.]];
//! let dataset = DatasetBase::from(points);
//!
//! let ball = SoftMdm::params(0.25)
//!     .tolerance(1e-9)
//!     .fit(&dataset)
//!     .unwrap();
//!
//! // the outlier is capped and not part of the support
//! assert_eq!(ball.weights()[5], 0.25);
//! assert!(!ball.support_indices().contains(&5));
//! println!("{}", ball);
//! ```
//!
//! # Logging
//! The solver emits `tracing` events: `debug` at start and end of a solve, `trace` for every
//! weight transfer and `warn` for the boundary fallback and numeric breakdowns. No subscriber is
//! installed by the library.

mod algorithm;
pub mod error;
mod hyperparams;
pub mod pivot;
pub mod solver_mdm;
pub mod trace;

pub use algorithm::{soft_mdm, SoftMdm};
pub use error::{Result, SoftMdmError, SoftMdmParamsError};
pub use hyperparams::{SoftMdmParams, SoftMdmValidParams};
pub use trace::{Clip, Snapshot, Trace};
