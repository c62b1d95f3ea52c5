//! `quorum` combines many weak learners into a strong predictor.
//!
//! This crate holds the pieces shared by every learner of the workspace:
//!
//! * [`DatasetBase`](dataset::DatasetBase), a records/labels pair with the bootstrap
//!   resampling primitives used by ensembles
//! * the [`Learner`](traits::Learner) contract every weak learner and ensemble implements, with
//!   the optional [`Probabilistic`](traits::Probabilistic) and
//!   [`RanksFeatures`](traits::RanksFeatures) capabilities
//! * [`Probabilities`](probabilities::Probabilities) tables indexed by class
//! * the [`ParamGuard`] pattern for checked hyperparameters
//! * the shared [`Error`] taxonomy
//!
//! The ensemble algorithms themselves live in `quorum-ensemble`, the tree learners they are
//! usually combined with in `quorum-trees`.
//!
//! ## Example
//!
//! ```
//! use ndarray::array;
//! use quorum::prelude::*;
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let dataset = Dataset::new(array![[0., 1.], [1., 0.], [1., 1.]], array!["a", "b", "a"]);
//! assert_eq!(dataset.possible_outcomes(), vec!["a", "b"]);
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let subset = dataset.random_subset_with_replacement(5, &mut rng);
//! assert_eq!(subset.nsamples(), 5);
//! ```

pub mod benchmarks;
pub mod dataset;
pub mod error;
mod metrics_classification;
mod param_guard;
pub mod prelude;
pub mod probabilities;
pub mod traits;

pub use dataset::{Dataset, DatasetBase, DatasetView, Float, Label};
pub use error::Error;
pub use param_guard::ParamGuard;

/// Common metrics functions for classification
pub mod metrics {
    pub use crate::metrics_classification::{ConfusionMatrix, ToConfusionMatrix};
}
