//! # Ensemble Learning Algorithms
//!
//! Ensemble methods combine the predictions of several base estimators built with a given
//! learning algorithm in order to improve generalizability / robustness over a single estimator.
//! Any type implementing [`Learner`](quorum::traits::Learner) can act as base estimator, the
//! ensembles clone it with `clone_untrained` for every member they grow.
//!
//! ## Random Forest
//!
//! [`RandomForest`] is a bagging ensemble: decision trees (see `quorum-trees`) trained on
//! bootstrap subsets of the same training set, whose class probabilities are averaged.
//!
//! ## AdaBoost
//!
//! [`AdaBoost`] trains weak learners one after another with the multiclass SAMME algorithm,
//! every round focusing on the samples its predecessors misclassified. Predictions are an
//! influence weighted vote of the rounds.
//!
//! ## Reference
//!
//! * [Scikit-Learn User Guide](https://scikit-learn.org/stable/modules/ensemble.html)
//! * Zhu, Zou, Rosset, Hastie, [Multi-class AdaBoost](https://hastie.su.domains/Papers/samme.pdf)
//!
//! ## Example
//!
//! This example shows how to train a random forest of 50 trees, each trained on a bootstrap
//! subset holding 70% as many rows as the training data.
//!
//! ```no_run
//! use ndarray::array;
//! use quorum::prelude::*;
//! use quorum_ensemble::RandomForest;
//! use quorum_trees::ClassificationTree;
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let centroids = array![[0., 0.], [5., 5.], [5., 0.]];
//! let (train, test) = quorum_datasets::generate::labeled_blobs(100, &centroids, &mut rng)
//!     .shuffle(&mut rng)
//!     .split_with_ratio(0.8);
//!
//! let params = RandomForest::params(ClassificationTree::<f64, usize>::default())
//!     .n_estimators(50)
//!     .ratio(0.7);
//! let mut forest = RandomForest::new(params).unwrap();
//! forest.train(&train).unwrap();
//!
//! let predictions = forest.predict(test.records().view()).unwrap();
//! ```
//!
mod adaboost;
pub mod aggregate;
mod random_forest;

pub use adaboost::*;
pub use random_forest::*;
