//!
//! # Decision tree learning
//! `quorum-trees` provides the tree classifiers used as weak learners by the `quorum`
//! ensembles.
//!
//! Decision Trees (DTs) are a non-parametric supervised learning method. The goal is to create a
//! model that predicts the class of a sample by learning simple decision rules inferred from the
//! data features.
//!
//! # Current state
//!
//! Two learners share the same [hyperparameters](DecisionTreeParams):
//!
//! * [`ClassificationTree`], a CART tree choosing the best Gini split
//! * [`ExtraTreeClassifier`], an extremely randomized tree cutting features at random thresholds
//!
//! Both estimate class probabilities and report the importance of the columns they split on, so
//! they can be bagged into a random forest or boosted as decision stumps.
//!

mod decision_trees;

pub use decision_trees::*;

pub use quorum::error::Result;
