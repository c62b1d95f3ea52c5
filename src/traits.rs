//! Provide traits for different classes of algorithms
//!

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView2};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::{AsLabels, DatasetBase, Float, Label};
use crate::error::Result;
use crate::probabilities::Probabilities;

/// The kind of task an estimator solves
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EstimatorType {
    Classifier,
    Regressor,
    Clusterer,
    AnomalyDetector,
}

/// Discriminates concrete learner families
///
/// Ensembles use the kind to decide whether a base learner can be combined: bagging only accepts
/// tree classifiers, boosting rejects learners which are ensembles themselves.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LearnerKind {
    ClassificationTree,
    ExtraTreeClassifier,
    AdaBoost,
    RandomForest,
    Other,
}

impl LearnerKind {
    /// Returns true for learners composed of other learners
    pub fn is_meta_estimator(&self) -> bool {
        matches!(self, LearnerKind::AdaBoost | LearnerKind::RandomForest)
    }
}

/// A trainable estimator
///
/// A learner value doubles as its own prototype: [`clone_untrained`](Learner::clone_untrained)
/// produces an independent copy with the same hyperparameters and no trained state, which is how
/// ensembles spawn their members.
pub trait Learner {
    type Float: Float;
    type Label: Label;

    fn kind(&self) -> LearnerKind;

    fn estimator_type(&self) -> EstimatorType;

    /// Returns an untrained copy sharing the hyperparameters of `self`
    fn clone_untrained(&self) -> Self
    where
        Self: Sized;

    fn is_trained(&self) -> bool;

    /// Replaces the seed of the learner's own randomness
    ///
    /// Ensembles call this on every member before training so that members cloned from one
    /// seeded prototype still draw different random sequences. Deterministic learners keep the
    /// default, which does nothing.
    fn reseed(&mut self, _seed: u64) {}

    /// Fits the learner in place
    ///
    /// Fails with `InvalidInput` when the dataset carries no labels or no samples.
    fn train<T: AsLabels<Self::Label>>(
        &mut self,
        dataset: &DatasetBase<Array2<Self::Float>, T>,
    ) -> Result<()>;

    /// Predicts one label per row, fails with `NotTrained` before `train`
    fn predict(&self, records: ArrayView2<'_, Self::Float>) -> Result<Array1<Self::Label>>;
}

/// Learners which estimate a probability for every class
pub trait Probabilistic: Learner {
    /// Returns one distribution per row, every row sums to one
    fn proba(&self, records: ArrayView2<'_, Self::Float>) -> Result<Probabilities<Self::Label>>;
}

/// Learners which score the importance of the feature columns they were trained on
pub trait RanksFeatures {
    /// Importance keyed by feature column
    ///
    /// Columns which played no role in the trained model may be absent.
    fn feature_importances(&self) -> Result<BTreeMap<usize, f64>>;
}
