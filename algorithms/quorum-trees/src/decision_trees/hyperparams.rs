use quorum::{
    error::{Error, Result},
    ParamGuard,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// The set of hyperparameters shared by [`ClassificationTree`](crate::ClassificationTree) and
/// [`ExtraTreeClassifier`](crate::ExtraTreeClassifier).
///
/// ### Example
///
/// ```rust
/// use quorum::prelude::*;
/// use quorum_trees::ClassificationTree;
///
/// // A decision stump, the usual weak learner for boosting
/// let params = ClassificationTree::<f64, usize>::params().max_depth(Some(1));
/// let stump = ClassificationTree::<f64, usize>::new(params).unwrap();
/// assert!(!stump.is_trained());
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionTreeValidParams {
    max_depth: Option<usize>,
    max_leaf_size: usize,
    min_purity_increase: f64,
    max_features: Option<usize>,
    seed: Option<u64>,
}

impl Default for DecisionTreeValidParams {
    fn default() -> Self {
        DecisionTreeValidParams {
            max_depth: None,
            max_leaf_size: 3,
            min_purity_increase: 1e-7,
            max_features: None,
            seed: None,
        }
    }
}

impl DecisionTreeValidParams {
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn max_leaf_size(&self) -> usize {
        self.max_leaf_size
    }

    pub fn min_purity_increase(&self) -> f64 {
        self.min_purity_increase
    }

    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub(crate) fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionTreeParams(DecisionTreeValidParams);

impl DecisionTreeParams {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `max_depth = None`
    /// * `max_leaf_size = 3`
    /// * `min_purity_increase = 1e-7`
    /// * `max_features = None`
    /// * `seed = None`
    pub fn new() -> Self {
        Self(DecisionTreeValidParams::default())
    }

    /// Sets the optional limit to the depth of the tree, a depth of one grows a stump
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the number of samples a node may hold and still become a leaf without splitting
    pub fn max_leaf_size(mut self, max_leaf_size: usize) -> Self {
        self.0.max_leaf_size = max_leaf_size;
        self
    }

    /// Sets the minimum decrease in Gini impurity a split needs to be applied
    pub fn min_purity_increase(mut self, min_purity_increase: f64) -> Self {
        self.0.min_purity_increase = min_purity_increase;
        self
    }

    /// Sets the number of randomly chosen feature columns considered at each split
    ///
    /// `None` considers every column.
    pub fn max_features(mut self, max_features: Option<usize>) -> Self {
        self.0.max_features = max_features;
        self
    }

    /// Seeds the random number generator used for feature subsampling and random thresholds
    ///
    /// Unseeded learners draw a fresh seed from the operating system on every `train` call.
    /// Ensembles overwrite the seed of every member they grow with one drawn from their own
    /// generator, so members cloned from the same seeded tree still differ.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.0.seed = seed;
        self
    }
}

impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamGuard for DecisionTreeParams {
    type Checked = DecisionTreeValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.max_depth == Some(0) {
            Err(Error::InvalidArgument(
                "Maximum depth should be at least one".to_string(),
            ))
        } else if self.0.max_leaf_size < 1 {
            Err(Error::InvalidArgument(format!(
                "Maximum leaf size should be at least one, but was {}",
                self.0.max_leaf_size
            )))
        } else if !(self.0.min_purity_increase >= 0.0 && self.0.min_purity_increase.is_finite()) {
            Err(Error::InvalidArgument(format!(
                "Minimum purity increase should be finite and non-negative, but was {}",
                self.0.min_purity_increase
            )))
        } else if self.0.max_features == Some(0) {
            Err(Error::InvalidArgument(
                "Maximum features should be at least one".to_string(),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
