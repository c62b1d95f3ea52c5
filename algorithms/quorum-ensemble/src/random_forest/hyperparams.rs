use quorum::{
    error::{Error, Result},
    traits::{Learner, LearnerKind},
    ParamGuard,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::RandomForest;

/// Learner families a random forest can be grown from
pub const COMPATIBLE_LEARNERS: [LearnerKind; 2] = [
    LearnerKind::ClassificationTree,
    LearnerKind::ExtraTreeClassifier,
];

#[derive(Clone, Debug, PartialEq)]
pub struct RandomForestValidParams<B, R> {
    base: B,
    n_estimators: usize,
    ratio: f64,
    rng: R,
}

impl<B, R> RandomForestValidParams<B, R> {
    /// Prototype every member is cloned from
    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<B: Learner, R: Clone> RandomForestValidParams<B, R> {
    /// Copies the hyperparameters with an untrained base and the current generator state
    pub(crate) fn clone_untrained(&self) -> Self {
        RandomForestValidParams {
            base: self.base.clone_untrained(),
            n_estimators: self.n_estimators,
            ratio: self.ratio,
            rng: self.rng.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RandomForestParams<B, R = SmallRng>(RandomForestValidParams<B, R>);

impl<B> RandomForestParams<B, SmallRng> {
    pub fn new(base: B) -> RandomForestParams<B, SmallRng> {
        Self::new_fixed_rng(base, SmallRng::from_entropy())
    }
}

impl<B, R: Rng + Clone> RandomForestParams<B, R> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `n_estimators = 100`
    /// * `ratio = 0.1`
    pub fn new_fixed_rng(base: B, rng: R) -> RandomForestParams<B, R> {
        Self(RandomForestValidParams {
            base,
            n_estimators: 100,
            ratio: 0.1,
            rng,
        })
    }

    /// Sets the number of trees in the forest
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.0.n_estimators = n_estimators;
        self
    }

    /// Sets the size of every bootstrap subset as a fraction of the training set
    pub fn ratio(mut self, ratio: f64) -> Self {
        self.0.ratio = ratio;
        self
    }
}

impl<B: Learner> RandomForest<B, SmallRng> {
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params(base: B) -> RandomForestParams<B, SmallRng> {
        RandomForestParams::new(base)
    }
}

impl<B: Learner, R> ParamGuard for RandomForestParams<B, R> {
    type Checked = RandomForestValidParams<B, R>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let kind = self.0.base.kind();

        if !COMPATIBLE_LEARNERS.contains(&kind) {
            Err(Error::InvalidArgument(format!(
                "Base learner must be one of {:?}, but was {:?}",
                COMPATIBLE_LEARNERS, kind
            )))
        } else if self.0.n_estimators < 1 {
            Err(Error::InvalidArgument(format!(
                "Number of estimators should be at least one, but was {}",
                self.0.n_estimators
            )))
        } else if !(0.01..=1.0).contains(&self.0.ratio) {
            Err(Error::InvalidArgument(format!(
                "Ratio should be between 0.01 and 1, but was {}",
                self.0.ratio
            )))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
