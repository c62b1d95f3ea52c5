use quorum::{
    error::{Error, Result},
    traits::{EstimatorType, Learner},
    ParamGuard,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::AdaBoost;

#[derive(Clone, Debug, PartialEq)]
pub struct AdaBoostValidParams<B, R> {
    base: B,
    n_estimators: usize,
    learning_rate: f64,
    ratio: f64,
    tolerance: f64,
    rng: R,
}

impl<B, R> AdaBoostValidParams<B, R> {
    /// Prototype every boosting round is cloned from
    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<B: Learner, R: Clone> AdaBoostValidParams<B, R> {
    pub(crate) fn clone_untrained(&self) -> Self {
        AdaBoostValidParams {
            base: self.base.clone_untrained(),
            rng: self.rng.clone(),
            ..*self
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdaBoostParams<B, R = SmallRng>(AdaBoostValidParams<B, R>);

impl<B> AdaBoostParams<B, SmallRng> {
    pub fn new(base: B) -> AdaBoostParams<B, SmallRng> {
        Self::new_fixed_rng(base, SmallRng::from_entropy())
    }
}

impl<B, R: Rng + Clone> AdaBoostParams<B, R> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `n_estimators = 100`
    /// * `learning_rate = 1.0`
    /// * `ratio = 0.8`
    /// * `tolerance = 1e-4`
    pub fn new_fixed_rng(base: B, rng: R) -> AdaBoostParams<B, R> {
        Self(AdaBoostValidParams {
            base,
            n_estimators: 100,
            learning_rate: 1.0,
            ratio: 0.8,
            tolerance: 1e-4,
            rng,
        })
    }

    /// Sets the maximum number of boosting rounds
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.0.n_estimators = n_estimators;
        self
    }

    /// Sets the factor every influence is scaled by
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.0.learning_rate = learning_rate;
        self
    }

    /// Sets the size of every weighted subset as a fraction of the training set
    pub fn ratio(mut self, ratio: f64) -> Self {
        self.0.ratio = ratio;
        self
    }

    /// Training stops early once the weighted loss of a round falls below the tolerance
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.0.tolerance = tolerance;
        self
    }
}

impl<B: Learner> AdaBoost<B, SmallRng> {
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params(base: B) -> AdaBoostParams<B, SmallRng> {
        AdaBoostParams::new(base)
    }
}

impl<B: Learner, R> ParamGuard for AdaBoostParams<B, R> {
    type Checked = AdaBoostValidParams<B, R>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let kind = self.0.base.kind();

        if kind.is_meta_estimator() {
            Err(Error::InvalidArgument(format!(
                "Base learner must not be an ensemble itself, but was {:?}",
                kind
            )))
        } else if self.0.base.estimator_type() != EstimatorType::Classifier {
            Err(Error::InvalidArgument(format!(
                "Base learner must be a classifier, but was a {:?}",
                self.0.base.estimator_type()
            )))
        } else if self.0.n_estimators < 1 {
            Err(Error::InvalidArgument(format!(
                "Number of estimators should be at least one, but was {}",
                self.0.n_estimators
            )))
        } else if !(self.0.learning_rate >= 0.0 && self.0.learning_rate.is_finite()) {
            Err(Error::InvalidArgument(format!(
                "Learning rate should be finite and non-negative, but was {}",
                self.0.learning_rate
            )))
        } else if !(0.01..=1.0).contains(&self.0.ratio) {
            Err(Error::InvalidArgument(format!(
                "Ratio should be between 0.01 and 1, but was {}",
                self.0.ratio
            )))
        } else if !(0.0..=1.0).contains(&self.0.tolerance) {
            Err(Error::InvalidArgument(format!(
                "Tolerance should be between 0 and 1, but was {}",
                self.0.tolerance
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
