use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use quorum::{
    dataset::{AsLabels, DatasetBase},
    error::{Error, Result},
    probabilities::ClassIndex,
    traits::*,
    ParamGuard,
};
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::{debug, info, warn};

use super::{AdaBoostParams, AdaBoostValidParams};
use crate::aggregate::{mean_importances, VoteAggregator};

/// Floor of the weighted loss, keeps the influence of a perfect round finite
const EPSILON: f64 = 1e-8;

/// Multiclass AdaBoost with the SAMME algorithm
///
/// Rounds are trained one after another. Every round fits a fresh copy of the base learner on
/// a subset drawn with replacement according to the current sample weights, then the weights of
/// the samples it misclassified grow so that the next round concentrates on them. The
/// influence of a round in the final vote grows as its weighted loss shrinks:
///
/// `influence = learning_rate * (ln((1 - loss) / loss) + ln(k - 1))`
///
/// with `k` the number of classes. Training stops early when a round reaches a loss below the
/// tolerance.
///
/// ### Example
///
/// ```rust
/// use ndarray::array;
/// use quorum::prelude::*;
/// use quorum_ensemble::AdaBoost;
/// use quorum_trees::{ClassificationTree, DecisionTreeParams};
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let centroids = array![[0., 0.], [8., 8.], [0., 8.]];
/// let dataset = quorum_datasets::generate::labeled_blobs(30, &centroids, &mut rng);
///
/// // boosted decision stumps
/// let stump =
///     ClassificationTree::<f64, usize>::new(DecisionTreeParams::new().max_depth(Some(1)))?;
/// let mut model = AdaBoost::new(AdaBoost::params(stump).n_estimators(20))?;
/// model.train(&dataset)?;
///
/// assert!(model.ensemble().len() <= 20);
/// assert_eq!(model.predict(array![[8.2, 7.9]].view())?, array![1]);
/// # Ok::<(), quorum::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AdaBoost<B: Learner, R = SmallRng> {
    params: AdaBoostValidParams<B, R>,
    classes: ClassIndex<B::Label>,
    ensemble: Vec<B>,
    influences: Vec<f64>,
    steps: Vec<f64>,
    weights: Array1<f64>,
}

impl<B: Learner, R: Rng + Clone> AdaBoost<B, R> {
    /// Creates an empty booster, fails with `InvalidArgument` when the hyperparameters are out of
    /// range or the base learner is an ensemble or not a classifier
    pub fn new(params: AdaBoostParams<B, R>) -> Result<Self> {
        Ok(AdaBoost {
            params: params.check()?,
            classes: ClassIndex::new(Vec::new()),
            ensemble: Vec::new(),
            influences: Vec::new(),
            steps: Vec::new(),
            weights: Array1::zeros(0),
        })
    }

    pub fn hyperparams(&self) -> &AdaBoostValidParams<B, R> {
        &self.params
    }

    /// Sample weights after the last completed round, they sum to one
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Influence of every member in the vote, in training order
    pub fn influences(&self) -> &[f64] {
        &self.influences
    }

    /// Weighted loss of every round, in training order
    pub fn steps(&self) -> &[f64] {
        &self.steps
    }

    /// Classes of the training set in the order they first appeared
    pub fn classes(&self) -> &[B::Label] {
        self.classes.classes()
    }

    pub fn ensemble(&self) -> &[B] {
        &self.ensemble
    }

    pub fn n_estimators(&self) -> usize {
        self.params.n_estimators()
    }
}

impl<B: Learner, R: Rng + Clone> Learner for AdaBoost<B, R> {
    type Float = B::Float;
    type Label = B::Label;

    fn kind(&self) -> LearnerKind {
        LearnerKind::AdaBoost
    }

    fn estimator_type(&self) -> EstimatorType {
        EstimatorType::Classifier
    }

    fn clone_untrained(&self) -> Self {
        AdaBoost {
            params: self.params.clone_untrained(),
            classes: ClassIndex::new(Vec::new()),
            ensemble: Vec::new(),
            influences: Vec::new(),
            steps: Vec::new(),
            weights: Array1::zeros(0),
        }
    }

    fn is_trained(&self) -> bool {
        !self.ensemble.is_empty()
    }

    fn train<T: AsLabels<B::Label>>(
        &mut self,
        dataset: &DatasetBase<Array2<B::Float>, T>,
    ) -> Result<()> {
        let data = dataset.try_labeled::<B::Label>()?;
        let n = data.nsamples();
        if n == 0 {
            return Err(Error::InvalidInput(
                "cannot boost on an empty dataset".to_string(),
            ));
        }

        let classes = ClassIndex::new(data.possible_outcomes());
        let k = classes.len();
        if k < 2 {
            return Err(Error::InvalidInput(format!(
                "boosting requires at least two classes, but the dataset has {}",
                k
            )));
        }

        let p = ((self.params.ratio() * n as f64).round() as usize).max(1);
        let rate = self.params.learning_rate();
        let tolerance = self.params.tolerance();

        info!(
            base = ?self.params.base().kind(),
            n_estimators = self.params.n_estimators(),
            learning_rate = rate,
            ratio = self.params.ratio(),
            tolerance,
            "training adaboost"
        );

        self.classes = classes;
        self.weights = Array1::from_elem(n, 1.0 / n as f64);
        self.ensemble.clear();
        self.influences.clear();
        self.steps.clear();

        let labels = data.labels();
        let records = data.records().view();

        for epoch in 1..=self.params.n_estimators() {
            let subset = data.random_weighted_subset_with_replacement(
                p,
                self.weights.view(),
                self.params.rng_mut(),
            )?;

            let mut member = self.params.base().clone_untrained();
            member.reseed(self.params.rng_mut().gen());
            member.train(&subset)?;

            let predictions = member.predict(records)?;
            let missed = Zip::from(&predictions)
                .and(&labels)
                .par_map_collect(|prediction, label| prediction != label);

            let total = self.weights.sum();
            let loss = Zip::from(&self.weights)
                .and(&missed)
                .fold(0.0, |acc, &w, &m| if m { acc + w } else { acc })
                / total;

            let influence =
                rate * (((1.0 - loss) / loss.max(EPSILON)).ln() + ((k - 1) as f64).ln());

            self.ensemble.push(member);
            self.steps.push(loss);
            self.influences.push(influence);

            debug!(epoch, loss, influence, "epoch complete");

            if loss < tolerance || total <= 0.0 {
                break;
            }

            let factor = influence.exp();
            let mut updated = self.weights.clone();
            Zip::from(&mut updated).and(&missed).for_each(|w, &m| {
                if m {
                    *w *= factor;
                }
            });

            let sum = updated.sum();
            if !sum.is_finite() || sum <= 0.0 {
                warn!(epoch, sum, "sample weights collapsed, stopping early");
                break;
            }

            self.weights = updated / sum;
        }

        info!(
            members = self.ensemble.len(),
            loss = self.steps.last().copied().unwrap_or_default(),
            "adaboost trained"
        );

        Ok(())
    }

    /// Influence weighted vote of the members
    fn predict(&self, records: ArrayView2<'_, B::Float>) -> Result<Array1<B::Label>> {
        if self.ensemble.is_empty() {
            return Err(Error::NotTrained);
        }

        let mut votes = VoteAggregator::new(&self.classes, records.nrows());
        for (member, &influence) in self.ensemble.iter().zip(self.influences.iter()) {
            votes.add_votes(member.predict(records)?.view(), influence)?;
        }

        Ok(votes.finish())
    }
}

impl<B: Learner + RanksFeatures, R> RanksFeatures for AdaBoost<B, R> {
    /// Importance of every column summed over the members and divided by the ensemble size
    fn feature_importances(&self) -> Result<BTreeMap<usize, f64>> {
        mean_importances(&self.ensemble)
    }
}
