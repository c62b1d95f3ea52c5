use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView2};
use quorum::{
    dataset::{AsLabels, DatasetBase},
    error::{Error, Result},
    probabilities::{ClassIndex, Probabilities},
    traits::*,
    ParamGuard,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use super::{RandomForestParams, RandomForestValidParams};
use crate::aggregate::{mean_importances, ProbabilityAggregator};

/// A random forest is a bagging ensemble of decision trees
///
/// Every member is trained on its own bootstrap subset of the training set, drawn uniformly
/// with replacement. Predictions average the class probabilities of all members and pick the
/// most probable class.
///
/// Rounds are independent and trained in parallel. Each round draws its subset with its own
/// generator, seeded from the forest generator in round order, so a forest built from a fixed
/// generator is reproducible regardless of thread scheduling.
///
/// ### Example
///
/// ```rust
/// use ndarray::array;
/// use quorum::prelude::*;
/// use quorum_ensemble::RandomForest;
/// use quorum_trees::ClassificationTree;
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let centroids = array![[0., 0.], [8., 8.]];
/// let dataset = quorum_datasets::generate::labeled_blobs(30, &centroids, &mut rng);
///
/// let params = RandomForest::params(ClassificationTree::<f64, usize>::default())
///     .n_estimators(10)
///     .ratio(0.5);
/// let mut forest = RandomForest::new(params)?;
/// forest.train(&dataset)?;
///
/// let proba = forest.proba(array![[0.5, -0.5]].view())?;
/// assert_eq!(proba.argmax(), array![0]);
/// # Ok::<(), quorum::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RandomForest<B: Learner, R = SmallRng> {
    params: RandomForestValidParams<B, R>,
    classes: ClassIndex<B::Label>,
    ensemble: Vec<B>,
}

impl<B: Learner, R: Rng + Clone> RandomForest<B, R> {
    /// Creates an empty forest, fails with `InvalidArgument` when the hyperparameters are out of
    /// range or the base learner is not a tree classifier
    pub fn new(params: RandomForestParams<B, R>) -> Result<Self> {
        Ok(RandomForest {
            params: params.check()?,
            classes: ClassIndex::new(Vec::new()),
            ensemble: Vec::new(),
        })
    }

    pub fn hyperparams(&self) -> &RandomForestValidParams<B, R> {
        &self.params
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

impl<B, R> Learner for RandomForest<B, R>
where
    B: Probabilistic + Send + Sync,
    R: Rng + Clone,
{
    type Float = B::Float;
    type Label = B::Label;

    fn kind(&self) -> LearnerKind {
        LearnerKind::RandomForest
    }

    fn estimator_type(&self) -> EstimatorType {
        EstimatorType::Classifier
    }

    fn clone_untrained(&self) -> Self {
        RandomForest {
            params: self.params.clone_untrained(),
            classes: ClassIndex::new(Vec::new()),
            ensemble: Vec::new(),
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
                "cannot train a random forest on an empty dataset".to_string(),
            ));
        }

        let n_estimators = self.params.n_estimators();
        let k = ((self.params.ratio() * n as f64).round() as usize).max(1);

        info!(
            base = ?self.params.base().kind(),
            n_estimators,
            ratio = self.params.ratio(),
            subset_size = k,
            "training random forest"
        );

        let classes = ClassIndex::new(data.possible_outcomes());

        let rng = self.params.rng_mut();
        let seeds = (0..n_estimators).map(|_| rng.gen()).collect::<Vec<u64>>();

        let base = self.params.base();
        let ensemble = seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = SmallRng::seed_from_u64(seed);
                let subset = data.random_subset_with_replacement(k, &mut rng);

                let mut member = base.clone_untrained();
                member.reseed(rng.gen());
                member.train(&subset)?;

                Ok(member)
            })
            .collect::<Result<Vec<_>>>()?;

        self.classes = classes;
        self.ensemble = ensemble;

        info!(members = self.ensemble.len(), "random forest trained");

        Ok(())
    }

    /// Picks the most probable class of every row
    fn predict(&self, records: ArrayView2<'_, B::Float>) -> Result<Array1<B::Label>> {
        Ok(self.proba(records)?.argmax())
    }
}

impl<B, R> Probabilistic for RandomForest<B, R>
where
    B: Probabilistic + Send + Sync,
    R: Rng + Clone,
{
    /// Mean of the member probabilities, over the classes of the training set
    fn proba(&self, records: ArrayView2<'_, B::Float>) -> Result<Probabilities<B::Label>> {
        if self.ensemble.is_empty() {
            return Err(Error::NotTrained);
        }

        let estimates = self
            .ensemble
            .par_iter()
            .map(|member| member.proba(records))
            .collect::<Result<Vec<_>>>()?;

        let mut mean = ProbabilityAggregator::new(&self.classes, records.nrows());
        for estimate in &estimates {
            mean.add(estimate)?;
        }

        mean.finish()
    }
}

impl<B: Learner + RanksFeatures, R> RanksFeatures for RandomForest<B, R> {
    /// Importance of every column summed over the members and divided by the forest size
    fn feature_importances(&self) -> Result<BTreeMap<usize, f64>> {
        mean_importances(&self.ensemble)
    }
}
