use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView2};
use quorum::{
    dataset::{AsLabels, DatasetBase},
    error::{Error, Result},
    probabilities::Probabilities,
    traits::*,
    Float, Label, ParamGuard,
};

use super::algorithm::{FittedTree, SplitStrategy};
use super::{DecisionTreeParams, DecisionTreeValidParams};

/// An extremely randomized classification tree
///
/// Instead of searching for the best threshold, each candidate feature is cut at a single
/// threshold drawn uniformly between its minimum and maximum in the node, and the best of these
/// random cuts is kept. Training is faster than with
/// [`ClassificationTree`](crate::ClassificationTree) and the added variance is what bagging
/// averages away.
#[derive(Debug, Clone)]
pub struct ExtraTreeClassifier<F, L: Label> {
    params: DecisionTreeValidParams,
    fitted: Option<FittedTree<F, L>>,
}

impl<F: Float, L: Label> ExtraTreeClassifier<F, L> {
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> DecisionTreeParams {
        DecisionTreeParams::new()
    }

    pub fn new(params: DecisionTreeParams) -> Result<Self> {
        Ok(ExtraTreeClassifier {
            params: params.check()?,
            fitted: None,
        })
    }

    pub fn hyperparams(&self) -> &DecisionTreeValidParams {
        &self.params
    }

    pub fn depth(&self) -> Result<usize> {
        Ok(self.fitted()?.depth())
    }

    pub fn classes(&self) -> Result<&[L]> {
        Ok(self.fitted()?.classes())
    }

    fn fitted(&self) -> Result<&FittedTree<F, L>> {
        self.fitted.as_ref().ok_or(Error::NotTrained)
    }
}

impl<F: Float, L: Label> Default for ExtraTreeClassifier<F, L> {
    fn default() -> Self {
        ExtraTreeClassifier {
            params: DecisionTreeValidParams::default(),
            fitted: None,
        }
    }
}

impl<F: Float, L: Label> Learner for ExtraTreeClassifier<F, L> {
    type Float = F;
    type Label = L;

    fn kind(&self) -> LearnerKind {
        LearnerKind::ExtraTreeClassifier
    }

    fn estimator_type(&self) -> EstimatorType {
        EstimatorType::Classifier
    }

    fn clone_untrained(&self) -> Self {
        ExtraTreeClassifier {
            params: self.params,
            fitted: None,
        }
    }

    fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    fn reseed(&mut self, seed: u64) {
        self.params.set_seed(seed);
    }

    fn train<T: AsLabels<L>>(&mut self, dataset: &DatasetBase<Array2<F>, T>) -> Result<()> {
        self.fitted = Some(FittedTree::fit(dataset, &self.params, SplitStrategy::Random)?);

        Ok(())
    }

    fn predict(&self, records: ArrayView2<'_, F>) -> Result<Array1<L>> {
        self.fitted()?.predict(records)
    }
}

impl<F: Float, L: Label> Probabilistic for ExtraTreeClassifier<F, L> {
    fn proba(&self, records: ArrayView2<'_, F>) -> Result<Probabilities<L>> {
        self.fitted()?.proba(records)
    }
}

impl<F: Float, L: Label> RanksFeatures for ExtraTreeClassifier<F, L> {
    fn feature_importances(&self) -> Result<BTreeMap<usize, f64>> {
        Ok(self.fitted()?.importances().clone())
    }
}
