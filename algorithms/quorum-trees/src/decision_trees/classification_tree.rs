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

/// A binary decision tree for classification, grown with the CART algorithm
///
/// Every split scans all midpoints between consecutive distinct values of the candidate
/// features and keeps the one with the lowest weighted Gini impurity. Leaves store the class
/// distribution of the training samples which reached them.
///
/// ### Example
///
/// ```rust
/// use ndarray::array;
/// use quorum::prelude::*;
/// use quorum_trees::{ClassificationTree, DecisionTreeParams};
///
/// let dataset = Dataset::new(
///     array![[1., 0.], [2., 0.], [8., 1.], [9., 1.]],
///     array!["low", "low", "high", "high"],
/// );
///
/// let params = DecisionTreeParams::new().max_leaf_size(1);
/// let mut tree = ClassificationTree::<f64, &str>::new(params)?;
/// tree.train(&dataset)?;
///
/// assert_eq!(tree.predict(array![[1.5, 0.], [8.5, 1.]].view())?, array!["low", "high"]);
/// # Ok::<(), quorum::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClassificationTree<F, L: Label> {
    params: DecisionTreeValidParams,
    fitted: Option<FittedTree<F, L>>,
}

impl<F: Float, L: Label> ClassificationTree<F, L> {
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> DecisionTreeParams {
        DecisionTreeParams::new()
    }

    /// Creates an untrained tree, fails with `InvalidArgument` for invalid hyperparameters
    pub fn new(params: DecisionTreeParams) -> Result<Self> {
        Ok(ClassificationTree {
            params: params.check()?,
            fitted: None,
        })
    }

    pub fn hyperparams(&self) -> &DecisionTreeValidParams {
        &self.params
    }

    /// Depth of the trained tree, a single leaf has depth zero
    pub fn depth(&self) -> Result<usize> {
        Ok(self.fitted()?.depth())
    }

    /// Classes seen during training in the order they first appeared
    pub fn classes(&self) -> Result<&[L]> {
        Ok(self.fitted()?.classes())
    }

    fn fitted(&self) -> Result<&FittedTree<F, L>> {
        self.fitted.as_ref().ok_or(Error::NotTrained)
    }
}

impl<F: Float, L: Label> Default for ClassificationTree<F, L> {
    fn default() -> Self {
        ClassificationTree {
            params: DecisionTreeValidParams::default(),
            fitted: None,
        }
    }
}

impl<F: Float, L: Label> Learner for ClassificationTree<F, L> {
    type Float = F;
    type Label = L;

    fn kind(&self) -> LearnerKind {
        LearnerKind::ClassificationTree
    }

    fn estimator_type(&self) -> EstimatorType {
        EstimatorType::Classifier
    }

    fn clone_untrained(&self) -> Self {
        ClassificationTree {
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
        self.fitted = Some(FittedTree::fit(dataset, &self.params, SplitStrategy::Best)?);

        Ok(())
    }

    fn predict(&self, records: ArrayView2<'_, F>) -> Result<Array1<L>> {
        self.fitted()?.predict(records)
    }
}

impl<F: Float, L: Label> Probabilistic for ClassificationTree<F, L> {
    fn proba(&self, records: ArrayView2<'_, F>) -> Result<Probabilities<L>> {
        self.fitted()?.proba(records)
    }
}

impl<F: Float, L: Label> RanksFeatures for ClassificationTree<F, L> {
    /// Total Gini decrease contributed by every split column, normalized to sum to one
    fn feature_importances(&self) -> Result<BTreeMap<usize, f64>> {
        Ok(self.fitted()?.importances().clone())
    }
}
