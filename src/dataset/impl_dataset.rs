use super::{AsLabels, Dataset, DatasetBase, DatasetView, Label, Records};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayBase, ArrayView, ArrayView1, Axis, Data, Ix1, Ix2};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Implementation without constraints on records and targets
impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase {
            records,
            targets,
            feature_names: Vec::new(),
        }
    }

    /// Returns reference to records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Returns reference to targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Number of samples in the dataset
    pub fn nsamples(&self) -> usize {
        self.records.nsamples()
    }

    /// Number of features per sample
    pub fn nfeatures(&self) -> usize {
        self.records.nfeatures()
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single feature.
    /// Unnamed datasets report `feature-<column>` for every column.
    pub fn feature_names(&self) -> Vec<String> {
        if !self.feature_names.is_empty() {
            self.feature_names.clone()
        } else {
            (0..self.records.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> DatasetBase<R, T> {
        let feature_names = names.into_iter().map(|x| x.into()).collect();

        self.feature_names = feature_names;

        self
    }
}

impl<F, L, D, S> DatasetBase<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>>
where
    F: Clone,
    L: Clone,
    D: Data<Elem = F>,
    S: Data<Elem = L>,
{
    /// Returns a view on the labels of the dataset
    pub fn labels(&self) -> ArrayView1<'_, L> {
        self.targets.view()
    }

    /// Creates a view of the dataset
    pub fn view(&self) -> DatasetView<'_, F, L> {
        DatasetBase {
            records: self.records.view(),
            targets: self.targets.view(),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Selects rows by index, repeated indices are allowed
    pub fn select(&self, indices: &[usize]) -> Dataset<F, L> {
        DatasetBase {
            records: self.records.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Draws `n` rows uniformly at random with replacement
    pub fn random_subset_with_replacement<R: Rng>(&self, n: usize, rng: &mut R) -> Dataset<F, L> {
        let nsamples = self.nsamples();
        if nsamples == 0 {
            return self.select(&[]);
        }

        let indices = (0..n)
            .map(|_| rng.gen_range(0..nsamples))
            .collect::<Vec<_>>();

        self.select(&indices)
    }

    /// Draws `n` rows with replacement, each row with probability proportional to its weight
    ///
    /// Rows with larger weights are drawn more often. Fails if the number of weights does not
    /// match the number of rows or if the weights do not form a valid distribution (negative,
    /// non-finite or all zero).
    pub fn random_weighted_subset_with_replacement<R: Rng>(
        &self,
        n: usize,
        weights: ArrayView1<'_, f64>,
        rng: &mut R,
    ) -> Result<Dataset<F, L>> {
        if weights.len() != self.nsamples() {
            return Err(Error::InvalidInput(format!(
                "expected {} sample weights, but got {}",
                self.nsamples(),
                weights.len()
            )));
        }

        let dist = WeightedIndex::new(weights.iter().copied())?;
        let indices = (0..n).map(|_| dist.sample(rng)).collect::<Vec<_>>();

        Ok(self.select(&indices))
    }

    /// Shuffles the rows of the dataset
    pub fn shuffle<R: Rng>(&self, rng: &mut R) -> Dataset<F, L> {
        let mut indices = (0..self.nsamples()).collect::<Vec<_>>();
        indices.shuffle(rng);

        self.select(&indices)
    }

    /// Splits the dataset into two owned parts, the first holding `ratio` of the rows
    pub fn split_with_ratio(&self, ratio: f32) -> (Dataset<F, L>, Dataset<F, L>) {
        let n = (self.nsamples() as f32 * ratio).ceil() as usize;
        let n = n.min(self.nsamples());

        let first = (0..n).collect::<Vec<_>>();
        let second = (n..self.nsamples()).collect::<Vec<_>>();

        (self.select(&first), self.select(&second))
    }
}

impl<F, L, D, S> DatasetBase<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>>
where
    L: Label,
    D: Data<Elem = F>,
    S: Data<Elem = L>,
{
    /// Returns the distinct labels in the order they first appear
    pub fn possible_outcomes(&self) -> Vec<L> {
        possible_outcomes(self.targets.view())
    }
}

/// Returns the distinct labels of `labels` in the order they first appear
pub fn possible_outcomes<L: Label>(labels: ArrayView1<'_, L>) -> Vec<L> {
    let mut seen = HashSet::new();

    labels
        .iter()
        .filter(|label| seen.insert(*label))
        .cloned()
        .collect()
}

impl<F, D: Data<Elem = F>, T> DatasetBase<ArrayBase<D, Ix2>, T> {
    /// Borrows records and labels as a [`DatasetView`], failing for unlabeled data
    pub fn try_labeled<L>(&self) -> Result<DatasetView<'_, F, L>>
    where
        T: AsLabels<L>,
    {
        let labels = self.targets.try_labels().ok_or_else(|| {
            Error::InvalidInput("this estimator requires a labeled training set".to_string())
        })?;

        if labels.len() != self.records.nrows() {
            return Err(Error::InvalidInput(format!(
                "dataset has {} records but {} labels",
                self.records.nrows(),
                labels.len()
            )));
        }

        Ok(DatasetBase {
            records: self.records.view(),
            targets: labels,
            feature_names: self.feature_names.clone(),
        })
    }
}

impl<F, L> From<(Array2<F>, Array1<L>)> for Dataset<F, L> {
    fn from(rec_tar: (Array2<F>, Array1<L>)) -> Self {
        DatasetBase::new(rec_tar.0, rec_tar.1)
    }
}

impl<'a, F, L> From<(ArrayView<'a, F, Ix2>, ArrayView1<'a, L>)> for DatasetView<'a, F, L> {
    fn from(rec_tar: (ArrayView<'a, F, Ix2>, ArrayView1<'a, L>)) -> Self {
        DatasetBase::new(rec_tar.0, rec_tar.1)
    }
}

impl<F> From<Array2<F>> for DatasetBase<Array2<F>, ()> {
    fn from(records: Array2<F>) -> Self {
        DatasetBase::new(records, ())
    }
}
