//! Tree induction shared by the classification tree and the extra tree
//!
use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::SmallRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use quorum::{
    dataset::{AsLabels, DatasetBase},
    error::{Error, Result},
    probabilities::{argmax, ClassIndex, Probabilities},
    Float, Label,
};

use super::DecisionTreeValidParams;

/// How split thresholds are chosen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SplitStrategy {
    /// Scan every midpoint between consecutive distinct values
    Best,
    /// Draw a single uniform threshold between the minimum and maximum value
    Random,
}

/// A node of a fitted tree
#[derive(Debug, Clone)]
pub(crate) enum TreeNode<F> {
    Leaf {
        distribution: Array1<f64>,
    },
    Split {
        feature: usize,
        threshold: F,
        left: Box<TreeNode<F>>,
        right: Box<TreeNode<F>>,
    },
}

impl<F: Float> TreeNode<F> {
    fn leaf<'a>(&'a self, sample: ArrayView1<'_, F>) -> &'a Array1<f64> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { distribution } => return distribution,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Trained state of a tree learner
#[derive(Debug, Clone)]
pub(crate) struct FittedTree<F, L: Label> {
    root: TreeNode<F>,
    classes: Vec<L>,
    nfeatures: usize,
    importances: BTreeMap<usize, f64>,
}

impl<F: Float, L: Label> FittedTree<F, L> {
    /// Grows a tree on a labeled dataset
    pub(crate) fn fit<T: AsLabels<L>>(
        dataset: &DatasetBase<Array2<F>, T>,
        params: &DecisionTreeValidParams,
        strategy: SplitStrategy,
    ) -> Result<Self> {
        let data = dataset.try_labeled::<L>()?;
        if data.nsamples() == 0 {
            return Err(Error::InvalidInput(
                "cannot grow a tree on an empty dataset".to_string(),
            ));
        }
        if data.records().iter().any(|value| !value.is_finite()) {
            return Err(Error::InvalidInput(
                "cannot grow a tree on records holding NaN or infinite values".to_string(),
            ));
        }

        let index = ClassIndex::new(data.possible_outcomes());
        let targets = index.encode(data.labels())?;

        let mut rng = match params.seed() {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut grower = Grower {
            records: data.records().view(),
            targets: targets.view(),
            nclasses: index.len(),
            params,
            strategy,
            rng: &mut rng,
            importances: BTreeMap::new(),
        };

        let rows = (0..data.nsamples()).collect::<Vec<_>>();
        let root = grower.grow(rows, 0);

        let mut importances = grower.importances;
        let total = importances.values().sum::<f64>();
        if total > 0.0 {
            for importance in importances.values_mut() {
                *importance /= total;
            }
        }

        Ok(FittedTree {
            root,
            classes: index.classes().to_vec(),
            nfeatures: data.nfeatures(),
            importances,
        })
    }

    fn check_features(&self, records: &ArrayView2<'_, F>) -> Result<()> {
        if records.ncols() != self.nfeatures {
            return Err(Error::InvalidInput(format!(
                "tree was trained on {} features, but records have {}",
                self.nfeatures,
                records.ncols()
            )));
        }

        Ok(())
    }

    pub(crate) fn predict(&self, records: ArrayView2<'_, F>) -> Result<Array1<L>> {
        self.check_features(&records)?;

        Ok(records
            .rows()
            .into_iter()
            .map(|sample| self.classes[argmax(self.root.leaf(sample).view())].clone())
            .collect())
    }

    pub(crate) fn proba(&self, records: ArrayView2<'_, F>) -> Result<Probabilities<L>> {
        self.check_features(&records)?;

        let mut values = Array2::zeros((records.nrows(), self.classes.len()));
        for (sample, mut row) in records
            .rows()
            .into_iter()
            .zip(values.axis_iter_mut(Axis(0)))
        {
            row.assign(self.root.leaf(sample));
        }

        Probabilities::new(self.classes.clone(), values)
    }

    pub(crate) fn importances(&self) -> &BTreeMap<usize, f64> {
        &self.importances
    }

    pub(crate) fn classes(&self) -> &[L] {
        &self.classes
    }

    pub(crate) fn depth(&self) -> usize {
        self.root.depth()
    }
}

/// Gini impurity of a class histogram
fn gini(counts: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }

    1.0 - counts.iter().map(|c| (c / total).powi(2)).sum::<f64>()
}

struct Grower<'a, F, R> {
    records: ArrayView2<'a, F>,
    targets: ArrayView1<'a, usize>,
    nclasses: usize,
    params: &'a DecisionTreeValidParams,
    strategy: SplitStrategy,
    rng: &'a mut R,
    importances: BTreeMap<usize, f64>,
}

/// Best split found for a node: feature, threshold and weighted child impurity
struct Candidate<F> {
    feature: usize,
    threshold: F,
    impurity: f64,
}

impl<'a, F: Float, R: Rng> Grower<'a, F, R> {
    fn histogram(&self, rows: &[usize]) -> Vec<f64> {
        let mut counts = vec![0.0; self.nclasses];
        for &row in rows {
            counts[self.targets[row]] += 1.0;
        }

        counts
    }

    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> TreeNode<F> {
        let counts = self.histogram(&rows);
        let n = rows.len() as f64;
        let impurity = gini(&counts, n);

        let distribution = Array1::from(counts.iter().map(|c| c / n).collect::<Vec<_>>());

        let depth_reached = self
            .params
            .max_depth()
            .map(|max_depth| depth >= max_depth)
            .unwrap_or(false);

        if depth_reached || rows.len() <= self.params.max_leaf_size() || impurity <= 0.0 {
            return TreeNode::Leaf { distribution };
        }

        let best = match self.find_split(&rows) {
            Some(best) => best,
            None => return TreeNode::Leaf { distribution },
        };

        let decrease = impurity - best.impurity;
        if decrease < self.params.min_purity_increase() {
            return TreeNode::Leaf { distribution };
        }

        let (left, right): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&row| self.records[(row, best.feature)] <= best.threshold);

        if left.is_empty() || right.is_empty() {
            return TreeNode::Leaf { distribution };
        }

        let weight = n / self.targets.len() as f64;
        *self.importances.entry(best.feature).or_insert(0.0) += weight * decrease;

        TreeNode::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: Box::new(self.grow(left, depth + 1)),
            right: Box::new(self.grow(right, depth + 1)),
        }
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        let nfeatures = self.records.ncols();

        match self.params.max_features() {
            Some(m) if m < nfeatures => {
                let mut features = sample(&mut *self.rng, nfeatures, m).into_vec();
                features.sort_unstable();
                features
            }
            _ => (0..nfeatures).collect(),
        }
    }

    fn find_split(&mut self, rows: &[usize]) -> Option<Candidate<F>> {
        let mut best: Option<Candidate<F>> = None;

        for feature in self.candidate_features() {
            let candidate = match self.strategy {
                SplitStrategy::Best => self.best_threshold(rows, feature),
                SplitStrategy::Random => self.random_threshold(rows, feature),
            };

            best = match (best, candidate) {
                (None, candidate) => candidate,
                (Some(current), Some(candidate)) if candidate.impurity < current.impurity => {
                    Some(candidate)
                }
                (current, _) => current,
            };
        }

        best
    }

    /// Scans all midpoints of a feature, moving samples one by one from right to left
    fn best_threshold(&self, rows: &[usize], feature: usize) -> Option<Candidate<F>> {
        let mut sorted = rows
            .iter()
            .map(|&row| (self.records[(row, feature)], self.targets[row]))
            .collect::<Vec<_>>();
        // records are finite, checked in `fit`
        sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let total = sorted.len() as f64;
        let mut left = vec![0.0; self.nclasses];
        let mut right = self.histogram(rows);
        let mut best: Option<Candidate<F>> = None;

        for i in 0..sorted.len() - 1 {
            let (value, class) = sorted[i];
            left[class] += 1.0;
            right[class] -= 1.0;

            let next = sorted[i + 1].0;
            if next <= value {
                continue;
            }

            let n_left = (i + 1) as f64;
            let n_right = total - n_left;
            let impurity =
                (n_left * gini(&left, n_left) + n_right * gini(&right, n_right)) / total;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                best = Some(Candidate {
                    feature,
                    threshold: (value + next) / F::cast(2.0),
                    impurity,
                });
            }
        }

        best
    }

    /// Splits a feature at a single threshold drawn uniformly from its range
    fn random_threshold(&mut self, rows: &[usize], feature: usize) -> Option<Candidate<F>> {
        let values = rows
            .iter()
            .map(|&row| self.records[(row, feature)])
            .collect::<Vec<_>>();

        let min = values.iter().copied().fold(F::infinity(), F::min);
        let max = values.iter().copied().fold(F::neg_infinity(), F::max);
        if !(min < max) {
            return None;
        }

        let threshold = self.rng.gen_range(min..max);

        let mut left = vec![0.0; self.nclasses];
        let mut right = vec![0.0; self.nclasses];
        for (&row, &value) in rows.iter().zip(values.iter()) {
            if value <= threshold {
                left[self.targets[row]] += 1.0;
            } else {
                right[self.targets[row]] += 1.0;
            }
        }

        let n_left = left.iter().sum::<f64>();
        let n_right = right.iter().sum::<f64>();
        let total = n_left + n_right;

        Some(Candidate {
            feature,
            threshold,
            impurity: (n_left * gini(&left, n_left) + n_right * gini(&right, n_right)) / total,
        })
    }
}
