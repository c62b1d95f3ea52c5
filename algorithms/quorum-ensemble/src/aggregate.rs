//! Combine the outputs of ensemble members
//!
//! Both aggregators accumulate into a table with one row per sample and one column per class of
//! the ensemble, the column order being the order in which the classes first appeared in the
//! training labels.
use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use quorum::{
    error::{Error, Result},
    probabilities::{argmax, ClassIndex, Probabilities},
    traits::RanksFeatures,
    Label,
};

/// Influence weighted plurality vote
///
/// ```
/// use ndarray::array;
/// use quorum::probabilities::ClassIndex;
/// use quorum_ensemble::aggregate::VoteAggregator;
///
/// let classes = ClassIndex::new(vec!["cat", "dog"]);
/// let mut votes = VoteAggregator::new(&classes, 2);
/// votes.add_votes(array!["cat", "dog"].view(), 0.4)?;
/// votes.add_votes(array!["dog", "dog"].view(), 0.5)?;
///
/// assert_eq!(votes.finish(), array!["dog", "dog"]);
/// # Ok::<(), quorum::Error>(())
/// ```
pub struct VoteAggregator<'a, L: Label> {
    classes: &'a ClassIndex<L>,
    scores: Array2<f64>,
}

impl<'a, L: Label> VoteAggregator<'a, L> {
    pub fn new(classes: &'a ClassIndex<L>, nsamples: usize) -> Self {
        VoteAggregator {
            classes,
            scores: Array2::zeros((nsamples, classes.len())),
        }
    }

    /// Adds `influence` to the score of the predicted class of every row
    ///
    /// Influences may be negative. Fails with `UnknownClass` if a prediction is not one of the
    /// ensemble classes, in which case no score is changed.
    pub fn add_votes(&mut self, predictions: ArrayView1<'_, L>, influence: f64) -> Result<()> {
        if predictions.len() != self.scores.nrows() {
            return Err(Error::InvalidInput(format!(
                "expected {} predictions, but got {}",
                self.scores.nrows(),
                predictions.len()
            )));
        }

        let positions = self.classes.encode(predictions)?;
        for (mut row, &position) in self.scores.rows_mut().into_iter().zip(positions.iter()) {
            row[position] += influence;
        }

        Ok(())
    }

    pub fn scores(&self) -> ArrayView2<'_, f64> {
        self.scores.view()
    }

    /// Picks the class with the highest score per row, ties go to the class seen first
    pub fn finish(self) -> Array1<L> {
        self.scores
            .rows()
            .into_iter()
            .map(|row| self.classes.label(argmax(row)).clone())
            .collect()
    }
}

/// Mean of the class probabilities estimated by the members
pub struct ProbabilityAggregator<'a, L: Label> {
    classes: &'a ClassIndex<L>,
    sums: Array2<f64>,
    members: usize,
}

impl<'a, L: Label> ProbabilityAggregator<'a, L> {
    pub fn new(classes: &'a ClassIndex<L>, nsamples: usize) -> Self {
        ProbabilityAggregator {
            classes,
            sums: Array2::zeros((nsamples, classes.len())),
            members: 0,
        }
    }

    /// Adds the estimate of a single member
    ///
    /// A member trained on a subset may know fewer classes than the ensemble, its columns are
    /// mapped onto the ensemble columns by label and the missing ones count as zero.
    pub fn add(&mut self, proba: &Probabilities<L>) -> Result<()> {
        if proba.nsamples() != self.sums.nrows() {
            return Err(Error::InvalidInput(format!(
                "expected probabilities for {} samples, but got {}",
                self.sums.nrows(),
                proba.nsamples()
            )));
        }

        let positions = proba
            .classes()
            .iter()
            .map(|class| self.classes.position(class))
            .collect::<Result<Vec<_>>>()?;

        for (column, position) in proba.values().columns().into_iter().zip(positions) {
            let mut target = self.sums.column_mut(position);
            Zip::from(&mut target)
                .and(&column)
                .for_each(|sum, &p| *sum += p);
        }
        self.members += 1;

        Ok(())
    }

    /// Divides the accumulated sums by the number of members, fails with `NotTrained` if none
    /// was added
    pub fn finish(self) -> Result<Probabilities<L>> {
        if self.members == 0 {
            return Err(Error::NotTrained);
        }

        let values = self.sums / self.members as f64;
        Probabilities::new(self.classes.classes().to_vec(), values)
    }
}

/// Sums the importance every member assigns to a column and divides by the ensemble size
///
/// Members which did not use a column contribute nothing to its sum but still count in the
/// divisor, so rarely used columns rank low.
pub fn mean_importances<B: RanksFeatures>(members: &[B]) -> Result<BTreeMap<usize, f64>> {
    if members.is_empty() {
        return Err(Error::NotTrained);
    }

    let mut importances = BTreeMap::new();
    for member in members {
        for (column, importance) in member.feature_importances()? {
            *importances.entry(column).or_insert(0.0) += importance;
        }
    }

    let n = members.len() as f64;
    for importance in importances.values_mut() {
        *importance /= n;
    }

    Ok(importances)
}
