//! Class-indexed probability tables
//!
//! Every probabilistic learner reports its estimates as [`Probabilities`]: an ordered list of
//! classes paired with a row-stochastic matrix of shape `(nsamples, nclasses)`. The column of a
//! class is its position in that list. [`ClassIndex`] maps labels to those positions, so
//! ensembles can add up tables produced by members which saw different subsets of classes.
use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::dataset::Label;
use crate::error::{Error, Result};

/// Canonical position of every class label in a fixed class ordering
#[derive(Debug, Clone, PartialEq)]
pub struct ClassIndex<L: Label> {
    classes: Vec<L>,
    positions: HashMap<L, usize>,
}

impl<L: Label> ClassIndex<L> {
    /// Creates the index, duplicated labels keep their first position
    pub fn new(classes: Vec<L>) -> Self {
        let mut positions = HashMap::with_capacity(classes.len());
        let mut unique = Vec::with_capacity(classes.len());

        for class in classes {
            if !positions.contains_key(&class) {
                positions.insert(class.clone(), unique.len());
                unique.push(class);
            }
        }

        ClassIndex {
            classes: unique,
            positions,
        }
    }

    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, class: &L) -> Option<usize> {
        self.positions.get(class).copied()
    }

    /// Returns the position of a class or fails with `UnknownClass`
    pub fn position(&self, class: &L) -> Result<usize> {
        self.get(class)
            .ok_or_else(|| Error::UnknownClass(format!("{:?}", class)))
    }

    pub fn label(&self, position: usize) -> &L {
        &self.classes[position]
    }

    /// Encodes every label as its class position
    pub fn encode(&self, labels: ArrayView1<'_, L>) -> Result<Array1<usize>> {
        labels
            .iter()
            .map(|label| self.position(label))
            .collect::<Result<Vec<_>>>()
            .map(Array1::from)
    }
}

/// Per-row probability estimates over an ordered set of classes
#[derive(Debug, Clone, PartialEq)]
pub struct Probabilities<L: Label> {
    classes: Vec<L>,
    values: Array2<f64>,
}

impl<L: Label> Probabilities<L> {
    /// Pairs a class list with a probability matrix with one column per class
    pub fn new(classes: Vec<L>, values: Array2<f64>) -> Result<Self> {
        if values.ncols() != classes.len() {
            return Err(Error::InvalidInput(format!(
                "probability table has {} columns for {} classes",
                values.ncols(),
                classes.len()
            )));
        }

        Ok(Probabilities { classes, values })
    }

    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn nsamples(&self) -> usize {
        self.values.nrows()
    }

    /// Probability of `class` for the sample in `row`, `None` for unknown classes
    pub fn get(&self, row: usize, class: &L) -> Option<f64> {
        self.classes
            .iter()
            .position(|c| c == class)
            .map(|col| self.values[(row, col)])
    }

    /// Iterates the `(class, probability)` pairs of a single row in class order
    pub fn row(&self, row: usize) -> impl Iterator<Item = (&L, f64)> + '_ {
        self.classes
            .iter()
            .zip(self.values.index_axis(Axis(0), row).to_vec())
    }

    /// Most probable class for every row
    ///
    /// Ties go to the class listed first.
    pub fn argmax(&self) -> Array1<L> {
        self.values
            .rows()
            .into_iter()
            .map(|row| self.classes[argmax(row)].clone())
            .collect()
    }
}

/// Position of the largest value, the first one wins on ties
pub fn argmax(scores: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;

    for (idx, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = idx;
        }
    }

    best
}
