//! Common metrics for performance evaluation of classifiers
//!
//! A confusion matrix counts how often each ground-truth class was predicted as each class.
//! Accuracy, precision and recall are derived from it.
use std::fmt;

use ndarray::{Array2, ArrayBase, ArrayView1, Data, Ix1, Ix2};

use crate::dataset::{AsLabels, DatasetBase, Label};
use crate::error::{Error, Result};
use crate::probabilities::ClassIndex;

/// Confusion matrix for multi-label evaluation
///
/// Rows correspond to the predicted class, columns to the ground truth class. Classes are
/// ordered by first appearance in the ground truth, followed by classes which were only
/// predicted.
#[derive(Clone, PartialEq)]
pub struct ConfusionMatrix<L: Label> {
    matrix: Array2<f32>,
    classes: Vec<L>,
}

impl<L: Label> ConfusionMatrix<L> {
    /// Fraction of correctly classified samples
    pub fn accuracy(&self) -> f32 {
        let total = self.matrix.sum();
        if total == 0.0 {
            return 0.0;
        }

        self.matrix.diag().sum() / total
    }

    /// Precision of a single class, `None` for a class which was never predicted
    pub fn precision(&self, class: &L) -> Option<f32> {
        let idx = self.classes.iter().position(|c| c == class)?;
        let predicted = self.matrix.row(idx).sum();

        if predicted == 0.0 {
            None
        } else {
            Some(self.matrix[(idx, idx)] / predicted)
        }
    }

    /// Recall of a single class, `None` for a class absent from the ground truth
    pub fn recall(&self, class: &L) -> Option<f32> {
        let idx = self.classes.iter().position(|c| c == class)?;
        let actual = self.matrix.column(idx).sum();

        if actual == 0.0 {
            None
        } else {
            Some(self.matrix[(idx, idx)] / actual)
        }
    }

    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn counts(&self) -> &Array2<f32> {
        &self.matrix
    }
}

impl<L: Label> fmt::Debug for ConfusionMatrix<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.matrix.len_of(ndarray::Axis(0));
        writeln!(f)?;
        write!(f, "{: <10}", "classes")?;
        for i in 0..len {
            write!(f, " | {: <10}", format!("{:?}", self.classes[i]))?;
        }
        writeln!(f)?;

        for i in 0..len {
            write!(f, "{: <10}", format!("{:?}", self.classes[i]))?;

            for j in 0..len {
                write!(f, " | {: <10}", self.matrix[(i, j)])?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

fn confusion_matrix<L: Label>(
    prediction: ArrayView1<'_, L>,
    ground_truth: ArrayView1<'_, L>,
) -> Result<ConfusionMatrix<L>> {
    if prediction.len() != ground_truth.len() {
        return Err(Error::InvalidInput(format!(
            "{} predictions for {} ground truth labels",
            prediction.len(),
            ground_truth.len()
        )));
    }

    let index = ClassIndex::new(
        ground_truth
            .iter()
            .chain(prediction.iter())
            .cloned()
            .collect(),
    );

    let mut matrix = Array2::zeros((index.len(), index.len()));
    for (pred, truth) in prediction.iter().zip(ground_truth.iter()) {
        matrix[(index.position(pred)?, index.position(truth)?)] += 1.0;
    }

    Ok(ConfusionMatrix {
        matrix,
        classes: index.classes().to_vec(),
    })
}

/// Compare predictions against ground truth
pub trait ToConfusionMatrix<L: Label, T> {
    fn confusion_matrix(&self, ground_truth: T) -> Result<ConfusionMatrix<L>>;
}

impl<L: Label, S: Data<Elem = L>, S2: Data<Elem = L>> ToConfusionMatrix<L, &ArrayBase<S2, Ix1>>
    for ArrayBase<S, Ix1>
{
    fn confusion_matrix(&self, ground_truth: &ArrayBase<S2, Ix1>) -> Result<ConfusionMatrix<L>> {
        confusion_matrix(self.view(), ground_truth.view())
    }
}

impl<L: Label, S: Data<Elem = L>, D: Data, T: AsLabels<L>>
    ToConfusionMatrix<L, &DatasetBase<ArrayBase<D, Ix2>, T>> for ArrayBase<S, Ix1>
{
    fn confusion_matrix(
        &self,
        ground_truth: &DatasetBase<ArrayBase<D, Ix2>, T>,
    ) -> Result<ConfusionMatrix<L>> {
        let labels = ground_truth.targets.try_labels().ok_or_else(|| {
            Error::InvalidInput("ground truth dataset carries no labels".to_string())
        })?;

        confusion_matrix(self.view(), labels)
    }
}
