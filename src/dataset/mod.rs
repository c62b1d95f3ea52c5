//! Datasets
//!
//! This module implements the dataset struct and the resampling primitives used by the
//! ensemble orchestrators to draw bootstrap subsets.
use ndarray::{
    ArrayBase, ArrayView, ArrayView1, Data, Ix1, Ix2, NdFloat, OwnedRepr, ScalarOperand,
};
use num_traits::{FromPrimitive, NumCast};
use rand::distributions::uniform::SampleUniform;

use std::fmt;
use std::hash::Hash;
use std::iter::Sum;

mod impl_dataset;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used in the records of a dataset.
pub trait Float:
    NdFloat
    + FromPrimitive
    + Default
    + Sum
    + SampleUniform
    + ScalarOperand
    + approx::AbsDiffEq
    + Send
    + Sync
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}
impl Float for f64 {}

/// Discrete labels
///
/// Labels are countable, comparable and hashable. The `Debug` bound is used to report labels
/// which an ensemble member produced but the ensemble never saw during training. Labels cross
/// thread boundaries when ensembles train or predict in parallel.
pub trait Label: PartialEq + Eq + Hash + Clone + fmt::Debug + Send + Sync {}

impl Label for bool {}
impl Label for usize {}
impl Label for u8 {}
impl Label for u32 {}
impl Label for i32 {}
impl Label for i64 {}
impl Label for String {}
impl Label for &str {}

/// DatasetBase
///
/// This is the fundamental structure of a dataset. It contains a number of records and may
/// contain targets and feature names. The dataset base is only generic over the records and
/// targets, which keeps the same structure usable for owned data, views and unlabeled data.
///
/// # Fields
///
/// * `records`: a two-dimensional matrix with dimensionality (nsamples, nfeatures)
/// * `targets`: a one-dimensional label vector with dimensionality (nsamples), or `()` for
///   unlabeled data
/// * `feature_names`: optional descriptive feature names with dimensionality (nfeatures)
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBase<R, T>
where
    R: Records,
{
    pub records: R,
    pub targets: T,

    feature_names: Vec<String>,
}

/// Dataset
///
/// The most commonly used type of dataset. It contains a number of records stored as an
/// `Array2` and a single label per record stored as an `Array1`.
pub type Dataset<F, L> = DatasetBase<ArrayBase<OwnedRepr<F>, Ix2>, ArrayBase<OwnedRepr<L>, Ix1>>;

/// DatasetView
///
/// A read only view of a Dataset
pub type DatasetView<'a, F, L> = DatasetBase<ArrayView<'a, F, Ix2>, ArrayView<'a, L, Ix1>>;

/// Dataset without any labels, as used for inference
pub type Unlabeled<F> = DatasetBase<ArrayBase<OwnedRepr<F>, Ix2>, ()>;

/// Record trait
pub trait Records: Sized {
    type Elem;

    fn nsamples(&self) -> usize;
    fn nfeatures(&self) -> usize;
}

impl<F, S: Data<Elem = F>> Records for ArrayBase<S, Ix2> {
    type Elem = F;

    fn nsamples(&self) -> usize {
        self.nrows()
    }

    fn nfeatures(&self) -> usize {
        self.ncols()
    }
}

/// Optional access to the labels of a dataset
///
/// Learners accept any target type implementing this trait and fail with
/// [`Error::InvalidInput`](crate::Error::InvalidInput) when no labels are present.
pub trait AsLabels<L> {
    fn try_labels(&self) -> Option<ArrayView1<'_, L>>;
}

impl<L> AsLabels<L> for () {
    fn try_labels(&self) -> Option<ArrayView1<'_, L>> {
        None
    }
}

impl<L, S: Data<Elem = L>> AsLabels<L> for ArrayBase<S, Ix1> {
    fn try_labels(&self) -> Option<ArrayView1<'_, L>> {
        Some(self.view())
    }
}

impl<L, T: AsLabels<L>> AsLabels<L> for &T {
    fn try_labels(&self) -> Option<ArrayView1<'_, L>> {
        (*self).try_labels()
    }
}
