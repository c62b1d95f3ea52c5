//! Error types in quorum
//!

use ndarray::ShapeError;
use rand::distributions::WeightedError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed hyperparameters or an incompatible base learner
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A dataset that cannot be used for the requested operation
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Inference requested from an estimator which holds no trained state
    #[error("estimator has not been trained")]
    NotTrained,
    /// A label produced by an ensemble member which was never seen during training
    #[error("unknown class label {0}")]
    UnknownClass(String),
    #[error("invalid sample weights: {0}")]
    Weights(#[from] WeightedError),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}
