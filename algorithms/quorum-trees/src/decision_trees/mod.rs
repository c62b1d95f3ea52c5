mod algorithm;
mod classification_tree;
mod extra_tree;
mod hyperparams;

pub use classification_tree::*;
pub use extra_tree::*;
pub use hyperparams::*;
