//! `quorum-datasets` provides synthetic datasets ready to be used in tests, examples and
//! benchmarks of the `quorum` workspace.
//!
//! ```
//! use ndarray::array;
//! use quorum_datasets::generate;
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let centroids = array![[0., 0.], [5., 5.]];
//! let (train, valid) = generate::labeled_blobs(50, &centroids, &mut rng)
//!     .shuffle(&mut rng)
//!     .split_with_ratio(0.8);
//! assert_eq!(train.nsamples() + valid.nsamples(), 100);
//! ```

pub mod generate;
