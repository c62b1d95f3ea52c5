//! Utility functions for randomly generating datasets

use ndarray::{s, Array, Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{Distribution, StandardNormal},
    RandomExt,
};
use quorum::Dataset;

/// Special case of `blobs_with_distribution` with a standard normal distribution.
pub fn blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    blobs_with_distribution(blob_size, blob_centroids, StandardNormal, rng)
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the blob centroids.
///
/// More specifically, each blob is formed by `blob_size` points sampled from a distribution
/// centered in the blob centroid.
pub fn blobs_with_distribution(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    distribution: impl Distribution<f64> + Clone,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut blobs: Array2<f64> = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &blob_centroid, distribution.clone(), rng);

        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        blobs.slice_mut(indexes).assign(&blob);
    }
    blobs
}

/// Labeled blobs: the samples drawn around the `i`-th centroid carry label `i`.
///
/// Rows are grouped by blob, shuffle the dataset before splitting it.
pub fn labeled_blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Dataset<f64, usize> {
    let records = blobs(blob_size, blob_centroids, rng);
    let targets = (0..blob_centroids.nrows())
        .flat_map(|label| std::iter::repeat(label).take(blob_size))
        .collect::<Array1<usize>>();

    Dataset::new(records, targets)
}

/// Generate `blob_size` data points (a "blob") around `blob_centroid` using the given distribution.
fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    distribution: impl Distribution<f64>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array::random_using(shape, distribution, rng);
    origin_blob + blob_centroid
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn labeled_blobs_pairs_rows_with_their_centroid() {
        let mut rng = SmallRng::seed_from_u64(42);
        let centroids = array![[-10., -10.], [10., 10.], [10., -10.]];

        let dataset = labeled_blobs(20, &centroids, &mut rng);
        assert_eq!(dataset.records().dim(), (60, 2));
        assert_eq!(dataset.possible_outcomes(), vec![0, 1, 2]);

        for (row, &label) in dataset.records().rows().into_iter().zip(dataset.labels().iter()) {
            let centroid = centroids.row(label);
            assert!((row[0] - centroid[0]).abs() < 6.);
            assert!((row[1] - centroid[1]).abs() < 6.);
        }
    }
}
