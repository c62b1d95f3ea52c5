use ndarray::array;
use quorum::prelude::*;
use quorum_ensemble::{RandomForest, RandomForestParams};
use quorum_trees::ExtraTreeClassifier;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // RUST_LOG=debug shows the training progress
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Number of trees in the forest
    let n_estimators = 100;
    // Size of every bootstrap subset relative to the training set
    let ratio = 0.3;

    let mut rng = SmallRng::seed_from_u64(42);
    let centroids = array![[0., 0.], [3., 3.], [3., -3.], [-3., 3.]];
    let (train, test) = quorum_datasets::generate::labeled_blobs(200, &centroids, &mut rng)
        .shuffle(&mut rng)
        .split_with_ratio(0.8);

    let base = ExtraTreeClassifier::<f64, usize>::default();
    let params = RandomForestParams::new_fixed_rng(base, rng)
        .n_estimators(n_estimators)
        .ratio(ratio);
    let mut forest = RandomForest::new(params)?;
    forest.train(&train)?;

    let predictions = forest.predict(test.records().view())?;
    let cm = predictions.confusion_matrix(&test)?;

    println!("{cm:?}");
    println!(
        "Test accuracy: {:.2}%\n with Extra Trees, Ensemble Size: {n_estimators}, Ratio: {ratio}",
        100.0 * cm.accuracy()
    );

    for (column, importance) in forest.feature_importances()? {
        println!("feature-{column}: {importance:.3}");
    }

    Ok(())
}
