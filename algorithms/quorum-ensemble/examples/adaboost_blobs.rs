use ndarray::array;
use quorum::prelude::*;
use quorum_ensemble::{AdaBoost, AdaBoostParams};
use quorum_trees::{ClassificationTree, DecisionTreeParams};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // RUST_LOG=debug prints the loss and influence of every epoch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = SmallRng::seed_from_u64(42);
    let centroids = array![[0., 0.], [4., 4.], [4., -4.]];
    let (train, test) = quorum_datasets::generate::labeled_blobs(150, &centroids, &mut rng)
        .shuffle(&mut rng)
        .split_with_ratio(0.8);

    // decision stumps are the classic weak learner for boosting
    for max_depth in [1, 2, 3] {
        let base = ClassificationTree::<f64, usize>::new(
            DecisionTreeParams::new().max_depth(Some(max_depth)),
        )?;
        let params = AdaBoostParams::new_fixed_rng(base, rng.clone())
            .n_estimators(50)
            .learning_rate(0.5);

        let mut model = AdaBoost::new(params)?;
        model.train(&train)?;

        let cm = model
            .predict(test.records().view())?
            .confusion_matrix(&test)?;

        println!(
            "max_depth {max_depth}: {} rounds, test accuracy {:.2}%",
            model.ensemble().len(),
            100.0 * cm.accuracy()
        );
        println!("losses: {:.3?}", model.steps());
    }

    Ok(())
}
