use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use ndarray::{array, Array1, Array2, ArrayView1, ArrayView2};
use quorum::prelude::*;
use quorum_ensemble::{AdaBoost, AdaBoostParams, RandomForest, RandomForestParams};
use quorum_trees::{ClassificationTree, DecisionTreeParams, ExtraTreeClassifier};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Deterministic learner which ignores its training subset and applies a fixed rule
#[derive(Clone)]
struct Rule {
    kind: LearnerKind,
    estimator_type: EstimatorType,
    rule: fn(ArrayView1<f64>) -> usize,
    trained: bool,
}

impl Rule {
    fn new(kind: LearnerKind, rule: fn(ArrayView1<f64>) -> usize) -> Self {
        Rule {
            kind,
            estimator_type: EstimatorType::Classifier,
            rule,
            trained: false,
        }
    }

    /// Class one when the first feature exceeds one half
    fn threshold() -> Self {
        Rule::new(LearnerKind::ClassificationTree, |x| (x[0] > 0.5) as usize)
    }

    fn constant() -> Self {
        Rule::new(LearnerKind::Other, |_| 0)
    }
}

impl Learner for Rule {
    type Float = f64;
    type Label = usize;

    fn kind(&self) -> LearnerKind {
        self.kind
    }

    fn estimator_type(&self) -> EstimatorType {
        self.estimator_type
    }

    fn clone_untrained(&self) -> Self {
        Rule {
            trained: false,
            ..self.clone()
        }
    }

    fn is_trained(&self) -> bool {
        self.trained
    }

    fn train<T: AsLabels<usize>>(&mut self, dataset: &DatasetBase<Array2<f64>, T>) -> Result<()> {
        if dataset.try_labeled::<usize>()?.nsamples() == 0 {
            return Err(Error::InvalidInput("empty".to_string()));
        }
        self.trained = true;

        Ok(())
    }

    fn predict(&self, records: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
        if !self.trained {
            return Err(Error::NotTrained);
        }

        Ok(records.rows().into_iter().map(self.rule).collect())
    }
}

impl Probabilistic for Rule {
    fn proba(&self, records: ArrayView2<'_, f64>) -> Result<Probabilities<usize>> {
        let predictions = self.predict(records)?;
        let mut values = Array2::zeros((records.nrows(), 2));
        for (row, &label) in predictions.iter().enumerate() {
            values[(row, label)] = 1.0;
        }

        Probabilities::new(vec![0, 1], values)
    }
}

impl RanksFeatures for Rule {
    fn feature_importances(&self) -> Result<BTreeMap<usize, f64>> {
        if !self.trained {
            return Err(Error::NotTrained);
        }

        Ok(BTreeMap::from([(0, 1.0)]))
    }
}

/// Predicts class zero until it has been trained `rounds` times, then applies the threshold rule
#[derive(Clone)]
struct Warmup {
    trainings: Arc<AtomicUsize>,
    rounds: usize,
    round: Option<usize>,
}

impl Warmup {
    fn new(rounds: usize) -> Self {
        Warmup {
            trainings: Arc::new(AtomicUsize::new(0)),
            rounds,
            round: None,
        }
    }
}

impl Learner for Warmup {
    type Float = f64;
    type Label = usize;

    fn kind(&self) -> LearnerKind {
        LearnerKind::Other
    }

    fn estimator_type(&self) -> EstimatorType {
        EstimatorType::Classifier
    }

    fn clone_untrained(&self) -> Self {
        Warmup {
            trainings: Arc::clone(&self.trainings),
            rounds: self.rounds,
            round: None,
        }
    }

    fn is_trained(&self) -> bool {
        self.round.is_some()
    }

    fn train<T: AsLabels<usize>>(&mut self, _: &DatasetBase<Array2<f64>, T>) -> Result<()> {
        self.round = Some(self.trainings.fetch_add(1, Ordering::SeqCst) + 1);

        Ok(())
    }

    fn predict(&self, records: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
        match self.round {
            None => Err(Error::NotTrained),
            Some(round) if round <= self.rounds => Ok(Array1::zeros(records.nrows())),
            Some(_) => Ok(records.rows().into_iter().map(|x| (x[0] > 0.5) as usize).collect()),
        }
    }
}

/// Four rows labeled by the threshold rule
fn separable() -> Dataset<f64, usize> {
    Dataset::new(array![[0.], [0.2], [0.8], [1.]], array![0, 0, 1, 1])
}

fn blobs(seed: u64) -> (Dataset<f64, usize>, Dataset<f64, usize>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let centroids = array![[-4., -4.], [4., 4.], [4., -4.]];

    quorum_datasets::generate::labeled_blobs(40, &centroids, &mut rng)
        .shuffle(&mut rng)
        .split_with_ratio(0.75)
}

fn seeded_forest<B: Learner>(base: B, n_estimators: usize, ratio: f64) -> RandomForestParams<B> {
    RandomForestParams::new_fixed_rng(base, SmallRng::seed_from_u64(42))
        .n_estimators(n_estimators)
        .ratio(ratio)
}

fn seeded_boost<B: Learner>(base: B) -> AdaBoostParams<B> {
    AdaBoostParams::new_fixed_rng(base, SmallRng::seed_from_u64(42))
}

#[test]
fn out_of_range_forest_params_are_rejected() {
    let cases = [
        seeded_forest(Rule::threshold(), 10, 1.5),
        seeded_forest(Rule::threshold(), 10, 0.005),
        seeded_forest(Rule::threshold(), 10, f64::NAN),
        seeded_forest(Rule::threshold(), 0, 0.5),
        seeded_forest(Rule::constant(), 10, 0.5),
    ];

    for params in cases {
        assert!(matches!(
            RandomForest::new(params),
            Err(Error::InvalidArgument(_))
        ));
    }

    assert!(RandomForest::new(seeded_forest(Rule::threshold(), 1, 0.01)).is_ok());
    assert!(RandomForest::new(seeded_forest(Rule::threshold(), 1, 1.0)).is_ok());
}

#[test]
fn out_of_range_boost_params_are_rejected() {
    let mut regressor = Rule::threshold();
    regressor.estimator_type = EstimatorType::Regressor;

    let cases = [
        seeded_boost(Rule::threshold()).learning_rate(-1.0),
        seeded_boost(Rule::threshold()).learning_rate(f64::INFINITY),
        seeded_boost(Rule::threshold()).tolerance(1.5),
        seeded_boost(Rule::threshold()).tolerance(-0.1),
        seeded_boost(Rule::threshold()).ratio(1.5),
        seeded_boost(Rule::threshold()).n_estimators(0),
        seeded_boost(Rule::new(LearnerKind::AdaBoost, |_| 0)),
        seeded_boost(regressor),
    ];

    for params in cases {
        assert!(matches!(
            AdaBoost::new(params),
            Err(Error::InvalidArgument(_))
        ));
    }

    assert!(AdaBoost::new(seeded_boost(Rule::constant()).learning_rate(0.0)).is_ok());
}

#[test]
fn ensembles_do_not_nest() -> Result<()> {
    let forest = RandomForest::new(seeded_forest(
        ClassificationTree::<f64, usize>::default(),
        5,
        0.5,
    ))?;
    assert!(matches!(
        AdaBoost::new(seeded_boost(forest)),
        Err(Error::InvalidArgument(_))
    ));

    let boost = AdaBoost::new(seeded_boost(ClassificationTree::<f64, usize>::default()))?;
    assert!(matches!(
        RandomForest::new(seeded_forest(boost, 5, 0.5)),
        Err(Error::InvalidArgument(_))
    ));

    Ok(())
}

#[test]
fn forest_grows_every_estimator() -> Result<()> {
    let (train, _) = blobs(1);

    let mut forest = RandomForest::new(seeded_forest(
        ExtraTreeClassifier::<f64, usize>::default(),
        17,
        0.3,
    ))?;
    forest.train(&train)?;

    assert_eq!(forest.ensemble().len(), 17);
    assert_eq!(forest.n_estimators(), 17);
    assert!(forest.is_trained());
    assert!(forest.ensemble().iter().all(|tree| tree.is_trained()));

    Ok(())
}

#[test]
fn forest_probabilities_sum_to_one() -> Result<()> {
    let (train, test) = blobs(2);

    let mut forest = RandomForest::new(seeded_forest(
        ClassificationTree::<f64, usize>::default(),
        20,
        0.2,
    ))?;
    forest.train(&train)?;

    let proba = forest.proba(test.records().view())?;
    assert_eq!(proba.classes(), forest.classes());
    assert_eq!(proba.nsamples(), test.nsamples());
    for row in proba.values().rows() {
        assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-9);
    }

    let cm = forest
        .predict(test.records().view())?
        .confusion_matrix(&test)?;
    assert!(cm.accuracy() > 0.9, "accuracy was {}", cm.accuracy());

    Ok(())
}

#[test]
fn single_member_forest_matches_its_member() -> Result<()> {
    let dataset = separable();

    let mut forest = RandomForest::new(seeded_forest(Rule::threshold(), 1, 1.0))?;
    forest.train(&dataset)?;

    let records = array![[0.1], [0.9], [0.4]];
    let member = forest.ensemble()[0].proba(records.view())?;
    let mean = forest.proba(records.view())?;

    assert_eq!(mean.classes(), member.classes());
    assert_abs_diff_eq!(mean.values(), member.values());
    assert_eq!(forest.predict(records.view())?, array![0, 1, 0]);

    Ok(())
}

#[test]
fn seeded_forests_are_reproducible() -> Result<()> {
    let (train, test) = blobs(3);
    let base = ExtraTreeClassifier::<f64, usize>::new(DecisionTreeParams::new().seed(Some(5)))?;

    let mut first = RandomForest::new(seeded_forest(base.clone(), 10, 0.5))?;
    let mut second = RandomForest::new(seeded_forest(base, 10, 0.5))?;
    first.train(&train)?;
    second.train(&train)?;

    assert_eq!(
        first.proba(test.records().view())?,
        second.proba(test.records().view())?
    );
    assert_eq!(first.feature_importances()?, second.feature_importances()?);

    Ok(())
}

#[test]
fn forest_members_draw_their_own_seeds() -> Result<()> {
    let (train, test) = blobs(6);

    let base = ExtraTreeClassifier::<f64, usize>::new(DecisionTreeParams::new().seed(Some(5)))?;
    let mut forest = RandomForest::new(seeded_forest(base, 12, 0.5))?;
    forest.train(&train)?;

    let seeds = forest
        .ensemble()
        .iter()
        .map(|tree| tree.hyperparams().seed())
        .collect::<HashSet<_>>();
    assert_eq!(seeds.len(), 12);
    assert!(!seeds.contains(&Some(5)));

    // unseeded prototypes take their seeds from the forest generator
    let base = ExtraTreeClassifier::<f64, usize>::default();
    let mut first = RandomForest::new(seeded_forest(base.clone(), 8, 0.5))?;
    let mut second = RandomForest::new(seeded_forest(base, 8, 0.5))?;
    first.train(&train)?;
    second.train(&train)?;

    assert_eq!(
        first.proba(test.records().view())?,
        second.proba(test.records().view())?
    );

    Ok(())
}

#[test]
fn perfect_learner_stops_after_first_round() -> Result<()> {
    let mut boost = AdaBoost::new(seeded_boost(Rule::threshold()).n_estimators(10))?;
    boost.train(&separable())?;

    assert_eq!(boost.ensemble().len(), 1);
    assert_eq!(boost.steps(), &[0.0]);
    // ln((1 - 0) / 1e-8) + ln(2 - 1)
    assert_abs_diff_eq!(boost.influences()[0], 1e8f64.ln(), epsilon = 1e-9);
    assert_abs_diff_eq!(boost.weights(), array![0.25, 0.25, 0.25, 0.25]);

    assert_eq!(boost.predict(array![[0.3], [0.7]].view())?, array![0, 1]);

    Ok(())
}

#[test]
fn constant_learner_has_no_influence() -> Result<()> {
    let mut boost = AdaBoost::new(seeded_boost(Rule::constant()).n_estimators(6))?;
    boost.train(&separable())?;

    // half of the weight is always misclassified
    assert_eq!(boost.ensemble().len(), 6);
    for (&loss, &influence) in boost.steps().iter().zip(boost.influences()) {
        assert_abs_diff_eq!(loss, 0.5);
        assert_abs_diff_eq!(influence, 0.0);
    }
    assert_abs_diff_eq!(boost.weights(), array![0.25, 0.25, 0.25, 0.25]);

    Ok(())
}

#[test]
fn constant_learner_has_no_influence_on_three_classes() -> Result<()> {
    let dataset = Dataset::new(array![[0.], [1.], [2.]], array![0, 1, 2]);

    let mut boost = AdaBoost::new(seeded_boost(Rule::constant()).n_estimators(3))?;
    boost.train(&dataset)?;

    // ln((1 - 2/3) / (2/3)) + ln(3 - 1) = 0
    assert_eq!(boost.ensemble().len(), 3);
    for (&loss, &influence) in boost.steps().iter().zip(boost.influences()) {
        assert_abs_diff_eq!(loss, 2. / 3., epsilon = 1e-12);
        assert_abs_diff_eq!(influence, 0.0, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(boost.weights(), array![1. / 3., 1. / 3., 1. / 3.], epsilon = 1e-12);

    Ok(())
}

#[test]
fn misclassified_rows_gain_weight() -> Result<()> {
    // the rule misses the last row only
    let dataset = Dataset::new(array![[0.], [0.2], [0.8], [1.]], array![0, 0, 1, 0]);

    let mut boost = AdaBoost::new(
        seeded_boost(Rule::threshold())
            .n_estimators(2)
            .tolerance(0.0),
    )?;
    boost.train(&dataset)?;

    assert_eq!(boost.ensemble().len(), 2);
    assert_abs_diff_eq!(boost.steps()[0], 0.25, epsilon = 1e-12);
    // ln(0.75 / 0.25) + ln(2 - 1)
    assert_abs_diff_eq!(boost.influences()[0], 3f64.ln(), epsilon = 1e-12);

    // the missed row is scaled by exp(ln 3) = 3 and everything renormalized by 1.5
    assert_abs_diff_eq!(boost.steps()[1], 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(boost.influences()[1], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(
        boost.weights(),
        array![1. / 6., 1. / 6., 1. / 6., 0.5],
        epsilon = 1e-12
    );

    Ok(())
}

#[test]
fn tolerance_halts_on_a_later_round() -> Result<()> {
    let mut boost = AdaBoost::new(seeded_boost(Warmup::new(2)).n_estimators(10))?;
    boost.train(&separable())?;

    // two constant rounds, then a perfect one below the tolerance
    assert_eq!(boost.ensemble().len(), 3);
    assert_eq!(boost.steps().len(), 3);
    assert_abs_diff_eq!(boost.steps()[0], 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(boost.steps()[1], 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(boost.steps()[2], 0.0);
    assert_abs_diff_eq!(boost.influences()[2], 1e8f64.ln(), epsilon = 1e-9);
    assert_abs_diff_eq!(boost.weights(), array![0.25, 0.25, 0.25, 0.25], epsilon = 1e-12);

    assert_eq!(boost.predict(array![[0.3], [0.7]].view())?, array![0, 1]);

    Ok(())
}

#[test]
fn boosting_weights_stay_normalized() -> Result<()> {
    let (train, test) = blobs(4);

    let stump =
        ClassificationTree::<f64, usize>::new(DecisionTreeParams::new().max_depth(Some(1)))?;
    let mut boost = AdaBoost::new(seeded_boost(stump).n_estimators(25).ratio(0.5))?;
    boost.train(&train)?;

    assert!(boost.ensemble().len() <= 25);
    assert_eq!(boost.ensemble().len(), boost.influences().len());
    assert_eq!(boost.ensemble().len(), boost.steps().len());
    assert_eq!(boost.weights().len(), train.nsamples());
    assert_abs_diff_eq!(boost.weights().sum(), 1.0, epsilon = 1e-9);
    assert_eq!(boost.classes().len(), 3);
    assert_eq!(boost.classes()[0], train.labels()[0]);

    let cm = boost
        .predict(test.records().view())?
        .confusion_matrix(&test)?;
    assert!(cm.accuracy() > 0.9, "accuracy was {}", cm.accuracy());

    Ok(())
}

#[test]
fn weight_collapse_keeps_previous_weights() -> Result<()> {
    // one of four rows disagrees with the rule, the huge rate overflows exp(influence)
    let dataset = Dataset::new(array![[0.], [0.2], [0.8], [1.]], array![0, 0, 1, 0]);

    let mut boost = AdaBoost::new(
        seeded_boost(Rule::threshold())
            .n_estimators(5)
            .learning_rate(1e300),
    )?;
    boost.train(&dataset)?;

    assert_eq!(boost.ensemble().len(), 1);
    assert_abs_diff_eq!(boost.steps()[0], 0.25);
    assert_abs_diff_eq!(boost.weights(), array![0.25, 0.25, 0.25, 0.25]);

    Ok(())
}

#[test]
fn predict_is_idempotent() -> Result<()> {
    let (train, test) = blobs(5);

    let mut forest = RandomForest::new(seeded_forest(
        ClassificationTree::<f64, usize>::default(),
        8,
        0.4,
    ))?;
    forest.train(&train)?;
    let stump =
        ClassificationTree::<f64, usize>::new(DecisionTreeParams::new().max_depth(Some(1)))?;
    let mut boost = AdaBoost::new(seeded_boost(stump).n_estimators(8))?;
    boost.train(&train)?;

    let records = test.records().view();
    assert_eq!(forest.predict(records)?, forest.predict(records)?);
    assert_eq!(boost.predict(records)?, boost.predict(records)?);

    Ok(())
}

#[test]
fn retraining_replaces_state() -> Result<()> {
    let first = separable();
    let second = Dataset::new(array![[0.], [1.], [0.5]], array![1, 0, 1]);

    let mut boost = AdaBoost::new(seeded_boost(Rule::constant()).n_estimators(3))?;
    boost.train(&first)?;
    boost.train(&second)?;

    assert_eq!(boost.ensemble().len(), 3);
    assert_eq!(boost.classes(), &[1, 0]);
    assert_eq!(boost.weights().len(), 3);

    let mut forest = RandomForest::new(seeded_forest(Rule::threshold(), 4, 1.0))?;
    forest.train(&first)?;
    forest.train(&second)?;

    assert_eq!(forest.ensemble().len(), 4);
    assert_eq!(forest.classes(), &[1, 0]);

    Ok(())
}

#[test]
fn invalid_training_sets_leave_state_untouched() -> Result<()> {
    let mut boost = AdaBoost::new(seeded_boost(Rule::threshold()).n_estimators(3))?;
    boost.train(&separable())?;

    let unlabeled: Unlabeled<f64> = array![[0.], [1.]].into();
    assert!(matches!(
        boost.train(&unlabeled),
        Err(Error::InvalidInput(_))
    ));

    let single_class = Dataset::new(array![[0.], [1.]], array![1, 1]);
    assert!(matches!(
        boost.train(&single_class),
        Err(Error::InvalidInput(_))
    ));

    let empty = Dataset::new(Array2::<f64>::zeros((0, 1)), Array1::<usize>::zeros(0));
    assert!(matches!(boost.train(&empty), Err(Error::InvalidInput(_))));

    assert_eq!(boost.ensemble().len(), 1);
    assert_eq!(boost.classes(), &[0, 1]);

    let mut forest = RandomForest::new(seeded_forest(Rule::threshold(), 2, 0.5))?;
    assert!(matches!(
        forest.train(&unlabeled),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(forest.train(&empty), Err(Error::InvalidInput(_))));
    assert!(!forest.is_trained());

    Ok(())
}

#[test]
fn untrained_ensembles_refuse_inference() -> Result<()> {
    let forest = RandomForest::new(seeded_forest(Rule::threshold(), 2, 0.5))?;
    let boost = AdaBoost::new(seeded_boost(Rule::threshold()))?;
    let records = array![[0.5]];

    assert_eq!(forest.feature_importances(), Err(Error::NotTrained));
    assert_eq!(boost.feature_importances(), Err(Error::NotTrained));
    assert_eq!(forest.predict(records.view()), Err(Error::NotTrained));
    assert_eq!(boost.predict(records.view()), Err(Error::NotTrained));
    assert!(matches!(
        forest.proba(records.view()),
        Err(Error::NotTrained)
    ));

    Ok(())
}

#[test]
fn importances_are_averaged_over_members() -> Result<()> {
    let mut forest = RandomForest::new(seeded_forest(Rule::threshold(), 3, 0.5))?;
    forest.train(&separable())?;
    assert_eq!(forest.feature_importances()?, BTreeMap::from([(0, 1.0)]));

    let (train, _) = blobs(6);
    let mut forest = RandomForest::new(seeded_forest(
        ClassificationTree::<f64, usize>::default(),
        10,
        0.5,
    ))?;
    forest.train(&train)?;

    let importances = forest.feature_importances()?;
    assert!(importances.keys().all(|&column| column < 2));
    // every tree normalizes to one, so the mean does too
    assert_abs_diff_eq!(importances.values().sum::<f64>(), 1.0, epsilon = 1e-9);

    Ok(())
}

#[test]
fn foreign_member_labels_are_reported() -> Result<()> {
    // the rule answers 1 while training only knew class 0 and 2
    let dataset = Dataset::new(array![[0.9], [1.]], array![0, 2]);

    let mut boost = AdaBoost::new(
        seeded_boost(Rule::threshold())
            .n_estimators(1)
            .tolerance(0.0),
    )?;
    boost.train(&dataset)?;

    assert!(matches!(
        boost.predict(array![[1.]].view()),
        Err(Error::UnknownClass(_))
    ));

    Ok(())
}
