//! Integration tests for reduction setup, validation and the shared handle

mod common;

use common::{ldf_example, shared_example, RecordingLearner};
use csreduce::example::{Candidate, Cost, Example, Features};
use csreduce::learner::{LearnerConfig, LinearLearner};
use csreduce::reduction::{
    setup, Learner, ReductionConfig, ReductionError, ReductionKind, SharedLearner,
};

fn linear() -> LinearLearner {
    LinearLearner::new(LearnerConfig {
        bits: 12,
        ..Default::default()
    })
    .unwrap()
}

/// Drive any installed reduction through the same calls
fn exercise<B: csreduce::learner::BaseLearner>(learner: &mut Learner<B>, example: &Example) -> u32 {
    learner.learn(example).unwrap();
    learner.evaluate(example).unwrap();
    learner.rank(example).unwrap();
    learner.predict(example).unwrap().label_id
}

#[test]
fn test_both_reductions_share_one_contract() {
    let example = ldf_example(&[
        (1, Cost::Known(1.0)),
        (2, Cost::Known(0.0)),
        (3, Cost::Known(2.0)),
    ]);

    for kind in [ReductionKind::Csoaa, ReductionKind::WapLdf] {
        let mut learner = setup(linear(), kind, ReductionConfig::default());
        assert_eq!(learner.kind(), kind);
        let label = exercise(&mut learner, &example);
        assert!((1..=3).contains(&label));
        assert_eq!(learner.examples_seen(), 2);
    }
}

#[test]
fn test_predict_does_not_change_state() {
    let mut learner = setup(linear(), ReductionKind::Csoaa, ReductionConfig::default());
    let example = shared_example(&[(1, Cost::Known(0.0)), (2, Cost::Known(1.0))]);
    learner.learn(&example).unwrap();

    let before = learner.base().weighted_examples();
    let first = learner.predict(&example).unwrap();
    let ranked = learner.rank(&example).unwrap();
    assert_eq!(learner.predict(&example).unwrap(), first);
    assert_eq!(learner.rank(&example).unwrap(), ranked);
    assert_eq!(learner.base().weighted_examples(), before);
    assert_eq!(learner.examples_seen(), 1);
}

#[test]
fn test_duplicate_label_rejected_by_both_reductions() {
    let example = ldf_example(&[(1, Cost::Known(0.0)), (1, Cost::Known(1.0))]);
    for kind in [ReductionKind::Csoaa, ReductionKind::WapLdf] {
        let mut learner = setup(RecordingLearner::new(), kind, ReductionConfig::default());
        assert_eq!(
            learner.learn(&example).unwrap_err(),
            ReductionError::DuplicateLabelId {
                example: 0,
                label_id: 1
            }
        );
        assert!(learner.base().calls().is_empty());
    }
}

#[test]
fn test_malformed_examples_leave_base_untouched() {
    let empty = Example::default();
    let nothing_predictable = shared_example(&[(1, Cost::NotApplicable), (2, Cost::Known(f32::NAN))]);

    for kind in [ReductionKind::Csoaa, ReductionKind::WapLdf] {
        let mut learner = setup(RecordingLearner::new(), kind, ReductionConfig::default());
        let err = learner.learn(&empty).unwrap_err();
        assert!(matches!(err, ReductionError::MalformedExample { example: 0, .. }));
        assert!(learner.learn(&nothing_predictable).is_err());
        assert!(learner.base().calls().is_empty());
        assert_eq!(learner.examples_seen(), 2);
    }
}

#[test]
fn test_error_index_tracks_stream_position() {
    let mut learner = setup(RecordingLearner::new(), ReductionKind::Csoaa, ReductionConfig::default());
    let good = shared_example(&[(1, Cost::Known(0.0)), (2, Cost::Known(1.0))]);
    learner.learn(&good).unwrap();
    learner.learn(&good).unwrap();
    let err = learner.learn(&Example::default()).unwrap_err();
    assert_eq!(err.example_index(), 2);
}

#[test]
fn test_invalid_costs_are_excluded_not_trained() {
    let mut learner = setup(RecordingLearner::new(), ReductionKind::Csoaa, ReductionConfig::default());
    let example = shared_example(&[
        (1, Cost::Known(f32::NAN)),
        (2, Cost::Known(0.5)),
        (3, Cost::Known(-1.0)),
        (4, Cost::Known(f32::INFINITY)),
    ]);
    let outcome = learner.learn(&example).unwrap();

    assert_eq!(outcome.excluded, vec![1, 3, 4]);
    assert_eq!(outcome.prediction.label_id, 2);
    assert_eq!(outcome.updates, 1);
    assert_eq!(learner.base().predict_calls(), 1);
    assert_eq!(learner.base().learn_calls()[0].1, 0.5);
}

#[test]
fn test_evaluate_scores_without_training() {
    let mut learner = setup(RecordingLearner::new(), ReductionKind::WapLdf, ReductionConfig::default());
    let example = ldf_example(&[(1, Cost::Known(3.0)), (2, Cost::Known(1.0))]);
    let outcome = learner.evaluate(&example).unwrap();

    // Untrained tournament is a draw, so label 1 is chosen
    assert_eq!(outcome.prediction.label_id, 1);
    assert_eq!(outcome.loss, Some(2.0));
    assert_eq!(outcome.updates, 0);
    assert!(learner.base().learn_calls().is_empty());
}

#[test]
fn test_non_finite_feature_never_reaches_the_weights() {
    for kind in [ReductionKind::Csoaa, ReductionKind::WapLdf] {
        let mut learner = setup(linear(), kind, ReductionConfig::default());
        let poisoned = Example::label_dependent(vec![
            Candidate::with_cost(1, 0.0).with_features(Features::from([(1, f32::NAN)])),
            Candidate::with_cost(2, 1.0).with_features(Features::from([(2, 1.0)])),
        ]);
        let err = learner.learn(&poisoned).unwrap_err();
        assert!(matches!(err, ReductionError::MalformedExample { example: 0, .. }));
        assert_eq!(learner.base().weighted_examples(), 0.0);

        let clean = ldf_example(&[(1, Cost::Known(0.0)), (2, Cost::Known(1.0))]);
        learner.learn(&clean).unwrap();
        let ranked = learner.rank(&clean).unwrap();
        assert!(ranked.iter().all(|r| r.score.is_finite()), "{:?}", ranked);
    }
}

#[test]
fn test_shared_learner_serializes_updates_across_threads() {
    let shared = SharedLearner::new(setup(linear(), ReductionKind::WapLdf, ReductionConfig::default()));
    let example = Example::label_dependent(vec![
        Candidate::with_cost(1, 1.0).with_features(Features::from([(10, 1.0)])),
        Candidate::with_cost(2, 0.0).with_features(Features::from([(20, 1.0)])),
    ]);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let handle = shared.clone();
            let example = &example;
            scope.spawn(move || {
                for _ in 0..25 {
                    handle.learn(example).unwrap();
                }
            });
        }
    });

    assert_eq!(shared.examples_seen(), 100);
    assert_eq!(shared.predict(&example).unwrap().label_id, 2);
    let learner = shared.try_unwrap().unwrap();
    assert_eq!(learner.base().weighted_examples(), 100.0);
}
