//! End-to-end tests: text data through the parser, runner and learner

mod common;

use common::{create_temp_data, synthetic_ldf_data, synthetic_single_line_data};
use csreduce::learner::{LearnerConfig, LinearLearner};
use csreduce::pipeline::{
    load_examples_with_progress, open_examples, run_in_memory, run_pass, DataFormat, ExampleReader,
    ParseOptions, RunOptions, RunSink, RunStats,
};
use csreduce::reduction::{setup, Learner, ReductionConfig, ReductionKind};
use csreduce::report::ProgressLog;

fn learner(kind: ReductionKind) -> Learner<LinearLearner> {
    let base = LinearLearner::new(LearnerConfig::default()).unwrap();
    setup(base, kind, ReductionConfig::default())
}

#[test]
fn test_single_line_file_round_through_csoaa() {
    let (_dir, path) = create_temp_data("1:0 2:1 3:1 | a b\n2:0 1:1 | c\n\n3 | a\n");
    let mut learner = learner(ReductionKind::Csoaa);
    let mut stats = RunStats::default();
    let mut predictions = Vec::new();
    {
        let mut sink = RunSink {
            progress: None,
            predictions: Some(Box::new(&mut predictions)),
        };
        let examples = open_examples(&path, DataFormat::SingleLine, &ParseOptions::default()).unwrap();
        run_pass(&mut learner, examples, &RunOptions::default(), &mut sink, &mut stats).unwrap();
    }

    assert_eq!(stats.passes, 1);
    assert_eq!(stats.examples, 3);
    // The last record has only an unknown cost
    assert_eq!(stats.labeled_examples, 2);
    assert_eq!(stats.updates, 5);
    assert_eq!(stats.malformed, 0);

    let text = String::from_utf8(predictions).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "3");
}

#[test]
fn test_bad_records_are_counted_and_skipped() {
    let data = "1:0 2:1 | a\nno separator here\n1:0 1:1 | dup\nx:1 | a\n2:0 1:1 | b\n";
    let (_dir, path) = create_temp_data(data);
    let mut learner = learner(ReductionKind::Csoaa);
    let mut stats = RunStats::default();
    let examples = open_examples(&path, DataFormat::SingleLine, &ParseOptions::default()).unwrap();
    run_pass(
        &mut learner,
        examples,
        &RunOptions::default(),
        &mut RunSink::default(),
        &mut stats,
    )
    .unwrap();

    assert_eq!(stats.examples, 2);
    assert_eq!(stats.malformed, 3);
    // Only the duplicate-label record reached the learner
    assert_eq!(learner.examples_seen(), 3);
}

#[test]
fn test_test_only_never_updates() {
    let data = synthetic_single_line_data(20, 3, 7);
    let examples: Vec<_> = ExampleReader::new(data.as_bytes(), DataFormat::SingleLine, ParseOptions::default())
        .collect::<Result<_, _>>()
        .unwrap();

    let mut learner = learner(ReductionKind::Csoaa);
    let options = RunOptions {
        passes: 2,
        test_only: true,
    };
    let stats = run_in_memory(&mut learner, &examples, &options, &mut RunSink::default()).unwrap();

    assert_eq!(stats.passes, 2);
    assert_eq!(stats.examples, 40);
    assert_eq!(stats.updates, 0);
    assert_eq!(learner.base().weighted_examples(), 0.0);
}

#[test]
fn test_training_lowers_loss_on_learnable_data() {
    let data = synthetic_single_line_data(300, 4, 11);
    let examples: Vec<_> = ExampleReader::new(data.as_bytes(), DataFormat::SingleLine, ParseOptions::default())
        .collect::<Result<_, _>>()
        .unwrap();

    let mut learner = learner(ReductionKind::Csoaa);
    let stats = run_in_memory(
        &mut learner,
        &examples,
        &RunOptions {
            passes: 3,
            test_only: false,
        },
        &mut RunSink::default(),
    )
    .unwrap();
    let trained = stats.average_loss().unwrap();

    let final_pass = run_in_memory(
        &mut learner,
        &examples,
        &RunOptions {
            passes: 1,
            test_only: true,
        },
        &mut RunSink::default(),
    )
    .unwrap();
    let held = final_pass.average_loss().unwrap();
    assert!(held <= trained, "held {} vs trained {}", held, trained);
    assert!(held < 0.1, "average loss {} should approach zero", held);
}

#[test]
fn test_ldf_data_trains_both_reductions() {
    let (_dir, path) = create_temp_data(&synthetic_ldf_data(150, 3, 3));
    let (examples, skipped) =
        load_examples_with_progress(&path, DataFormat::LabelDependent, &ParseOptions::default())
            .unwrap();
    assert_eq!(skipped, 0);
    assert_eq!(examples.len(), 150);
    assert!(examples.iter().all(|e| e.candidates.len() == 3));

    for kind in [ReductionKind::Csoaa, ReductionKind::WapLdf] {
        let mut learner = learner(kind);
        let options = RunOptions {
            passes: 2,
            test_only: false,
        };
        run_in_memory(&mut learner, &examples, &options, &mut RunSink::default()).unwrap();
        let eval = run_in_memory(
            &mut learner,
            &examples,
            &RunOptions {
                passes: 1,
                test_only: true,
            },
            &mut RunSink::default(),
        )
        .unwrap();
        assert_eq!(eval.malformed, 0);
        assert!(
            eval.average_loss().unwrap() < 0.5,
            "{} left average loss {:?}",
            kind,
            eval.average_loss()
        );
    }
}

#[test]
fn test_progress_log_receives_rows() {
    let data = synthetic_single_line_data(10, 2, 5);
    let examples: Vec<_> = ExampleReader::new(data.as_bytes(), DataFormat::SingleLine, ParseOptions::default())
        .collect::<Result<_, _>>()
        .unwrap();

    let mut out = Vec::new();
    {
        let mut sink = RunSink {
            progress: Some(ProgressLog::new(Box::new(&mut out))),
            predictions: None,
        };
        run_in_memory(&mut learner(ReductionKind::Csoaa), &examples, &RunOptions::default(), &mut sink)
            .unwrap();
    }
    let text = String::from_utf8(out).unwrap();
    // Two header lines plus rows at examples 1, 2, 4 and 8
    assert_eq!(text.lines().count(), 6);
}
