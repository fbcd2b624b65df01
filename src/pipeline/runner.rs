//! Streams examples through a learner
//!
//! The runner is the glue between ingestion and a [`Learner`]: it keeps input
//! order, skips records that fail to parse or reduce, and feeds the progress
//! log and prediction sink.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use super::parser::ParseError;
use crate::example::Example;
use crate::learner::BaseLearner;
use crate::reduction::Learner;
use crate::report::{ProgressEntry, ProgressLog};

/// Configuration for a run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Number of passes over the data
    pub passes: usize,
    /// Predict and score only, never update the base learner
    pub test_only: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            passes: 1,
            test_only: false,
        }
    }
}

/// Totals accumulated over one or more passes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub passes: usize,
    /// Examples that went through the learner
    pub examples: u64,
    /// Examples with a defined loss
    pub labeled_examples: u64,
    pub sum_loss: f64,
    /// Records skipped for parse or validation errors
    pub malformed: u64,
    /// Base learner `learn` calls issued
    pub updates: u64,
}

impl RunStats {
    pub fn average_loss(&self) -> Option<f64> {
        (self.labeled_examples > 0).then(|| self.sum_loss / self.labeled_examples as f64)
    }
}

/// Where per-example output goes. Both sinks are optional.
#[derive(Default)]
pub struct RunSink<'a> {
    pub progress: Option<ProgressLog<Box<dyn Write + 'a>>>,
    pub predictions: Option<Box<dyn Write + 'a>>,
}

impl<'a> RunSink<'a> {
    pub fn flush(&mut self) -> Result<()> {
        if let Some(out) = self.predictions.as_mut() {
            out.flush().context("Failed to flush predictions")?;
        }
        Ok(())
    }
}

/// Run one pass over `examples`, updating `stats` in place.
pub fn run_pass<B, I>(
    learner: &mut Learner<B>,
    examples: I,
    options: &RunOptions,
    sink: &mut RunSink<'_>,
    stats: &mut RunStats,
) -> Result<()>
where
    B: BaseLearner,
    I: IntoIterator<Item = Result<Example, ParseError>>,
{
    for item in examples {
        let example = match item {
            Ok(example) => example,
            Err(e) => {
                warn!(error = %e, "Skipping unparseable record");
                stats.malformed += 1;
                continue;
            }
        };

        let result = if options.test_only {
            learner.evaluate(&example)
        } else {
            learner.learn(&example)
        };
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(example = e.example_index(), error = %e, "Skipping example");
                stats.malformed += 1;
                continue;
            }
        };

        debug!(
            example = outcome.example_index,
            prediction = outcome.prediction.label_id,
            loss = ?outcome.loss,
            updates = outcome.updates,
            "Processed example"
        );

        stats.examples += 1;
        stats.updates += outcome.updates as u64;
        if let Some(loss) = outcome.loss {
            stats.labeled_examples += 1;
            stats.sum_loss += loss as f64;
        }

        if let Some(log) = sink.progress.as_mut() {
            log.record(&ProgressEntry {
                loss: outcome.loss,
                label: example.min_cost().map(|(label, _)| label),
                prediction: outcome.prediction.label_id,
                features: example.feature_count(),
            })
            .context("Failed to write progress log")?;
        }
        if let Some(out) = sink.predictions.as_mut() {
            writeln!(out, "{}", outcome.prediction.label_id)
                .context("Failed to write prediction")?;
        }
    }

    stats.passes += 1;
    sink.flush()
}

/// Run `options.passes` passes over in-memory examples.
pub fn run_in_memory<B: BaseLearner>(
    learner: &mut Learner<B>,
    examples: &[Example],
    options: &RunOptions,
    sink: &mut RunSink<'_>,
) -> Result<RunStats> {
    let mut stats = RunStats::default();
    for _ in 0..options.passes.max(1) {
        run_pass(
            learner,
            examples.iter().cloned().map(Ok),
            options,
            sink,
            &mut stats,
        )?;
    }
    Ok(stats)
}
