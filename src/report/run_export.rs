//! Run report export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::learner::{LearnerConfig, Loss};
use crate::pipeline::RunStats;
use crate::reduction::ReductionKind;

/// Base learner settings recorded with the run
#[derive(Debug, Serialize)]
pub struct LearnerSettings {
    pub bits: u8,
    pub learning_rate: f32,
    pub power_t: f32,
    pub initial_t: f32,
    pub loss: Loss,
}

impl From<&LearnerConfig> for LearnerSettings {
    fn from(config: &LearnerConfig) -> Self {
        Self {
            bits: config.bits,
            learning_rate: config.learning_rate,
            power_t: config.power_t,
            initial_t: config.initial_t,
            loss: config.loss,
        }
    }
}

/// Metadata about the run
#[derive(Debug, Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// csreduce version
    pub csreduce_version: String,
    pub data_file: String,
    pub reduction: ReductionKind,
    /// Class count for CSOAA label validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_classes: Option<u32>,
    pub test_only: bool,
    pub learner: LearnerSettings,
}

/// Complete run report
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub stats: RunStats,
    /// Average loss over labeled examples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_loss: Option<f64>,
    pub elapsed_seconds: f64,
}

/// Parameters for run report export
pub struct ExportParams<'a> {
    pub data_file: &'a str,
    pub reduction: ReductionKind,
    pub num_classes: Option<u32>,
    pub test_only: bool,
    pub learner: &'a LearnerConfig,
    pub elapsed_seconds: f64,
}

/// Build the report for a finished run
pub fn build_run_report(stats: &RunStats, params: &ExportParams) -> RunReport {
    RunReport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            csreduce_version: env!("CARGO_PKG_VERSION").to_string(),
            data_file: params.data_file.to_string(),
            reduction: params.reduction,
            num_classes: params.num_classes,
            test_only: params.test_only,
            learner: LearnerSettings::from(params.learner),
        },
        stats: stats.clone(),
        average_loss: stats.average_loss(),
        elapsed_seconds: params.elapsed_seconds,
    }
}

/// Export a run report to a JSON file
pub fn export_run_report(stats: &RunStats, output_path: &Path, params: &ExportParams) -> Result<()> {
    let report = build_run_report(stats, params);

    let json =
        serde_json::to_string_pretty(&report).context("Failed to serialize run report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write run report to {}", output_path.display()))?;

    Ok(())
}
