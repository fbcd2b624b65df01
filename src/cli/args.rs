//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::learner::{LearnerConfig, Loss};
use crate::pipeline::{DataFormat, ParseOptions, RunOptions};
use crate::reduction::{CsoaaConfig, ReductionConfig, ReductionKind};

/// csreduce - Online cost-sensitive classification by CSOAA or WAP-LDF reduction
#[derive(Parser, Debug)]
#[command(name = "csreduce")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data file with cost-sensitive examples
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Reduction to install on the base learner
    #[arg(long, value_enum, default_value_t = ReductionKind::Csoaa)]
    pub reduction: ReductionKind,

    /// Number of classes K for CSOAA. Labels must lie in 1..=K and records with
    /// an empty label section predict over all K labels.
    #[arg(long, value_parser = validate_num_classes)]
    pub num_classes: Option<u32>,

    /// Read the multi-line label-dependent format (always on for wap-ldf)
    #[arg(long, default_value = "false")]
    pub ldf: bool,

    /// Number of passes over the data
    #[arg(long, default_value = "1", value_parser = validate_passes)]
    pub passes: usize,

    /// Predict and score only, never update the model
    #[arg(short = 't', long, default_value = "false")]
    pub testonly: bool,

    /// Write one predicted label per example to this file
    #[arg(short, long)]
    pub predictions: Option<PathBuf>,

    /// Write a JSON run report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Weight table size as a power of two
    #[arg(short, long, default_value = "18", value_parser = validate_bits)]
    pub bits: u8,

    /// Base learning rate
    #[arg(short, long, default_value = "0.5", value_parser = validate_learning_rate)]
    pub learning_rate: f32,

    /// Learning rate decay exponent
    #[arg(long, default_value = "0.5", value_parser = validate_non_negative)]
    pub power_t: f32,

    /// Offset added to the example count in the learning rate schedule
    #[arg(long, default_value = "0.0", value_parser = validate_non_negative)]
    pub initial_t: f32,

    /// Loss optimized by the base learner
    #[arg(long, value_enum, default_value_t = Loss::Squared)]
    pub loss: Loss,

    /// Do not add the constant bias feature
    #[arg(long, default_value = "false")]
    pub noconstant: bool,

    /// Suppress the progress log
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train CSOAA and WAP-LDF side by side on the same label-dependent data
    Compare {
        /// Data file in the multi-line label-dependent format
        data: PathBuf,

        /// Number of passes over the data
        #[arg(long, default_value = "1", value_parser = validate_passes)]
        passes: usize,
    },
}

impl Cli {
    /// Get the data path, if one was given.
    pub fn data(&self) -> Option<&PathBuf> {
        self.data.as_ref()
    }

    /// Base learner settings from the command line.
    pub fn learner_config(&self) -> LearnerConfig {
        LearnerConfig {
            bits: self.bits,
            learning_rate: self.learning_rate,
            power_t: self.power_t,
            initial_t: self.initial_t,
            loss: self.loss,
        }
    }

    pub fn reduction_config(&self) -> ReductionConfig {
        ReductionConfig {
            csoaa: CsoaaConfig {
                num_classes: self.num_classes,
            },
        }
    }

    /// Input layout: label-dependent for wap-ldf or when `--ldf` is set.
    pub fn data_format(&self) -> DataFormat {
        if self.ldf || self.reduction.is_label_dependent() {
            DataFormat::LabelDependent
        } else {
            DataFormat::SingleLine
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            constant: !self.noconstant,
            num_classes: self.num_classes,
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            passes: self.passes,
            test_only: self.testonly,
        }
    }
}

/// Validator for the bits parameter
fn validate_bits(s: &str) -> Result<u8, String> {
    let value: u8 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of bits", s))?;

    if !(1..=30).contains(&value) {
        Err(format!("bits must be between 1 and 30, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for the passes parameter
fn validate_passes(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value == 0 {
        Err("passes must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for the num_classes parameter
fn validate_num_classes(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value == 0 {
        Err("num_classes must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for the learning_rate parameter
fn validate_learning_rate(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(value.is_finite() && value > 0.0) {
        Err(format!("learning_rate must be positive, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for power_t and initial_t
fn validate_non_negative(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(value.is_finite() && value >= 0.0) {
        Err(format!("value must be non-negative, got {}", value))
    } else {
        Ok(value)
    }
}
