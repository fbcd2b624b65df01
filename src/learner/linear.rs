//! Hashed sparse linear learner
//!
//! Weights live in a flat table of `2^bits` slots addressed by masking the
//! feature index. Squared loss uses the importance-invariant closed-form update
//! so a large importance weight moves the prediction at most all the way to
//! the target; logistic loss takes a plain weighted gradient step.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

use super::BaseLearner;
use crate::example::Features;

/// Loss function optimized by [`LinearLearner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Loss {
    /// `(p - y)^2 / 2`; targets are arbitrary reals.
    #[default]
    Squared,
    /// `log(1 + exp(-y p))`; targets are `-1` or `+1`.
    Logistic,
}

impl fmt::Display for Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loss::Squared => write!(f, "squared"),
            Loss::Logistic => write!(f, "logistic"),
        }
    }
}

impl FromStr for Loss {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "squared" => Ok(Loss::Squared),
            "logistic" => Ok(Loss::Logistic),
            _ => Err(format!(
                "Invalid loss '{}'. Use 'squared' or 'logistic'",
                s
            )),
        }
    }
}

/// Configuration for the linear learner
#[derive(Debug, Clone)]
pub struct LearnerConfig {
    /// Weight table holds `2^bits` slots
    pub bits: u8,
    /// Base learning rate
    pub learning_rate: f32,
    /// Decay exponent of the learning rate schedule
    pub power_t: f32,
    /// Offset added to the running example weight in the schedule
    pub initial_t: f32,
    pub loss: Loss,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            bits: 18,
            learning_rate: 0.5,
            power_t: 0.5,
            initial_t: 0.0,
            loss: Loss::Squared,
        }
    }
}

/// Rejected learner configuration.
#[derive(Debug, Error, PartialEq)]
pub enum LearnerConfigError {
    #[error("bits must be between 1 and 30, got {0}")]
    Bits(u8),
    #[error("learning rate must be positive and finite, got {0}")]
    LearningRate(f32),
    #[error("power_t must be non-negative and finite, got {0}")]
    PowerT(f32),
    #[error("initial_t must be non-negative and finite, got {0}")]
    InitialT(f32),
}

impl LearnerConfig {
    pub fn validate(&self) -> Result<(), LearnerConfigError> {
        if !(1..=30).contains(&self.bits) {
            return Err(LearnerConfigError::Bits(self.bits));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(LearnerConfigError::LearningRate(self.learning_rate));
        }
        if !(self.power_t.is_finite() && self.power_t >= 0.0) {
            return Err(LearnerConfigError::PowerT(self.power_t));
        }
        if !(self.initial_t.is_finite() && self.initial_t >= 0.0) {
            return Err(LearnerConfigError::InitialT(self.initial_t));
        }
        Ok(())
    }
}

/// Online linear model over hashed sparse features.
#[derive(Debug, Clone)]
pub struct LinearLearner {
    config: LearnerConfig,
    weights: Vec<f32>,
    mask: u32,
    weighted_examples: f64,
    updates: u64,
}

impl LinearLearner {
    pub fn new(config: LearnerConfig) -> Result<Self, LearnerConfigError> {
        config.validate()?;
        let slots = 1usize << config.bits;
        Ok(Self {
            mask: (slots - 1) as u32,
            weights: vec![0.0; slots],
            config,
            weighted_examples: 0.0,
            updates: 0,
        })
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Number of `learn` calls that changed the model.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Sum of importance weights seen by `learn`.
    pub fn weighted_examples(&self) -> f64 {
        self.weighted_examples
    }

    /// Current weight stored for a feature index.
    pub fn weight(&self, index: u32) -> f32 {
        self.weights[(index & self.mask) as usize]
    }

    fn learning_rate(&self) -> f32 {
        let t = self.config.initial_t as f64 + self.weighted_examples;
        (self.config.learning_rate as f64 * t.powf(-(self.config.power_t as f64))) as f32
    }

    fn apply(&mut self, features: &Features, scale: f32) {
        for (index, value) in features.iter() {
            self.weights[(index & self.mask) as usize] += scale * value;
        }
    }
}

impl BaseLearner for LinearLearner {
    fn predict(&self, features: &Features) -> f32 {
        features
            .iter()
            .map(|(index, value)| self.weights[(index & self.mask) as usize] * value)
            .sum()
    }

    fn learn(&mut self, features: &Features, target: f32, weight: f32) {
        if weight <= 0.0 || !weight.is_finite() || !target.is_finite() {
            return;
        }
        let x2 = features.squared_norm();
        if x2 == 0.0 || !x2.is_finite() {
            return;
        }

        self.weighted_examples += weight as f64;
        let eta = self.learning_rate();
        let prediction = self.predict(features);

        let scale = match self.config.loss {
            Loss::Squared => {
                (target - prediction) * (1.0 - (-eta * weight * x2).exp()) / x2
            }
            Loss::Logistic => {
                let y = if target > 0.0 { 1.0 } else { -1.0 };
                eta * weight * y / (1.0 + (y * prediction).exp())
            }
        };

        if scale != 0.0 {
            self.apply(features, scale);
            self.updates += 1;
        }
    }
}
