//! Learner reductions for cost-sensitive classification
//!
//! [`setup`] binds a base learner to one of two strategies and returns a
//! [`Learner`] whose `predict` / `rank` / `learn` contract is the same for both,
//! so callers never branch on the installed reduction.
//!
//! - [`csoaa`]: one regression per candidate, argmin selection.
//! - [`wap_ldf`]: importance-weighted pairwise comparisons over label-dependent
//!   features, tournament selection.

pub mod csoaa;
mod error;
pub mod shared;
pub mod wap_ldf;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;
use tracing::warn;

pub use csoaa::{Csoaa, CsoaaConfig};
pub use error::ReductionError;
pub use shared::SharedLearner;
pub use wap_ldf::{PairwiseUpdate, WapLdf};

use crate::example::Example;
use crate::learner::BaseLearner;

/// Which reduction a [`Learner`] runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReductionKind {
    /// One-against-all cost regression
    #[default]
    Csoaa,
    /// Weighted all-pairs over label-dependent features
    WapLdf,
}

impl ReductionKind {
    /// Whether examples must carry per-label feature vectors.
    pub fn is_label_dependent(self) -> bool {
        matches!(self, ReductionKind::WapLdf)
    }
}

impl fmt::Display for ReductionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReductionKind::Csoaa => write!(f, "csoaa"),
            ReductionKind::WapLdf => write!(f, "wap-ldf"),
        }
    }
}

impl FromStr for ReductionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "csoaa" => Ok(ReductionKind::Csoaa),
            "wap-ldf" | "wapldf" => Ok(ReductionKind::WapLdf),
            _ => Err(format!(
                "Invalid reduction '{}'. Use 'csoaa' or 'wap-ldf'",
                s
            )),
        }
    }
}

/// Reduction-specific settings passed to [`setup`]
#[derive(Debug, Clone, Default)]
pub struct ReductionConfig {
    pub csoaa: CsoaaConfig,
}

/// Selected label.
///
/// `score` is the predicted cost under CSOAA and the number of pairwise wins
/// under WAP-LDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label_id: u32,
    pub score: f32,
}

/// One entry of a ranking, same score convention as [`Prediction`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranked {
    pub label_id: u32,
    pub score: f32,
}

impl From<Ranked> for Prediction {
    fn from(r: Ranked) -> Self {
        Prediction {
            label_id: r.label_id,
            score: r.score,
        }
    }
}

/// What happened to one example passed to [`Learner::learn`] or
/// [`Learner::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub example_index: u64,
    /// Prediction made before any update from this example.
    pub prediction: Prediction,
    /// `cost(predicted) - min cost`; `None` when the predicted label has no
    /// usable cost.
    pub loss: Option<f32>,
    /// Number of base learner `learn` calls issued.
    pub updates: usize,
    /// Labels dropped because their cost was NaN, infinite or negative.
    pub excluded: Vec<u32>,
}

#[derive(Debug, Clone)]
enum Strategy {
    Csoaa(Csoaa),
    WapLdf(WapLdf),
}

/// A base learner with one reduction installed.
#[derive(Debug, Clone)]
pub struct Learner<B> {
    base: B,
    strategy: Strategy,
    examples_seen: u64,
}

/// Install `kind` on top of `base`.
pub fn setup<B: BaseLearner>(base: B, kind: ReductionKind, config: ReductionConfig) -> Learner<B> {
    let strategy = match kind {
        ReductionKind::Csoaa => Strategy::Csoaa(Csoaa::new(config.csoaa)),
        ReductionKind::WapLdf => Strategy::WapLdf(WapLdf::new()),
    };
    Learner {
        base,
        strategy,
        examples_seen: 0,
    }
}

impl<B: BaseLearner> Learner<B> {
    pub fn kind(&self) -> ReductionKind {
        match self.strategy {
            Strategy::Csoaa(_) => ReductionKind::Csoaa,
            Strategy::WapLdf(_) => ReductionKind::WapLdf,
        }
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn into_base(self) -> B {
        self.base
    }

    /// Examples submitted through `learn` or `evaluate`, malformed ones included.
    pub fn examples_seen(&self) -> u64 {
        self.examples_seen
    }

    /// Best candidate under the current weights. Does not change any state.
    pub fn predict(&self, example: &Example) -> Result<Prediction, ReductionError> {
        let index = self.examples_seen;
        self.validate(example, index)?;
        self.select(example, index)
    }

    /// Every prediction-set candidate, best first.
    pub fn rank(&self, example: &Example) -> Result<Vec<Ranked>, ReductionError> {
        self.validate(example, self.examples_seen)?;
        Ok(match &self.strategy {
            Strategy::Csoaa(r) => r.rank(&self.base, example),
            Strategy::WapLdf(r) => r.rank(&self.base, example),
        })
    }

    /// Predict, then train on every usable cost in the example.
    pub fn learn(&mut self, example: &Example) -> Result<Outcome, ReductionError> {
        let mut outcome = self.evaluate(example)?;
        outcome.updates = match &self.strategy {
            Strategy::Csoaa(r) => r.learn(&mut self.base, example),
            Strategy::WapLdf(r) => r.learn(&mut self.base, example),
        };
        Ok(outcome)
    }

    /// Predict and score the example against its costs without training.
    pub fn evaluate(&mut self, example: &Example) -> Result<Outcome, ReductionError> {
        let index = self.examples_seen;
        self.examples_seen += 1;

        let excluded = self.validate(example, index)?;
        let prediction = self.select(example, index)?;
        let loss = example
            .cost_of(prediction.label_id)
            .zip(example.min_cost())
            .map(|(chosen, (_, min))| chosen - min);

        Ok(Outcome {
            example_index: index,
            prediction,
            loss,
            updates: 0,
            excluded,
        })
    }

    fn select(&self, example: &Example, index: u64) -> Result<Prediction, ReductionError> {
        let prediction = match &self.strategy {
            Strategy::Csoaa(r) => r.predict(&self.base, example),
            Strategy::WapLdf(r) => r.predict(&self.base, example),
        };
        prediction.ok_or_else(|| ReductionError::MalformedExample {
            example: index,
            reason: "no candidate left to predict".to_string(),
        })
    }

    /// Reject examples that cannot be reduced; returns labels excluded for
    /// unusable costs. Runs before any base learner call.
    fn validate(&self, example: &Example, index: u64) -> Result<Vec<u32>, ReductionError> {
        if example.candidates.is_empty() {
            return Err(ReductionError::MalformedExample {
                example: index,
                reason: "example has no candidates".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(example.candidates.len());
        for candidate in &example.candidates {
            if !seen.insert(candidate.label_id) {
                return Err(ReductionError::DuplicateLabelId {
                    example: index,
                    label_id: candidate.label_id,
                });
            }
        }

        if !example.shared.is_finite() {
            return Err(ReductionError::MalformedExample {
                example: index,
                reason: "shared features contain a non-finite value".to_string(),
            });
        }
        if let Some(c) = example
            .candidates
            .iter()
            .find(|c| c.features.as_ref().is_some_and(|f| !f.is_finite()))
        {
            return Err(ReductionError::MalformedExample {
                example: index,
                reason: format!("label {} has a non-finite feature value", c.label_id),
            });
        }

        match &self.strategy {
            Strategy::Csoaa(r) => {
                if let Some(k) = r.config().num_classes {
                    if let Some(c) = example
                        .candidates
                        .iter()
                        .find(|c| c.label_id == 0 || c.label_id > k)
                    {
                        return Err(ReductionError::LabelOutOfRange {
                            example: index,
                            label_id: c.label_id,
                            num_classes: k,
                        });
                    }
                }
            }
            Strategy::WapLdf(_) => {
                if let Some(c) = example.prediction_set().find(|c| c.features.is_none()) {
                    return Err(ReductionError::MissingLabelFeatures {
                        example: index,
                        label_id: c.label_id,
                    });
                }
            }
        }

        if example.prediction_set().next().is_none() {
            return Err(ReductionError::MalformedExample {
                example: index,
                reason: "no candidate has a usable or unknown cost".to_string(),
            });
        }

        let excluded = example.invalid_cost_labels();
        for label_id in &excluded {
            warn!(
                example = index,
                label_id = *label_id,
                "Excluding candidate with non-finite or negative cost"
            );
        }
        Ok(excluded)
    }
}
