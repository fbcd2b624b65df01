//! One-against-all cost regression (CSOAA)
//!
//! Each candidate becomes one regression problem on the shared base learner.
//! The candidate's features are tagged with its label id, so a single weight
//! table holds a separate regressor per label. Prediction is the argmin of the
//! per-label regressions.

use std::cmp::Ordering;

use super::{Prediction, Ranked};
use crate::example::Example;
use crate::learner::BaseLearner;

/// Configuration for the CSOAA reduction
#[derive(Debug, Clone, Default)]
pub struct CsoaaConfig {
    /// When set, label ids must lie in `1..=num_classes`.
    pub num_classes: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct Csoaa {
    config: CsoaaConfig,
}

impl Csoaa {
    pub fn new(config: CsoaaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CsoaaConfig {
        &self.config
    }

    /// Predicted cost of every prediction-set candidate, in input order.
    pub fn scores<B: BaseLearner + ?Sized>(&self, base: &B, example: &Example) -> Vec<Ranked> {
        example
            .prediction_set()
            .map(|candidate| {
                let view = example.effective_features(candidate).tagged(candidate.label_id);
                Ranked {
                    label_id: candidate.label_id,
                    score: base.predict(&view),
                }
            })
            .collect()
    }

    /// Candidates ordered by predicted cost, lowest label id first on ties.
    pub fn rank<B: BaseLearner + ?Sized>(&self, base: &B, example: &Example) -> Vec<Ranked> {
        let mut ranked = self.scores(base, example);
        if ranked.len() > 1 {
            ranked.sort_by(compare_cost);
        }
        ranked
    }

    pub fn predict<B: BaseLearner + ?Sized>(
        &self,
        base: &B,
        example: &Example,
    ) -> Option<Prediction> {
        self.scores(base, example)
            .into_iter()
            .min_by(compare_cost)
            .map(Prediction::from)
    }

    /// One regression update per candidate with a usable cost. Returns the
    /// number of `learn` calls issued.
    pub fn learn<B: BaseLearner + ?Sized>(&self, base: &mut B, example: &Example) -> usize {
        let mut updates = 0;
        for (candidate, cost) in example.training_set() {
            let view = example.effective_features(candidate).tagged(candidate.label_id);
            base.learn(&view, cost, 1.0);
            updates += 1;
        }
        updates
    }
}

fn compare_cost(a: &Ranked, b: &Ranked) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then(a.label_id.cmp(&b.label_id))
}
