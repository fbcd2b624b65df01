//! Weighted all-pairs over label-dependent features (WAP-LDF)
//!
//! Every unordered pair of candidates with different costs becomes one
//! importance-weighted binary problem on the shared base learner. The paired
//! representation is `x_i - x_j`; target `-1` means `i` is cheaper, `+1` means
//! `j` is. The importance weight is exactly `|cost_i - cost_j|`.
//!
//! Prediction runs a tournament: each pair's score awards a win to the side it
//! favours, and the candidate with the most wins is selected.

use std::cmp::Ordering;

use super::{Prediction, Ranked};
use crate::example::{Candidate, Example, Features};
use crate::learner::BaseLearner;

/// Target used when the first member of a pair is preferred.
pub const PREFER_FIRST: f32 = -1.0;
/// Target used when the second member of a pair is preferred.
pub const PREFER_SECOND: f32 = 1.0;

/// One binary training problem derived from a pair of candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseUpdate {
    pub first: u32,
    pub second: u32,
    /// `x_first - x_second`
    pub features: Features,
    pub target: f32,
    pub weight: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WapLdf;

impl WapLdf {
    pub fn new() -> Self {
        WapLdf
    }

    /// Binary problems for every informative pair, in enumeration order.
    ///
    /// Pairs with equal costs carry no signal and are skipped.
    pub fn training_pairs<'a>(
        &self,
        example: &'a Example,
    ) -> impl Iterator<Item = PairwiseUpdate> + 'a {
        let labeled: Vec<(&'a Candidate, f32)> = example.training_set().collect();
        let n = labeled.len();
        (0..n)
            .flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
            .filter_map(move |(i, j)| {
                let (first, cost_i) = labeled[i];
                let (second, cost_j) = labeled[j];
                let delta = cost_i - cost_j;
                if delta == 0.0 {
                    return None;
                }
                Some(PairwiseUpdate {
                    first: first.label_id,
                    second: second.label_id,
                    features: Features::difference(
                        example.effective_features(first),
                        example.effective_features(second),
                    ),
                    target: if delta < 0.0 { PREFER_FIRST } else { PREFER_SECOND },
                    weight: delta.abs(),
                })
            })
    }

    /// Pairwise win counts for every prediction-set candidate, best first.
    ///
    /// A score of exactly zero is a draw and awards no win. Ties in the win
    /// count go to the lowest label id.
    pub fn rank<B: BaseLearner + ?Sized>(&self, base: &B, example: &Example) -> Vec<Ranked> {
        let candidates: Vec<&Candidate> = example.prediction_set().collect();
        let mut wins = vec![0u32; candidates.len()];

        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                let paired = Features::difference(
                    example.effective_features(candidates[i]),
                    example.effective_features(candidates[j]),
                );
                let score = base.predict(&paired);
                if score < 0.0 {
                    wins[i] += 1;
                } else if score > 0.0 {
                    wins[j] += 1;
                }
            }
        }

        let mut ranked: Vec<Ranked> = candidates
            .iter()
            .zip(wins)
            .map(|(c, w)| Ranked {
                label_id: c.label_id,
                score: w as f32,
            })
            .collect();
        if ranked.len() > 1 {
            ranked.sort_by(compare_wins);
        }
        ranked
    }

    pub fn predict<B: BaseLearner + ?Sized>(
        &self,
        base: &B,
        example: &Example,
    ) -> Option<Prediction> {
        self.rank(base, example).into_iter().next().map(Prediction::from)
    }

    /// Issues one `learn` call per informative pair and returns the count.
    pub fn learn<B: BaseLearner + ?Sized>(&self, base: &mut B, example: &Example) -> usize {
        let mut updates = 0;
        for pair in self.training_pairs(example) {
            base.learn(&pair.features, pair.target, pair.weight);
            updates += 1;
        }
        updates
    }
}

fn compare_wins(a: &Ranked, b: &Ranked) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.label_id.cmp(&b.label_id))
}
