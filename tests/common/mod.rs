//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;

use csreduce::example::{Candidate, Cost, Example, Features};
use csreduce::learner::BaseLearner;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// One call observed by [`RecordingLearner`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Predict(Features),
    Learn {
        features: Features,
        target: f32,
        weight: f32,
    },
}

/// Base learner mock that records every call and scores with a fixed function
pub struct RecordingLearner {
    calls: RefCell<Vec<Call>>,
    score: Box<dyn Fn(&Features) -> f32>,
}

impl RecordingLearner {
    /// Every prediction is 0
    pub fn new() -> Self {
        Self::scoring(|_| 0.0)
    }

    pub fn scoring(score: impl Fn(&Features) -> f32 + 'static) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            score: Box::new(score),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn predict_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Predict(_)))
            .count()
    }

    /// `(features, target, weight)` of every learn call, in order
    pub fn learn_calls(&self) -> Vec<(Features, f32, f32)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Learn {
                    features,
                    target,
                    weight,
                } => Some((features.clone(), *target, *weight)),
                Call::Predict(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl BaseLearner for RecordingLearner {
    fn predict(&self, features: &Features) -> f32 {
        self.calls.borrow_mut().push(Call::Predict(features.clone()));
        (self.score)(features)
    }

    fn learn(&mut self, features: &Features, target: f32, weight: f32) {
        self.calls.borrow_mut().push(Call::Learn {
            features: features.clone(),
            target,
            weight,
        });
    }
}

/// Score = weighted sum over a fixed table of index weights
pub fn table_scorer(table: Vec<(u32, f32)>) -> impl Fn(&Features) -> f32 {
    move |features: &Features| {
        features
            .iter()
            .map(|(i, v)| {
                table
                    .iter()
                    .find(|(t, _)| *t == i)
                    .map(|(_, w)| w * v)
                    .unwrap_or(0.0)
            })
            .sum()
    }
}

/// Shared-feature example with one feature and the given `(label, cost)` list
pub fn shared_example(costs: &[(u32, Cost)]) -> Example {
    Example::new(
        Features::from([(1, 1.0), (2, 0.5)]),
        costs.iter().map(|&(id, cost)| Candidate::new(id, cost)).collect(),
    )
}

/// Label-dependent candidate whose only feature is `index`
pub fn ldf_candidate(label_id: u32, cost: Cost, index: u32) -> Candidate {
    Candidate::new(label_id, cost).with_features(Features::from([(index, 1.0)]))
}

/// Label-dependent example; candidate `label` gets feature index `100 + label`
pub fn ldf_example(costs: &[(u32, Cost)]) -> Example {
    Example::label_dependent(
        costs
            .iter()
            .map(|&(id, cost)| ldf_candidate(id, cost, 100 + id))
            .collect(),
    )
}

/// Write `contents` to a data file inside a fresh temporary directory
pub fn create_temp_data(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("train.dat");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    (temp_dir, path)
}

/// Synthetic label-dependent data where the candidate carrying feature
/// `good` is always cheapest.
pub fn synthetic_ldf_data(examples: usize, labels: u32, seed: u64) -> String {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut out = String::new();
    for _ in 0..examples {
        let best = rng.gen_range(1..=labels);
        out.push_str("shared | user_a\n");
        for label in 1..=labels {
            if label == best {
                out.push_str(&format!("{}:0 | good item{}\n", label, label));
            } else {
                let cost: f32 = 1.0 + rng.gen::<f32>();
                out.push_str(&format!("{}:{:.3} | bad item{}\n", label, cost, label));
            }
        }
        out.push('\n');
    }
    out
}

/// Synthetic single-line data where the cheapest label is determined by the
/// single active feature `f{label}`.
pub fn synthetic_single_line_data(examples: usize, labels: u32, seed: u64) -> String {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut out = String::new();
    for _ in 0..examples {
        let best = rng.gen_range(1..=labels);
        let costs: Vec<String> = (1..=labels)
            .map(|l| format!("{}:{}", l, if l == best { 0 } else { 1 }))
            .collect();
        out.push_str(&format!("{} | f{}\n", costs.join(" "), best));
    }
    out
}
