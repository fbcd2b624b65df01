//! Cost-sensitive example model
//!
//! An [`Example`] is one streaming record: a shared feature vector and an
//! ordered list of candidate labels, each with a cost and optionally its own
//! features. Examples carry no state across calls; a reduction consumes one and
//! it is dropped.

pub mod features;
pub mod label;

pub use features::{Features, CONSTANT_INDEX};
pub use label::{Candidate, Cost};

/// One cost-sensitive record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Example {
    /// Used by candidates that have no private feature vector.
    pub shared: Features,
    /// Candidate order only fixes enumeration order; ties resolve by label id.
    pub candidates: Vec<Candidate>,
}

impl Example {
    pub fn new(shared: Features, candidates: Vec<Candidate>) -> Self {
        Self { shared, candidates }
    }

    /// Example where every candidate carries its own features.
    pub fn label_dependent(candidates: Vec<Candidate>) -> Self {
        Self {
            shared: Features::new(),
            candidates,
        }
    }

    /// Private features of `candidate` when present, otherwise the shared vector.
    pub fn effective_features<'a>(&'a self, candidate: &'a Candidate) -> &'a Features {
        candidate.features.as_ref().unwrap_or(&self.shared)
    }

    /// Candidates with a valid known cost, in input order, paired with that cost.
    pub fn training_set(&self) -> impl Iterator<Item = (&Candidate, f32)> + '_ {
        self.candidates
            .iter()
            .filter_map(|c| c.cost.valid().map(|cost| (c, cost)))
    }

    /// Candidates eligible for prediction: valid known cost or unknown cost.
    pub fn prediction_set(&self) -> impl Iterator<Item = &Candidate> + '_ {
        self.candidates
            .iter()
            .filter(|c| c.cost.valid().is_some() || c.cost == Cost::Unknown)
    }

    /// At least one candidate carries a usable cost.
    pub fn is_labeled(&self) -> bool {
        self.training_set().next().is_some()
    }

    /// Label ids whose known cost is NaN, infinite or negative.
    pub fn invalid_cost_labels(&self) -> Vec<u32> {
        self.candidates
            .iter()
            .filter(|c| c.cost.is_invalid())
            .map(|c| c.label_id)
            .collect()
    }

    /// Lowest valid cost and its label id; ties go to the lowest label id.
    pub fn min_cost(&self) -> Option<(u32, f32)> {
        self.training_set()
            .map(|(c, cost)| (c.label_id, cost))
            .min_by(|a, b| {
                a.1.total_cmp(&b.1).then(a.0.cmp(&b.0))
            })
    }

    /// Valid cost of `label_id`, if that candidate has one.
    pub fn cost_of(&self, label_id: u32) -> Option<f32> {
        self.candidates
            .iter()
            .find(|c| c.label_id == label_id)
            .and_then(|c| c.cost.valid())
    }

    /// Total number of feature entries across the shared and private vectors.
    pub fn feature_count(&self) -> usize {
        self.shared.len()
            + self
                .candidates
                .iter()
                .filter_map(|c| c.features.as_ref())
                .map(Features::len)
                .sum::<usize>()
    }
}
