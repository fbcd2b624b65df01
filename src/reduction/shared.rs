//! Thread-shareable learner handle
//!
//! Online updates must reach the base learner in a single ordered stream. The
//! lock is held for a whole example, not per base learner call, so the
//! predict/learn sequence of one example is never interleaved with another's.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Learner, Outcome, Prediction, Ranked, ReductionError};
use crate::example::Example;
use crate::learner::BaseLearner;

/// Cloneable handle to one [`Learner`]; clones share the same weights.
#[derive(Debug)]
pub struct SharedLearner<B> {
    inner: Arc<Mutex<Learner<B>>>,
}

impl<B> Clone for SharedLearner<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: BaseLearner> SharedLearner<B> {
    pub fn new(learner: Learner<B>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(learner)),
        }
    }

    pub fn learn(&self, example: &Example) -> Result<Outcome, ReductionError> {
        self.inner.lock().learn(example)
    }

    pub fn evaluate(&self, example: &Example) -> Result<Outcome, ReductionError> {
        self.inner.lock().evaluate(example)
    }

    pub fn predict(&self, example: &Example) -> Result<Prediction, ReductionError> {
        self.inner.lock().predict(example)
    }

    pub fn rank(&self, example: &Example) -> Result<Vec<Ranked>, ReductionError> {
        self.inner.lock().rank(example)
    }

    pub fn examples_seen(&self) -> u64 {
        self.inner.lock().examples_seen()
    }

    /// Run `f` with exclusive access to the learner.
    pub fn with<R>(&self, f: impl FnOnce(&mut Learner<B>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// The learner back, if this is the last handle.
    pub fn try_unwrap(self) -> Result<Learner<B>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}
