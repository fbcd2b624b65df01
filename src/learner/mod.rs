//! Base learner capability
//!
//! Reductions only ever talk to an online predictor through [`BaseLearner`].
//! Concrete predictors are interchangeable behind it; [`LinearLearner`] is the
//! hashed linear model shipped with the crate.

pub mod linear;

pub use linear::{LearnerConfig, LearnerConfigError, LinearLearner, Loss};

use crate::example::Features;

/// An online scorer that can be updated one weighted example at a time.
///
/// Calls against one handle form a single ordered stream; callers that share a
/// handle across threads must serialize access themselves.
pub trait BaseLearner {
    /// Score `features` with the current weights.
    fn predict(&self, features: &Features) -> f32;

    /// Move the score of `features` toward `target`.
    ///
    /// `weight` is an importance weight (`>= 0`) scaling the update. A zero
    /// weight must leave the learner unchanged.
    fn learn(&mut self, features: &Features, target: f32, weight: f32);
}

impl<B: BaseLearner + ?Sized> BaseLearner for Box<B> {
    fn predict(&self, features: &Features) -> f32 {
        (**self).predict(features)
    }

    fn learn(&mut self, features: &Features, target: f32, weight: f32) {
        (**self).learn(features, target, weight)
    }
}

impl<B: BaseLearner + ?Sized> BaseLearner for &mut B {
    fn predict(&self, features: &Features) -> f32 {
        (**self).predict(features)
    }

    fn learn(&mut self, features: &Features, target: f32, weight: f32) {
        (**self).learn(features, target, weight)
    }
}
