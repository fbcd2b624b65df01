//! csreduce: Cost-Sensitive Classification by Reduction
//!
//! Online cost-sensitive multiclass learning, reduced to regression
//! (one-against-all, CSOAA) or to importance-weighted pairwise binary
//! classification over label-dependent features (WAP-LDF), on top of any
//! [`learner::BaseLearner`].
//!
//! ```no_run
//! use csreduce::example::{Candidate, Example, Features};
//! use csreduce::learner::{LearnerConfig, LinearLearner};
//! use csreduce::reduction::{setup, ReductionConfig, ReductionKind};
//!
//! let base = LinearLearner::new(LearnerConfig::default()).unwrap();
//! let mut learner = setup(base, ReductionKind::Csoaa, ReductionConfig::default());
//! let example = Example::new(
//!     Features::from([(1, 1.0)]),
//!     vec![Candidate::with_cost(1, 0.0), Candidate::with_cost(2, 1.0)],
//! );
//! let outcome = learner.learn(&example).unwrap();
//! println!("predicted {}", outcome.prediction.label_id);
//! ```

pub mod cli;
pub mod example;
pub mod learner;
pub mod pipeline;
pub mod reduction;
pub mod report;
pub mod utils;
