//! Pipeline module - reads examples and streams them through a learner

pub mod loader;
pub mod parser;
pub mod runner;

pub use loader::*;
pub use parser::{feature_index, DataFormat, ExampleReader, ParseError, ParseOptions};
pub use runner::*;
