//! Terminal and logging helpers shared by the binary and the pipeline

pub mod logging;
pub mod progress;
pub mod styling;

pub use progress::*;
pub use styling::*;
