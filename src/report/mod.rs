//! Report module - progress log, run summaries and exports

pub mod progress;
pub mod run_export;
pub mod summary;

pub use progress::*;
pub use run_export::*;
pub use summary::*;
