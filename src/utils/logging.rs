//! Logging setup for the binary.
//!
//! Installs a global tracing subscriber writing to stderr so diagnostics never
//! mix with predictions written to stdout. `RUST_LOG` takes precedence over the
//! verbosity flag.

use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Errors that may occur while initializing logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive could not be parsed.
    #[error("Invalid log filter '{directive}': {message}")]
    Filter { directive: String, message: String },
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Default filter directive for a verbosity flag.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "csreduce=debug,warn"
    } else {
        "warn"
    }
}

/// Build the filter from `RUST_LOG`, falling back to the verbosity default.
pub fn build_filter(verbose: bool) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = default_directive(verbose);
    EnvFilter::try_new(directive).map_err(|e| LoggingError::Filter {
        directive: directive.to_string(),
        message: e.to_string(),
    })
}

/// Initialize tracing on stderr.
///
/// Failures are returned so callers can continue without logging.
pub fn init(verbose: bool) -> Result<(), LoggingError> {
    let filter = build_filter(verbose)?;
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let subscriber = Registry::default().with(filter).with(stderr_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
