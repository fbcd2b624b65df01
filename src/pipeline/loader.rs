//! Data file loader for cost-sensitive text formats

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use super::parser::{DataFormat, ExampleReader, ParseOptions};
use crate::example::Example;
use crate::utils::{create_spinner, finish_with_success, finish_with_warning};

/// Open a data file as a stream of examples
pub fn open_examples(
    path: &Path,
    format: DataFormat,
    options: &ParseOptions,
) -> Result<ExampleReader<BufReader<File>>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open data file: {}", path.display()))?;
    Ok(ExampleReader::new(
        BufReader::new(file),
        format,
        options.clone(),
    ))
}

/// Read a whole data file into memory, showing a spinner.
///
/// Records that fail to parse are logged and skipped.
///
/// # Returns
/// The parsed examples and the number of records skipped
pub fn load_examples_with_progress(
    path: &Path,
    format: DataFormat,
    options: &ParseOptions,
) -> Result<(Vec<Example>, usize)> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));
    let mut examples = Vec::new();
    let mut skipped = 0usize;

    for item in open_examples(path, format, options)? {
        match item {
            Ok(example) => examples.push(example),
            Err(e) => {
                warn!(error = %e, "Skipping unparseable record");
                skipped += 1;
            }
        }
    }

    let message = format!("Loaded {} examples", examples.len());
    if skipped == 0 {
        finish_with_success(&spinner, &message);
    } else {
        finish_with_warning(&spinner, &format!("{} ({} skipped)", message, skipped));
    }
    Ok((examples, skipped))
}
