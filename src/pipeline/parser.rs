//! Text formats for cost-sensitive examples
//!
//! Two layouts are understood:
//!
//! - single line: `1:0.5 2:1 3 | price:1.5 red |shape round`, one example per
//!   line. A label without `:cost` has an unknown cost.
//! - label dependent: one candidate per line (`2:1.0 | features`), an optional
//!   leading `shared | features` line, examples separated by blank lines.
//!
//! Feature tokens are `name` or `name:value`; `|ns` opens namespace `ns`.

use std::io::BufRead;

use thiserror::Error;

use crate::example::{Candidate, Cost, Example, Features, CONSTANT_INDEX};

/// Layout of a data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    SingleLine,
    LabelDependent,
}

/// Parsing switches
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Append the bias feature to every feature vector
    pub constant: bool,
    /// Expands an empty label section to labels `1..=K` with unknown cost
    pub num_classes: Option<u32>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            constant: true,
            num_classes: None,
        }
    }
}

/// A record that could not be parsed. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: missing '|' between labels and features")]
    MissingSeparator { line: usize },

    #[error("line {line}: invalid label '{token}'")]
    InvalidLabel { line: usize, token: String },

    #[error("line {line}: invalid cost '{token}'")]
    InvalidCost { line: usize, token: String },

    #[error("line {line}: invalid feature value '{token}'")]
    InvalidFeatureValue { line: usize, token: String },

    #[error("line {line}: 'shared' must be the first line of an example")]
    MisplacedShared { line: usize },

    #[error("line {line}: example has a shared line but no candidates")]
    NoCandidates { line: usize },

    #[error("line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::MissingSeparator { line }
            | ParseError::InvalidLabel { line, .. }
            | ParseError::InvalidCost { line, .. }
            | ParseError::InvalidFeatureValue { line, .. }
            | ParseError::MisplacedShared { line }
            | ParseError::NoCandidates { line }
            | ParseError::Io { line, .. } => *line,
        }
    }
}

/// Stable feature index for `name` inside `namespace`.
pub fn feature_index(namespace: &str, name: &str) -> u32 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(namespace.as_bytes());
    hasher.update(&[0]);
    hasher.update(name.as_bytes());
    let hash = hasher.finalize();
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Parse the part of a line after the first `|`.
fn parse_features(section: &str, line: usize, options: &ParseOptions) -> Result<Features, ParseError> {
    let mut features = Features::new();

    for group in section.split('|') {
        let mut tokens = group.split_whitespace();
        let namespace = if group.starts_with(char::is_whitespace) || group.is_empty() {
            ""
        } else {
            // `|ns:2.0` namespace weights are not supported; keep the name only
            let ns = tokens.next().unwrap_or("");
            ns.split(':').next().unwrap_or(ns)
        };

        for token in tokens {
            let (name, value) = match token.rsplit_once(':') {
                Some((name, raw)) => {
                    let value: f32 = raw.parse().map_err(|_| ParseError::InvalidFeatureValue {
                        line,
                        token: token.to_string(),
                    })?;
                    if !value.is_finite() {
                        return Err(ParseError::InvalidFeatureValue {
                            line,
                            token: token.to_string(),
                        });
                    }
                    (name, value)
                }
                None => (token, 1.0),
            };
            if value != 0.0 {
                features.push(feature_index(namespace, name), value);
            }
        }
    }

    if options.constant {
        features.push(CONSTANT_INDEX, 1.0);
    }
    Ok(features)
}

fn parse_label(token: &str, line: usize) -> Result<Candidate, ParseError> {
    let (id, cost) = match token.split_once(':') {
        Some((id, cost)) => (id, Some(cost)),
        None => (token, None),
    };
    let label_id: u32 = id.parse().map_err(|_| ParseError::InvalidLabel {
        line,
        token: token.to_string(),
    })?;
    let cost = match cost {
        None => Cost::Unknown,
        Some(raw) => Cost::Known(raw.parse().map_err(|_| ParseError::InvalidCost {
            line,
            token: token.to_string(),
        })?),
    };
    Ok(Candidate::new(label_id, cost))
}

fn split_line(text: &str, line: usize) -> Result<(&str, &str), ParseError> {
    text.split_once('|')
        .ok_or(ParseError::MissingSeparator { line })
}

/// Parse one single-line record.
pub fn parse_line(text: &str, line: usize, options: &ParseOptions) -> Result<Example, ParseError> {
    let (labels, features) = split_line(text, line)?;
    let shared = parse_features(features, line, options)?;

    let mut candidates = labels
        .split_whitespace()
        .map(|token| parse_label(token, line))
        .collect::<Result<Vec<_>, _>>()?;

    if candidates.is_empty() {
        if let Some(k) = options.num_classes {
            candidates = (1..=k).map(|id| Candidate::new(id, Cost::Unknown)).collect();
        }
    }

    Ok(Example::new(shared, candidates))
}

/// Parse one label-dependent record from its `(line number, text)` lines.
///
/// Shared features are appended to every candidate's vector, so the returned
/// example's own shared vector is empty.
pub fn parse_ldf_record(
    lines: &[(usize, String)],
    options: &ParseOptions,
) -> Result<Example, ParseError> {
    let no_constant = ParseOptions {
        constant: false,
        ..options.clone()
    };
    let mut shared = Features::new();
    let mut candidates = Vec::with_capacity(lines.len());

    for (position, (line, text)) in lines.iter().enumerate() {
        let (labels, features) = split_line(text, *line)?;
        let labels = labels.trim();

        if labels == "shared" {
            if position != 0 {
                return Err(ParseError::MisplacedShared { line: *line });
            }
            shared = parse_features(features, *line, &no_constant)?;
            continue;
        }

        let mut tokens = labels.split_whitespace();
        let candidate = match (tokens.next(), tokens.next()) {
            (Some(token), None) => parse_label(token, *line)?,
            _ => {
                return Err(ParseError::InvalidLabel {
                    line: *line,
                    token: labels.to_string(),
                })
            }
        };

        let mut own = parse_features(features, *line, &no_constant)?;
        own.extend_from(&shared);
        if options.constant {
            own.push(CONSTANT_INDEX, 1.0);
        }
        candidates.push(candidate.with_features(own));
    }

    if candidates.is_empty() {
        let line = lines.last().map(|(l, _)| *l).unwrap_or(0);
        return Err(ParseError::NoCandidates { line });
    }

    Ok(Example::label_dependent(candidates))
}

/// Streams examples out of a line-oriented reader.
pub struct ExampleReader<R> {
    reader: R,
    format: DataFormat,
    options: ParseOptions,
    line: usize,
    done: bool,
}

impl<R: BufRead> ExampleReader<R> {
    pub fn new(reader: R, format: DataFormat, options: ParseOptions) -> Self {
        Self {
            reader,
            format,
            options,
            line: 0,
            done: false,
        }
    }

    /// Next raw line without its terminator, `None` at end of input.
    fn next_line(&mut self) -> Option<Result<String, ParseError>> {
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line += 1;
                let trimmed = buf.trim_end_matches(&['\n', '\r'][..]).len();
                buf.truncate(trimmed);
                Some(Ok(buf))
            }
            Err(source) => Some(Err(ParseError::Io {
                line: self.line + 1,
                source,
            })),
        }
    }

    fn next_single(&mut self) -> Option<Result<Example, ParseError>> {
        loop {
            match self.next_line()? {
                Err(e) => return Some(Err(e)),
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => return Some(parse_line(&text, self.line, &self.options)),
            }
        }
    }

    fn next_record(&mut self) -> Option<Result<Example, ParseError>> {
        let mut record: Vec<(usize, String)> = Vec::new();
        loop {
            match self.next_line() {
                None => break,
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(text)) if text.trim().is_empty() => {
                    if record.is_empty() {
                        continue;
                    }
                    break;
                }
                Some(Ok(text)) => record.push((self.line, text)),
            }
        }
        if record.is_empty() {
            return None;
        }
        Some(parse_ldf_record(&record, &self.options))
    }
}

impl<R: BufRead> Iterator for ExampleReader<R> {
    type Item = Result<Example, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.format {
            DataFormat::SingleLine => self.next_single(),
            DataFormat::LabelDependent => self.next_record(),
        };
        // Stop after an I/O failure instead of retrying the same read forever
        if item.is_none() || matches!(item, Some(Err(ParseError::Io { .. }))) {
            self.done = true;
        }
        item
    }
}
