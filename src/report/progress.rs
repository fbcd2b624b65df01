//! Textual progress log
//!
//! Prints the familiar table of average loss, loss since the previous row,
//! example counter, example weight and the current label, prediction and
//! feature count. A row is printed each time the example weight reaches the
//! dump threshold, which starts at 1 and doubles after every row, so long runs
//! produce a logarithmic number of lines.

use std::io::{self, Write};

/// What the log needs to know about one processed example
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEntry {
    /// `None` for examples without usable costs
    pub loss: Option<f32>,
    /// Lowest-cost label, when known
    pub label: Option<u32>,
    pub prediction: u32,
    pub features: usize,
}

pub struct ProgressLog<W> {
    out: W,
    examples: u64,
    weighted_examples: f64,
    labeled: f64,
    sum_loss: f64,
    labeled_since_last: f64,
    loss_since_last: f64,
    next_dump: f64,
    header_written: bool,
}

impl<W: Write> ProgressLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            examples: 0,
            weighted_examples: 0.0,
            labeled: 0.0,
            sum_loss: 0.0,
            labeled_since_last: 0.0,
            loss_since_last: 0.0,
            next_dump: 1.0,
            header_written: false,
        }
    }

    /// Account for one example; returns `true` when a row was printed.
    pub fn record(&mut self, entry: &ProgressEntry) -> io::Result<bool> {
        self.examples += 1;
        self.weighted_examples += 1.0;
        if let Some(loss) = entry.loss {
            self.labeled += 1.0;
            self.labeled_since_last += 1.0;
            self.sum_loss += loss as f64;
            self.loss_since_last += loss as f64;
        }

        if self.weighted_examples < self.next_dump {
            return Ok(false);
        }

        if !self.header_written {
            self.write_header()?;
        }
        let label = entry
            .label
            .map(|l| l.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        writeln!(
            self.out,
            "{:<10} {:<10} {:>12} {:>12.1} {:>8} {:>8} {:>8}",
            average(self.sum_loss, self.labeled),
            average(self.loss_since_last, self.labeled_since_last),
            self.examples,
            self.weighted_examples,
            label,
            entry.prediction,
            entry.features
        )?;

        self.loss_since_last = 0.0;
        self.labeled_since_last = 0.0;
        self.next_dump *= 2.0;
        Ok(true)
    }

    /// Average loss over every labeled example so far.
    pub fn average_loss(&self) -> Option<f64> {
        (self.labeled > 0.0).then(|| self.sum_loss / self.labeled)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "{:<10} {:<10} {:>12} {:>12} {:>8} {:>8} {:>8}",
            "average", "since", "example", "example", "current", "current", "current"
        )?;
        writeln!(
            self.out,
            "{:<10} {:<10} {:>12} {:>12} {:>8} {:>8} {:>8}",
            "loss", "last", "counter", "weight", "label", "predict", "features"
        )?;
        self.header_written = true;
        Ok(())
    }
}

fn average(sum: f64, count: f64) -> String {
    if count > 0.0 {
        format!("{:.6}", sum / count)
    } else {
        "n.a.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(loss: Option<f32>) -> ProgressEntry {
        ProgressEntry {
            loss,
            label: Some(1),
            prediction: 2,
            features: 4,
        }
    }

    #[test]
    fn test_rows_double_in_spacing() {
        let mut log = ProgressLog::new(Vec::new());
        let printed: Vec<u64> = (1..=16u64)
            .filter(|_| log.record(&entry(Some(1.0))).unwrap())
            .collect::<Vec<_>>();
        // Rows at examples 1, 2, 4, 8, 16
        assert_eq!(printed.len(), 5);

        let text = String::from_utf8(log.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + 5);
        assert!(lines[0].starts_with("average"));
        assert!(lines[1].starts_with("loss"));
    }

    #[test]
    fn test_since_last_resets_between_rows() {
        let mut log = ProgressLog::new(Vec::new());
        log.record(&entry(Some(1.0))).unwrap(); // row at 1
        log.record(&entry(Some(0.0))).unwrap(); // row at 2
        let text = String::from_utf8(log.into_inner()).unwrap();
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("0.500000   0.000000"), "got '{}'", last);
    }

    #[test]
    fn test_unlabeled_examples_show_na() {
        let mut log = ProgressLog::new(Vec::new());
        log.record(&ProgressEntry {
            loss: None,
            label: None,
            prediction: 3,
            features: 1,
        })
        .unwrap();
        assert_eq!(log.average_loss(), None);
        let text = String::from_utf8(log.into_inner()).unwrap();
        let row = text.lines().last().unwrap();
        assert!(row.starts_with("n.a."));
        assert!(row.contains("unknown"));
    }
}
