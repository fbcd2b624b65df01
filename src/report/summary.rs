//! Run summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::RunStats;
use crate::reduction::ReductionKind;

/// Summary of one training or evaluation run
#[derive(Debug)]
pub struct RunSummary {
    pub reduction: ReductionKind,
    pub test_only: bool,
    pub stats: RunStats,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(reduction: ReductionKind, test_only: bool, stats: RunStats, elapsed: Duration) -> Self {
        Self {
            reduction,
            test_only,
            stats,
            elapsed,
        }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("🧮 Reduction"),
            Cell::new(self.reduction.to_string()).fg(Color::Cyan),
        ]);
        table.add_row(vec![
            Cell::new("🔁 Mode"),
            Cell::new(if self.test_only { "test only" } else { "train" }),
        ]);
        table.add_row(vec![Cell::new("📚 Passes"), Cell::new(self.stats.passes)]);
        table.add_row(vec![Cell::new("📁 Examples"), Cell::new(self.stats.examples)]);
        table.add_row(vec![
            Cell::new("🏷️  Labeled"),
            Cell::new(self.stats.labeled_examples),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Skipped (Malformed)"),
            Cell::new(self.stats.malformed).fg(if self.stats.malformed == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("⚙️  Base Updates"),
            Cell::new(self.stats.updates),
        ]);
        table.add_row(vec![
            Cell::new("📉 Average Loss"),
            Cell::new(format_loss(self.stats.average_loss()))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("⏱️  Elapsed"),
            Cell::new(format!("{:.2}s", self.elapsed.as_secs_f64())),
        ]);
        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }
    }
}

/// Side-by-side results of independent pipelines over the same data
#[derive(Debug, Default)]
pub struct ComparisonSummary {
    pub rows: Vec<(ReductionKind, RunStats, Duration)>,
}

impl ComparisonSummary {
    pub fn push(&mut self, reduction: ReductionKind, stats: RunStats, elapsed: Duration) {
        self.rows.push((reduction, stats, elapsed));
    }

    /// Reduction with the lowest average loss, if any run was labeled.
    pub fn best(&self) -> Option<ReductionKind> {
        self.rows
            .iter()
            .filter_map(|(kind, stats, _)| stats.average_loss().map(|l| (*kind, l)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(kind, _)| kind)
    }

    pub fn to_table(&self) -> Table {
        let best = self.best();
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Reduction").add_attribute(Attribute::Bold),
            Cell::new("Examples").add_attribute(Attribute::Bold),
            Cell::new("Base Updates").add_attribute(Attribute::Bold),
            Cell::new("Average Loss").add_attribute(Attribute::Bold),
            Cell::new("Elapsed").add_attribute(Attribute::Bold),
        ]);

        for (kind, stats, elapsed) in &self.rows {
            let loss_cell = Cell::new(format_loss(stats.average_loss()));
            let loss_cell = if Some(*kind) == best {
                loss_cell.fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                loss_cell
            };
            table.add_row(vec![
                Cell::new(kind.to_string()).fg(Color::Cyan),
                Cell::new(stats.examples),
                Cell::new(stats.updates),
                loss_cell,
                Cell::new(format!("{:.2}s", elapsed.as_secs_f64())),
            ]);
        }
        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("⚖️").cyan(),
            style("REDUCTION COMPARISON").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }
    }
}

fn format_loss(loss: Option<f64>) -> String {
    loss.map(|l| format!("{:.6}", l))
        .unwrap_or_else(|| "n.a.".to_string())
}
