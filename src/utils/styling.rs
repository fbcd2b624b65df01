//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

use crate::learner::LearnerConfig;
use crate::reduction::ReductionKind;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("csreduce").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Cost-sensitive classification by reduction").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Run settings shown in the configuration card
pub struct RunCard<'a> {
    pub data: &'a Path,
    pub reduction: ReductionKind,
    pub passes: usize,
    pub test_only: bool,
    pub learner: &'a LearnerConfig,
}

/// Print configuration card
pub fn print_config(card: &RunCard) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("Configuration").cyan().bold(),
        " ".repeat(box_width - 16)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Data:      {:<36}│",
        FOLDER,
        truncate_path(card.data, 35)
    );
    println!(
        "    │  {} Reduction: {:<36}│",
        TARGET,
        card.reduction.to_string()
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Passes:        {:<32}│",
        CHART,
        style(if card.test_only {
            format!("{} (test only)", card.passes)
        } else {
            card.passes.to_string()
        })
        .yellow()
    );
    println!(
        "    │  {} Learning rate: {:<32}│",
        GEAR,
        style(format!(
            "{} (power_t {}, {} bits, {})",
            card.learner.learning_rate, card.learner.power_t, card.learner.bits, card.learner.loss
        ))
        .yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: usize, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", style("!").yellow().bold(), style(message).yellow());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("csreduce run complete!").green().bold()
    );
    println!();
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
