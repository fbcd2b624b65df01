//! csreduce: Cost-Sensitive Classification CLI
//!
//! Trains or evaluates a CSOAA or WAP-LDF reduction over a hashed linear
//! learner, one example at a time.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use csreduce::cli::{Cli, Commands};
use csreduce::learner::LinearLearner;
use csreduce::pipeline::{
    load_examples_with_progress, open_examples, run_in_memory, run_pass, DataFormat, RunOptions,
    RunSink, RunStats,
};
use csreduce::reduction::{setup, ReductionKind};
use csreduce::report::{export_run_report, ComparisonSummary, ExportParams, ProgressLog, RunSummary};
use csreduce::utils::{
    logging, print_banner, print_completion, print_config, print_info, print_step_header,
    print_success, print_warning, RunCard,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Compare { data, passes } => run_compare(&cli, data, *passes),
        };
    }

    let data = cli.data().ok_or_else(|| {
        anyhow::anyhow!("Data file is required. Use -d/--data to specify a file.")
    })?;
    run_single(&cli, data)
}

/// Train or evaluate one reduction over a data file
fn run_single(cli: &Cli, data: &Path) -> Result<()> {
    let learner_config = cli.learner_config();
    let options = cli.run_options();
    let format = cli.data_format();
    let parse_options = cli.parse_options();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&RunCard {
        data,
        reduction: cli.reduction,
        passes: options.passes,
        test_only: options.test_only,
        learner: &learner_config,
    });

    let base = LinearLearner::new(learner_config.clone()).context("Invalid learner settings")?;
    let mut learner = setup(base, cli.reduction, cli.reduction_config());

    let mut sink = RunSink::default();
    if !cli.quiet {
        sink.progress = Some(ProgressLog::new(Box::new(io::stderr())));
    }
    if let Some(path) = &cli.predictions {
        let file = File::create(path)
            .with_context(|| format!("Failed to create predictions file: {}", path.display()))?;
        sink.predictions = Some(Box::new(BufWriter::new(file)));
    }

    let start = Instant::now();
    let mut stats = RunStats::default();
    for pass in 1..=options.passes {
        print_step_header(pass, &format!("Pass {}", pass));
        let examples = open_examples(data, format, &parse_options)?;
        run_pass(&mut learner, examples, &options, &mut sink, &mut stats)?;
        print_success(&format!("Pass {} complete", pass));
    }
    let elapsed = start.elapsed();

    if stats.malformed > 0 {
        print_warning(&format!(
            "Skipped {} malformed record(s); rerun with --verbose for details",
            stats.malformed
        ));
    }
    if let Some(path) = &cli.predictions {
        print_info(&format!("Predictions written to {}", path.display()));
    }

    if let Some(path) = &cli.report {
        let data_file = data.display().to_string();
        export_run_report(
            &stats,
            path,
            &ExportParams {
                data_file: &data_file,
                reduction: cli.reduction,
                num_classes: cli.num_classes,
                test_only: options.test_only,
                learner: &learner_config,
                elapsed_seconds: elapsed.as_secs_f64(),
            },
        )?;
        print_info(&format!("Run report written to {}", path.display()));
    }

    RunSummary::new(cli.reduction, options.test_only, stats, elapsed).display();
    print_completion();

    Ok(())
}

/// Train both reductions as independent pipelines over the same data
fn run_compare(cli: &Cli, data: &Path, passes: usize) -> Result<()> {
    let learner_config = cli.learner_config();
    let options = RunOptions {
        passes,
        test_only: false,
    };

    print_banner(env!("CARGO_PKG_VERSION"));
    print_step_header(1, "Load Data");
    let (examples, skipped) =
        load_examples_with_progress(data, DataFormat::LabelDependent, &cli.parse_options())?;
    if skipped > 0 {
        print_warning(&format!("Skipped {} unparseable record(s)", skipped));
    }

    print_step_header(2, "Train Pipelines");
    let train = |kind: ReductionKind| -> Result<(RunStats, std::time::Duration)> {
        let start = Instant::now();
        let base = LinearLearner::new(learner_config.clone()).context("Invalid learner settings")?;
        let mut learner = setup(base, kind, cli.reduction_config());
        let stats = run_in_memory(&mut learner, &examples, &options, &mut RunSink::default())?;
        Ok((stats, start.elapsed()))
    };

    let (csoaa, wap) = rayon::join(
        || train(ReductionKind::Csoaa),
        || train(ReductionKind::WapLdf),
    );
    let (csoaa_stats, csoaa_time) = csoaa?;
    let (wap_stats, wap_time) = wap?;
    print_success("Both pipelines finished");

    let mut comparison = ComparisonSummary::default();
    comparison.push(ReductionKind::Csoaa, csoaa_stats, csoaa_time);
    comparison.push(ReductionKind::WapLdf, wap_stats, wap_time);
    comparison.display();

    if let Some(best) = comparison.best() {
        print_info(&format!("Lowest average loss: {}", best));
    }
    print_completion();

    Ok(())
}
