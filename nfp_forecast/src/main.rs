mod cli;
mod logging;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use nfp_forecast::output::{write_predictions_csv, write_report_json};
use nfp_forecast::utils::SeriesSummary;
use nfp_forecast::{ConfigOverrides, LoadOptions, Pipeline, ProjectConfig, SeriesLoader};

use crate::cli::{Cli, Command, InspectArgs, RunArgs};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run_forecast(args),
        Command::Inspect(args) => inspect(args),
    }
}

/// Merge command-line overrides into the file configuration.
fn resolve_config(args: RunArgs) -> Result<ProjectConfig> {
    let config = match &args.config {
        Some(path) => ProjectConfig::from_file(path)
            .with_context(|| format!("failed to load config file: {}", path.display()))?,
        None => ProjectConfig::default(),
    };

    Ok(config.apply_overrides(ConfigOverrides {
        input: args.input,
        value_column: args.value_column,
        date_column: args.date_column,
        lags: args.lags,
        train_fraction: args.train_fraction,
        report: args.report,
        predictions: args.predictions,
        recent: args.recent,
    }))
}

fn run_forecast(args: RunArgs) -> Result<()> {
    let config = resolve_config(args)?;

    let input = config.input()?;
    let pipeline = Pipeline::new(config.pipeline_config()?)?;

    info!(
        path = %input.display(),
        lags = pipeline.config().lags,
        train_fraction = pipeline.config().train_fraction,
        "starting forecast run"
    );
    let report = pipeline.run_file(input, &config.load_options())?;

    println!(
        "Fitted {} lags on {} pairs, tested on {} pairs",
        report.lags, report.train_size, report.test_size
    );
    print!("{}", report.evaluation);
    print!("{}", report.next_month);

    if let Some(path) = &config.output.report {
        write_report_json(path, &report)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
    }

    if let Some(path) = &config.output.predictions {
        let records: &[_] = match config.output.recent {
            Some(n) => report.recent(n),
            None => &report.predictions,
        };
        write_predictions_csv(path, records)
            .with_context(|| format!("failed to write predictions: {}", path.display()))?;
    }

    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let options = LoadOptions {
        value_column: args.value_column,
        date_column: args.date_column,
    };
    let raw = SeriesLoader::from_csv(&args.input, &options)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    println!("Column '{}': {} months", raw.column(), raw.len());
    if let (Some(first), Some(last)) = (raw.months().and_then(|m| m.first()), raw.last_month()) {
        println!("Range: {} to {}", first.format("%Y-%m"), last.format("%Y-%m"));
    }

    println!("Levels:");
    print!("{}", SeriesSummary::of(raw.values())?);

    let diffs = raw.difference()?;
    println!("Month-over-month changes:");
    print!("{}", SeriesSummary::of(diffs.values())?);

    Ok(())
}
