use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Monthly payroll change forecaster.
#[derive(Parser)]
#[command(
    name = "nfp_forecast",
    version,
    about = "Forecast monthly Non-Farm Payroll changes from lagged differences"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Fit on the training block and score the test block.
    Run(RunArgs),
    /// Summarise a level series and its month-over-month changes.
    Inspect(InspectArgs),
}

/// Arguments for the `run` subcommand.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override input CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Number of lagged changes per feature vector.
    #[arg(short, long)]
    pub lags: Option<usize>,

    /// Share of lagged pairs used for training, in (0, 1).
    #[arg(short = 'f', long = "train-fraction")]
    pub train_fraction: Option<f64>,

    /// Column holding the payroll levels.
    #[arg(long = "value-column")]
    pub value_column: Option<String>,

    /// Column holding the months.
    #[arg(long = "date-column")]
    pub date_column: Option<String>,

    /// Write the full JSON report here.
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Write test predictions as CSV here.
    #[arg(short, long)]
    pub predictions: Option<PathBuf>,

    /// Only write the most recent N test predictions.
    #[arg(long)]
    pub recent: Option<usize>,
}

/// Arguments for the `inspect` subcommand.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to input CSV.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Column holding the payroll levels.
    #[arg(long = "value-column")]
    pub value_column: Option<String>,

    /// Column holding the months.
    #[arg(long = "date-column")]
    pub date_column: Option<String>,
}
