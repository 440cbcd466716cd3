mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::describe::DescribeArgs;
use commands::extract::ExtractArgs;
use commands::view::ViewArgs;

/// Loan balance and interest rate dashboard
#[derive(Parser)]
#[command(
    name = "loandash",
    version,
    about = "Loan balance and interest rate dashboard",
    long_about = "Extracts monthly lending statistics from a long-format CSV into a \
                  JSON data file, then filters, groups and aggregates the series into \
                  dashboard views with funds-weighted average rates."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the statistics CSV into the JSON data file
    Extract(ExtractArgs),
    /// Filter, group and aggregate series into a dashboard view
    View(ViewArgs),
    /// Summarise what a data file contains
    Describe(DescribeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Extract(args) => commands::extract::run_extract(args),
        Commands::View(args) => commands::view::run_view(args),
        Commands::Describe(args) => commands::describe::run_describe(args),
        Commands::Version => {
            println!("loandash {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
