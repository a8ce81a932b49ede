//! Benchmark harness for the repair flow.
//!
//! Drives `repairer` over a problem dataset, scores each run, and renders a
//! leaderboard plus a persisted results artifact.

mod cli;
mod dataset;
mod evaluator;
mod results;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bench", version, about = "Benchmark harness for the repair flow")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the repair flow over a dataset and print the leaderboard.
    Run {
        /// JSONL dataset path; built-in samples when omitted.
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// Maximum number of problems to attempt.
        #[arg(long, default_value_t = 5)]
        limit: usize,
        /// Repairer config file; defaults apply when it is missing.
        #[arg(long, default_value = "repairer.toml")]
        config: PathBuf,
        /// Directory for result artifacts.
        #[arg(long, default_value = "results")]
        out: PathBuf,
    },
    /// Print the built-in sample problems as JSONL.
    Sample,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            dataset,
            limit,
            config,
            out,
        } => cli::run_benchmark(&cli::RunArgs {
            dataset,
            limit,
            config,
            out,
        }),
        Command::Sample => cli::print_samples(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_defaults() {
        let cli = Cli::parse_from(["bench", "run"]);
        match cli.command {
            Command::Run {
                dataset,
                limit,
                config,
                out,
            } => {
                assert!(dataset.is_none());
                assert_eq!(limit, 5);
                assert_eq!(config, PathBuf::from("repairer.toml"));
                assert_eq!(out, PathBuf::from("results"));
            }
            Command::Sample => panic!("expected run"),
        }
    }

    #[test]
    fn parse_run_with_dataset() {
        let cli = Cli::parse_from(["bench", "run", "--dataset", "data/hard.jsonl", "--limit", "2"]);
        match cli.command {
            Command::Run { dataset, limit, .. } => {
                assert_eq!(dataset, Some(PathBuf::from("data/hard.jsonl")));
                assert_eq!(limit, 2);
            }
            Command::Sample => panic!("expected run"),
        }
    }

    #[test]
    fn parse_sample() {
        let cli = Cli::parse_from(["bench", "sample"]);
        assert!(matches!(cli.command, Command::Sample));
    }
}
