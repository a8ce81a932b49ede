//! Iterative test-driven program repair CLI.
//!
//! Reads a problem file, drives the repair flow against it, and prints the
//! final result as JSON for downstream consumers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use repairer::flow::RepairFlow;
use repairer::harness::TestHarness;
use repairer::io::config::load_config;
use repairer::io::problem::ProblemFile;

#[derive(Parser)]
#[command(
    name = "repairer",
    version,
    about = "Iterative test-driven program repair"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Repair a single problem described by a TOML file.
    Solve {
        /// Path to the problem file.
        problem: PathBuf,
        /// Config file; defaults apply when it is missing.
        #[arg(long, default_value = "repairer.toml")]
        config: PathBuf,
    },
    /// Check that a problem file parses and validates.
    Validate {
        /// Path to the problem file.
        problem: PathBuf,
    },
}

fn main() {
    repairer::logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Solve { problem, config } => cmd_solve(&problem, &config),
        Command::Validate { problem } => cmd_validate(&problem),
    }
}

fn cmd_solve(problem_path: &Path, config_path: &Path) -> Result<()> {
    let cfg = load_config(config_path)?;
    let problem = ProblemFile::load(problem_path)?;

    let harness = TestHarness::new(cfg.build_sandbox(), cfg.test_timeout());
    let flow = RepairFlow::new(cfg.build_reasoner(), harness);
    let result = flow.run(
        &problem.problem.description,
        problem.tests,
        cfg.max_iterations,
    );

    let mut payload = serde_json::to_string_pretty(&result).context("serialize result")?;
    payload.push('\n');
    print!("{payload}");
    Ok(())
}

fn cmd_validate(problem_path: &Path) -> Result<()> {
    let problem = ProblemFile::load(problem_path)?;
    println!(
        "ok: {} ({} tests)",
        problem.problem.id,
        problem.tests.len()
    );
    Ok(())
}
