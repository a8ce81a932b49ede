//! CLI command implementations.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, instrument};

use repairer::flow::RepairFlow;
use repairer::harness::TestHarness;
use repairer::io::config::load_config;

use crate::dataset::{load_problems, sample_problems};
use crate::evaluator::Evaluator;
use crate::results::{BenchArtifact, BenchMeta, bench_run_id, file_sha256, write_artifact};

/// Arguments for a benchmark run.
pub struct RunArgs {
    pub dataset: Option<PathBuf>,
    pub limit: usize,
    pub config: PathBuf,
    pub out: PathBuf,
}

/// Run the repair flow over a dataset (or the built-in samples), print the
/// leaderboard, and persist the results artifact.
#[instrument(skip_all, fields(limit = args.limit))]
pub fn run_benchmark(args: &RunArgs) -> Result<()> {
    let cfg = load_config(&args.config)?;

    let mut problems = match &args.dataset {
        Some(path) => load_problems(path)?,
        None => sample_problems(),
    };
    problems.truncate(args.limit);
    info!(problems = problems.len(), "benchmark started");

    let started_at = Utc::now();
    let start = Instant::now();
    let mut evaluator = Evaluator::default();

    for (index, problem) in problems.iter().enumerate() {
        debug!(problem = %problem.id, "problem started");
        println!(
            "problem {}/{}: {} ({})",
            index + 1,
            problems.len(),
            problem.id,
            problem.title
        );

        // Each problem gets its own flow and record; nothing is shared
        // between runs.
        let harness = TestHarness::new(cfg.build_sandbox(), cfg.test_timeout());
        let flow = RepairFlow::new(cfg.build_reasoner(), harness);

        let problem_start = Instant::now();
        let result = flow.run(
            &problem.description,
            problem.tests.clone(),
            cfg.max_iterations,
        );
        let duration = problem_start.elapsed().as_secs_f64();

        println!(
            "  status={:?} iterations={} confidence={:.2} time={:.2}s",
            result.status, result.iteration_count, result.confidence_score, duration
        );
        evaluator.add_result(&problem.id, &result, duration);
    }

    let finished_at = Utc::now();
    print!("{}", evaluator.render_leaderboard());

    let dataset_hash = match &args.dataset {
        Some(path) => Some(file_sha256(path)?),
        None => None,
    };
    let artifact = BenchArtifact {
        meta: BenchMeta {
            bench_run_id: bench_run_id(started_at),
            dataset: args.dataset.as_ref().map(|path| path.display().to_string()),
            dataset_hash,
            started_at: started_at.to_rfc3339(),
            finished_at: finished_at.to_rfc3339(),
            duration_secs: start.elapsed().as_secs_f64(),
        },
        results: evaluator.results().to_vec(),
    };
    let path = write_artifact(&args.out, &artifact).context("write results artifact")?;
    println!("results: {}", path.display());
    Ok(())
}

/// Print the built-in sample problems as JSONL.
pub fn print_samples() -> Result<()> {
    for problem in sample_problems() {
        println!(
            "{}",
            serde_json::to_string(&problem).context("serialize problem")?
        );
    }
    Ok(())
}
