//! Metrics and leaderboard for repair runs.

use serde::{Deserialize, Serialize};

use repairer::core::record::{FinalResult, RunStatus};

/// Efficiency score for a single run.
///
/// 1.0 when solved on the first iteration, decaying with every extra
/// iteration (rounded to 3 decimals); 0.0 when unsolved.
pub fn efficiency_score(solved: bool, iterations: u32) -> f64 {
    if !solved || iterations == 0 {
        return 0.0;
    }
    round3(1.0 / f64::from(iterations))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProblemResult {
    pub problem: String,
    pub solved: bool,
    pub iterations: u32,
    pub confidence: f64,
    pub duration_secs: f64,
    pub score: f64,
}

/// Accumulates per-problem results and renders the final leaderboard.
#[derive(Debug, Default)]
pub struct Evaluator {
    results: Vec<ProblemResult>,
}

impl Evaluator {
    pub fn add_result(&mut self, problem_id: &str, result: &FinalResult, duration_secs: f64) {
        let solved = result.status == RunStatus::Solved;
        self.results.push(ProblemResult {
            problem: problem_id.to_string(),
            solved,
            iterations: result.iteration_count,
            confidence: result.confidence_score,
            duration_secs,
            score: efficiency_score(solved, result.iteration_count),
        });
    }

    pub fn results(&self) -> &[ProblemResult] {
        &self.results
    }

    /// Render the leaderboard as plain text.
    pub fn render_leaderboard(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:<16} | {:<6} | {:>5} | {:>8} | {:>6}\n",
            "problem", "status", "iters", "time", "score"
        ));
        out.push_str(&format!("{}\n", "-".repeat(54)));

        let mut solved = 0usize;
        let mut total_iterations = 0u64;
        let mut total_duration = 0.0f64;

        for row in &self.results {
            let status = if row.solved { "pass" } else { "fail" };
            out.push_str(&format!(
                "{:<16} | {:<6} | {:>5} | {:>7.2}s | {:>6.3}\n",
                row.problem, status, row.iterations, row.duration_secs, row.score
            ));
            if row.solved {
                solved += 1;
            }
            total_iterations += u64::from(row.iterations);
            total_duration += row.duration_secs;
        }

        out.push_str(&format!("{}\n", "-".repeat(54)));
        let runs = self.results.len();
        let pass_at_1 = if runs == 0 {
            0.0
        } else {
            solved as f64 / runs as f64
        };
        let avg_iterations = if runs == 0 {
            0.0
        } else {
            total_iterations as f64 / runs as f64
        };
        out.push_str(&format!("pass@1: {:.2}%\n", pass_at_1 * 100.0));
        out.push_str(&format!("avg iterations: {avg_iterations:.2}\n"));
        out.push_str(&format!("total duration: {total_duration:.2}s\n"));
        out
    }
}
