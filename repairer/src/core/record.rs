//! Run Record types threaded through one repair lifecycle.
//!
//! These types define the stable contract between the controller, the test
//! harness, and result consumers. They hold no I/O handles and are
//! deterministic apart from id assignment at creation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a repair attempt.
///
/// Transitions move forward only: `Pending -> Repairing -> Solved | Failed`.
/// Terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    Repairing,
    Solved,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Solved | RunStatus::Failed)
    }

    /// Whether moving from `self` to `next` goes forward in the lifecycle.
    fn permits(self, next: RunStatus) -> bool {
        match self {
            RunStatus::Pending => next != RunStatus::Pending,
            RunStatus::Repairing => next.is_terminal(),
            RunStatus::Solved | RunStatus::Failed => false,
        }
    }
}

/// One input/output test case.
///
/// Pass/fail is exact string equality after trimming surrounding whitespace;
/// there is no semantic or numeric tolerance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected: String,
}

/// One failed repair attempt, kept for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairAttempt {
    /// Iteration the attempt belongs to (1-indexed).
    pub iteration: u32,
    /// Root cause produced by the diagnosis step.
    pub diagnosed_cause: String,
    /// Diagnostic log from the harness run that triggered the repair.
    pub raw_log: String,
}

/// Mutable state for one problem-solving attempt.
///
/// Owned exclusively by a single controller invocation for its lifetime.
/// `tests` is fixed at creation and `history` is append-only; both are kept
/// private so those invariants hold by construction.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: String,
    pub problem_description: String,
    /// Populated once by semantic analysis, never mutated afterward.
    pub constraints: String,
    /// Latest candidate source, replaced wholesale on each generation step.
    pub current_code: String,
    tests: Vec<TestCase>,
    status: RunStatus,
    /// Monotonically increasing, bounded by the configured maximum.
    pub iteration_count: u32,
    /// Pass rate from the most recent harness run, in `[0.0, 1.0]`.
    pub confidence_score: f64,
    history: Vec<RepairAttempt>,
}

impl RunRecord {
    pub fn new(problem_description: impl Into<String>, tests: Vec<TestCase>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            problem_description: problem_description.into(),
            constraints: String::new(),
            current_code: String::new(),
            tests,
            status: RunStatus::Pending,
            iteration_count: 0,
            confidence_score: 0.0,
            history: Vec::new(),
        }
    }

    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Advance the status, rejecting backward transitions so terminal states
    /// stick. Returns whether the transition was applied.
    pub fn advance_status(&mut self, next: RunStatus) -> bool {
        if !self.status.permits(next) {
            return false;
        }
        self.status = next;
        true
    }

    pub fn history(&self) -> &[RepairAttempt] {
        &self.history
    }

    pub fn push_attempt(&mut self, attempt: RepairAttempt) {
        self.history.push(attempt);
    }

    /// Condense the record into the shape result consumers receive.
    pub fn finalize(self) -> FinalResult {
        FinalResult {
            code: self.current_code,
            status: self.status,
            iteration_count: self.iteration_count,
            confidence_score: self.confidence_score,
            history_depth: self.history.len(),
        }
    }
}

/// Per-run summary handed to result consumers.
///
/// `confidence_score` always reflects the most recent harness pass rate,
/// never a stale value from an earlier iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    pub code: String,
    pub status: RunStatus,
    pub iteration_count: u32,
    pub confidence_score: f64,
    pub history_depth: usize,
}
