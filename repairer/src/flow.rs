//! Repair flow controller: semantic analysis, generation, and the bounded
//! generate-test-diagnose-patch loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, instrument, warn};

use crate::core::extract::extract_code;
use crate::core::record::{FinalResult, RepairAttempt, RunRecord, RunStatus, TestCase};
use crate::harness::TestHarness;
use crate::io::reasoner::Reasoner;
use crate::io::sandbox::Sandbox;
use crate::prompts::{PromptSet, system};

/// Cooperative stop signal checked at iteration boundaries.
///
/// Cancellation never interrupts an in-flight execution; a test run ends
/// only by completing or timing out.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drives a single Run Record from problem statement to a final result.
///
/// One flow owns one record per [`RepairFlow::run`] call; distinct runs
/// share no mutable state and may be driven concurrently by the caller.
pub struct RepairFlow<R: Reasoner, S: Sandbox> {
    reasoner: R,
    harness: TestHarness<S>,
    prompts: PromptSet,
    cancel: Option<CancelFlag>,
}

impl<R: Reasoner, S: Sandbox> RepairFlow<R, S> {
    pub fn new(reasoner: R, harness: TestHarness<S>) -> Self {
        Self {
            reasoner,
            harness,
            prompts: PromptSet::new(),
            cancel: None,
        }
    }

    /// Attach a cooperative cancellation flag.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Run the full repair lifecycle for one problem.
    ///
    /// The loop runs at most `max_iterations` times; each iteration tests
    /// the current candidate and, short of a full pass, diagnoses and
    /// patches it. A run that exhausts the budget without solving ends
    /// `Failed`; callers distinguish "never progressed" from "partially
    /// passing, out of budget" via `confidence_score` and `history_depth`.
    #[instrument(skip_all, fields(max_iterations))]
    pub fn run(
        &self,
        problem_description: &str,
        tests: Vec<TestCase>,
        max_iterations: u32,
    ) -> FinalResult {
        let mut record = RunRecord::new(problem_description, tests);
        info!(id = %record.id, tests = record.tests().len(), "repair flow started");

        self.semantic_analysis(&mut record);
        self.generate_solution(&mut record);

        while record.iteration_count < max_iterations && record.status() != RunStatus::Solved {
            if self.cancelled() {
                warn!(id = %record.id, "flow cancelled between iterations");
                break;
            }
            record.advance_status(RunStatus::Repairing);
            record.iteration_count += 1;
            debug!(
                iteration = record.iteration_count,
                max_iterations, "iteration started"
            );

            let report = self.harness.run(&record.current_code, record.tests());
            record.confidence_score = report.pass_rate;

            if report.pass_rate == 1.0 {
                record.advance_status(RunStatus::Solved);
                record.confidence_score = 1.0;
                info!(id = %record.id, iteration = record.iteration_count, "solution verified");
                break;
            }

            let cause = self.analyze_failure(&record, &report.log);
            self.apply_fix(&mut record, &cause, &report.log);
        }

        if record.status() != RunStatus::Solved {
            record.advance_status(RunStatus::Failed);
            info!(
                id = %record.id,
                iterations = record.iteration_count,
                confidence = record.confidence_score,
                "budget exhausted without a verified solution"
            );
        }

        record.finalize()
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }

    /// Populate `constraints` once from the problem statement.
    fn semantic_analysis(&self, record: &mut RunRecord) {
        debug!("extracting constraints");
        let prompt = self.prompts.semantic_analysis(&record.problem_description);
        record.constraints = self.reasoner.complete(&prompt, Some(system::ANALYST));
    }

    fn generate_solution(&self, record: &mut RunRecord) {
        debug!("drafting initial solution");
        let prompt = self
            .prompts
            .generate_solution(&record.problem_description, &record.constraints);
        let raw = self.reasoner.complete(&prompt, Some(system::ENGINEER));
        record.current_code = extract_code(&raw);
    }

    fn analyze_failure(&self, record: &RunRecord, log: &str) -> String {
        debug!("diagnosing root cause");
        let prompt =
            self.prompts
                .analyze_failure(&record.current_code, log, &record.problem_description);
        self.reasoner.complete(&prompt, Some(system::DEBUGGER))
    }

    fn apply_fix(&self, record: &mut RunRecord, cause: &str, log: &str) {
        debug!("applying targeted repair");
        let prompt = self.prompts.targeted_repair(&record.current_code, cause);
        let raw = self.reasoner.complete(&prompt, Some(system::MAINTAINER));
        record.current_code = extract_code(&raw);
        record.push_attempt(RepairAttempt {
            iteration: record.iteration_count,
            diagnosed_cause: cause.to_string(),
            raw_log: log.to_string(),
        });
    }
}
