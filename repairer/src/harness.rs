//! Aggregated test execution for one candidate program.

use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::core::outcome::ExecOutcome;
use crate::core::record::TestCase;
use crate::io::sandbox::Sandbox;

/// How many failing tests the diagnostic log keeps, oldest first. Bounds the
/// payload handed to the diagnosis step.
const MAX_LOGGED_FAILURES: usize = 3;

/// Aggregated result of running a candidate against a test list.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessReport {
    /// Fraction of tests whose trimmed output matched the expectation.
    pub pass_rate: f64,
    /// Up to the first [`MAX_LOGGED_FAILURES`] failing tests; passing tests
    /// never appear here.
    pub log: String,
}

impl HarnessReport {
    fn empty_candidate() -> Self {
        Self {
            pass_rate: 0.0,
            log: "empty code: no candidate program to execute".to_string(),
        }
    }

    fn no_tests() -> Self {
        Self {
            pass_rate: 0.0,
            log: "no tests provided to verify the candidate".to_string(),
        }
    }
}

/// Runs the execution engine over an ordered test list and aggregates a
/// pass rate plus a bounded diagnostic log.
///
/// Execution is sequential by design: total wall time is bounded by
/// `tests * timeout` and log entries stay ordered by test index.
pub struct TestHarness<S: Sandbox> {
    sandbox: S,
    timeout: Duration,
}

impl<S: Sandbox> TestHarness<S> {
    pub fn new(sandbox: S, timeout: Duration) -> Self {
        Self { sandbox, timeout }
    }

    #[instrument(skip_all, fields(tests = tests.len()))]
    pub fn run(&self, code: &str, tests: &[TestCase]) -> HarnessReport {
        if code.trim().is_empty() {
            debug!("skipping execution, empty candidate");
            return HarnessReport::empty_candidate();
        }
        if tests.is_empty() {
            debug!("skipping execution, no tests");
            return HarnessReport::no_tests();
        }

        let mut passes = 0usize;
        let mut failures: Vec<String> = Vec::new();

        for (index, test) in tests.iter().enumerate() {
            let number = index + 1;
            let outcome = match self.sandbox.execute(code, &test.input, self.timeout) {
                Ok(outcome) => outcome,
                Err(err) => {
                    // The engine could not build an execution context for
                    // this test; fold it into the aggregate instead of
                    // aborting the whole run.
                    warn!(test = number, err = %err, "execution context unavailable");
                    ExecOutcome::RuntimeFailure(format!(
                        "execution context unavailable: {err:#}"
                    ))
                }
            };

            debug!(test = number, outcome = outcome.label(), "test executed");
            match outcome {
                ExecOutcome::Success(output) => {
                    let actual = output.trim();
                    let expected = test.expected.trim();
                    if actual == expected {
                        passes += 1;
                    } else {
                        failures.push(format!(
                            "test {number}: output mismatch\n  input: {}\n  expected: '{expected}'\n  actual: '{actual}'",
                            test.input
                        ));
                    }
                }
                ExecOutcome::RuntimeFailure(stderr) => {
                    failures.push(format!(
                        "test {number}: runtime failure\n{}",
                        stderr.trim()
                    ));
                }
                ExecOutcome::Timeout => {
                    failures.push(format!(
                        "test {number}: time limit exceeded ({}s)",
                        self.timeout.as_secs_f64()
                    ));
                }
            }
        }

        let pass_rate = passes as f64 / tests.len() as f64;
        debug!(passes, total = tests.len(), pass_rate, "harness finished");
        HarnessReport {
            pass_rate,
            log: failures
                .into_iter()
                .take(MAX_LOGGED_FAILURES)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BrokenSandbox, ScriptedSandbox, StaticSandbox};

    fn test(input: &str, expected: &str) -> TestCase {
        TestCase {
            input: input.to_string(),
            expected: expected.to_string(),
        }
    }

    fn harness<S: Sandbox>(sandbox: S) -> TestHarness<S> {
        TestHarness::new(sandbox, Duration::from_secs(1))
    }

    #[test]
    fn all_passing_yields_full_rate_and_empty_log() {
        let sandbox = ScriptedSandbox::new(vec![
            ExecOutcome::Success("4\n".to_string()),
            ExecOutcome::Success("  0  \n".to_string()),
        ]);
        let report = harness(sandbox).run("code", &[test("2", "4"), test("-5", "0")]);
        assert_eq!(report.pass_rate, 1.0);
        assert_eq!(report.log, "");
    }

    #[test]
    fn empty_candidate_short_circuits() {
        // A scripted sandbox with no outcomes panics if invoked at all.
        let report = harness(ScriptedSandbox::new(Vec::new())).run("   \n", &[test("x", "y")]);
        assert_eq!(report.pass_rate, 0.0);
        assert!(report.log.contains("empty code"));
    }

    #[test]
    fn no_tests_short_circuits() {
        let report = harness(ScriptedSandbox::new(Vec::new())).run("code", &[]);
        assert_eq!(report.pass_rate, 0.0);
        assert!(report.log.contains("no tests provided"));
    }

    #[test]
    fn mismatch_entry_names_input_expected_and_actual() {
        let sandbox = StaticSandbox::new(ExecOutcome::Success("Wrong Output\n".to_string()));
        let report = harness(sandbox).run("code", &[test("x", "Expected Output")]);
        assert_eq!(report.pass_rate, 0.0);
        assert!(report.log.contains("test 1: output mismatch"));
        assert!(report.log.contains("input: x"));
        assert!(report.log.contains("expected: 'Expected Output'"));
        assert!(report.log.contains("actual: 'Wrong Output'"));
    }

    #[test]
    fn runtime_failure_entry_carries_stderr() {
        let sandbox = StaticSandbox::new(ExecOutcome::RuntimeFailure(
            "Traceback: boom\n".to_string(),
        ));
        let report = harness(sandbox).run("code", &[test("x", "y")]);
        assert_eq!(report.pass_rate, 0.0);
        assert!(report.log.contains("test 1: runtime failure"));
        assert!(report.log.contains("Traceback: boom"));
    }

    #[test]
    fn timeout_entry_is_distinct_from_runtime_failure() {
        let sandbox = StaticSandbox::new(ExecOutcome::Timeout);
        let report = harness(sandbox).run("code", &[test("x", "y")]);
        assert_eq!(report.pass_rate, 0.0);
        assert!(report.log.contains("time limit exceeded"));
        assert!(!report.log.contains("runtime failure"));
    }

    #[test]
    fn log_keeps_at_most_the_first_three_failures() {
        let sandbox = StaticSandbox::new(ExecOutcome::Success("nope".to_string()));
        let tests: Vec<TestCase> = (1..=5).map(|n| test(&n.to_string(), "yes")).collect();
        let report = harness(sandbox).run("code", &tests);
        assert_eq!(report.pass_rate, 0.0);
        for number in 1..=3 {
            assert!(report.log.contains(&format!("test {number}:")));
        }
        assert!(!report.log.contains("test 4:"));
        assert!(!report.log.contains("test 5:"));
    }

    #[test]
    fn passing_tests_never_appear_in_the_log() {
        let sandbox = ScriptedSandbox::new(vec![
            ExecOutcome::Success("right\n".to_string()),
            ExecOutcome::Success("wrong\n".to_string()),
        ]);
        let report = harness(sandbox).run("code", &[test("a", "right"), test("b", "right")]);
        assert_eq!(report.pass_rate, 0.5);
        assert!(!report.log.contains("test 1:"));
        assert!(report.log.contains("test 2:"));
    }

    #[test]
    fn context_construction_failure_counts_as_runtime_failure() {
        let report = harness(BrokenSandbox).run("code", &[test("x", "y"), test("a", "b")]);
        assert_eq!(report.pass_rate, 0.0);
        assert!(report.log.contains("execution context unavailable"));
    }
}
