//! End-to-end repair lifecycle against the real interpreter sandbox.
//!
//! Candidates run under `sh` so the suite stays portable; the sandbox is
//! interpreter-agnostic and the default config points it at `python3`.

use std::time::Duration;

use repairer::core::record::{RunStatus, TestCase};
use repairer::flow::RepairFlow;
use repairer::harness::TestHarness;
use repairer::io::sandbox::InterpreterSandbox;
use repairer::test_support::ScriptedReasoner;

fn sh_harness(timeout: Duration) -> TestHarness<InterpreterSandbox> {
    TestHarness::new(
        InterpreterSandbox::new(vec!["sh".to_string()]).with_source_suffix(".sh"),
        timeout,
    )
}

fn test(input: &str, expected: &str) -> TestCase {
    TestCase {
        input: input.to_string(),
        expected: expected.to_string(),
    }
}

#[test]
fn greets_and_solves_on_the_first_iteration() {
    let reasoner = ScriptedReasoner::new(vec![
        "- Algo: string echo",
        "read name\necho \"Hello $name\"",
    ]);
    let tests = vec![test("World", "Hello World")];

    let result = RepairFlow::new(&reasoner, sh_harness(Duration::from_secs(5))).run(
        "Greet whoever is on stdin.",
        tests,
        5,
    );

    assert_eq!(result.status, RunStatus::Solved);
    assert_eq!(result.iteration_count, 1);
    assert_eq!(result.confidence_score, 1.0);
    assert_eq!(result.history_depth, 0);
}

#[test]
fn repairs_wrong_output_then_solves() {
    // Generation prints the wrong text; the scripted repair fixes it and
    // arrives wrapped in fences, exercising extraction on the way in.
    let reasoner = ScriptedReasoner::new(vec![
        "- Algo: constant output",
        "echo \"Wrong Output\"",
        "ROOT CAUSE: prints a literal instead of the expected text.",
        "```sh\necho \"Expected Output\"\n```",
    ]);
    let tests = vec![test("x", "Expected Output")];

    let result = RepairFlow::new(&reasoner, sh_harness(Duration::from_secs(5))).run(
        "Print the expected output.",
        tests,
        5,
    );

    assert_eq!(result.status, RunStatus::Solved);
    assert_eq!(result.iteration_count, 2);
    assert_eq!(result.history_depth, 1);
    assert_eq!(result.code, "echo \"Expected Output\"");

    // The mismatch diagnostics reached the diagnosis prompt.
    let prompts = reasoner.prompts();
    assert_eq!(prompts.len(), 4);
    assert!(prompts[2].contains("output mismatch"));
    assert!(prompts[2].contains("'Expected Output'"));
    assert!(prompts[2].contains("'Wrong Output'"));
}

#[test]
fn slow_candidate_is_diagnosed_as_a_timeout() {
    let reasoner = ScriptedReasoner::new(vec!["- Algo: none", "sleep 5"]);
    let tests = vec![test("", "")];

    let result = RepairFlow::new(&reasoner, sh_harness(Duration::from_secs(1))).run(
        "Terminate promptly.",
        tests,
        1,
    );

    assert_eq!(result.status, RunStatus::Failed);
    assert_eq!(result.iteration_count, 1);
    assert_eq!(result.confidence_score, 0.0);

    let prompts = reasoner.prompts();
    assert!(prompts[2].contains("time limit exceeded"));
    assert!(!prompts[2].contains("runtime failure"));
}

#[test]
fn crashing_candidate_feeds_stderr_to_the_diagnosis() {
    let reasoner = ScriptedReasoner::new(vec![
        "- Algo: none",
        "echo 'fatal: cannot parse' >&2\nexit 2",
    ]);
    let tests = vec![test("", "anything")];

    let result = RepairFlow::new(&reasoner, sh_harness(Duration::from_secs(5))).run(
        "Do not crash.",
        tests,
        1,
    );

    assert_eq!(result.status, RunStatus::Failed);
    let prompts = reasoner.prompts();
    assert!(prompts[2].contains("runtime failure"));
    assert!(prompts[2].contains("fatal: cannot parse"));
}
