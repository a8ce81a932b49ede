//! Isolated execution of untrusted candidate programs.
//!
//! The [`Sandbox`] trait decouples the test harness from the actual
//! execution backend (currently a host interpreter subprocess), so a
//! container or restricted interpreter can slot in without touching the
//! harness or the controller. Tests use scripted sandboxes that return
//! predetermined outcomes without spawning processes.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, instrument, warn};

use crate::core::outcome::ExecOutcome;
use crate::io::process::run_with_timeout;

/// Capability for running one candidate program against one input under a
/// hard wall-clock timeout.
///
/// `Err` is reserved for failures to construct the isolated execution
/// context at all (temp artifact allocation, interpreter spawn). Everything
/// the candidate itself does wrong comes back as an [`ExecOutcome`] variant.
pub trait Sandbox {
    fn execute(&self, code: &str, input: &str, timeout: Duration) -> Result<ExecOutcome>;
}

impl<T: Sandbox + ?Sized> Sandbox for &T {
    fn execute(&self, code: &str, input: &str, timeout: Duration) -> Result<ExecOutcome> {
        (**self).execute(code, input, timeout)
    }
}

/// Sandbox that runs candidates through a host interpreter subprocess.
///
/// Each invocation materializes the code into its own temp file, so
/// concurrent invocations share no filesystem path or handle. The artifact
/// is removed when the invocation returns, on every exit path.
#[derive(Debug, Clone)]
pub struct InterpreterSandbox {
    command: Vec<String>,
    source_suffix: String,
    output_limit_bytes: usize,
    scratch_dir: Option<PathBuf>,
}

impl InterpreterSandbox {
    /// Create a sandbox running `command` (interpreter plus fixed arguments);
    /// the materialized source path is appended per invocation.
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            source_suffix: ".py".to_string(),
            output_limit_bytes: 100_000,
            scratch_dir: None,
        }
    }

    /// Filename suffix for materialized candidate sources.
    pub fn with_source_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.source_suffix = suffix.into();
        self
    }

    /// Bound for captured candidate stdout/stderr bytes.
    pub fn with_output_limit(mut self, bytes: usize) -> Self {
        self.output_limit_bytes = bytes;
        self
    }

    /// Direct temp artifacts to a caller-owned directory. Tests use this to
    /// observe that nothing survives an invocation.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    fn materialize(&self, code: &str) -> Result<NamedTempFile> {
        let mut builder = Builder::new();
        builder.prefix("candidate-").suffix(&self.source_suffix);
        let mut file = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .context("allocate candidate source file")?;
        file.write_all(code.as_bytes())
            .context("write candidate source")?;
        file.flush().context("flush candidate source")?;
        Ok(file)
    }
}

impl Sandbox for InterpreterSandbox {
    #[instrument(skip_all, fields(timeout_secs = timeout.as_secs()))]
    fn execute(&self, code: &str, input: &str, timeout: Duration) -> Result<ExecOutcome> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| anyhow!("interpreter command is empty"))?;

        // Holding the handle keeps the artifact alive for exactly this
        // invocation; dropping it removes the file no matter how we leave.
        let source = self.materialize(code)?;

        let mut cmd = Command::new(program);
        cmd.args(args).arg(source.path());

        let output = run_with_timeout(
            cmd,
            Some(input.as_bytes()),
            timeout,
            self.output_limit_bytes,
        )
        .context("run interpreter")?;

        if output.timed_out {
            warn!(
                timeout_secs = timeout.as_secs(),
                "candidate exceeded the time limit"
            );
            return Ok(ExecOutcome::Timeout);
        }
        if !output.status.success() {
            debug!(exit_code = ?output.status.code(), "candidate terminated abnormally");
            return Ok(ExecOutcome::RuntimeFailure(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        debug!("candidate completed");
        Ok(ExecOutcome::Success(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh_sandbox() -> InterpreterSandbox {
        InterpreterSandbox::new(vec!["sh".to_string()]).with_source_suffix(".sh")
    }

    #[test]
    fn success_carries_stdout_unmodified() {
        let outcome = sh_sandbox()
            .execute("echo hello", "", Duration::from_secs(5))
            .expect("execute");
        assert_eq!(outcome, ExecOutcome::Success("hello\n".to_string()));
    }

    #[test]
    fn input_reaches_the_candidate_via_stdin() {
        let outcome = sh_sandbox()
            .execute(
                "read name\necho \"Hello $name\"",
                "World",
                Duration::from_secs(5),
            )
            .expect("execute");
        match outcome {
            ExecOutcome::Success(output) => assert_eq!(output.trim(), "Hello World"),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn nonzero_exit_is_a_runtime_failure_with_stderr() {
        let outcome = sh_sandbox()
            .execute("echo boom >&2\nexit 3", "", Duration::from_secs(5))
            .expect("execute");
        match outcome {
            ExecOutcome::RuntimeFailure(stderr) => assert!(stderr.contains("boom")),
            other => panic!("expected runtime failure, got {other:?}"),
        }
    }

    #[test]
    fn slow_candidate_times_out() {
        let outcome = sh_sandbox()
            .execute("sleep 5", "", Duration::from_millis(200))
            .expect("execute");
        assert_eq!(outcome, ExecOutcome::Timeout);
    }

    #[test]
    fn partial_output_before_timeout_is_discarded() {
        let outcome = sh_sandbox()
            .execute("echo partial\nsleep 5", "", Duration::from_millis(200))
            .expect("execute");
        assert_eq!(outcome, ExecOutcome::Timeout);
    }

    #[test]
    fn temp_artifacts_are_released_on_every_path() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let sandbox = sh_sandbox().with_scratch_dir(scratch.path());

        for code in ["echo fine", "exit 1", "sleep 5"] {
            sandbox
                .execute(code, "", Duration::from_millis(200))
                .expect("execute");
            let leftovers = std::fs::read_dir(scratch.path())
                .expect("read scratch dir")
                .count();
            assert_eq!(leftovers, 0, "artifact leaked after running {code:?}");
        }
    }

    #[test]
    fn empty_interpreter_command_is_a_context_failure() {
        let sandbox = InterpreterSandbox::new(Vec::new());
        let err = sandbox
            .execute("echo hi", "", Duration::from_secs(1))
            .unwrap_err();
        assert!(err.to_string().contains("interpreter command is empty"));
    }

    #[test]
    fn missing_interpreter_is_a_context_failure() {
        let sandbox = InterpreterSandbox::new(vec!["definitely-not-an-interpreter".to_string()]);
        let err = sandbox
            .execute("echo hi", "", Duration::from_secs(1))
            .unwrap_err();
        assert!(err.to_string().contains("run interpreter"));
    }
}
