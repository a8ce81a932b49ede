//! Reasoner capability boundary.
//!
//! The reasoner is the external collaborator that turns a prompt into
//! natural-language or code text. It is opaque to the repair flow and
//! infallible by contract: implementations degrade internal failures into
//! diagnostic text returned in place of the completion, which the controller
//! then treats as ordinary (likely useless) candidate text.

use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, instrument, warn};

use crate::io::process::run_with_timeout;

/// External capability that turns a prompt into text. Never raises; see the
/// module docs for the degradation contract.
pub trait Reasoner {
    fn complete(&self, prompt: &str, system_prompt: Option<&str>) -> String;
}

impl<T: Reasoner + ?Sized> Reasoner for &T {
    fn complete(&self, prompt: &str, system_prompt: Option<&str>) -> String {
        (**self).complete(prompt, system_prompt)
    }
}

/// Reasoner backed by a provider CLI subprocess.
///
/// The configured command receives the system prompt (when present) and the
/// prompt on stdin, separated by a blank line, and must print the completion
/// to stdout. The timeout is this collaborator's own; the repair flow
/// imposes none.
pub struct CommandReasoner {
    command: Vec<String>,
    timeout: Duration,
    output_limit_bytes: usize,
}

impl CommandReasoner {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self {
            command,
            timeout,
            output_limit_bytes: 1_000_000,
        }
    }

    fn try_complete(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| anyhow!("reasoner command is empty"))?;
        let mut cmd = Command::new(program);
        cmd.args(args);

        let mut payload = String::new();
        if let Some(system) = system_prompt {
            payload.push_str(system);
            payload.push_str("\n\n");
        }
        payload.push_str(prompt);

        let output = run_with_timeout(
            cmd,
            Some(payload.as_bytes()),
            self.timeout,
            self.output_limit_bytes,
        )
        .context("run reasoner command")?;

        if output.timed_out {
            bail!("timed out after {:?}", self.timeout);
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "exited with {:?}: {}",
                output.status.code(),
                stderr.trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Reasoner for CommandReasoner {
    #[instrument(skip_all, fields(prompt_bytes = prompt.len()))]
    fn complete(&self, prompt: &str, system_prompt: Option<&str>) -> String {
        match self.try_complete(prompt, system_prompt) {
            Ok(completion) => {
                debug!(completion_bytes = completion.len(), "reasoner completed");
                completion
            }
            Err(err) => {
                warn!(err = %err, "reasoner call degraded to error text");
                format!("reasoner error: {err:#}")
            }
        }
    }
}
