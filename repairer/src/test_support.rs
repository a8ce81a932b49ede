//! Test-only scripted implementations of the reasoner and sandbox
//! capabilities.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::core::outcome::ExecOutcome;
use crate::io::reasoner::Reasoner;
use crate::io::sandbox::Sandbox;

/// Reasoner that replays canned completions in order and records every
/// prompt it receives.
///
/// Once the script runs dry it degrades the way a real backend would,
/// returning diagnostic text instead of failing.
pub struct ScriptedReasoner {
    script: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedReasoner {
    pub fn new(completions: Vec<&str>) -> Self {
        Self {
            script: Mutex::new(completions.into_iter().map(str::to_string).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Reasoner for ScriptedReasoner {
    fn complete(&self, prompt: &str, _system_prompt: Option<&str>) -> String {
        self.calls
            .lock()
            .expect("calls lock")
            .push(prompt.to_string());
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| "reasoner error: scripted completions exhausted".to_string())
    }
}

/// Sandbox replaying canned outcomes in order. Panics when exhausted so a
/// test never silently under-provisions its script.
pub struct ScriptedSandbox {
    outcomes: Mutex<VecDeque<ExecOutcome>>,
}

impl ScriptedSandbox {
    pub fn new(outcomes: Vec<ExecOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }
}

impl Sandbox for ScriptedSandbox {
    fn execute(&self, _code: &str, _input: &str, _timeout: Duration) -> Result<ExecOutcome> {
        Ok(self
            .outcomes
            .lock()
            .expect("outcomes lock")
            .pop_front()
            .expect("scripted outcomes exhausted"))
    }
}

/// Sandbox that returns the same outcome for every execution.
pub struct StaticSandbox {
    outcome: ExecOutcome,
}

impl StaticSandbox {
    pub fn new(outcome: ExecOutcome) -> Self {
        Self { outcome }
    }
}

impl Sandbox for StaticSandbox {
    fn execute(&self, _code: &str, _input: &str, _timeout: Duration) -> Result<ExecOutcome> {
        Ok(self.outcome.clone())
    }
}

/// Sandbox that cannot construct an execution context at all.
pub struct BrokenSandbox;

impl Sandbox for BrokenSandbox {
    fn execute(&self, _code: &str, _input: &str, _timeout: Duration) -> Result<ExecOutcome> {
        Err(anyhow!("no execution context available"))
    }
}
