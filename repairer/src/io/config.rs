//! Repair configuration stored as human-editable TOML.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::io::reasoner::CommandReasoner;
use crate::io::sandbox::InterpreterSandbox;

/// Repair flow configuration (TOML).
///
/// Missing fields default to sensible values, so an absent file is a valid
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RepairConfig {
    /// Iteration budget for the repair loop.
    pub max_iterations: u32,

    /// Hard wall-clock budget per test-case execution, in seconds.
    pub test_timeout_secs: u64,

    /// Truncate captured candidate stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,

    /// Interpreter command the sandbox runs candidates with.
    pub interpreter: Vec<String>,

    /// Filename suffix for materialized candidate sources.
    pub source_suffix: String,

    pub reasoner: ReasonerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReasonerConfig {
    /// Provider CLI invoked with the prompt on stdin.
    pub command: Vec<String>,

    /// Collaborator-owned timeout for one completion call, in seconds.
    pub timeout_secs: u64,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            command: vec!["codex".to_string(), "exec".to_string(), "-".to_string()],
            timeout_secs: 300,
        }
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            test_timeout_secs: 2,
            output_limit_bytes: 100_000,
            interpreter: vec!["python3".to_string()],
            source_suffix: ".py".to_string(),
            reasoner: ReasonerConfig::default(),
        }
    }
}

impl RepairConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(anyhow!("max_iterations must be > 0"));
        }
        if self.test_timeout_secs == 0 {
            return Err(anyhow!("test_timeout_secs must be > 0"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        if self.interpreter.is_empty() || self.interpreter[0].trim().is_empty() {
            return Err(anyhow!("interpreter must be a non-empty command"));
        }
        if self.source_suffix.trim().is_empty() {
            return Err(anyhow!("source_suffix must be non-empty"));
        }
        if self.reasoner.command.is_empty() || self.reasoner.command[0].trim().is_empty() {
            return Err(anyhow!("reasoner.command must be a non-empty command"));
        }
        if self.reasoner.timeout_secs == 0 {
            return Err(anyhow!("reasoner.timeout_secs must be > 0"));
        }
        Ok(())
    }

    pub fn test_timeout(&self) -> Duration {
        Duration::from_secs(self.test_timeout_secs)
    }

    /// Build the interpreter sandbox this config describes.
    pub fn build_sandbox(&self) -> InterpreterSandbox {
        InterpreterSandbox::new(self.interpreter.clone())
            .with_source_suffix(self.source_suffix.clone())
            .with_output_limit(self.output_limit_bytes)
    }

    /// Build the command-backed reasoner this config describes.
    pub fn build_reasoner(&self) -> CommandReasoner {
        CommandReasoner::new(
            self.reasoner.command.clone(),
            Duration::from_secs(self.reasoner.timeout_secs),
        )
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RepairConfig::default()`.
pub fn load_config(path: &Path) -> Result<RepairConfig> {
    if !path.exists() {
        let cfg = RepairConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RepairConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &RepairConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
