//! Problem file parsing for the `solve` command.
//!
//! Problems are TOML files with a description and input/output tests:
//!
//! ```toml
//! [problem]
//! id = "double-positives"
//! title = "Double and Positives"
//! description = "Read an integer and print it doubled; print 0 for negatives."
//!
//! [[tests]]
//! input = "2"
//! expected = "4"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::core::record::TestCase;

/// A parsed problem file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProblemFile {
    pub problem: ProblemMeta,
    /// May be empty; the harness then reports the run as unverifiable.
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

/// Problem metadata: identifier and statement.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProblemMeta {
    /// Unique identifier (slug format: `[a-z0-9_-]+`).
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Statement handed to the repair flow.
    pub description: String,
}

impl ProblemFile {
    /// Load and validate a problem file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read problem {}", path.display()))?;
        let problem: ProblemFile = toml::from_str(&contents)
            .with_context(|| format!("parse problem {}", path.display()))?;
        problem
            .validate()
            .with_context(|| format!("validate problem {}", path.display()))?;
        Ok(problem)
    }

    #[cfg(test)]
    pub fn parse_str(contents: &str) -> Result<Self> {
        let problem: ProblemFile = toml::from_str(contents).context("parse problem")?;
        problem.validate()?;
        Ok(problem)
    }

    fn validate(&self) -> Result<()> {
        validate_problem_id(&self.problem.id)?;
        if self.problem.description.trim().is_empty() {
            bail!("problem.description must be non-empty");
        }
        Ok(())
    }
}

fn validate_problem_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        bail!("problem.id must be non-empty");
    }
    if !id
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
    {
        bail!("problem.id must use [a-z0-9_-] only");
    }
    Ok(())
}
