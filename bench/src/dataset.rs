//! Problem datasets for benchmark runs.
//!
//! Datasets are JSONL files, one problem per line. The repair flow consumes
//! only `description` and `tests`; the rest is reporting metadata.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use repairer::core::record::TestCase;

/// One benchmark problem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Problem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

/// Load problems from a JSONL file.
///
/// Blank lines are skipped; malformed lines fail with line context.
pub fn load_problems(path: &Path) -> Result<Vec<Problem>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read dataset {}", path.display()))?;
    let mut problems = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let problem: Problem = serde_json::from_str(line)
            .with_context(|| format!("parse {} line {}", path.display(), index + 1))?;
        problems.push(problem);
    }
    if problems.is_empty() {
        bail!("dataset {} contains no problems", path.display());
    }
    Ok(problems)
}

/// Built-in demo problems for runs without a dataset.
pub fn sample_problems() -> Vec<Problem> {
    vec![
        Problem {
            id: "mock-001".to_string(),
            title: "Double and Positives".to_string(),
            description:
                "Read an integer from standard input and print it doubled, but print 0 for negatives."
                    .to_string(),
            tests: vec![
                test("2", "4"),
                test("-5", "0"),
                test("0", "0"),
            ],
        },
        Problem {
            id: "mock-002".to_string(),
            title: "Sum of Evens".to_string(),
            description:
                "Read a list of integers from standard input and print the sum of the even ones."
                    .to_string(),
            tests: vec![
                test("[1, 2, 3, 4]", "6"),
                test("[1, 3, 5]", "0"),
                test("[]", "0"),
            ],
        },
    ]
}

fn test(input: &str, expected: &str) -> TestCase {
    TestCase {
        input: input.to_string(),
        expected: expected.to_string(),
    }
}
