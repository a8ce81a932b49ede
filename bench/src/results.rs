//! Persisted benchmark artifacts.
//!
//! Each benchmark run writes one JSON artifact with its result rows and
//! enough metadata (dataset fingerprint, timestamps) to reproduce the run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::evaluator::ProblemResult;

/// Metadata persisted next to the result rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchMeta {
    pub bench_run_id: String,
    /// Dataset path, when one was used (built-in samples otherwise).
    pub dataset: Option<String>,
    /// SHA-256 of the dataset file for reproducibility tracking.
    pub dataset_hash: Option<String>,
    pub started_at: String,
    pub finished_at: String,
    pub duration_secs: f64,
}

/// The full persisted artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchArtifact {
    pub meta: BenchMeta,
    pub results: Vec<ProblemResult>,
}

pub fn bench_run_id(now: DateTime<Utc>) -> String {
    format!("bench-{}", now.format("%Y%m%d_%H%M%S"))
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let contents = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let digest = hasher.finalize();
    Ok(hex::encode(digest))
}

/// Write the artifact under `out_dir/<bench_run_id>.json`.
pub fn write_artifact(out_dir: &Path, artifact: &BenchArtifact) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create results dir {}", out_dir.display()))?;
    let path = out_dir.join(format!("{}.json", artifact.meta.bench_run_id));
    let mut payload = serde_json::to_string_pretty(artifact).context("serialize results")?;
    payload.push('\n');
    fs::write(&path, payload).with_context(|| format!("write results {}", path.display()))?;
    Ok(path)
}
