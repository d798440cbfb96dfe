use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use super::terminal::Tally;
use crate::check::SnapshotStatus;

#[derive(Debug, Serialize)]
pub struct JsonEntry {
    pub id: String,
    #[serde(flatten)]
    pub status: SnapshotStatus,
    pub elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub new: usize,
    pub errored: usize,
    pub missing: Vec<String>,
    pub elapsed_ms: u64,
    pub results: Vec<JsonEntry>,
}

impl JsonSummary {
    pub fn new(tally: &Tally, mut results: Vec<JsonEntry>, missing: &[String], elapsed: Duration) -> Self {
        results.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            total: tally.total,
            passed: tally.passed,
            failed: tally.failed,
            new: tally.new,
            errored: tally.errored,
            missing: missing.to_vec(),
            elapsed_ms: elapsed.as_millis() as u64,
            results,
        }
    }
}

pub fn print(summary: &JsonSummary) -> Result<()> {
    let out = serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;
    println!("{out}");
    Ok(())
}
