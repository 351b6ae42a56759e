//! Run summary reporting

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PrepError;

/// A source file that could not be processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub code: String,
    pub reason: String,
}

impl FileFailure {
    pub fn from_error(path: PathBuf, error: &PrepError) -> Self {
        Self {
            path,
            code: error.error_code().to_string(),
            reason: error.to_string(),
        }
    }
}

/// What happened to one source file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Transformed and written to the destination
    Written { destination: PathBuf },
    /// Left alone (output already present, or no usable file name)
    Skipped { path: PathBuf, reason: String },
    /// Per-file error; the batch carried on
    Failed(FileFailure),
}

/// Totals for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub processed: usize,
    pub skipped: usize,
    pub failures: Vec<FileFailure>,
}

impl RunSummary {
    /// Start an empty summary stamped with the current time
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            processed: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    /// Fold one file outcome into the totals
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Written { .. } => self.processed += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    /// Stamp the finish time
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self.failures.sort_by(|a, b| a.path.cmp(&b.path));
        self
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Number of source files seen
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = self.finished_at - self.started_at;
        writeln!(f, "Run {}", self.run_id)?;
        writeln!(
            f,
            "  {} files: {} processed, {} skipped, {} failed ({:.2}s)",
            self.total(),
            self.processed,
            self.skipped,
            self.failed(),
            elapsed.num_milliseconds() as f64 / 1000.0
        )?;
        for failure in &self.failures {
            writeln!(f, "  [{}] {}: {}", failure.code, failure.path.display(), failure.reason)?;
        }
        Ok(())
    }
}
