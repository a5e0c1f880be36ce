use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks and anything else the listing can emit.
    Other,
}

impl EntryKind {
    pub(crate) fn from_marker(marker: char) -> Self {
        match marker {
            '-' => EntryKind::File,
            'd' => EntryKind::Directory,
            _ => EntryKind::Other,
        }
    }
}

/// One line of `hdfs dfs -ls -R` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub permissions: String,
    pub kind: EntryKind,
    pub modified: NaiveDate,
    pub path: String,
}

impl ListingEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub path: String,
    pub succeeded: bool,
    pub detail: String,
}

impl ActionOutcome {
    pub(crate) fn success(path: &str, detail: impl Into<String>) -> Self {
        ActionOutcome {
            path: path.to_string(),
            succeeded: true,
            detail: detail.into(),
        }
    }

    pub(crate) fn failure(path: &str, detail: impl Into<String>) -> Self {
        ActionOutcome {
            path: path.to_string(),
            succeeded: false,
            detail: detail.into(),
        }
    }
}

/// Result of probing/creating the archive destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsureOutcome {
    AlreadyExists,
    Created,
}

/// Time from the start of the run to the end of `stage`.
#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub stage: &'static str,
    pub elapsed: Duration,
}

#[derive(Debug, Serialize)]
pub struct RetentionReport {
    pub root: String,
    pub cutoff: NaiveDate,
    pub mode: String,
    pub dry_run: bool,
    pub listed_files: usize,
    /// Size of the loaded exception set.
    pub protected_paths: usize,
    pub eligible: usize,
    pub excepted: usize,
    pub candidates: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub destination: Option<EnsureOutcome>,
    pub outcomes: Vec<ActionOutcome>,
    pub stages: Vec<StageTiming>,
}

impl RetentionReport {
    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }
}
