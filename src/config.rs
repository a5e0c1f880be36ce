// src/config.rs

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::retention::{ActionMode, RetentionPolicy, DEFAULT_EXCEPTION_COLUMN};

/// Everything one run needs, fixed before the pipeline starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    pub root: String,
    pub policy: RetentionPolicy,
    pub mode: ActionMode,
    pub exception_file: Option<PathBuf>,
    pub exception_column: String,
    /// Reference date for the cutoff; the CLI passes the local date.
    pub today: NaiveDate,
}

impl RetentionConfig {
    pub fn new(root: impl Into<String>, threshold_days: u32, today: NaiveDate) -> Self {
        RetentionConfig {
            root: root.into(),
            policy: RetentionPolicy::new(threshold_days),
            mode: ActionMode::Delete,
            exception_file: None,
            exception_column: DEFAULT_EXCEPTION_COLUMN.to_string(),
            today,
        }
    }

    pub fn with_mode(mut self, mode: ActionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_exception_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.exception_file = Some(path.into());
        self
    }

    pub fn with_exception_column(mut self, column: impl Into<String>) -> Self {
        self.exception_column = column.into();
        self
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.policy.cutoff(self.today)
    }
}
