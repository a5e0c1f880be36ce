use serde::{Deserialize, Serialize};

use super::ensure::ensure_directory;
use super::error::RetentionResult;
use super::storage::StorageClient;
use super::types::{ActionOutcome, EnsureOutcome};

/// What to do with the candidate set. Exactly one mode per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ActionMode {
    /// Dry run: list what the non-dry-run mode would act on, touch nothing.
    Report { archive_to: Option<String> },
    Delete,
    Archive { destination: String },
}

impl ActionMode {
    /// `dry_run` wins over `archive`; without either the run deletes.
    pub fn from_flags(dry_run: bool, archive: Option<String>) -> Self {
        match (dry_run, archive) {
            (true, archive_to) => ActionMode::Report { archive_to },
            (false, Some(destination)) => ActionMode::Archive { destination },
            (false, None) => ActionMode::Delete,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionMode::Report { .. } => "report",
            ActionMode::Delete => "delete",
            ActionMode::Archive { .. } => "archive",
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, ActionMode::Report { .. })
    }

    /// Past participle for summaries ("deleted", "archived").
    pub fn verb(&self) -> &'static str {
        match self {
            ActionMode::Report { archive_to: Some(_) } | ActionMode::Archive { .. } => "archived",
            ActionMode::Report { archive_to: None } | ActionMode::Delete => "deleted",
        }
    }
}

#[derive(Debug, Default)]
pub struct ActionBatch {
    pub outcomes: Vec<ActionOutcome>,
    /// Set only in archive mode.
    pub destination: Option<EnsureOutcome>,
}

impl ActionBatch {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Apply `mode` to every candidate, one at a time, in order.
///
/// Only an archive destination that can't be created aborts; that happens
/// before any file is moved. Individual delete/move failures are recorded
/// and the batch moves on.
pub async fn execute<S: StorageClient>(
    storage: &S,
    candidates: &[String],
    mode: &ActionMode,
) -> RetentionResult<ActionBatch> {
    match mode {
        ActionMode::Report { archive_to } => Ok(report(candidates, archive_to.as_deref())),
        ActionMode::Delete => Ok(ActionBatch {
            outcomes: delete_all(storage, candidates).await,
            destination: None,
        }),
        ActionMode::Archive { destination } => {
            let ensured = ensure_directory(storage, destination).await?;
            Ok(ActionBatch {
                outcomes: move_all(storage, candidates, destination).await,
                destination: Some(ensured),
            })
        }
    }
}

fn report(candidates: &[String], archive_to: Option<&str>) -> ActionBatch {
    let detail = match archive_to {
        Some(dest) => format!("would archive to {}", dest),
        None => "would delete".to_string(),
    };
    let outcomes = candidates
        .iter()
        .map(|path| {
            log::info!("[dry-run] {}", path);
            ActionOutcome::success(path, detail.clone())
        })
        .collect::<Vec<_>>();
    log::info!("[dry-run] {} candidate files", outcomes.len());
    ActionBatch {
        outcomes,
        destination: None,
    }
}

async fn delete_all<S: StorageClient>(storage: &S, candidates: &[String]) -> Vec<ActionOutcome> {
    let mut outcomes = Vec::with_capacity(candidates.len());
    for path in candidates {
        match storage.remove(path).await {
            Ok(()) => {
                log::info!("Successfully deleted: {}", path);
                outcomes.push(ActionOutcome::success(path, "deleted"));
            }
            Err(err) => {
                log::warn!("Something bad happened while deleting {}: {}", path, err);
                outcomes.push(ActionOutcome::failure(path, err));
            }
        }
    }
    outcomes
}

async fn move_all<S: StorageClient>(
    storage: &S,
    candidates: &[String],
    destination: &str,
) -> Vec<ActionOutcome> {
    let mut outcomes = Vec::with_capacity(candidates.len());
    for path in candidates {
        match storage.move_to(path, destination).await {
            Ok(()) => {
                log::info!("Successfully moved: {} -> {}", path, destination);
                outcomes.push(ActionOutcome::success(path, format!("moved to {}", destination)));
            }
            Err(err) => {
                log::warn!("Something bad happened while moving {}: {}", path, err);
                outcomes.push(ActionOutcome::failure(path, err));
            }
        }
    }
    outcomes
}
