use std::time::Instant;

use crate::config::RetentionConfig;

use super::exceptions::ExceptionSet;
use super::executor::{execute, ActionMode};
use super::error::RetentionResult;
use super::listing;
use super::storage::StorageClient;
use super::types::{RetentionReport, StageTiming};

/// Runs list → parse → age filter → exception filter → action against one storage client.
pub struct RetentionEngine<S> {
    storage: S,
}

impl<S: StorageClient> RetentionEngine<S> {
    pub fn new(storage: S) -> Self {
        RetentionEngine { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the exception file named in `config`, or an empty set.
    pub fn load_exceptions(config: &RetentionConfig) -> RetentionResult<ExceptionSet> {
        match &config.exception_file {
            Some(path) => ExceptionSet::load(path, &config.exception_column),
            None => Ok(ExceptionSet::empty()),
        }
    }

    pub async fn run(&self, config: &RetentionConfig) -> RetentionResult<RetentionReport> {
        let exceptions = Self::load_exceptions(config)?;
        self.run_with_exceptions(config, &exceptions).await
    }

    pub async fn run_with_exceptions(
        &self,
        config: &RetentionConfig,
        exceptions: &ExceptionSet,
    ) -> RetentionResult<RetentionReport> {
        let started = Instant::now();
        let mut stages = Vec::with_capacity(5);
        let mut finish = |stage: &'static str| {
            stages.push(StageTiming {
                stage,
                elapsed: started.elapsed(),
            })
        };

        let cutoff = config.cutoff();
        log::info!(
            "Scanning {} for files dated on or before {} ({} days)",
            config.root,
            cutoff,
            config.policy.threshold_days
        );

        let lines = self.storage.list_recursive(&config.root).await?;
        finish("list");

        let entries = listing::parse(&lines);
        finish("parse");

        let eligible = config.policy.select(&entries, config.today);
        let eligible_count = eligible.len();
        finish("select");

        if !exceptions.is_empty() {
            log::info!("Checking candidates against {} protected paths", exceptions.len());
        }
        let candidates = exceptions.filter(eligible);
        let excepted = eligible_count - candidates.len();
        finish("except");
        log::info!(
            "{} files listed, {} eligible, {} protected by exceptions, {} candidates",
            entries.len(),
            eligible_count,
            excepted,
            candidates.len()
        );

        let batch = execute(&self.storage, &candidates, &config.mode).await?;
        finish("execute");

        let destination_name = match &config.mode {
            ActionMode::Archive { destination } => Some(destination.as_str()),
            _ => None,
        };
        if batch.failed() > 0 {
            log::warn!(
                "{} of {} files could not be {}{}",
                batch.failed(),
                candidates.len(),
                config.mode.verb(),
                destination_name
                    .map(|d| format!(" to {}", d))
                    .unwrap_or_default()
            );
        }
        log::debug!("Run over {} finished: {:?}", config.root, stages);

        Ok(RetentionReport {
            root: config.root.clone(),
            cutoff,
            mode: config.mode.name().to_string(),
            dry_run: config.mode.is_dry_run(),
            listed_files: entries.len(),
            protected_paths: exceptions.len(),
            eligible: eligible_count,
            excepted,
            candidates: candidates.len(),
            succeeded: batch.succeeded(),
            failed: batch.failed(),
            destination: batch.destination,
            outcomes: batch.outcomes,
            stages,
        })
    }
}
