use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use super::error::{RetentionError, RetentionResult};
use super::storage::StorageClient;

/// A primitive call observed by [`InMemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    List(String),
    Remove(String),
    Move { src: String, dest: String },
    Exists(String),
    MakeDirectory(String),
}

impl StorageCall {
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            StorageCall::Remove(_) | StorageCall::Move { .. } | StorageCall::MakeDirectory(_)
        )
    }
}

#[derive(Default)]
struct State {
    listing: Vec<String>,
    listing_error: Option<String>,
    directories: HashSet<String>,
    removed: Vec<String>,
    moved: Vec<(String, String)>,
    fail_remove: HashSet<String>,
    fail_move: HashSet<String>,
    fail_make_directory: bool,
    make_directory_races: bool,
    calls: Vec<StorageCall>,
}

/// In-process [`StorageClient`] that serves a canned listing, records every
/// call and fails on request.
#[derive(Default)]
pub struct InMemoryStorage {
    state: Mutex<State>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state().listing = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_directory(self, path: &str) -> Self {
        self.state().directories.insert(path.to_string());
        self
    }

    pub fn failing_listing(self, reason: &str) -> Self {
        self.state().listing_error = Some(reason.to_string());
        self
    }

    pub fn failing_remove(self, path: &str) -> Self {
        self.state().fail_remove.insert(path.to_string());
        self
    }

    pub fn failing_move(self, path: &str) -> Self {
        self.state().fail_move.insert(path.to_string());
        self
    }

    pub fn failing_make_directory(self) -> Self {
        self.state().fail_make_directory = true;
        self
    }

    /// `make_directory` reports failure but the directory shows up anyway,
    /// as when another client created it in between.
    pub fn racing_make_directory(self) -> Self {
        let mut state = self.state();
        state.fail_make_directory = true;
        state.make_directory_races = true;
        drop(state);
        self
    }

    pub fn calls(&self) -> Vec<StorageCall> {
        self.state().calls.clone()
    }

    pub fn mutating_calls(&self) -> usize {
        self.state().calls.iter().filter(|c| c.is_mutating()).count()
    }

    pub fn removed(&self) -> Vec<String> {
        self.state().removed.clone()
    }

    pub fn moved(&self) -> Vec<(String, String)> {
        self.state().moved.clone()
    }

    pub fn has_directory(&self, path: &str) -> bool {
        self.state().directories.contains(path)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageClient for InMemoryStorage {
    async fn list_recursive(&self, path: &str) -> RetentionResult<Vec<String>> {
        let mut state = self.state();
        state.calls.push(StorageCall::List(path.to_string()));
        if let Some(reason) = state.listing_error.clone() {
            return Err(RetentionError::ListingFailed {
                path: path.to_string(),
                reason,
            });
        }
        Ok(state.listing.clone())
    }

    async fn remove(&self, path: &str) -> Result<(), String> {
        let mut state = self.state();
        state.calls.push(StorageCall::Remove(path.to_string()));
        if state.fail_remove.contains(path) {
            return Err(format!("rm: {}: Permission denied", path));
        }
        state.removed.push(path.to_string());
        Ok(())
    }

    async fn move_to(&self, src: &str, dest: &str) -> Result<(), String> {
        let mut state = self.state();
        state.calls.push(StorageCall::Move {
            src: src.to_string(),
            dest: dest.to_string(),
        });
        if state.fail_move.contains(src) {
            return Err(format!("mv: {}: No such file or directory", src));
        }
        state.moved.push((src.to_string(), dest.to_string()));
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        let mut state = self.state();
        state.calls.push(StorageCall::Exists(path.to_string()));
        state.directories.contains(path)
    }

    async fn make_directory(&self, path: &str) -> Result<(), String> {
        let mut state = self.state();
        state.calls.push(StorageCall::MakeDirectory(path.to_string()));
        if state.make_directory_races {
            state.directories.insert(path.to_string());
        }
        if state.fail_make_directory {
            return Err(format!("mkdir: {}: cannot create directory", path));
        }
        state.directories.insert(path.to_string());
        Ok(())
    }
}
