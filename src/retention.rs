mod engine;
mod ensure;
pub mod error;
mod exceptions;
mod executor;
pub mod listing;
pub mod memory_storage;
mod policy;
pub mod storage;
pub mod types;


pub use engine::RetentionEngine;
pub use ensure::ensure_directory;
pub use error::{RetentionError, RetentionResult};
pub use exceptions::{ExceptionSet, DEFAULT_EXCEPTION_COLUMN};
pub use executor::{execute, ActionBatch, ActionMode};
pub use memory_storage::{InMemoryStorage, StorageCall};
pub use policy::RetentionPolicy;
pub use storage::{HdfsClient, StorageClient};
pub use types::{
    ActionOutcome, EnsureOutcome, EntryKind, ListingEntry, RetentionReport, StageTiming,
};
