pub mod cli;
pub mod config;
mod retention;

pub use config::RetentionConfig;
pub use retention::{
    ensure_directory, execute, listing, ActionBatch, ActionMode, ActionOutcome, EnsureOutcome,
    EntryKind, ExceptionSet, HdfsClient, InMemoryStorage, ListingEntry, RetentionEngine,
    RetentionError, RetentionPolicy, RetentionReport, RetentionResult, StageTiming, StorageCall,
    StorageClient, DEFAULT_EXCEPTION_COLUMN,
};
