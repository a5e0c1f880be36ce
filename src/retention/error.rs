use thiserror::Error;

/// Result type used across the retention pipeline.
pub type RetentionResult<T> = Result<T, RetentionError>;

/// Conditions that abort a run before anything is deleted or moved.
///
/// Per-item delete/move failures are not represented here; they are
/// recorded as failed [`super::ActionOutcome`]s and the batch continues.
#[derive(Debug, Error)]
pub enum RetentionError {
    /// The recursive listing could not be started or did not complete.
    #[error("listing failed for {path}: {reason}")]
    ListingFailed { path: String, reason: String },

    /// The exception file is missing, unreadable or lacks the column.
    #[error("exception source {path}: {reason}")]
    ExceptionSource { path: String, reason: String },

    /// The archive directory neither exists nor could be created.
    #[error("there's a problem with archive path {path}: {reason}")]
    ArchiveDestination { path: String, reason: String },
}
