use super::error::{RetentionError, RetentionResult};
use super::storage::StorageClient;
use super::types::EnsureOutcome;

/// Make sure the archive destination exists before anything is moved.
///
/// Probes first and only creates when the probe says the directory is
/// absent. A failed creation is re-probed: if the directory appeared in the
/// meantime it counts as already existing, otherwise the run must stop.
pub async fn ensure_directory<S: StorageClient>(
    storage: &S,
    path: &str,
) -> RetentionResult<EnsureOutcome> {
    if storage.exists(path).await {
        log::info!("Dir. exists: {}", path);
        return Ok(EnsureOutcome::AlreadyExists);
    }

    log::info!("Directory {} doesn't exist, creating dir...", path);
    match storage.make_directory(path).await {
        Ok(()) => {
            log::info!("Dir. created: {}", path);
            Ok(EnsureOutcome::Created)
        }
        Err(reason) => {
            if storage.exists(path).await {
                log::debug!("{} appeared while creating it: {}", path, reason);
                return Ok(EnsureOutcome::AlreadyExists);
            }
            Err(RetentionError::ArchiveDestination {
                path: path.to_string(),
                reason,
            })
        }
    }
}
