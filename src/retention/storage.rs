use std::env;
use std::process::Output;

use tokio::process::Command;

use super::error::{RetentionError, RetentionResult};

/// Env var pointing at the `hdfs` executable.
pub const HDFS_BIN_ENV: &str = "HDFS_RETENTION_BIN";

/// The remote filesystem primitives the pipeline needs.
///
/// Every call is awaited before the next is issued; implementations don't
/// need to be shareable across tasks.
#[allow(async_fn_in_trait)]
pub trait StorageClient {
    /// Raw recursive listing, one line per entry.
    async fn list_recursive(&self, path: &str) -> RetentionResult<Vec<String>>;

    async fn remove(&self, path: &str) -> Result<(), String>;

    /// Move `src` into the directory `dest`.
    async fn move_to(&self, src: &str, dest: &str) -> Result<(), String>;

    async fn exists(&self, path: &str) -> bool;

    /// Create `path` including missing parents.
    async fn make_directory(&self, path: &str) -> Result<(), String>;
}

/// [`StorageClient`] backed by the `hdfs dfs` command-line tool.
#[derive(Debug, Clone)]
pub struct HdfsClient {
    binary: String,
}

impl HdfsClient {
    pub fn new(binary: impl Into<String>) -> Self {
        HdfsClient {
            binary: binary.into(),
        }
    }

    /// Uses `$HDFS_RETENTION_BIN`, falling back to `hdfs` on the `PATH`.
    pub fn from_env() -> Self {
        let binary = env::var(HDFS_BIN_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "hdfs".to_string());
        Self::new(binary)
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    async fn dfs(&self, args: &[&str]) -> std::io::Result<Output> {
        log::debug!("Running {} dfs {}", self.binary, args.join(" "));
        Command::new(&self.binary)
            .arg("dfs")
            .args(args)
            .output()
            .await
    }

    async fn dfs_status(&self, args: &[&str]) -> Result<(), String> {
        let output = self
            .dfs(args)
            .await
            .map_err(|e| format!("Failed to run {}: {}", self.binary, e))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(format!(
                "{} dfs {} failed (status {:?}): {}",
                self.binary,
                args.first().copied().unwrap_or_default(),
                output.status.code(),
                captured_text(&output)
            ))
        }
    }
}

impl Default for HdfsClient {
    fn default() -> Self {
        Self::from_env()
    }
}

impl StorageClient for HdfsClient {
    async fn list_recursive(&self, path: &str) -> RetentionResult<Vec<String>> {
        let listing_err = |reason: String| RetentionError::ListingFailed {
            path: path.to_string(),
            reason,
        };

        let output = self
            .dfs(&["-ls", "-R", path])
            .await
            .map_err(|e| listing_err(format!("failed to run {}: {}", self.binary, e)))?;

        // `-ls -R` exits non-zero when any subtree is unreadable but still
        // prints everything it could reach.
        if !output.status.success() {
            log::warn!(
                "Listing of {} exited with status {:?}: {}",
                path,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }

    async fn remove(&self, path: &str) -> Result<(), String> {
        self.dfs_status(&["-rm", "-f", path]).await
    }

    async fn move_to(&self, src: &str, dest: &str) -> Result<(), String> {
        self.dfs_status(&["-mv", src, dest]).await
    }

    async fn exists(&self, path: &str) -> bool {
        match self.dfs(&["-test", "-e", path]).await {
            Ok(output) => output.status.success(),
            Err(err) => {
                log::warn!("Failed to probe {}: {}", path, err);
                false
            }
        }
    }

    async fn make_directory(&self, path: &str) -> Result<(), String> {
        self.dfs_status(&["-mkdir", "-p", path]).await
    }
}

/// stdout and stderr of a finished command, as one trimmed string.
fn captured_text(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{}{}", stdout, stderr).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_fails_listing_and_items() {
        let client = HdfsClient::new("/nonexistent/bin/hdfs");
        let err = client.list_recursive("/data/").await.unwrap_err();
        assert!(matches!(err, RetentionError::ListingFailed { .. }));
        assert!(client.remove("/data/a.log").await.is_err());
        assert!(!client.exists("/data/").await);
    }

    #[tokio::test]
    async fn non_zero_listing_exit_is_not_fatal() {
        let client = HdfsClient::new("false");
        let lines = client.list_recursive("/data/").await.unwrap();
        assert!(lines.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn partial_listing_keeps_reachable_entries() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let script = temp_dir.path().join("hdfs");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             echo '-rw-r--r--   3 hdfs supergroup 1024 2020-01-01 09:12 /data/old.log'\n\
             echo \"ls: Permission denied: user=etl, access=READ_EXECUTE, inode=/data/secret\" >&2\n\
             exit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let client = HdfsClient::new(script.display().to_string());
        // A sibling test forking while the script was open can leave it busy (ETXTBSY).
        let mut attempt = 0;
        let lines = loop {
            match client.list_recursive("/data/").await {
                Err(err) if attempt < 5 && err.to_string().contains("busy") => {
                    attempt += 1;
                    std::thread::sleep(std::time::Duration::from_millis(50));
                }
                other => break other.unwrap(),
            }
        };
        assert_eq!(lines.len(), 1);

        let entries = crate::retention::listing::parse(&lines);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "/data/old.log");
    }

    #[tokio::test]
    async fn successful_commands_map_to_ok() {
        let client = HdfsClient::new("true");
        assert!(client.remove("/data/a.log").await.is_ok());
        assert!(client.move_to("/data/a.log", "/archive/").await.is_ok());
        assert!(client.make_directory("/archive/").await.is_ok());
        assert!(client.exists("/archive/").await);
    }

    #[tokio::test]
    async fn listing_returns_stdout_lines() {
        let client = HdfsClient::new("echo");
        let lines = client.list_recursive("/data/").await.unwrap();
        assert_eq!(lines, vec!["dfs -ls -R /data/".to_string()]);
        assert_eq!(client.binary(), "echo");
    }
}
