//! Filesystem helpers shared by pipeline steps.

use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{InstallError, InstallResult};

/// Ensure a directory exists, creating it and its parents if missing.
///
/// An already existing directory is success.
pub async fn ensure_dir(path: &Path) -> InstallResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| InstallError::CreateDir {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Remove a temporary file, logging instead of failing.
///
/// A missing file is not an error. Any other failure is logged at `warn`
/// and swallowed so it can never mask the error that led here.
pub async fn best_effort_cleanup(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed temporary file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove temporary file"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_dir_creates_nested() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b c").join("Tést Földér");
        ensure_dir(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_ensure_dir_existing_is_ok() {
        let temp = TempDir::new().unwrap();
        ensure_dir(temp.path()).await.unwrap();
        ensure_dir(temp.path()).await.unwrap();
        assert!(temp.path().is_dir());
    }

    #[tokio::test]
    async fn test_ensure_dir_over_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        std::fs::write(&file, b"x").unwrap();

        let err = ensure_dir(&file.join("sub")).await.unwrap_err();
        assert!(matches!(err, InstallError::CreateDir { .. }));
    }

    #[tokio::test]
    async fn test_cleanup_removes_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("artifacts-remeshes-1.zip");
        std::fs::write(&file, b"zip").unwrap();

        best_effort_cleanup(&file).await;
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn test_cleanup_missing_file_is_silent() {
        let temp = TempDir::new().unwrap();
        best_effort_cleanup(&temp.path().join("never-created.zip")).await;
    }

    #[tokio::test]
    async fn test_cleanup_error_is_swallowed() {
        // remove_file on a directory fails with something other than NotFound.
        let temp = TempDir::new().unwrap();
        best_effort_cleanup(temp.path()).await;
        assert!(temp.path().is_dir());
    }
}
