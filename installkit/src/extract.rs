//! ZIP archive extraction.
//!
//! Entries are unpacked one at a time on tokio's blocking pool. Each entry
//! name is streamed back to the async side as soon as it is written, so the
//! caller can report per-entry progress while extraction continues.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{ExtractionError, InstallError, InstallResult};

/// Unpacks ZIP archives into a destination directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ZipExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract `archive` into `dest`, calling `on_entry` once per entry.
    ///
    /// Resolves after the last entry has been written and returns the number
    /// of entries. A 0-byte archive resolves immediately with no entries.
    /// The archive itself is never deleted.
    pub async fn extract<F>(&self, archive: &Path, dest: &Path, mut on_entry: F) -> InstallResult<usize>
    where
        F: FnMut(&str) + Send,
    {
        let fail = |source: ExtractionError| InstallError::Extraction {
            path: archive.to_path_buf(),
            source,
        };

        let size = tokio::fs::metadata(archive)
            .await
            .map_err(|e| fail(e.into()))?
            .len();
        if size == 0 {
            debug!(path = %archive.display(), "Empty archive, nothing to extract");
            return Ok(0);
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let archive_path = archive.to_path_buf();
        let dest_path = dest.to_path_buf();
        let worker =
            tokio::task::spawn_blocking(move || unpack(&archive_path, &dest_path, &tx));

        // The channel closes when the worker drops its sender.
        while let Some(name) = rx.recv().await {
            on_entry(&name);
        }

        let count = worker
            .await
            .map_err(|e| fail(ExtractionError::Worker(e.to_string())))?
            .map_err(fail)?;

        info!(
            archive = %archive.display(),
            dest = %dest.display(),
            entries = count,
            "Archive extracted"
        );
        Ok(count)
    }
}

fn unpack(
    archive: &Path,
    dest: &Path,
    entries: &mpsc::UnboundedSender<String>,
) -> Result<usize, ExtractionError> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let name = entry.name().to_string();
        let relative: PathBuf = entry
            .enclosed_name()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| ExtractionError::UnsafeEntry(name.clone()))?;
        let out = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out)?;
        } else {
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut target = File::create(&out)?;
            io::copy(&mut entry, &mut target)?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&out, fs::Permissions::from_mode(mode & 0o7777))?;
            }
        }

        // A closed receiver only means nobody is listening for progress.
        let _ = entries.send(name);
    }

    Ok(zip.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, data) in files {
            writer
                .start_file(*name, SimpleFileOptions::default().unix_permissions(0o755))
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[tokio::test]
    async fn test_extract_reports_each_entry() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("artifacts-remeshes-1.zip");
        write_zip(
            &archive,
            &[("a.txt", b"alpha"), ("sub/b.txt", b"beta"), ("sub/deeper/c.bin", b"\x00\x01")],
        );
        let dest = temp.path().join("out");

        let mut seen = Vec::new();
        let count = ZipExtractor::new()
            .extract(&archive, &dest, |name| seen.push(name.to_string()))
            .await
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(seen, vec!["a.txt", "sub/b.txt", "sub/deeper/c.bin"]);
        assert_eq!(fs::read(dest.join("sub/b.txt")).unwrap(), b"beta");
        assert!(archive.exists(), "extractor never deletes its input");
    }

    #[tokio::test]
    async fn test_empty_archive_resolves_immediately() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("empty.zip");
        File::create(&archive).unwrap();

        let mut calls = 0;
        let count = ZipExtractor::new()
            .extract(&archive, temp.path(), |_| calls += 1)
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_non_ascii_destination() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.zip");
        write_zip(&archive, &[("Readme ü.txt", b"hallo")]);
        let dest = temp.path().join("Tést Földér").join("with space");

        ZipExtractor::new()
            .extract(&archive, &dest, |_| {})
            .await
            .unwrap();

        assert_eq!(fs::read(dest.join("Readme ü.txt")).unwrap(), b"hallo");
    }

    #[tokio::test]
    async fn test_corrupt_archive_is_extraction_error() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("corrupt.zip");
        fs::write(&archive, b"this is not a zip archive").unwrap();

        let err = ZipExtractor::new()
            .extract(&archive, temp.path(), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InstallError::Extraction {
                source: ExtractionError::Zip(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_archive_is_extraction_error() {
        let temp = TempDir::new().unwrap();
        let err = ZipExtractor::new()
            .extract(&temp.path().join("gone.zip"), temp.path(), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InstallError::Extraction {
                source: ExtractionError::Io(_),
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unix_permissions_applied() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.zip");
        write_zip(&archive, &[("run.sh", b"#!/bin/sh\n")]);
        let dest = temp.path().join("out");

        ZipExtractor::new()
            .extract(&archive, &dest, |_| {})
            .await
            .unwrap();

        let mode = fs::metadata(dest.join("run.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
