//! Error types for install pipelines.
//!
//! Every failure a pipeline step can produce falls into one of three classes
//! (see [`ErrorClass`]): the remote fetch failed, a filesystem operation
//! failed, or the archive could not be extracted. The remaining variants come
//! from configuration and dispatch, before any pipeline step runs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::component::{ComponentKind, TaskKind};

/// Result type for install operations.
pub type InstallResult<T> = Result<T, InstallError>;

/// Coarse classification of an [`InstallError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Network or transport failure, or a non-success response.
    Transfer,
    /// Directory creation, file read/write or deletion failure.
    Filesystem,
    /// Corrupt archive, unsupported entry or I/O error while unpacking.
    Extraction,
    /// Configuration, locale or dispatch failure.
    Other,
}

/// Errors that can occur while installing a component.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The remote fetch finished with its `failed` flag set.
    ///
    /// `message` is the localized, user-facing text; `reason` keeps the
    /// underlying transport error for logs.
    #[error("{message}")]
    Transfer {
        message: String,
        url: String,
        reason: String,
    },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// Failed to read a file.
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Archive extraction failed.
    #[error("failed to extract {}: {source}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: ExtractionError,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A locale file could not be loaded.
    #[error("failed to load locale {}: {reason}", path.display())]
    Locale { path: PathBuf, reason: String },

    /// An installer of this kind is already running.
    #[error("{0} is already being installed")]
    AlreadyRunning(TaskKind),

    /// No download location is configured for the component.
    #[error("no download location configured for {}", .0.pretty_name())]
    MissingSource(ComponentKind),
}

impl InstallError {
    /// Classify the error into one of the pipeline failure classes.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Transfer { .. } => ErrorClass::Transfer,
            Self::CreateDir { .. } | Self::Write { .. } | Self::Read { .. } => {
                ErrorClass::Filesystem
            }
            Self::Extraction { .. } => ErrorClass::Extraction,
            Self::Config(_)
            | Self::Locale { .. }
            | Self::AlreadyRunning(_)
            | Self::MissingSource(_) => ErrorClass::Other,
        }
    }
}

/// Underlying cause of an archive extraction failure.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The zip reader rejected the archive or one of its entries.
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    /// Reading the archive or writing an entry failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// An entry name points outside the destination directory.
    #[error("entry '{0}' escapes the destination directory")]
    UnsafeEntry(String),

    /// The blocking extraction worker did not complete.
    #[error("extraction worker failed: {0}")]
    Worker(String),
}

/// Failure reported by a [`crate::transfer::Transport`].
#[derive(Debug, Error)]
pub enum TransferError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The destination file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// The source could not be reached at all.
    #[error("{0} is unreachable")]
    Unreachable(String),
}
