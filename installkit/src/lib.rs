//! installkit - Download, extract and install pipelines
//!
//! This library orchestrates multi-step software installs: fetch a remote
//! archive, prepare the destination directory, unpack it, and report
//! progress along the way with exactly one success or failure ending.
//!
//! # Architecture
//!
//! ```text
//! Launcher ──► ComponentInstaller ──► Sequencer ──► download ─► setup_dir ─► extract
//!    │                                     │            │                       │
//!    └─► CompleteInstaller ──► Sequencer   │     TransferMonitor          ZipExtractor
//!              (dispatches sub-installs)   │     + ProgressReporter
//!                                          ▼
//!                                   Finalizer (success | failure)
//!                                          │
//!                     ProgressSurface, Notifier, TaskRegistry, InstallState
//! ```
//!
//! Embedding applications implement the traits in [`host`] and hand them to
//! the [`Launcher`] through an [`InstallerServices`] bundle.

pub mod component;
pub mod config;
pub mod error;
pub mod extract;
pub mod fsutil;
pub mod host;
pub mod installer;
pub mod launcher;
pub mod locale;
pub mod pipeline;
pub mod progress;
pub mod registry;
pub mod transfer;

pub use component::{ComponentKind, Platform, TaskKind};
pub use error::{ErrorClass, InstallError, InstallResult};
pub use installer::InstallerServices;
pub use launcher::Launcher;
pub use locale::{Locale, MessageKey};
