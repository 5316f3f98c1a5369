//! Interfaces to the collaborators surrounding an install pipeline.
//!
//! Pipelines do not render anything, track installed software, or show
//! dialogs themselves. They talk to these traits, which the embedding
//! application implements:
//!
//! ```text
//!                ┌──────────────────┐
//!                │  Install recipe  │
//!                └────────┬─────────┘
//!     ┌───────────────┬───┴──────────┬────────────────┐
//!     ▼               ▼              ▼                ▼
//! ProgressSurface  Notifier    TaskRegistry     InstallState
//! (progress bars)  (dialogs)   (running kinds)  (installed?)
//! ```
//!
//! All methods are fire-and-forget from the pipeline's point of view.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use parking_lot::RwLock;

use crate::component::{ComponentKind, TaskKind};
use crate::error::InstallResult;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One progress notification for a single-component install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressItem {
    /// Identity of the progress item; stable for one pipeline instance.
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub message: String,
    /// Percentage, 0 to 100.
    pub percent: u8,
}

/// Milestone notification for the composite install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullInstallItem {
    pub title: String,
    pub subtitle: String,
    pub detail: String,
    /// Milestone percentage, 0 to 100.
    pub percent: u8,
}

/// Display surface receiving progress notifications.
pub trait ProgressSurface: Send + Sync {
    /// Create or update a progress item.
    fn add_progress_item(&self, item: &ProgressItem);

    /// Mark a progress item as no longer active.
    fn stop_progress_item(&self, id: &str);

    /// Update the composite install's milestone item, or clear it with `None`.
    fn full_install_progress_item(&self, item: Option<&FullInstallItem>);
}

/// User-facing dialogs, used only on terminal paths.
pub trait Notifier: Send + Sync {
    /// Tell the user a component was installed.
    fn show_installed(&self, name: &str);

    /// Tell the user an install failed.
    fn show_failed_install(&self, name: &str, reason: &str);

    /// Send a general notification.
    fn send_notification(&self, title: &str, body: &str);
}

/// Tracks which installer kinds currently have a running pipeline.
///
/// This is a presence set, not a lock.
pub trait TaskRegistry: Send + Sync {
    /// Record a kind as running. Returns `false` if it was already present.
    fn add_active_task(&self, kind: TaskKind) -> bool;

    /// Remove a kind. Removing an absent kind is a no-op.
    fn remove_active_task(&self, kind: TaskKind);

    /// Whether a kind is currently running.
    fn is_active(&self, kind: TaskKind) -> bool;
}

/// Read-only view of which components are installed.
pub trait InstallState: Send + Sync {
    /// Whether the component is already installed.
    fn is_installed(&self, component: ComponentKind) -> bool;

    /// Re-read installed programs after an install finished.
    fn refresh(&self) {}
}

/// Options for one single-component install.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// The install runs as part of a composite install, which owns the
    /// user-facing dialogs.
    pub full_install: bool,
    /// Target directory; the configured default is used when `None`.
    pub dir: Option<PathBuf>,
}

impl InstallOptions {
    /// Options for a sub-install of a composite install.
    pub fn part_of_full_install(dir: Option<PathBuf>) -> Self {
        Self {
            full_install: true,
            dir,
        }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }
}

/// Starts single-component installs on behalf of a composite install.
pub trait ComponentDispatch: Send + Sync {
    fn install(
        &self,
        component: ComponentKind,
        options: InstallOptions,
    ) -> BoxFuture<'_, InstallResult<()>>;
}

/// In-memory [`InstallState`].
#[derive(Debug, Default)]
pub struct InstalledSet {
    installed: RwLock<HashSet<ComponentKind>>,
}

impl InstalledSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set with the given components installed.
    pub fn with(components: impl IntoIterator<Item = ComponentKind>) -> Self {
        Self {
            installed: RwLock::new(components.into_iter().collect()),
        }
    }

    /// Mark a component as installed.
    pub fn mark_installed(&self, component: ComponentKind) {
        self.installed.write().insert(component);
    }
}

impl InstallState for InstalledSet {
    fn is_installed(&self, component: ComponentKind) -> bool {
        self.installed.read().contains(&component)
    }
}

/// [`InstallState`] that probes install directories.
///
/// A component counts as installed when `<root>/<pretty name>` exists and
/// contains at least one entry. Results are cached until [`refresh`] runs.
///
/// [`refresh`]: InstallState::refresh
#[derive(Debug)]
pub struct DirectoryProbe {
    root: PathBuf,
    cache: InstalledSet,
}

impl DirectoryProbe {
    /// Probe components below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let probe = Self {
            root: root.into(),
            cache: InstalledSet::new(),
        };
        probe.refresh();
        probe
    }

    /// Directory probed for a component.
    pub fn component_dir(&self, component: ComponentKind) -> PathBuf {
        self.root.join(component.pretty_name())
    }
}

fn dir_has_entries(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

impl InstallState for DirectoryProbe {
    fn is_installed(&self, component: ComponentKind) -> bool {
        self.cache.is_installed(component)
    }

    fn refresh(&self) {
        let mut installed = self.cache.installed.write();
        installed.clear();
        for component in ComponentKind::ALL {
            if dir_has_entries(&self.component_dir(component)) {
                installed.insert(component);
            }
        }
    }
}
