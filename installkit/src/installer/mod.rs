//! Installer recipes built on the pipeline engine.
//!
//! - [`ComponentInstaller`]: download, prepare the directory and extract one
//!   component archive.
//! - [`CompleteInstaller`]: chain several component installs into one
//!   "complete" installation with milestone progress.
//!
//! Both recipes take their collaborators from an [`InstallerServices`]
//! bundle and report through the traits in [`crate::host`].

mod composite;
mod plan;
mod single;

use std::sync::Arc;
use std::time::Duration;

use crate::host::{InstallState, Notifier, ProgressSurface, TaskRegistry};
use crate::locale::Locale;
use crate::progress::DEFAULT_PROGRESS_INTERVAL;
use crate::transfer::Transport;

pub use composite::{CompleteInstaller, DEFAULT_SETTLE_DELAY};
pub use plan::{CompositePlan, PlanStep};
pub use single::{ComponentInstaller, InstallRequest};

/// Collaborators shared by every installer recipe.
#[derive(Clone)]
pub struct InstallerServices {
    pub surface: Arc<dyn ProgressSurface>,
    pub notifier: Arc<dyn Notifier>,
    pub registry: Arc<dyn TaskRegistry>,
    pub install_state: Arc<dyn InstallState>,
    pub transport: Arc<dyn Transport>,
    pub locale: Arc<Locale>,
    /// Polling period of download progress reporters.
    pub progress_interval: Duration,
}

impl InstallerServices {
    /// Bundle the collaborators with an English locale and the default
    /// progress interval.
    pub fn new(
        surface: Arc<dyn ProgressSurface>,
        notifier: Arc<dyn Notifier>,
        registry: Arc<dyn TaskRegistry>,
        install_state: Arc<dyn InstallState>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            surface,
            notifier,
            registry,
            install_state,
            transport,
            locale: Arc::new(Locale::english()),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Arc::new(locale);
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }
}
