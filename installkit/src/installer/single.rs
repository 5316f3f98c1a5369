//! Single-component installer.
//!
//! ```text
//! download ──► setup_dir ──► extract
//!    │             │            │
//!    └─────────────┴────────────┴── error ──► failure finalizer
//! ```
//!
//! The download step runs a [`TransferMonitor`] with a [`ProgressReporter`]
//! polling it. The archive lands in the temp directory and is removed on
//! both terminal paths.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info};

use super::InstallerServices;
use crate::component::{ComponentKind, TaskKind};
use crate::error::{InstallError, InstallResult};
use crate::extract::ZipExtractor;
use crate::fsutil::{best_effort_cleanup, ensure_dir};
use crate::host::BoxFuture;
use crate::locale::MessageKey;
use crate::pipeline::{Finalizer, PipelineId, Sequencer, Step, StepFailure};
use crate::progress::{download_message, ProgressChannel, ProgressReporter};
use crate::transfer::TransferMonitor;

/// What to install and where.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub component: ComponentKind,
    pub source_url: String,
    /// Destination directory of the extracted files.
    pub target: PathBuf,
    /// Directory holding the temporary archive.
    pub temp_dir: PathBuf,
    /// Part of a composite install; dialogs are suppressed.
    pub full_install: bool,
    /// Name shown in the remesh pack's progress title.
    pub parent: String,
}

/// One run of the download, setup and extract pipeline.
pub struct ComponentInstaller {
    id: PipelineId,
    request: InstallRequest,
    archive: PathBuf,
    services: InstallerServices,
    channel: Arc<ProgressChannel>,
    reporter: Mutex<Option<ProgressReporter>>,
}

impl ComponentInstaller {
    pub fn new(request: InstallRequest, services: InstallerServices) -> Self {
        let id = PipelineId::next();
        let archive = request
            .temp_dir
            .join(format!("artifacts-{}-{}.zip", request.component.slug(), id));
        let channel = Arc::new(ProgressChannel::new(
            Arc::clone(&services.surface),
            id.progress_item_id(),
            request.component.progress_title(&request.parent),
            request.target.display().to_string(),
        ));

        Self {
            id,
            request,
            archive,
            services,
            channel,
            reporter: Mutex::new(None),
        }
    }

    pub fn id(&self) -> PipelineId {
        self.id
    }

    /// Path of the temporary archive.
    pub fn archive_path(&self) -> &Path {
        &self.archive
    }

    pub fn target(&self) -> &Path {
        &self.request.target
    }

    /// Run the pipeline to its end.
    ///
    /// The error of the first failing step is returned unchanged after the
    /// failure finalizer has run.
    pub async fn install(self) -> InstallResult<()> {
        info!(
            id = %self.id,
            component = %self.request.component,
            url = %self.request.source_url,
            target = %self.request.target.display(),
            "Install started"
        );

        let steps = vec![
            Step::new("download", || self.download()),
            Step::new("setup_dir", || self.setup_dir()),
            Step::new("extract", || self.extract()),
        ];

        Sequencer::new(steps)
            .run(&self)
            .await
            .map_err(StepFailure::into_error)
    }

    fn text(&self, key: MessageKey) -> &str {
        self.services.locale.get(key)
    }

    async fn download(&self) -> InstallResult<()> {
        let mut monitor = TransferMonitor::new(
            self.request.source_url.clone(),
            self.archive.clone(),
            Arc::clone(&self.services.transport),
        );
        let signal = monitor.start().ok_or_else(|| {
            self.transfer_error("transfer was already started".to_string())
        })?;

        self.channel.emit(
            &download_message(&self.services.locale, 0.0, monitor.total_mb(), 0),
            0,
        );

        let reporter = ProgressReporter::spawn(
            Arc::clone(&self.channel),
            monitor.state(),
            Arc::clone(&self.services.locale),
            self.services.progress_interval,
        );
        *self.reporter.lock() = Some(reporter);

        let outcome = signal.wait().await;
        if outcome.failed {
            // The failure finalizer halts and stops the reporter.
            return Err(self.transfer_error(outcome.error.unwrap_or_default()));
        }

        let reporter = self.reporter.lock().take();
        if let Some(reporter) = reporter {
            reporter.stop().await;
        }

        info!(id = %self.id, bytes = outcome.bytes, "Download finished");
        Ok(())
    }

    async fn setup_dir(&self) -> InstallResult<()> {
        ensure_dir(&self.request.target).await
    }

    async fn extract(&self) -> InstallResult<()> {
        let prefix = self.text(MessageKey::ExtractingFiles);
        self.channel.emit(prefix, 100);

        let channel = &self.channel;
        ZipExtractor::new()
            .extract(&self.archive, &self.request.target, |entry| {
                channel.emit(&format!("{} {}", prefix, entry), 100);
            })
            .await?;

        best_effort_cleanup(&self.archive).await;
        Ok(())
    }

    fn transfer_error(&self, reason: String) -> InstallError {
        InstallError::Transfer {
            message: self.text(MessageKey::NetworkError).to_string(),
            url: self.request.source_url.clone(),
            reason,
        }
    }

    fn task_kind(&self) -> TaskKind {
        TaskKind::from(self.request.component)
    }
}

impl Finalizer for ComponentInstaller {
    fn on_success(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.channel
                .emit(self.text(MessageKey::InstallationFinished), 100);
            self.channel.stop();
            self.services.install_state.refresh();
            self.services.registry.remove_active_task(self.task_kind());

            info!(id = %self.id, component = %self.request.component, "Install finished");
            if !self.request.full_install {
                self.services
                    .notifier
                    .show_installed(self.request.component.pretty_name());
            }
        })
    }

    fn on_failure<'a>(&'a self, failure: &'a StepFailure) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            self.channel.halt();
            let reporter = self.reporter.lock().take();
            if let Some(reporter) = reporter {
                reporter.stop().await;
            }

            self.channel
                .emit_final(self.text(MessageKey::FailedInstallation), 100);
            self.channel.stop();
            best_effort_cleanup(&self.archive).await;
            self.services.registry.remove_active_task(self.task_kind());

            error!(
                id = %self.id,
                component = %self.request.component,
                step = failure.step,
                error = %failure.error,
                "Install failed"
            );
            if !self.request.full_install {
                self.services.notifier.show_failed_install(
                    self.request.component.pretty_name(),
                    &failure.error.to_string(),
                );
            }
        })
    }
}
