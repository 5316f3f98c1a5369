//! Composite "complete" installer.
//!
//! Runs a [`CompositePlan`] through the same sequencer as the single
//! installer. Each step pushes its milestone, then either resolves at once
//! (component already installed) or dispatches a sub-install tagged as part
//! of the full install. Sub-installs stay silent; this recipe shows the one
//! user-facing report.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{error, info};

use super::{CompositePlan, InstallerServices, PlanStep};
use crate::component::TaskKind;
use crate::error::InstallResult;
use crate::host::{BoxFuture, ComponentDispatch, FullInstallItem, InstallOptions};
use crate::locale::MessageKey;
use crate::pipeline::{Finalizer, PipelineId, Sequencer, Step, StepFailure};

/// Default pause before the final item is cleared.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// One run of a composite install.
pub struct CompleteInstaller<'a> {
    id: PipelineId,
    folder: PathBuf,
    plan: CompositePlan,
    dispatch: &'a dyn ComponentDispatch,
    services: InstallerServices,
    settle_delay: Duration,
}

impl<'a> CompleteInstaller<'a> {
    pub fn new(
        folder: impl Into<PathBuf>,
        plan: CompositePlan,
        dispatch: &'a dyn ComponentDispatch,
        services: InstallerServices,
    ) -> Self {
        Self {
            id: PipelineId::next(),
            folder: folder.into(),
            plan,
            dispatch,
            services,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Set how long the final item stays visible.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Run every plan step, then one terminal report.
    pub async fn install(self) -> InstallResult<()> {
        info!(
            id = %self.id,
            folder = %self.folder.display(),
            steps = self.plan.len(),
            "Complete install started"
        );

        let this = &self;
        let steps = self
            .plan
            .steps()
            .iter()
            .map(|step| Step::new(step.component.slug(), move || this.run_step(step)))
            .collect::<Vec<_>>();

        Sequencer::new(steps)
            .run(&self)
            .await
            .map_err(StepFailure::into_error)
    }

    async fn run_step(&self, step: &PlanStep) -> InstallResult<()> {
        self.push_item(step.title, self.text(step.subtitle), step.detail, step.milestone);

        if step.skip_if_installed && self.services.install_state.is_installed(step.component) {
            info!(id = %self.id, component = %step.component, "Already installed, skipping");
            return Ok(());
        }

        let dir = step
            .subfolder
            .then(|| self.folder.join(step.component.pretty_name()));
        self.dispatch
            .install(step.component, InstallOptions::part_of_full_install(dir))
            .await
    }

    fn text(&self, key: MessageKey) -> &str {
        self.services.locale.get(key)
    }

    fn push_item(&self, title: MessageKey, subtitle: &str, detail: MessageKey, percent: u8) {
        let item = FullInstallItem {
            title: self.text(title).to_string(),
            subtitle: subtitle.to_string(),
            detail: self.text(detail).to_string(),
            percent,
        };
        self.services.surface.full_install_progress_item(Some(&item));
    }

    async fn settle_and_clear(&self) {
        tokio::time::sleep(self.settle_delay).await;
        self.services
            .registry
            .remove_active_task(TaskKind::FullInstall);
        self.services.surface.full_install_progress_item(None);
    }
}

impl Finalizer for CompleteInstaller<'_> {
    fn on_success(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.push_item(
                MessageKey::Finished,
                self.text(MessageKey::Play),
                MessageKey::PlayClick,
                CompositePlan::FINAL_MILESTONE,
            );
            self.services.notifier.send_notification(
                self.text(MessageKey::Finished),
                self.text(MessageKey::FinishedLong),
            );
            info!(id = %self.id, "Complete install finished");

            self.settle_and_clear().await;
        })
    }

    fn on_failure<'a>(&'a self, failure: &'a StepFailure) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let reason = failure.error.to_string();
            let description = format!("{} {}", self.text(MessageKey::ErrorDescription), reason);
            self.push_item(
                MessageKey::ErrorTitle,
                &description,
                MessageKey::Close,
                CompositePlan::FINAL_MILESTONE,
            );

            error!(
                installer = "complete",
                id = %self.id,
                step = failure.step,
                error = %failure.error,
                "Complete install failed"
            );

            let name = self
                .plan
                .steps()
                .get(failure.index)
                .map(|step| step.component.pretty_name())
                .unwrap_or(failure.step);
            self.services.notifier.show_failed_install(name, &reason);

            self.settle_and_clear().await;
        })
    }
}
