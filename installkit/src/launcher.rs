//! Entry point that turns install requests into running pipelines.
//!
//! The launcher owns the active-task guard: it records the installer kind
//! before a pipeline starts and refuses a second pipeline of the same kind.
//! The pipeline's finalizer removes the entry again.

use std::path::Path;

use tracing::{info, warn};

use crate::component::{ComponentKind, TaskKind};
use crate::config::LauncherConfig;
use crate::error::{InstallError, InstallResult};
use crate::host::{BoxFuture, ComponentDispatch, InstallOptions};
use crate::installer::{
    CompleteInstaller, ComponentInstaller, CompositePlan, InstallRequest, InstallerServices,
};

/// Dispatches single-component and composite installs.
pub struct Launcher {
    config: LauncherConfig,
    services: InstallerServices,
}

impl Launcher {
    /// Create a launcher. The services' progress interval is taken from
    /// `config`.
    pub fn new(config: LauncherConfig, services: InstallerServices) -> Self {
        let services = services.with_progress_interval(config.progress_interval);
        Self { config, services }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn services(&self) -> &InstallerServices {
        &self.services
    }

    /// Install one component.
    ///
    /// Fails with [`InstallError::AlreadyRunning`] while another install of
    /// the same component is in progress.
    pub async fn install(
        &self,
        component: ComponentKind,
        options: InstallOptions,
    ) -> InstallResult<()> {
        let kind = TaskKind::from(component);
        self.claim(kind)?;

        let installer = match self.component_installer(component, options) {
            Ok(installer) => installer,
            Err(e) => {
                self.services.registry.remove_active_task(kind);
                return Err(e);
            }
        };
        installer.install().await
    }

    /// Install the remesh pack into `dir`, or its default location.
    pub async fn install_remeshes(&self, dir: Option<&Path>) -> InstallResult<()> {
        let options = InstallOptions {
            full_install: false,
            dir: dir.map(Path::to_path_buf),
        };
        self.install(ComponentKind::Remeshes, options).await
    }

    /// Run the composite install into `folder`.
    pub async fn full_install(&self, folder: &Path) -> InstallResult<()> {
        self.claim(TaskKind::FullInstall)?;

        info!(folder = %folder.display(), platform = ?self.config.platform, "Full install requested");
        CompleteInstaller::new(
            folder,
            CompositePlan::for_platform(self.config.platform),
            self,
            self.services.clone(),
        )
        .with_settle_delay(self.config.settle_delay)
        .install()
        .await
    }

    fn claim(&self, kind: TaskKind) -> InstallResult<()> {
        if self.services.registry.add_active_task(kind) {
            Ok(())
        } else {
            warn!(kind = %kind, "Install already running");
            Err(InstallError::AlreadyRunning(kind))
        }
    }

    fn component_installer(
        &self,
        component: ComponentKind,
        options: InstallOptions,
    ) -> InstallResult<ComponentInstaller> {
        let source_url = self
            .config
            .source_url(component)
            .ok_or(InstallError::MissingSource(component))?
            .to_string();
        let target = options
            .dir
            .unwrap_or_else(|| self.config.component_dir(component));

        let request = InstallRequest {
            component,
            source_url,
            target,
            temp_dir: self.config.temp_dir.clone(),
            full_install: options.full_install,
            parent: self.config.parent_component.clone(),
        };
        Ok(ComponentInstaller::new(request, self.services.clone()))
    }
}

impl ComponentDispatch for Launcher {
    fn install(
        &self,
        component: ComponentKind,
        options: InstallOptions,
    ) -> BoxFuture<'_, InstallResult<()>> {
        Box::pin(Launcher::install(self, component, options))
    }
}
