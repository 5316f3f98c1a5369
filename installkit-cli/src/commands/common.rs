//! Common types and utilities shared across CLI commands.

use std::path::Path;
use std::sync::Arc;

use indicatif::MultiProgress;
use installkit::config::{ConfigFile, LauncherConfig};
use installkit::host::InstallState;
use installkit::registry::ActiveTasks;
use installkit::transfer::HttpTransport;
use installkit::{InstallerServices, Launcher};
use tokio::runtime::Runtime;

use crate::error::CliError;
use crate::ui::{ConsoleNotifier, ConsoleSurface};

/// Load the config file from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Build a launcher wired to the terminal UI.
pub fn build_launcher(
    config: LauncherConfig,
    install_state: Arc<dyn InstallState>,
) -> Result<Launcher, CliError> {
    let multi = MultiProgress::new();
    let surface = Arc::new(ConsoleSurface::new(multi.clone()));
    let notifier = Arc::new(ConsoleNotifier::new(multi));

    let transport = HttpTransport::with_timeout(config.request_timeout)
        .map_err(|e| CliError::Runtime(format!("failed to create HTTP client: {}", e)))?;
    let locale = config.load_locale()?;

    let services = InstallerServices::new(
        surface,
        notifier,
        Arc::new(ActiveTasks::new()),
        install_state,
        Arc::new(transport),
    )
    .with_locale(locale);

    Ok(Launcher::new(config, services))
}

/// Create the async runtime used by install commands.
pub fn runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(format!("failed to start async runtime: {}", e)))
}
