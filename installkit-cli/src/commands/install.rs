//! `install` and `remesh` commands.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use installkit::config::LauncherConfig;
use installkit::host::{DirectoryProbe, InstallOptions};
use installkit::ComponentKind;
use tracing::info;

use super::common::{build_launcher, runtime};
use crate::error::CliError;

/// Arguments of `installkit install`.
#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Component to install (openal, net, mono, sdl, tso, fso, remeshes)
    pub component: ComponentKind,

    /// Install into this directory instead of <install_dir>/<component name>
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Download from this URL instead of the configured location
    #[arg(long)]
    pub url: Option<String>,
}

/// Arguments of `installkit remesh`.
#[derive(Debug, Args)]
pub struct RemeshArgs {
    /// Install into this directory instead of the default location
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Component name shown in the progress title
    #[arg(long)]
    pub parent: Option<String>,
}

/// Install a single component.
pub fn run(args: InstallArgs, mut config: LauncherConfig) -> Result<(), CliError> {
    if let Some(url) = args.url {
        config = config.with_source(args.component, url);
    }

    let probe = Arc::new(DirectoryProbe::new(config.install_dir.clone()));
    let launcher = build_launcher(config, probe)?;

    let options = InstallOptions {
        full_install: false,
        dir: args.dir,
    };

    info!(component = %args.component, "Running install command");
    runtime()?.block_on(launcher.install(args.component, options))?;
    Ok(())
}

/// Install the remesh pack.
pub fn run_remesh(args: RemeshArgs, mut config: LauncherConfig) -> Result<(), CliError> {
    if let Some(parent) = args.parent {
        config = config.with_parent_component(parent);
    }

    let probe = Arc::new(DirectoryProbe::new(config.install_dir.clone()));
    let launcher = build_launcher(config, probe)?;

    runtime()?.block_on(launcher.install_remeshes(args.dir.as_deref()))?;
    Ok(())
}
