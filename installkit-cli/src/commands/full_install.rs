//! `full-install` command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;
use dialoguer::Confirm;
use installkit::config::LauncherConfig;
use installkit::host::{DirectoryProbe, InstallState, InstalledSet};
use installkit::installer::CompositePlan;
use installkit::ComponentKind;

use super::common::{build_launcher, runtime};
use crate::error::CliError;

/// Arguments of `installkit full-install`.
#[derive(Debug, Args)]
pub struct FullInstallArgs {
    /// Folder receiving the game and client subfolders
    pub folder: PathBuf,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Treat these components as already installed
    #[arg(long, value_delimiter = ',')]
    pub assume_installed: Vec<ComponentKind>,
}

/// Probe installed components, then add the ones the user vouches for.
fn install_state(config: &LauncherConfig, assumed: &[ComponentKind]) -> InstalledSet {
    let probe = DirectoryProbe::new(config.install_dir.clone());
    let installed = InstalledSet::new();
    for component in ComponentKind::ALL {
        if probe.is_installed(component) {
            installed.mark_installed(component);
        }
    }
    for component in assumed {
        installed.mark_installed(*component);
    }
    installed
}

/// Run the composite install.
pub fn run(args: FullInstallArgs, config: LauncherConfig) -> Result<(), CliError> {
    let plan = CompositePlan::for_platform(config.platform);
    let state = install_state(&config, &args.assume_installed);

    println!("{}", style("Complete installation").bold());
    println!("  Target: {}", args.folder.display());
    for step in plan.steps() {
        let note = if step.skip_if_installed && state.is_installed(step.component) {
            " (already installed)"
        } else {
            ""
        };
        println!("  {:>3}%  {}{}", step.milestone, step.component.pretty_name(), note);
    }
    println!();

    if !args.yes {
        let proceed = Confirm::new()
            .with_prompt("Start the installation?")
            .default(true)
            .interact()
            .map_err(|e| CliError::Runtime(format!("prompt failed: {}", e)))?;
        if !proceed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let launcher = build_launcher(config, Arc::new(state))?;
    runtime()?.block_on(launcher.full_install(&args.folder))?;
    Ok(())
}
