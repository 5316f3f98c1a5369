//! `components` command.

use std::path::PathBuf;

use clap::Args;
use console::style;
use installkit::config::LauncherConfig;
use installkit::host::{DirectoryProbe, InstallState};
use installkit::ComponentKind;

use crate::error::CliError;

/// Arguments of `installkit components`.
#[derive(Debug, Args)]
pub struct ComponentsArgs {
    /// Probe this directory instead of the configured install directory
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

/// List components with their install state and download location.
pub fn run(args: ComponentsArgs, config: &LauncherConfig) -> Result<(), CliError> {
    let root = args.dir.unwrap_or_else(|| config.install_dir.clone());
    let probe = DirectoryProbe::new(&root);

    println!("Components in {}", root.display());
    println!();
    println!("  {:<10} {:<8} {:<18} {:<10} SOURCE", "NAME", "CODE", "DESCRIPTION", "STATE");

    for component in ComponentKind::ALL {
        let state = if probe.is_installed(component) {
            style("installed").green()
        } else {
            style("missing").dim()
        };
        let source = config.source_url(component).unwrap_or("(not configured)");
        println!(
            "  {:<10} {:<8} {:<18} {:<10} {}",
            component.slug(),
            component.code(),
            component.pretty_name(),
            state,
            source
        );
    }

    Ok(())
}
