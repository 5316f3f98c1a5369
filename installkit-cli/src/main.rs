//! installkit CLI - Command-line interface
//!
//! Drives the installkit download/extract/install pipelines from a terminal,
//! rendering progress items as bars and dialogs as console messages.

mod commands;
mod error;
mod logging;
mod ui;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use console::style;
use installkit::config::LauncherConfig;

use commands::components::ComponentsArgs;
use commands::config::ConfigCommands;
use commands::full_install::FullInstallArgs;
use commands::install::{InstallArgs, RemeshArgs};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "installkit")]
#[command(version, about = "Download, extract and install game components", long_about = None)]
struct Cli {
    /// Also log to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Install a single component
    Install(InstallArgs),

    /// Install the remesh pack
    Remesh(RemeshArgs),

    /// Install runtimes, game files and client in one go
    FullInstall(FullInstallArgs),

    /// List components and whether they are installed
    Components(ComponentsArgs),

    /// View or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Commands::Config { command } = cli.command {
        return commands::config::run(command, cli.config.as_deref());
    }

    let file = commands::common::load_config(cli.config.as_deref())?;
    let config = LauncherConfig::from_config_file(&file);

    // Dropping the guard flushes the file appender.
    let _guard = logging::init_logging(&config.log_dir, cli.verbose)?;

    match cli.command {
        Commands::Install(args) => commands::install::run(args, config),
        Commands::Remesh(args) => commands::install::run_remesh(args, config),
        Commands::FullInstall(args) => commands::full_install::run(args, config),
        Commands::Components(args) => commands::components::run(args, &config),
        Commands::Config { .. } => Ok(()),
    }
}
