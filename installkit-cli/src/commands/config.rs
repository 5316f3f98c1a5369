//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path` commands
//! for viewing and modifying configuration settings from the command line.

use std::path::Path;

use clap::Subcommand;
use console::style;
use installkit::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., components.tso_url)
        key: String,
    },

    /// Set a configuration value (an empty value clears a component URL)
    Set {
        /// Configuration key in format section.key (e.g., components.tso_url)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against `path`, or the default config file.
pub fn run(command: ConfigCommands, path: Option<&Path>) -> Result<(), CliError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_file_path);
    match command {
        ConfigCommands::Get { key } => run_get(&path, &key),
        ConfigCommands::Set { key, value } => run_set(&path, &key, &value),
        ConfigCommands::List => run_list(&path),
        ConfigCommands::Path => run_path(&path),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'installkit config list' to see available keys.",
            key
        ))
    })
}

/// Load the file for display, falling back to defaults with a warning.
fn load_for_display(path: &Path) -> ConfigFile {
    ConfigFile::load_from(path).unwrap_or_else(|e| {
        eprintln!(
            "{} {}; showing default values",
            style("Warning:").yellow().bold(),
            e
        );
        ConfigFile::default()
    })
}

/// Get a configuration value.
fn run_get(path: &Path, key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let config = load_for_display(path);
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a configuration value.
fn run_set(path: &Path, key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    // A file that fails to parse is never overwritten.
    let mut config = ConfigFile::load_from(path)?;
    config_key
        .set(&mut config, value)
        .map_err(|e| CliError::Config(e.to_string()))?;
    config.save_to(path)?;

    println!("Set {} = {}", config_key.name(), value);

    Ok(())
}

/// List all configuration settings.
fn run_list(path: &Path) -> Result<(), CliError> {
    let config = load_for_display(path);

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        let value = key.get(&config);
        let key_name = key.key_name();

        if value.is_empty() {
            println!("  {} = (not set)", key_name);
        } else {
            println!("  {} = {}", key_name, value);
        }
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    Ok(())
}
