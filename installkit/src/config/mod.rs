//! Configuration.
//!
//! Settings live in an INI file at `~/.config/installkit/config.ini` (see
//! [`config_file_path`]):
//!
//! ```ini
//! [paths]
//! install_dir = /home/user/Games
//! temp_dir = /tmp/installkit
//! log_dir = /home/user/.installkit/logs
//!
//! [pipeline]
//! progress_interval_ms = 1000
//! settle_delay_ms = 5000
//! # connect timeout and longest pause between received bytes
//! request_timeout_secs = 300
//!
//! [remeshes]
//! url = http://beta.freeso.org/remeshes.docx
//! parent_component = FreeSO
//!
//! [components]
//! tso_url = https://example.com/tso.zip
//!
//! [locale]
//! file = /path/to/de.json
//! ```
//!
//! [`ConfigFile`] mirrors the file, [`ConfigKey`] addresses single
//! settings for the CLI, and [`LauncherConfig`] is the resolved runtime
//! view used by the launcher.

mod file;
mod keys;
mod launcher;

use std::path::PathBuf;

use thiserror::Error;

use crate::error::InstallError;

pub use file::{
    ComponentSources, ConfigFile, LocaleSettings, PathSettings, PipelineSettings, RemeshSettings,
};
pub use keys::ConfigKey;
pub use launcher::LauncherConfig;

/// Built-in download location of the remesh pack.
pub const DEFAULT_REMESH_URL: &str = "http://beta.freeso.org/remeshes.docx";

/// Component named in the remesh pack's progress title.
pub const DEFAULT_PARENT_COMPONENT: &str = "FreeSO";

/// Errors from reading, writing or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

impl From<ConfigError> for InstallError {
    fn from(e: ConfigError) -> Self {
        InstallError::Config(e.to_string())
    }
}

/// Default configuration directory: `~/.config/installkit`.
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("installkit")
}

/// Default configuration file path.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
