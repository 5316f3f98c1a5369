//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};
use crate::component::ComponentKind;

/// A single setting of [`ConfigFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    InstallDir,
    TempDir,
    LogDir,
    ProgressIntervalMs,
    SettleDelayMs,
    RequestTimeoutSecs,
    RemeshUrl,
    ParentComponent,
    /// `components.<slug>_url`; never the remesh pack.
    ComponentUrl(ComponentKind),
    LocaleFile,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::InstallDir,
    ConfigKey::TempDir,
    ConfigKey::LogDir,
    ConfigKey::ProgressIntervalMs,
    ConfigKey::SettleDelayMs,
    ConfigKey::RequestTimeoutSecs,
    ConfigKey::RemeshUrl,
    ConfigKey::ParentComponent,
    ConfigKey::ComponentUrl(ComponentKind::OpenAl),
    ConfigKey::ComponentUrl(ComponentKind::DotNet),
    ConfigKey::ComponentUrl(ComponentKind::Mono),
    ConfigKey::ComponentUrl(ComponentKind::Sdl),
    ConfigKey::ComponentUrl(ComponentKind::Tso),
    ConfigKey::ComponentUrl(ComponentKind::Fso),
    ConfigKey::LocaleFile,
];

fn optional_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn set_optional_path(slot: &mut Option<PathBuf>, value: &str) {
    let value = value.trim();
    *slot = (!value.is_empty()).then(|| PathBuf::from(value));
}

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    pub fn section(&self) -> &'static str {
        match self {
            Self::InstallDir | Self::TempDir | Self::LogDir => "paths",
            Self::ProgressIntervalMs | Self::SettleDelayMs | Self::RequestTimeoutSecs => {
                "pipeline"
            }
            Self::RemeshUrl | Self::ParentComponent => "remeshes",
            Self::ComponentUrl(_) => "components",
            Self::LocaleFile => "locale",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> String {
        match self {
            Self::InstallDir => "install_dir".to_string(),
            Self::TempDir => "temp_dir".to_string(),
            Self::LogDir => "log_dir".to_string(),
            Self::ProgressIntervalMs => "progress_interval_ms".to_string(),
            Self::SettleDelayMs => "settle_delay_ms".to_string(),
            Self::RequestTimeoutSecs => "request_timeout_secs".to_string(),
            Self::RemeshUrl => "url".to_string(),
            Self::ParentComponent => "parent_component".to_string(),
            Self::ComponentUrl(c) => format!("{}_url", c.slug()),
            Self::LocaleFile => "file".to_string(),
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as text; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            Self::InstallDir => optional_path(&config.paths.install_dir),
            Self::TempDir => optional_path(&config.paths.temp_dir),
            Self::LogDir => optional_path(&config.paths.log_dir),
            Self::ProgressIntervalMs => config.pipeline.progress_interval_ms.to_string(),
            Self::SettleDelayMs => config.pipeline.settle_delay_ms.to_string(),
            Self::RequestTimeoutSecs => config.pipeline.request_timeout_secs.to_string(),
            Self::RemeshUrl => config.remeshes.url.clone().unwrap_or_default(),
            Self::ParentComponent => config.remeshes.parent_component.clone(),
            Self::ComponentUrl(c) => config.components.get(*c).unwrap_or_default().to_string(),
            Self::LocaleFile => optional_path(&config.locale.file),
        }
    }

    /// Validate and store a value. An empty value clears optional settings.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let number = |value: &str| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: self.name(),
                    value: value.to_string(),
                    reason: e.to_string(),
                })
        };

        match self {
            Self::InstallDir => set_optional_path(&mut config.paths.install_dir, value),
            Self::TempDir => set_optional_path(&mut config.paths.temp_dir, value),
            Self::LogDir => set_optional_path(&mut config.paths.log_dir, value),
            Self::ProgressIntervalMs => {
                let ms = number(value)?;
                if ms == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: self.name(),
                        value: value.to_string(),
                        reason: "interval must be greater than zero".to_string(),
                    });
                }
                config.pipeline.progress_interval_ms = ms;
            }
            Self::SettleDelayMs => config.pipeline.settle_delay_ms = number(value)?,
            Self::RequestTimeoutSecs => config.pipeline.request_timeout_secs = number(value)?,
            Self::RemeshUrl => {
                let value = value.trim();
                config.remeshes.url = (!value.is_empty()).then(|| value.to_string());
            }
            Self::ParentComponent => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: self.name(),
                        value: value.to_string(),
                        reason: "name must not be empty".to_string(),
                    });
                }
                config.remeshes.parent_component = value.to_string();
            }
            Self::ComponentUrl(c) => config.components.set(*c, value.trim()),
            Self::LocaleFile => set_optional_path(&mut config.locale.file, value),
        }
        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
