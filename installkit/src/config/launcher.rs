//! Resolved runtime settings of the launcher.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use super::{ConfigFile, DEFAULT_PARENT_COMPONENT, DEFAULT_REMESH_URL};
use crate::component::{ComponentKind, Platform};
use crate::error::InstallResult;
use crate::installer::DEFAULT_SETTLE_DELAY;
use crate::locale::Locale;
use crate::progress::DEFAULT_PROGRESS_INTERVAL;
use crate::transfer::DEFAULT_TIMEOUT_SECS;

/// Settings used to build and run install pipelines.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Parent of the default per-component install directories.
    pub install_dir: PathBuf,

    /// Directory for temporary archives.
    pub temp_dir: PathBuf,

    /// Directory for log files.
    pub log_dir: PathBuf,

    pub progress_interval: Duration,

    /// How long the composite's final item stays visible.
    pub settle_delay: Duration,

    /// Connect timeout and longest stall while receiving a download.
    pub request_timeout: Duration,

    /// Download locations by component.
    pub sources: HashMap<ComponentKind, String>,

    /// Name shown in the remesh pack's progress title.
    pub parent_component: String,

    pub locale_file: Option<PathBuf>,

    pub platform: Platform,
}

/// `~/.installkit`
fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".installkit")
}

impl Default for LauncherConfig {
    fn default() -> Self {
        let mut sources = HashMap::new();
        sources.insert(ComponentKind::Remeshes, DEFAULT_REMESH_URL.to_string());

        Self {
            install_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("installkit"),
            temp_dir: std::env::temp_dir().join("installkit"),
            log_dir: home_dir().join("logs"),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            sources,
            parent_component: DEFAULT_PARENT_COMPONENT.to_string(),
            locale_file: None,
            platform: Platform::current(),
        }
    }
}

impl LauncherConfig {
    /// Create a configuration with the given install directory.
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            ..Default::default()
        }
    }

    /// Resolve settings from a loaded config file, filling in defaults.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(dir) = &file.paths.install_dir {
            config.install_dir = dir.clone();
        }
        if let Some(dir) = &file.paths.temp_dir {
            config.temp_dir = dir.clone();
        }
        if let Some(dir) = &file.paths.log_dir {
            config.log_dir = dir.clone();
        }

        config.progress_interval = Duration::from_millis(file.pipeline.progress_interval_ms.max(1));
        config.settle_delay = Duration::from_millis(file.pipeline.settle_delay_ms);
        config.request_timeout = Duration::from_secs(file.pipeline.request_timeout_secs);

        if let Some(url) = &file.remeshes.url {
            config.sources.insert(ComponentKind::Remeshes, url.clone());
        }
        config.parent_component = file.remeshes.parent_component.clone();
        for (component, url) in file.components.iter() {
            config.sources.insert(component, url.to_string());
        }

        config.locale_file = file.locale.file.clone();
        config
    }

    /// Download location of a component, if one is configured.
    pub fn source_url(&self, component: ComponentKind) -> Option<&str> {
        self.sources.get(&component).map(String::as_str)
    }

    /// Default install directory of a component: `<install_dir>/<pretty name>`.
    pub fn component_dir(&self, component: ComponentKind) -> PathBuf {
        self.install_dir.join(component.pretty_name())
    }

    /// Load the configured locale, or English when none is set.
    pub fn load_locale(&self) -> InstallResult<Locale> {
        match &self.locale_file {
            Some(path) => Locale::load(path),
            None => Ok(Locale::english()),
        }
    }

    pub fn with_install_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_dir = path.into();
        self
    }

    pub fn with_temp_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_dir = path.into();
        self
    }

    pub fn with_log_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_dir = path.into();
        self
    }

    /// Set or replace a component's download location.
    pub fn with_source(mut self, component: ComponentKind, url: impl Into<String>) -> Self {
        self.sources.insert(component, url.into());
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_parent_component(mut self, name: impl Into<String>) -> Self {
        self.parent_component = name.into();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LauncherConfig::default();
        assert_eq!(config.source_url(ComponentKind::Remeshes), Some(DEFAULT_REMESH_URL));
        assert_eq!(config.source_url(ComponentKind::Tso), None);
        assert_eq!(config.progress_interval, Duration::from_secs(1));
        assert_eq!(config.settle_delay, Duration::from_secs(5));
        assert_eq!(config.parent_component, "FreeSO");
    }

    #[test]
    fn test_from_config_file_overrides() {
        let file = ConfigFile::parse(
            "[paths]\ninstall_dir = /games\n\
             [pipeline]\nsettle_delay_ms = 0\nprogress_interval_ms = 250\n\
             [remeshes]\nurl = http://mirror/rms.zip\nparent_component = FreeSO Beta\n\
             [components]\nfso_url = http://mirror/fso.zip\n",
        )
        .unwrap();

        let config = LauncherConfig::from_config_file(&file);
        assert_eq!(config.install_dir, PathBuf::from("/games"));
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.progress_interval, Duration::from_millis(250));
        assert_eq!(config.source_url(ComponentKind::Remeshes), Some("http://mirror/rms.zip"));
        assert_eq!(config.source_url(ComponentKind::Fso), Some("http://mirror/fso.zip"));
        assert_eq!(config.parent_component, "FreeSO Beta");
        assert_eq!(
            config.component_dir(ComponentKind::Fso),
            PathBuf::from("/games").join("FreeSO")
        );
    }

    #[test]
    fn test_builder_pattern() {
        let config = LauncherConfig::new("/custom")
            .with_temp_dir("/scratch")
            .with_source(ComponentKind::Tso, "http://a/tso.zip")
            .with_settle_delay(Duration::ZERO)
            .with_platform(Platform::MacOs);

        assert_eq!(config.install_dir, PathBuf::from("/custom"));
        assert_eq!(config.temp_dir, PathBuf::from("/scratch"));
        assert_eq!(config.source_url(ComponentKind::Tso), Some("http://a/tso.zip"));
        assert_eq!(config.platform, Platform::MacOs);
    }

    #[test]
    fn test_locale_defaults_to_english() {
        let locale = LauncherConfig::default().load_locale().unwrap();
        assert_eq!(
            locale.get(crate::locale::MessageKey::Close),
            crate::locale::MessageKey::Close.english()
        );
    }
}
