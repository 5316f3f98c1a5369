//! INI-backed configuration file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use super::{config_file_path, ConfigError, DEFAULT_PARENT_COMPONENT};
use crate::component::ComponentKind;

/// `[paths]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSettings {
    pub install_dir: Option<PathBuf>,
    pub temp_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

/// `[pipeline]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub progress_interval_ms: u64,
    pub settle_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            progress_interval_ms: 1000,
            settle_delay_ms: 5000,
            request_timeout_secs: 300,
        }
    }
}

/// `[remeshes]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemeshSettings {
    /// Overrides the built-in download location when set.
    pub url: Option<String>,
    pub parent_component: String,
}

impl Default for RemeshSettings {
    fn default() -> Self {
        Self {
            url: None,
            parent_component: DEFAULT_PARENT_COMPONENT.to_string(),
        }
    }
}

/// `[components]` section: download locations keyed by component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentSources {
    urls: HashMap<ComponentKind, String>,
}

impl ComponentSources {
    pub fn get(&self, component: ComponentKind) -> Option<&str> {
        self.urls.get(&component).map(String::as_str)
    }

    /// Set or clear (with an empty value) a component's location.
    pub fn set(&mut self, component: ComponentKind, url: impl Into<String>) {
        let url = url.into();
        if url.is_empty() {
            self.urls.remove(&component);
        } else {
            self.urls.insert(component, url);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentKind, &str)> {
        self.urls.iter().map(|(c, u)| (*c, u.as_str()))
    }

    /// INI key of a component's location.
    pub(crate) fn key(component: ComponentKind) -> String {
        format!("{}_url", component.slug())
    }
}

/// `[locale]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleSettings {
    pub file: Option<PathBuf>,
}

/// Contents of `config.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub paths: PathSettings,
    pub pipeline: PipelineSettings,
    pub remeshes: RemeshSettings,
    pub components: ComponentSources,
    pub locale: LocaleSettings,
}

/// Trimmed, non-empty value of `section.key`.
fn value<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.section(Some(section))
        .and_then(|s| s.get(key))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

impl ConfigFile {
    /// Load from the default path. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Parse INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // [paths]
        config.paths.install_dir = value(ini, "paths", "install_dir").map(PathBuf::from);
        config.paths.temp_dir = value(ini, "paths", "temp_dir").map(PathBuf::from);
        config.paths.log_dir = value(ini, "paths", "log_dir").map(PathBuf::from);

        // [pipeline]
        if let Some(v) = value(ini, "pipeline", "progress_interval_ms") {
            config.pipeline.progress_interval_ms = parse_u64("pipeline.progress_interval_ms", v)?;
        }
        if let Some(v) = value(ini, "pipeline", "settle_delay_ms") {
            config.pipeline.settle_delay_ms = parse_u64("pipeline.settle_delay_ms", v)?;
        }
        if let Some(v) = value(ini, "pipeline", "request_timeout_secs") {
            config.pipeline.request_timeout_secs = parse_u64("pipeline.request_timeout_secs", v)?;
        }

        // [remeshes]
        config.remeshes.url = value(ini, "remeshes", "url").map(String::from);
        if let Some(v) = value(ini, "remeshes", "parent_component") {
            config.remeshes.parent_component = v.to_string();
        }

        // [components]
        for component in ComponentKind::ALL {
            if component == ComponentKind::Remeshes {
                continue;
            }
            if let Some(url) = value(ini, "components", ComponentSources::key(component).as_str()) {
                config.components.set(component, url);
            }
        }

        // [locale]
        config.locale.file = value(ini, "locale", "file").map(PathBuf::from);

        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let path_str = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        let mut ini = Ini::new();
        ini.with_section(Some("paths"))
            .set("install_dir", path_str(&self.paths.install_dir))
            .set("temp_dir", path_str(&self.paths.temp_dir))
            .set("log_dir", path_str(&self.paths.log_dir));
        ini.with_section(Some("pipeline"))
            .set(
                "progress_interval_ms",
                self.pipeline.progress_interval_ms.to_string(),
            )
            .set("settle_delay_ms", self.pipeline.settle_delay_ms.to_string())
            .set(
                "request_timeout_secs",
                self.pipeline.request_timeout_secs.to_string(),
            );
        ini.with_section(Some("remeshes"))
            .set("url", self.remeshes.url.clone().unwrap_or_default())
            .set("parent_component", self.remeshes.parent_component.clone());
        for component in ComponentKind::ALL {
            if component == ComponentKind::Remeshes {
                continue;
            }
            ini.with_section(Some("components")).set(
                ComponentSources::key(component),
                self.components.get(component).unwrap_or_default(),
            );
        }
        ini.with_section(Some("locale"))
            .set("file", path_str(&self.locale.file));
        ini
    }

    /// Save to the default path, creating its directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating its parent directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.pipeline.progress_interval_ms, 1000);
        assert_eq!(config.pipeline.settle_delay_ms, 5000);
        assert_eq!(config.pipeline.request_timeout_secs, 300);
        assert_eq!(config.remeshes.parent_component, "FreeSO");
        assert!(config.remeshes.url.is_none());
    }

    #[test]
    fn test_parse_sections() {
        let config = ConfigFile::parse(
            "[paths]\ninstall_dir = /games\n\n\
             [pipeline]\nsettle_delay_ms = 0\n\n\
             [remeshes]\nurl = http://mirror/remeshes.zip\n\n\
             [components]\ntso_url = http://mirror/tso.zip\nfso_url =\n",
        )
        .unwrap();

        assert_eq!(config.paths.install_dir, Some(PathBuf::from("/games")));
        assert_eq!(config.pipeline.settle_delay_ms, 0);
        assert_eq!(config.pipeline.progress_interval_ms, 1000);
        assert_eq!(config.remeshes.url.as_deref(), Some("http://mirror/remeshes.zip"));
        assert_eq!(config.components.get(ComponentKind::Tso), Some("http://mirror/tso.zip"));
        assert_eq!(config.components.get(ComponentKind::Fso), None);
    }

    #[test]
    fn test_invalid_number() {
        let err = ConfigFile::parse("[pipeline]\nprogress_interval_ms = soon\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("config.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.paths.install_dir = Some(PathBuf::from("/opt/Tést Földér"));
        config.pipeline.request_timeout_secs = 60;
        config.components.set(ComponentKind::OpenAl, "http://mirror/oal.zip");
        config.save_to(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }
}
