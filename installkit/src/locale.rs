//! Localized message table.
//!
//! Pipelines never format user-facing text themselves; they look strings up
//! in an injected [`Locale`]. English is built in, and a flat JSON file
//! (`{"KEY": "text", ...}`) can override any subset of keys.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{InstallError, InstallResult};

macro_rules! message_keys {
    ($($variant:ident => $key:literal, $english:literal;)+) => {
        /// Key of a localized message.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MessageKey {
            $($variant,)+
        }

        impl MessageKey {
            /// Every known key.
            pub const ALL: &'static [MessageKey] = &[$(MessageKey::$variant,)+];

            /// Key as it appears in locale files.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(MessageKey::$variant => $key,)+
                }
            }

            /// Built-in English text.
            pub fn english(&self) -> &'static str {
                match self {
                    $(MessageKey::$variant => $english,)+
                }
            }
        }
    };
}

message_keys! {
    FailedInstallation => "FSO_FAILED_INSTALLATION", "Installation failed";
    InstallationFinished => "INSTALLATION_FINISHED", "Installation finished";
    NetworkError => "FSO_NETWORK_ERROR", "A network error occurred while downloading. Check your connection and try again.";
    DownloadingFiles => "DL_CLIENT_FILES", "Downloading files:";
    OutOf => "X_OUT_OF_X", "out of";
    ExtractingFiles => "EXTRACTING_CLIENT_FILES", "Extracting files:";
    InstallOpenAl => "INS_OAL", "Installing OpenAL";
    InstallSdl => "INS_SDL", "Installing SDL2";
    InstallWindow => "INS_WINDOW", "An installer window may appear";
    InstallOpenAlWindow => "INS_OAL_WINDOW", "OpenAL is required for in-game audio.";
    InstallSdlWindow => "INS_SDL_WINDOW", "SDL2 is required to run the game on macOS.";
    InstallNet => "INS_NET", "Installing .NET Framework";
    InstallMono => "INS_MONO", "Installing Mono";
    InstallNetWindow => "INS_NET_WINDOW", ".NET Framework is required to run the game.";
    InstallMonoWindow => "INS_MONO_WINDOW", "Mono is required to run the game on macOS.";
    InstallTso => "INS_TSO", "Installing The Sims Online";
    DownloadExtract => "INS_DLEX", "Downloading and extracting";
    InstallInfo => "INS_INFO", "This may take a while depending on your connection.";
    InstallFso => "INS_FSO", "Installing FreeSO";
    Finished => "INS_FINISHED", "Installation complete";
    Play => "INS_PLAY", "You can now play the game";
    PlayClick => "INS_PLAY_CLICK", "Press Play to start.";
    FinishedLong => "INS_FINISHED_LONG", "Everything has been installed. Have fun!";
    ErrorTitle => "INS_ERROR", "Installation error";
    ErrorDescription => "INS_ERROR_DESCR", "The installation could not be completed:";
    Close => "INS_CLOSE", "You can close this window.";
}

/// A flat mapping from message key to display string.
#[derive(Debug, Clone)]
pub struct Locale {
    strings: HashMap<MessageKey, String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl Locale {
    /// The built-in English table.
    pub fn english() -> Self {
        let strings = MessageKey::ALL
            .iter()
            .map(|key| (*key, key.english().to_string()))
            .collect();
        Self { strings }
    }

    /// Build a table from JSON text, falling back to English for missing keys.
    ///
    /// Unknown keys in the JSON are ignored.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: HashMap<String, String> = serde_json::from_str(json)?;
        let mut locale = Self::english();
        for key in MessageKey::ALL {
            if let Some(text) = overrides.get(key.as_str()) {
                locale.strings.insert(*key, text.clone());
            }
        }
        Ok(locale)
    }

    /// Load a JSON locale file.
    pub fn load(path: &Path) -> InstallResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| InstallError::Locale {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&text).map_err(|e| InstallError::Locale {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Look up a message.
    pub fn get(&self, key: MessageKey) -> &str {
        self.strings
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.english())
    }

    /// Override a single message.
    pub fn set(&mut self, key: MessageKey, text: impl Into<String>) {
        self.strings.insert(key, text.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_has_every_key() {
        let locale = Locale::english();
        for key in MessageKey::ALL {
            assert!(!locale.get(*key).is_empty(), "{} is empty", key.as_str());
        }
    }

    #[test]
    fn test_json_overrides_subset() {
        let locale = Locale::from_json_str(
            r#"{"FSO_NETWORK_ERROR": "Erreur réseau", "NOT_A_KEY": "ignored"}"#,
        )
        .unwrap();
        assert_eq!(locale.get(MessageKey::NetworkError), "Erreur réseau");
        assert_eq!(
            locale.get(MessageKey::InstallationFinished),
            MessageKey::InstallationFinished.english()
        );
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(Locale::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Locale::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, InstallError::Locale { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("de.json");
        std::fs::write(&path, r#"{"INS_CLOSE": "Fenster schließen"}"#).unwrap();
        let locale = Locale::load(&path).unwrap();
        assert_eq!(locale.get(MessageKey::Close), "Fenster schließen");
    }
}
