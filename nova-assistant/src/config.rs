/// Assistant configuration
///
/// Every table the resolver consumes (wake phrases, registries, aliases,
/// confusions) lives here. Defaults match a stock Linux desktop; a JSON
/// file can override any field.

use intent_resolver::{AliasTable, Registry};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NovaConfig {
    /// Phrases that wake the assistant, including known mis-hearings.
    pub wake_phrases: Vec<String>,

    /// Start in the awake state instead of waiting for a wake phrase.
    pub start_awake: bool,

    /// Never return to sleep after a command.
    pub stay_awake: bool,

    /// Window length for windowed speech engines, in seconds.
    pub window_secs: f32,

    /// Application registry: spoken key to launch command.
    pub apps: Registry,

    /// Website registry: spoken key to URL.
    pub sites: Registry,

    /// Spoken aliases resolving to app registry keys.
    pub app_aliases: AliasTable,

    /// Spoken aliases resolving to site registry keys.
    pub site_aliases: AliasTable,

    /// Phonetic confusion corrections applied before routing.
    pub confusions: HashMap<String, String>,

    /// Where screenshots land; defaults to the Pictures directory.
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for NovaConfig {
    fn default() -> Self {
        Self {
            wake_phrases: ["hey nova", "hello nova", "hey noah", "hey novaa"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            start_awake: false,
            stay_awake: false,
            window_secs: 1.5,
            apps: Registry::from_entries([
                ("chrome", "google-chrome"),
                ("edge", "microsoft-edge"),
                ("brave", "brave-browser"),
                ("vscode", "code"),
                ("notepad", "gedit"),
                ("spotify", "spotify"),
                ("calculator", "gnome-calculator"),
            ]),
            sites: Registry::from_entries([
                ("google", "https://www.google.com"),
                ("youtube", "https://www.youtube.com"),
                ("gmail", "https://mail.google.com"),
                ("google drive", "https://drive.google.com"),
                ("chatgpt", "https://chat.openai.com"),
                ("github", "https://github.com"),
                ("stackoverflow", "https://stackoverflow.com"),
            ]),
            app_aliases: AliasTable::from_entries([
                ("google", "chrome"),
                ("visual studio code", "vscode"),
                ("code", "vscode"),
            ]),
            site_aliases: AliasTable::from_entries([
                ("yt", "youtube"),
                ("you tube", "youtube"),
                ("g mail", "gmail"),
                ("mail", "gmail"),
                ("drive", "google drive"),
            ]),
            confusions: [
                ("grown", "chrome"),
                ("goal", "chrome"),
                ("rome", "chrome"),
                ("googly", "google"),
                ("googling", "google"),
                ("blows", "close"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            screenshot_dir: None,
        }
    }
}

impl NovaConfig {
    /// Load from a JSON file; absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wake_phrases.is_empty() && !self.stay_awake {
            return Err(ConfigError::Invalid(
                "no wake phrases configured and stay_awake is off; the assistant could never wake"
                    .to_string(),
            ));
        }
        if !(self.window_secs > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "window_secs must be positive, got {}",
                self.window_secs
            )));
        }
        self.apps
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("apps: {e}")))?;
        self.sites
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("sites: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = NovaConfig::default();
        config.validate().unwrap();
        assert_eq!(config.wake_phrases[0], "hey nova");
        assert_eq!(config.apps.get("chrome"), Some("google-chrome"));
        assert_eq!(config.sites.get("youtube"), Some("https://www.youtube.com"));
        assert_eq!(config.confusions.get("grown").map(String::as_str), Some("chrome"));
    }

    #[test]
    fn test_load_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"stay_awake": true,
                 "apps": [{{"key": "firefox", "target": "firefox"}}],
                 "app_aliases": {{"ff": "firefox"}}}}"#
        )
        .unwrap();

        let config = NovaConfig::load(file.path()).unwrap();
        assert!(config.stay_awake);
        assert_eq!(config.apps.get("firefox"), Some("firefox"));
        assert_eq!(config.app_aliases.canonical("ff"), "firefox");
        // Untouched fields keep their defaults.
        assert_eq!(config.wake_phrases.len(), 4);
        assert_eq!(config.site_aliases.canonical("yt"), "youtube");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"wake_phrase_typo": []}}"#).unwrap();
        assert!(matches!(
            NovaConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_window_rejected() {
        let config = NovaConfig {
            window_secs: 0.0,
            ..NovaConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_no_wake_path_rejected() {
        let config = NovaConfig {
            wake_phrases: Vec::new(),
            ..NovaConfig::default()
        };
        assert!(config.validate().is_err());

        let pinned = NovaConfig {
            wake_phrases: Vec::new(),
            stay_awake: true,
            start_awake: true,
            ..NovaConfig::default()
        };
        pinned.validate().unwrap();
    }
}
