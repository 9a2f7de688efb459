//! Runtime settings: defaults, then `vc_scout.toml`, then `VC_SCOUT__*`
//! environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_FAVORITES_FILE: &str = "saved_startups.json";

const DEFAULT_SUGGESTIONS: [&str; 5] = ["Sequoia Capital", "SoftBank", "a16z", "Kaszek", "Monashees"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root URL of the search backend.
    pub base_url: String,
    /// Deep searches can take minutes.
    pub request_timeout_secs: u64,
    /// Quiet period before filter edits are applied.
    pub filter_debounce_ms: u64,
    pub favorites_path: Option<PathBuf>,
    /// VC names offered as one-click chips under the search box.
    pub suggestions: Vec<String>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    pub fn favorites_file(&self) -> PathBuf {
        self.favorites_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FAVORITES_FILE))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 120,
            filter_debounce_ms: 300,
            favorites_path: None,
            suggestions: DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Load settings from `vc_scout.toml` in the working directory (optional)
/// and the environment.
pub fn load_settings() -> Result<Settings> {
    load_settings_from("vc_scout")
}

/// Same as [`load_settings`] with an explicit config file stem.
pub fn load_settings_from(file_stem: &str) -> Result<Settings> {
    let defaults = Settings::default();
    let settings = Config::builder()
        .set_default("base_url", defaults.base_url)?
        .set_default("request_timeout_secs", defaults.request_timeout_secs)?
        .set_default("filter_debounce_ms", defaults.filter_debounce_ms)?
        .set_default("suggestions", defaults.suggestions)?
        .add_source(File::with_name(file_stem).required(false))
        .add_source(
            Environment::with_prefix("VC_SCOUT")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("suggestions")
                .try_parsing(true),
        )
        .build()
        .context("reading configuration")?;

    settings
        .try_deserialize()
        .context("invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("absent");
        let settings = load_settings_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(settings.filter_debounce(), Duration::from_millis(300));
        assert_eq!(settings.suggestions.len(), 5);
        assert_eq!(settings.favorites_file(), PathBuf::from(DEFAULT_FAVORITES_FILE));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "request_timeout_secs = 30\nfavorites_path = \"/tmp/favs.json\"\nsuggestions = [\"Kaszek\"]\n",
        )
        .unwrap();
        let stem = dir.path().join("custom");
        let settings = load_settings_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.favorites_file(), PathBuf::from("/tmp/favs.json"));
        assert_eq!(settings.suggestions, ["Kaszek"]);
    }
}
