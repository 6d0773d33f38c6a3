//! Application settings structs, defaults and TOML persistence.
//!
//! These settings describe *how* the client runs (endpoint, timeouts, where
//! files live). The operator's profiles, output aliases and history live in
//! the JSON configuration document managed by [`crate::store::ConfigStore`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ApiSettings
// ---------------------------------------------------------------------------

/// Connection settings for the remote TTS service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL; `/tts` and `/voices` are appended to it.
    pub base_url: String,
    /// Value of the `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Timeout for one synthesis request, in seconds.
    pub request_timeout_secs: u64,
    /// Timeout for the `HEAD /voices` liveness probe, in seconds.
    pub probe_timeout_secs: u64,
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://pkc-proxy.98tt.me/v1".into(),
            user_agent: "FishAudioTTS/2.0".into(),
            request_timeout_secs: 30,
            probe_timeout_secs: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// StorageSettings
// ---------------------------------------------------------------------------

/// Optional overrides for the locations resolved by [`AppPaths`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the JSON configuration document is kept.
    pub document_file: Option<PathBuf>,
    /// Directory assigned to the `"default"` output alias on first run.
    pub default_output_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// AppSettings  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application settings, serialised as `settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub storage: StorageSettings,
}

impl AppSettings {
    /// Load settings from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppSettings::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
    /// Returns `true` when no `settings.toml` exists at `path` yet.
    pub fn is_first_run(path: &Path) -> bool {
        !path.exists()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_values() {
        let settings = AppSettings::default();
        assert_eq!(settings.api.base_url, "https://pkc-proxy.98tt.me/v1");
        assert_eq!(settings.api.user_agent, "FishAudioTTS/2.0");
        assert_eq!(settings.api.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.api.probe_timeout(), Duration::from_secs(5));
        assert!(settings.storage.document_file.is_none());
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let settings = AppSettings::load_from(&path).expect("should not error");
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.toml");

        let mut settings = AppSettings::default();
        settings.api.base_url = "http://localhost:8080/v1".into();
        settings.api.request_timeout_secs = 60;
        settings.storage.document_file = Some(PathBuf::from("/srv/tts/config.json"));

        settings.save_to(&path).expect("save");
        let loaded = AppSettings::load_from(&path).expect("load");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn partial_file_fills_remaining_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://example.test\"\n").expect("write");

        let loaded = AppSettings::load_from(&path).expect("load");
        assert_eq!(loaded.api.base_url, "http://example.test");
        assert_eq!(loaded.api.request_timeout_secs, 30);
        assert_eq!(loaded.storage, StorageSettings::default());
    }

    #[test]
    fn first_run_until_settings_are_written() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        assert!(AppSettings::is_first_run(&path));

        AppSettings::default().save_to(&path).expect("save");
        assert!(!AppSettings::is_first_run(&path));
        let content = std::fs::read_to_string(&path).expect("read");
        assert!(content.contains("[api]"));
        assert!(content.contains("request_timeout_secs = 30"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[api\nbroken").expect("write");

        assert!(AppSettings::load_from(&path).is_err());
    }
}
