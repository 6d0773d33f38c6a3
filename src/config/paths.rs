//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings + configuration document):
//!   Windows: %APPDATA%\tts-pro\
//!   macOS:   ~/Library/Application Support/tts-pro/
//!   Linux:   ~/.config/tts-pro/
//!
//! Default output dir (generated audio):
//!   `<Downloads>/tts-output`, or `./tts-output` when the platform has no
//!   download directory.

use std::path::PathBuf;

use super::settings::StorageSettings;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `tts_config.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to the JSON configuration document.
    pub document_file: PathBuf,
    /// Directory used for the `"default"` output alias on first run.
    pub default_output_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "tts-pro";
    const DOCUMENT_FILE: &'static str = "tts_config.json";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let default_output_dir = dirs::download_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tts-output");

        let settings_file = config_dir.join("settings.toml");
        let document_file = config_dir.join(Self::DOCUMENT_FILE);

        Self {
            config_dir,
            settings_file,
            document_file,
            default_output_dir,
        }
    }

    /// Applies the `[storage]` overrides from `settings.toml`.
    pub fn with_storage(mut self, storage: &StorageSettings) -> Self {
        if let Some(file) = &storage.document_file {
            self.document_file = file.clone();
        }
        if let Some(dir) = &storage.default_output_dir {
            self.default_output_dir = dir.clone();
        }
        self
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
