//! The operations exposed to the interactive layer.
//!
//! [`TtsSession`] owns the [`ConfigStore`] and the [`SynthesisClient`] for the
//! lifetime of the process. Mutating calls return a short status line for
//! display; failures are returned as tagged errors and never end the
//! process.

use std::path::{Path, PathBuf};

use crate::config::{ApiSettings, AppPaths};
use crate::error::{ConfigError, SynthesisError};
use crate::history::HistoryLog;
use crate::registry::{ProfileFields, ProfileRegistry};
use crate::store::{ConfigDocument, ConfigStore, HistoryRecord, VoiceProfile};
use crate::synth::{SpeechJob, SynthesisClient};

pub struct TtsSession {
    store: ConfigStore,
    client: SynthesisClient,
}

impl TtsSession {
    /// Load the document (initialising it on first run), persist the
    /// repaired form and make sure every output directory exists.
    ///
    /// Fails only when the document cannot be written.
    pub fn load_or_init(paths: &AppPaths, api: &ApiSettings) -> Result<Self, ConfigError> {
        let store = ConfigStore::load(&paths.document_file, &paths.default_output_dir);
        Self::with_client(store, SynthesisClient::from_settings(api))
    }

    /// Assemble a session from parts; used with test transports.
    pub fn with_client(store: ConfigStore, client: SynthesisClient) -> Result<Self, ConfigError> {
        store.save()?;
        log::info!("configuration at {}", store.path().display());
        Ok(Self { store, client })
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn document(&self) -> &ConfigDocument {
        self.store.document()
    }

    pub fn profiles(&self) -> impl Iterator<Item = (&str, &VoiceProfile)> + '_ {
        self.document()
            .voices
            .iter()
            .map(|(name, profile)| (name.as_str(), profile))
    }

    pub fn output_paths(&self) -> impl Iterator<Item = (&str, &Path)> + '_ {
        self.document()
            .output_paths
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    pub fn active_profile(&self) -> &str {
        self.document().active_profile()
    }

    pub fn active_output(&self) -> &str {
        self.document().active_output()
    }

    pub fn format_options(&self) -> &[String] {
        &self.document().format_options
    }

    pub fn backend_options(&self) -> &[String] {
        &self.document().backend_options
    }

    /// History records, newest first.
    pub fn list_history(&self) -> impl Iterator<Item = &HistoryRecord> + '_ {
        self.document().history.iter()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn set_api_key(&mut self, key: &str) -> Result<String, ConfigError> {
        self.store.set_api_key(key.trim())?;
        Ok("API key saved".into())
    }

    pub fn create_profile(&mut self, name: &str, fields: ProfileFields) -> Result<String, ConfigError> {
        ProfileRegistry::new(&mut self.store).create_profile(name, fields)?;
        Ok(format!("voice profile '{name}' created"))
    }

    pub fn edit_profile(&mut self, name: &str, fields: ProfileFields) -> Result<String, ConfigError> {
        ProfileRegistry::new(&mut self.store).edit_profile(name, fields)?;
        Ok(format!("voice profile '{name}' updated"))
    }

    pub fn delete_profile(&mut self, name: &str) -> Result<String, ConfigError> {
        ProfileRegistry::new(&mut self.store).delete_profile(name)?;
        Ok(format!("voice profile '{name}' deleted"))
    }

    pub fn set_active_profile(&mut self, name: &str) -> Result<String, ConfigError> {
        ProfileRegistry::new(&mut self.store).set_active_profile(name)?;
        Ok(format!("active profile is now '{name}'"))
    }

    pub fn add_output_path(&mut self, name: &str, path: impl Into<PathBuf>) -> Result<String, ConfigError> {
        ProfileRegistry::new(&mut self.store).add_output_path(name, path)?;
        Ok(format!("output path '{name}' added"))
    }

    pub fn delete_output_path(&mut self, name: &str) -> Result<String, ConfigError> {
        ProfileRegistry::new(&mut self.store).delete_output_path(name)?;
        Ok(format!("output path '{name}' deleted"))
    }

    pub fn set_active_output(&mut self, name: &str) -> Result<String, ConfigError> {
        ProfileRegistry::new(&mut self.store).set_active_output(name)?;
        Ok(format!("active output path is now '{name}'"))
    }

    pub fn clear_history(&mut self) -> Result<String, ConfigError> {
        HistoryLog::new(&mut self.store).clear()?;
        Ok("history cleared".into())
    }

    // -----------------------------------------------------------------------
    // Remote
    // -----------------------------------------------------------------------

    /// Synthesize `job` and return the path of the saved audio file.
    pub async fn synthesize(&mut self, job: &SpeechJob) -> Result<PathBuf, SynthesisError> {
        self.client.synthesize(&mut self.store, job).await
    }

    pub async fn test_connection(&self) -> bool {
        self.client
            .test_connection(&self.store.document().api_key)
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
