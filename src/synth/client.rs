//! Synthesis pipeline: resolve profile → request → decode → write → record.
//!
//! ```text
//! Resolving ──▶ Requesting ──▶ Decoding ──▶ Writing ──▶ Recorded
//!                    │              │           │
//!                    ├─ RemoteFailed │           │
//!                    └─ NetworkFailed└── Failed ─┘
//! ```
//!
//! Every call is one-shot. A failed call leaves neither an audio file nor a
//! history record behind.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, SecondsFormat};

use crate::config::ApiSettings;
use crate::error::{ConfigError, SynthesisError};
use crate::history::HistoryLog;
use crate::registry::ProfileRegistry;
use crate::store::{ConfigStore, HistoryRecord, VoiceProfile};
use crate::synth::filename::output_file_name;
use crate::synth::request::{SpeechJob, TtsRequest};
use crate::synth::response::{classify_response, remote_error};
use crate::synth::transport::{HttpTransport, TtsTransport};

/// Turns text into a saved audio file and a history entry.
pub struct SynthesisClient {
    transport: Arc<dyn TtsTransport>,
}

impl SynthesisClient {
    pub fn new(transport: Arc<dyn TtsTransport>) -> Self {
        Self { transport }
    }

    /// Client talking to the real service described by `settings`.
    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self::new(Arc::new(HttpTransport::from_settings(settings)))
    }

    /// Run one synthesis and return the path of the written file.
    pub async fn synthesize(
        &self,
        store: &mut ConfigStore,
        job: &SpeechJob,
    ) -> Result<PathBuf, SynthesisError> {
        // Resolving
        let (profile_name, profile) = resolve_profile(store, job.profile.as_deref())?;
        let output_dir = resolve_output_dir(store, job.output.as_deref())?;

        // Requesting
        let request = TtsRequest::new(&job.text, &profile, job.speed);
        log::info!(
            "synthesizing {} chars with profile '{profile_name}' ({}, {})",
            job.text.chars().count(),
            profile.backend,
            profile.format
        );
        let api_key = store.document().api_key.clone();
        let response = self.transport.post_tts(&api_key, &request).await?;
        if !response.is_success() {
            let err = remote_error(response.status, &response.body);
            log::warn!("{err}");
            return Err(err);
        }

        // Decoding
        let audio = classify_response(&response.body, &profile.format)?.into_audio()?;

        // Writing
        let now = Local::now();
        let path = output_dir.join(output_file_name(&job.text, &profile.format, &now));
        std::fs::write(&path, &audio).map_err(SynthesisError::Write)?;

        // Recorded
        let record = HistoryRecord {
            text: job.text.clone(),
            voice_profile: profile_name,
            backend: profile.backend,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, false),
            filename: path.display().to_string(),
            speed: job.speed,
        };
        if let Err(e) = HistoryLog::new(store).record(record) {
            let _ = std::fs::remove_file(&path);
            return Err(e.into());
        }

        log::info!("saved {} bytes to {}", audio.len(), path.display());
        Ok(path)
    }

    /// `true` when `HEAD {base}/voices` answers 200.
    pub async fn test_connection(&self, api_key: &str) -> bool {
        match self.transport.probe(api_key).await {
            Ok(200) => true,
            Ok(status) => {
                log::warn!("API probe returned status {status}");
                false
            }
            Err(e) => {
                log::warn!("API probe failed: {e}");
                false
            }
        }
    }
}

/// Look up the requested (or active) profile.
fn resolve_profile(
    store: &mut ConfigStore,
    requested: Option<&str>,
) -> Result<(String, VoiceProfile), SynthesisError> {
    let name = match requested {
        Some(name) => name.to_string(),
        None => store.document().active_profile().to_string(),
    };
    let registry = ProfileRegistry::new(store);
    match registry.profile(&name) {
        Some(profile) if !profile.voice_id.trim().is_empty() => Ok((name, profile.clone())),
        _ => Err(SynthesisError::ProfileNotFound(name)),
    }
}

/// Directory of the requested (or active) output alias.
fn resolve_output_dir(
    store: &mut ConfigStore,
    requested: Option<&str>,
) -> Result<PathBuf, SynthesisError> {
    let alias = match requested {
        Some(alias) => alias.to_string(),
        None => store.document().active_output().to_string(),
    };
    ProfileRegistry::new(store)
        .output_path(&alias)
        .map(|p| p.to_path_buf())
        .ok_or_else(|| ConfigError::NotFound(alias).into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
