//! Per-field optional values for creating and editing voice profiles.

use crate::error::ConfigError;
use crate::store::VoiceProfile;

/// Caller-supplied profile fields. `None` means "not supplied".
///
/// On create, unsupplied fields take the [`VoiceProfile`] defaults. On edit,
/// unsupplied fields are left untouched, and so are supplied values equal to
/// the type's zero value (`0.0`, `0`, `""`). `normalize` is the exception:
/// `Some(false)` is a real edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub voice_id: Option<String>,
    pub backend: Option<String>,
    pub format: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub chunk_length: Option<u32>,
    pub normalize: Option<bool>,
    pub prosody_volume: Option<f64>,
}

/// Drops zero values so they leave the stored field unchanged.
fn non_zero<T: Default + PartialEq>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v != T::default())
}

impl ProfileFields {
    pub fn with_voice_id(voice_id: impl Into<String>) -> Self {
        Self {
            voice_id: Some(voice_id.into()),
            ..Self::default()
        }
    }

    /// Build a complete profile, filling gaps with defaults.
    pub fn into_profile(self) -> Result<VoiceProfile, ConfigError> {
        if self.voice_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "voice_id",
                reason: "must not be empty",
            });
        }
        if self.chunk_length == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "chunk_length",
                reason: "must be positive",
            });
        }

        let defaults = VoiceProfile::default();
        Ok(VoiceProfile {
            voice_id: self.voice_id.unwrap_or(defaults.voice_id),
            backend: self.backend.unwrap_or(defaults.backend),
            format: self.format.unwrap_or(defaults.format),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            top_p: self.top_p.unwrap_or(defaults.top_p),
            chunk_length: self.chunk_length.unwrap_or(defaults.chunk_length),
            normalize: self.normalize.unwrap_or(defaults.normalize),
            prosody_volume: self.prosody_volume.unwrap_or(defaults.prosody_volume),
        })
    }

    /// Overwrite the supplied, non-zero fields of `profile`.
    pub fn apply_to(self, profile: &mut VoiceProfile) {
        if let Some(v) = non_zero(self.voice_id) {
            profile.voice_id = v;
        }
        if let Some(v) = non_zero(self.backend) {
            profile.backend = v;
        }
        if let Some(v) = non_zero(self.format) {
            profile.format = v;
        }
        if let Some(v) = non_zero(self.temperature) {
            profile.temperature = v;
        }
        if let Some(v) = non_zero(self.top_p) {
            profile.top_p = v;
        }
        if let Some(v) = non_zero(self.chunk_length) {
            profile.chunk_length = v;
        }
        if let Some(v) = self.normalize {
            profile.normalize = v;
        }
        if let Some(v) = non_zero(self.prosody_volume) {
            profile.prosody_volume = v;
        }
    }
}
