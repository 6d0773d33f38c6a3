//! Request payloads: the operator-facing [`SpeechJob`] and the wire-level
//! [`TtsRequest`] sent to `POST {base}/tts`.

use serde::Serialize;

use crate::store::VoiceProfile;

/// Default speaking speed.
pub const DEFAULT_SPEED: f64 = 1.0;

/// Speeds accepted by the interactive layer.
pub const SPEED_RANGE: std::ops::RangeInclusive<f64> = 0.5..=2.0;

// ---------------------------------------------------------------------------
// SpeechJob
// ---------------------------------------------------------------------------

/// One synthesis invocation as requested by the operator.
///
/// `profile` and `output` default to the active selections when `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechJob {
    pub text: String,
    pub profile: Option<String>,
    pub output: Option<String>,
    pub speed: f64,
}

impl SpeechJob {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            profile: None,
            output: None,
            speed: DEFAULT_SPEED,
        }
    }

    pub fn with_profile(mut self, name: impl Into<String>) -> Self {
        self.profile = Some(name.into());
        self
    }

    pub fn with_output(mut self, alias: impl Into<String>) -> Self {
        self.output = Some(alias.into());
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }
}

// ---------------------------------------------------------------------------
// TtsRequest
// ---------------------------------------------------------------------------

/// JSON body of a synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TtsRequest {
    pub text: String,
    pub reference_id: String,
    pub backend: String,
    pub format: String,
    pub temperature: f64,
    pub top_p: f64,
    pub chunk_length: u32,
    pub normalize: bool,
    pub speed: f64,
    pub volume: f64,
}

impl TtsRequest {
    pub fn new(text: &str, profile: &VoiceProfile, speed: f64) -> Self {
        Self {
            text: text.to_string(),
            reference_id: profile.voice_id.clone(),
            backend: profile.backend.clone(),
            format: profile.format.clone(),
            temperature: profile.temperature,
            top_p: profile.top_p,
            chunk_length: profile.chunk_length,
            normalize: profile.normalize,
            speed,
            volume: profile.prosody_volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_maps_profile_fields() {
        let profile = VoiceProfile {
            voice_id: "ref-7".into(),
            backend: "s1".into(),
            format: "wav".into(),
            temperature: 0.2,
            top_p: 0.9,
            chunk_length: 150,
            normalize: false,
            prosody_volume: -0.3,
        };
        let value = serde_json::to_value(TtsRequest::new("hi", &profile, 1.5)).expect("json");

        assert_eq!(
            value,
            serde_json::json!({
                "text": "hi",
                "reference_id": "ref-7",
                "backend": "s1",
                "format": "wav",
                "temperature": 0.2,
                "top_p": 0.9,
                "chunk_length": 150,
                "normalize": false,
                "speed": 1.5,
                "volume": -0.3
            })
        );
    }

    #[test]
    fn job_defaults_to_active_selections() {
        let job = SpeechJob::new("text");
        assert!(job.profile.is_none());
        assert!(job.output.is_none());
        assert_eq!(job.speed, DEFAULT_SPEED);
        assert!(SPEED_RANGE.contains(&job.speed));
    }
}
