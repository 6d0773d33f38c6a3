//! Interpretation of `POST /tts` response bodies.
//!
//! A success body is either a JSON envelope `{"audio": "<base64>"}` or the
//! audio bytes themselves. [`classify_response`] decides which from the
//! bytes alone so the decision can be tested without a network.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;

use crate::error::SynthesisError;

/// Maximum number of body characters quoted in error messages.
const SNIPPET_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// AudioResponse
// ---------------------------------------------------------------------------

/// A success body whose shape has been recognised.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioResponse {
    /// Base64 text taken from the `audio` field of a JSON envelope.
    Encoded(String),
    /// The body is itself the audio file.
    Raw(Vec<u8>),
}

impl AudioResponse {
    /// Audio bytes ready to be written to disk.
    pub fn into_audio(self) -> Result<Vec<u8>, SynthesisError> {
        match self {
            AudioResponse::Encoded(text) => STANDARD
                .decode(text.trim())
                .map_err(|e| SynthesisError::Decode(e.to_string())),
            AudioResponse::Raw(bytes) => Ok(bytes),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Whether `body` starts with a known audio container signature.
pub fn has_audio_signature(body: &[u8]) -> bool {
    body.starts_with(b"RIFF")
        || body.starts_with(b"ID3")
        || body.starts_with(b"OggS")
        || body.starts_with(b"fLaC")
        // MPEG audio frame sync: 11 set bits.
        || matches!(body, [0xFF, b, ..] if b & 0xE0 == 0xE0)
}

/// Decide how a success body carries its audio.
///
/// `format` is the format requested from the server; headerless `pcm` is
/// accepted as raw audio without a signature.
pub fn classify_response(body: &[u8], format: &str) -> Result<AudioResponse, SynthesisError> {
    if let Ok(json) = serde_json::from_slice::<Value>(body) {
        return match json.get("audio").and_then(Value::as_str) {
            Some(audio) => Ok(AudioResponse::Encoded(audio.to_string())),
            None => Err(SynthesisError::UnrecognizedResponse(
                "response contained no audio data".into(),
            )),
        };
    }

    if has_audio_signature(body) || (format == "pcm" && !body.is_empty()) {
        return Ok(AudioResponse::Raw(body.to_vec()));
    }

    Err(SynthesisError::UnrecognizedResponse(snippet(body)))
}

/// Build the error for a non-success status.
///
/// Prefers a message from a JSON body; otherwise quotes the start of the
/// raw body.
pub fn remote_error(status: u16, body: &[u8]) -> SynthesisError {
    let message = match serde_json::from_slice::<Value>(body) {
        Ok(json) => json_error_message(&json),
        Err(_) => snippet(body),
    };
    SynthesisError::Remote { status, message }
}

fn json_error_message(json: &Value) -> String {
    let nested = json.get("error").and_then(|e| match e {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => e.get("message").and_then(Value::as_str).map(str::to_string),
        _ => None,
    });
    nested
        .or_else(|| json.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| json.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| json.to_string())
}

fn snippet(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(SNIPPET_CHARS)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
