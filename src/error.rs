//! Error types for the configuration and synthesis layers.
//!
//! Both enums are closed sets so callers can match on recoverability rather
//! than on message text. Neither is ever fatal to the running process.

use thiserror::Error;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors raised by profile, output-path and history operations.
///
/// All variants except `Io` and `Serialize` are locally recoverable: the
/// caller re-prompts the operator.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A profile or output alias with this name already exists.
    #[error("'{0}' already exists")]
    DuplicateName(String),

    /// No profile or output alias with this name exists.
    #[error("'{0}' does not exist")]
    NotFound(String),

    /// The `"default"` profile and output alias cannot be removed.
    #[error("'{0}' is protected and cannot be deleted")]
    ProtectedName(String),

    /// At least one output alias must remain.
    #[error("at least one output path must remain")]
    LastPathRemaining,

    /// A supplied value is not acceptable for the given field.
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },

    /// Filesystem error while persisting the document or creating a directory.
    #[error("failed to persist configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be serialised.
    #[error("failed to serialise configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// SynthesisError
// ---------------------------------------------------------------------------

/// Errors raised by [`crate::synth::SynthesisClient::synthesize`].
///
/// A synthesis call that returns any of these has written no audio file and
/// recorded no history entry.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The requested (or active) profile is missing or has no `voice_id`.
    #[error("voice profile '{0}' not found")]
    ProfileNotFound(String),

    /// Timeout or connection failure; the request was not retried.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("request failed (status {status}): {message}")]
    Remote { status: u16, message: String },

    /// Success status, but the body is neither a JSON audio envelope nor a
    /// recognised audio container.
    #[error("unrecognized response: {0}")]
    UnrecognizedResponse(String),

    /// The JSON envelope carried an `audio` field that is not valid base64.
    #[error("failed to decode audio payload: {0}")]
    Decode(String),

    /// The audio file could not be written to the output directory.
    #[error("failed to write audio file: {0}")]
    Write(std::io::Error),

    /// Output alias lookup or history persistence failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<reqwest::Error> for SynthesisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SynthesisError::Network("request timed out".into())
        } else {
            SynthesisError::Network(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_message_includes_status() {
        let err = SynthesisError::Remote {
            status: 400,
            message: "bad voice_id".into(),
        };
        assert_eq!(err.to_string(), "request failed (status 400): bad voice_id");
    }

    #[test]
    fn config_error_is_transparent_inside_synthesis_error() {
        let err: SynthesisError = ConfigError::NotFound("studio".into()).into();
        assert_eq!(err.to_string(), "'studio' does not exist");
    }
}
