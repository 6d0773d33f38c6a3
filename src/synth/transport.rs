//! HTTP seam between the synthesis client and the remote service.
//!
//! [`TtsTransport`] is object-safe and `Send + Sync` so it can be held behind
//! an `Arc<dyn TtsTransport>`; tests substitute an in-memory double.
//! [`HttpTransport`] is the `reqwest` implementation.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::config::ApiSettings;
use crate::error::SynthesisError;
use crate::synth::request::TtsRequest;

// ---------------------------------------------------------------------------
// RawResponse
// ---------------------------------------------------------------------------

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ---------------------------------------------------------------------------
// TtsTransport trait
// ---------------------------------------------------------------------------

/// One-shot calls to the TTS service. Implementations never retry.
#[async_trait]
pub trait TtsTransport: Send + Sync {
    /// `POST {base}/tts`. Any HTTP status is returned as `Ok`; only timeouts
    /// and connection failures are `Err(SynthesisError::Network)`.
    async fn post_tts(&self, api_key: &str, request: &TtsRequest) -> Result<RawResponse, SynthesisError>;

    /// `HEAD {base}/voices`, returning the status code.
    async fn probe(&self, api_key: &str) -> Result<u16, SynthesisError>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// `reqwest`-backed transport configured from [`ApiSettings`].
pub struct HttpTransport {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl HttpTransport {
    /// Build a transport from settings.
    ///
    /// A default client is used as a last-resort fallback if the builder
    /// fails.
    pub fn from_settings(settings: &ApiSettings) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            settings: settings.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl TtsTransport for HttpTransport {
    async fn post_tts(&self, api_key: &str, request: &TtsRequest) -> Result<RawResponse, SynthesisError> {
        let response = self
            .client
            .post(self.endpoint("tts"))
            .bearer_auth(api_key)
            .header(USER_AGENT, &self.settings.user_agent)
            .timeout(self.settings.request_timeout())
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        log::debug!("POST /tts -> {status} ({} bytes)", body.len());
        Ok(RawResponse { status, body })
    }

    async fn probe(&self, api_key: &str) -> Result<u16, SynthesisError> {
        let response = self
            .client
            .head(self.endpoint("voices"))
            .bearer_auth(api_key)
            .header(USER_AGENT, &self.settings.user_agent)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.settings.probe_timeout())
            .send()
            .await?;
        Ok(response.status().as_u16())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> ApiSettings {
        ApiSettings {
            base_url: base_url.into(),
            probe_timeout_secs: 1,
            request_timeout_secs: 1,
            ..ApiSettings::default()
        }
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let transport = HttpTransport::from_settings(&settings("http://localhost:8080/v1/"));
        assert_eq!(transport.endpoint("tts"), "http://localhost:8080/v1/tts");
        assert_eq!(transport.endpoint("voices"), "http://localhost:8080/v1/voices");
    }

    #[test]
    fn success_range() {
        let ok = RawResponse { status: 200, body: Vec::new() };
        let created = RawResponse { status: 201, body: Vec::new() };
        let bad = RawResponse { status: 400, body: Vec::new() };
        assert!(ok.is_success());
        assert!(created.is_success());
        assert!(!bad.is_success());
    }

    /// `HttpTransport` must be usable as `dyn TtsTransport`.
    #[test]
    fn transport_is_object_safe() {
        let transport: Box<dyn TtsTransport> =
            Box::new(HttpTransport::from_settings(&ApiSettings::default()));
        drop(transport);
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Nothing listens on the discard port.
        let transport = HttpTransport::from_settings(&settings("http://127.0.0.1:9"));
        let err = transport.probe("key").await.unwrap_err();
        assert!(matches!(err, SynthesisError::Network(_)));
    }
}
