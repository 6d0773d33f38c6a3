//! Synthesis against the remote TTS service.
//!
//! This module provides:
//! * [`SynthesisClient`] — resolves a profile, calls the service, writes the
//!   audio file and records history.
//! * [`TtsTransport`] — async trait at the HTTP seam; [`HttpTransport`] is
//!   the `reqwest` implementation.
//! * [`classify_response`] / [`AudioResponse`] — pure interpretation of the
//!   two success body shapes.
//! * [`output_file_name`] — deterministic output naming.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use tts_pro::config::ApiSettings;
//! use tts_pro::store::ConfigStore;
//! use tts_pro::synth::{SpeechJob, SynthesisClient};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut store = ConfigStore::load("tts_config.json", "/tmp/tts-output");
//!     let client = SynthesisClient::from_settings(&ApiSettings::default());
//!
//!     let job = SpeechJob::new("你好，世界").with_speed(1.2);
//!     let path = client.synthesize(&mut store, &job).await.unwrap();
//!     println!("{}", path.display());
//! }
//! ```

pub mod client;
pub mod filename;
pub mod request;
pub mod response;
pub mod transport;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::SynthesisClient;
pub use filename::{file_stem, output_file_name, FALLBACK_STEM};
pub use request::{SpeechJob, TtsRequest, DEFAULT_SPEED, SPEED_RANGE};
pub use response::{classify_response, has_audio_signature, remote_error, AudioResponse};
pub use transport::{HttpTransport, RawResponse, TtsTransport};
