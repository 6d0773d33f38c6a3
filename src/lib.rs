//! Local client for a remote text-to-speech service.
//!
//! * [`config`] — settings (`settings.toml`) and platform paths.
//! * [`store`] — the JSON configuration document and its persistence.
//! * [`registry`] — voice profiles and output-path aliases.
//! * [`history`] — bounded synthesis history.
//! * [`synth`] — requests, response decoding and audio file output.
//! * [`session`] — the operations the interactive layer calls.

pub mod config;
pub mod error;
pub mod history;
pub mod registry;
pub mod session;
pub mod store;
pub mod synth;

pub use error::{ConfigError, SynthesisError};
pub use session::TtsSession;
