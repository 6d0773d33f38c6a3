//! Application settings for the TTS client.
//!
//! Provides `AppSettings` (endpoint and timeouts, stored as TOML) and
//! `AppPaths` for cross-platform data directories. The operator's voice
//! profiles and history are kept separately in the JSON document owned by
//! [`crate::store::ConfigStore`].

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{ApiSettings, AppSettings, StorageSettings};
