//! Persistent configuration document and its store.
//!
//! * [`ConfigDocument`] — profiles, output aliases, history, last-used pointers.
//! * [`ConfigStore`] — owns the document; loads with schema repair, saves
//!   atomically.

pub mod config_store;
pub mod document;

pub use config_store::{load_document, save_document, ConfigStore};
pub use document::{
    ConfigDocument, HistoryRecord, LastUsed, VoiceProfile, BACKEND_OPTIONS, DEFAULT_NAME,
    FORMAT_OPTIONS, HISTORY_LIMIT,
};
