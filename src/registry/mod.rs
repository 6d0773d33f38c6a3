//! CRUD over voice profiles and output-path aliases.
//!
//! [`ProfileRegistry`] is a short-lived view over a [`ConfigStore`]. Every
//! mutating call edits the in-memory document and saves it before
//! returning.
//!
//! ```rust,no_run
//! use tts_pro::registry::{ProfileFields, ProfileRegistry};
//! use tts_pro::store::ConfigStore;
//!
//! let mut store = ConfigStore::load("tts_config.json", "/tmp/tts-output");
//! let mut registry = ProfileRegistry::new(&mut store);
//! registry
//!     .create_profile("narrator", ProfileFields::with_voice_id("ref-42"))
//!     .unwrap();
//! registry.set_active_profile("narrator").unwrap();
//! ```

pub mod fields;
pub mod outputs;
pub mod profiles;

pub use fields::ProfileFields;

use crate::store::ConfigStore;

/// Mutable view over the profiles and output aliases of a [`ConfigStore`].
pub struct ProfileRegistry<'a> {
    store: &'a mut ConfigStore,
}

impl<'a> ProfileRegistry<'a> {
    pub fn new(store: &'a mut ConfigStore) -> Self {
        Self { store }
    }
}
