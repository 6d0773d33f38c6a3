//! Voice profile operations.

use crate::error::ConfigError;
use crate::registry::{ProfileFields, ProfileRegistry};
use crate::store::{VoiceProfile, DEFAULT_NAME};

impl ProfileRegistry<'_> {
    /// Insert a new profile named `name`.
    pub fn create_profile(&mut self, name: &str, fields: ProfileFields) -> Result<(), ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "name",
                reason: "must not be empty",
            });
        }
        if self.store.document().voices.contains_key(name) {
            return Err(ConfigError::DuplicateName(name.to_string()));
        }

        let profile = fields.into_profile()?;
        self.store.update(|doc| {
            doc.voices.insert(name.to_string(), profile);
            Ok(())
        })?;
        log::info!("created voice profile '{name}'");
        Ok(())
    }

    /// Update the supplied fields of an existing profile.
    pub fn edit_profile(&mut self, name: &str, fields: ProfileFields) -> Result<(), ConfigError> {
        self.store.update(|doc| {
            let profile = doc
                .voices
                .get_mut(name)
                .ok_or_else(|| ConfigError::NotFound(name.to_string()))?;
            fields.apply_to(profile);
            Ok(())
        })?;
        log::info!("updated voice profile '{name}'");
        Ok(())
    }

    /// Remove a profile. Falls back to `"default"` if it was active.
    pub fn delete_profile(&mut self, name: &str) -> Result<(), ConfigError> {
        if name == DEFAULT_NAME {
            return Err(ConfigError::ProtectedName(name.to_string()));
        }

        self.store.update(|doc| {
            if doc.voices.remove(name).is_none() {
                return Err(ConfigError::NotFound(name.to_string()));
            }
            if doc.last_used.voice == name {
                doc.last_used.voice = DEFAULT_NAME.into();
            }
            Ok(())
        })?;
        log::info!("deleted voice profile '{name}'");
        Ok(())
    }

    /// Select the profile used when a synthesis call names none.
    ///
    /// The pointer is persisted immediately.
    pub fn set_active_profile(&mut self, name: &str) -> Result<(), ConfigError> {
        self.store.update(|doc| {
            if !doc.voices.contains_key(name) {
                return Err(ConfigError::NotFound(name.to_string()));
            }
            doc.last_used.voice = name.to_string();
            Ok(())
        })
    }

    pub fn profile(&self, name: &str) -> Option<&VoiceProfile> {
        self.store.document().voices.get(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
