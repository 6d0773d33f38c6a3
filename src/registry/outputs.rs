//! Output-path alias operations.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::registry::ProfileRegistry;
use crate::store::DEFAULT_NAME;

impl ProfileRegistry<'_> {
    /// Register `path` under `name`, creating the directory if missing.
    pub fn add_output_path(&mut self, name: &str, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        let path = path.into();
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "name",
                reason: "must not be empty",
            });
        }
        if path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "path",
                reason: "must not be empty",
            });
        }
        if self.store.document().output_paths.contains_key(name) {
            return Err(ConfigError::DuplicateName(name.to_string()));
        }

        std::fs::create_dir_all(&path)?;
        let shown = path.display().to_string();
        self.store.update(|doc| {
            doc.output_paths.insert(name.to_string(), path);
            Ok(())
        })?;
        log::info!("added output path '{name}' -> {shown}");
        Ok(())
    }

    /// Remove an alias. Falls back to `"default"` if it was active.
    ///
    /// The directory itself is left on disk.
    pub fn delete_output_path(&mut self, name: &str) -> Result<(), ConfigError> {
        if name == DEFAULT_NAME {
            return Err(ConfigError::ProtectedName(name.to_string()));
        }

        self.store.update(|doc| {
            if !doc.output_paths.contains_key(name) {
                return Err(ConfigError::NotFound(name.to_string()));
            }
            if doc.output_paths.len() <= 1 {
                return Err(ConfigError::LastPathRemaining);
            }
            doc.output_paths.remove(name);
            if doc.last_used.output == name {
                doc.last_used.output = DEFAULT_NAME.into();
            }
            Ok(())
        })?;
        log::info!("deleted output path '{name}'");
        Ok(())
    }

    /// Select the alias used when a synthesis call names none.
    ///
    /// The pointer is persisted immediately.
    pub fn set_active_output(&mut self, name: &str) -> Result<(), ConfigError> {
        self.store.update(|doc| {
            if !doc.output_paths.contains_key(name) {
                return Err(ConfigError::NotFound(name.to_string()));
            }
            doc.last_used.output = name.to_string();
            Ok(())
        })
    }

    pub fn output_path(&self, name: &str) -> Option<&Path> {
        self.store.document().output_paths.get(name).map(PathBuf::as_path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
