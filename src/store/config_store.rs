//! Loading and persisting the configuration document.
//!
//! `load` never fails: a missing file yields a fresh default document, and an
//! unparsable one is copied to `*.json.bak` before the defaults replace it.
//! `save` creates every output directory, then replaces the file through a
//! temporary sibling and a rename so readers never observe a half-written
//! document.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::store::document::ConfigDocument;

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Read the document at `path`, completing missing sections.
///
/// Returns a fresh default document when the file is absent or corrupt.
/// A corrupt file is copied alongside it as `*.json.bak`.
pub fn load_document(path: &Path, default_output_dir: &Path) -> ConfigDocument {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("cannot read {} ({e}); using defaults", path.display());
            }
            return ConfigDocument::new(default_output_dir);
        }
    };

    match ConfigDocument::from_json(&content, default_output_dir) {
        Ok(doc) => doc,
        Err(e) => {
            let backup = path.with_extension("json.bak");
            match fs::copy(path, &backup) {
                Ok(_) => log::warn!(
                    "unparsable {} ({e}); kept a copy at {} and using defaults",
                    path.display(),
                    backup.display()
                ),
                Err(copy_err) => log::warn!(
                    "unparsable {} ({e}); backup failed ({copy_err}); using defaults",
                    path.display()
                ),
            }
            ConfigDocument::new(default_output_dir)
        }
    }
}

/// Persist `doc` to `path`.
pub fn save_document(path: &Path, doc: &ConfigDocument) -> Result<(), ConfigError> {
    for dir in doc.output_paths.values() {
        fs::create_dir_all(dir)?;
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut content = serde_json::to_string_pretty(doc)?;
    content.push('\n');

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ConfigStore
// ---------------------------------------------------------------------------

/// Owns the in-memory document and the location it is persisted to.
///
/// Every mutating operation in the registry and history modules goes through
/// [`ConfigStore::update`], which rewrites the whole document before
/// returning and leaves memory untouched when the write fails.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    default_output_dir: PathBuf,
    document: ConfigDocument,
}

impl ConfigStore {
    /// Load (or initialise) the document stored at `path`.
    pub fn load(path: impl Into<PathBuf>, default_output_dir: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let default_output_dir = default_output_dir.into();
        let document = load_document(&path, &default_output_dir);
        log::debug!(
            "loaded {} ({} profiles, {} output paths, {} history records)",
            path.display(),
            document.voices.len(),
            document.output_paths.len(),
            document.history.len()
        );
        Self {
            path,
            default_output_dir,
            document,
        }
    }

    /// Re-read the document from disk, discarding in-memory state.
    #[cfg(test)]
    pub(crate) fn reload(&mut self) {
        self.document = load_document(&self.path, &self.default_output_dir);
    }

    /// Write the in-memory document to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        save_document(&self.path, &self.document)
    }

    /// Apply `change` to the document, restore the at-rest invariants and
    /// persist the result.
    ///
    /// When `change` or the save fails, the in-memory document is put back
    /// the way it was, so it keeps matching the file on disk.
    pub(crate) fn update<T>(
        &mut self,
        change: impl FnOnce(&mut ConfigDocument) -> Result<T, ConfigError>,
    ) -> Result<T, ConfigError> {
        let snapshot = self.document.clone();
        let result = match change(&mut self.document) {
            Ok(value) => {
                self.document.repair(&self.default_output_dir);
                self.save().map(|()| value)
            }
            Err(e) => Err(e),
        };
        if result.is_err() {
            self.document = snapshot;
        }
        result
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    #[cfg(test)]
    pub(crate) fn document_mut(&mut self) -> &mut ConfigDocument {
        &mut self.document
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the API key and persist.
    pub fn set_api_key(&mut self, key: impl Into<String>) -> Result<(), ConfigError> {
        let key = key.into();
        self.update(|doc| {
            doc.api_key = key;
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::document::{HistoryRecord, VoiceProfile, DEFAULT_NAME};
    use tempfile::tempdir;

    fn sample_document(root: &Path) -> ConfigDocument {
        let mut doc = ConfigDocument::new(root.join("out"));
        doc.api_key = "sk-test".into();
        doc.voices.insert(
            "narrator".into(),
            VoiceProfile {
                voice_id: "ref-42".into(),
                temperature: 0.3,
                normalize: false,
                prosody_volume: -0.5,
                ..VoiceProfile::default()
            },
        );
        doc.output_paths.insert("books".into(), root.join("books"));
        doc.history.push(HistoryRecord {
            text: "你好".into(),
            voice_profile: "narrator".into(),
            backend: "s1".into(),
            timestamp: "2026-01-02T03:04:05+00:00".into(),
            filename: "/x/你好_20260102030405.mp3".into(),
            speed: 1.25,
        });
        doc.last_used.voice = "narrator".into();
        doc.last_used.output = "books".into();
        doc
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let store = ConfigStore::load(dir.path().join("missing.json"), dir.path().join("out"));
        assert_eq!(store.document(), &ConfigDocument::new(dir.path().join("out")));
    }

    #[test]
    fn load_corrupt_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{\"voices\": 12").expect("write");

        let doc = load_document(&path, &dir.path().join("out"));
        assert_eq!(doc, ConfigDocument::new(dir.path().join("out")));
        assert_eq!(
            fs::read_to_string(path.with_extension("json.bak")).expect("backup"),
            "{\"voices\": 12"
        );
    }

    #[test]
    fn load_does_not_create_directories() {
        let dir = tempdir().expect("temp dir");
        let _store = ConfigStore::load(dir.path().join("config.json"), dir.path().join("out"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn round_trip_preserves_document() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        let doc = sample_document(dir.path());

        save_document(&path, &doc).expect("save");
        let loaded = load_document(&path, &dir.path().join("unused"));
        assert_eq!(loaded, doc);
    }

    #[test]
    fn save_is_idempotent() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        let doc = sample_document(dir.path());

        save_document(&path, &doc).expect("first save");
        let first = fs::read(&path).expect("read");
        save_document(&path, &doc).expect("second save");
        let second = fs::read(&path).expect("read");
        assert_eq!(first, second);
    }

    #[test]
    fn save_creates_output_directories_and_parent() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.json");
        let doc = sample_document(dir.path());

        save_document(&path, &doc).expect("save");
        assert!(dir.path().join("out").is_dir());
        assert!(dir.path().join("books").is_dir());
        assert!(path.is_file());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn failed_save_rolls_back_in_memory_document() {
        let dir = tempdir().expect("temp dir");
        let mut store = ConfigStore::load(dir.path().join("config.json"), dir.path().join("out"));
        store.set_api_key("sk-old").expect("set key");

        // A regular file where an output directory should be makes every save fail.
        store
            .update(|doc| {
                doc.output_paths.insert("blocked".into(), dir.path().join("blocked"));
                Ok(())
            })
            .expect("add alias");
        fs::remove_dir(dir.path().join("blocked")).expect("remove dir");
        fs::write(dir.path().join("blocked"), b"not a directory").expect("write");

        let err = store.set_api_key("sk-new").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert_eq!(store.document().api_key, "sk-old");
    }

    #[test]
    fn failed_change_is_not_applied() {
        let dir = tempdir().expect("temp dir");
        let mut store = ConfigStore::load(dir.path().join("config.json"), dir.path().join("out"));
        let before = store.document().clone();

        let err = store
            .update(|doc| {
                doc.api_key = "half-done".into();
                Err::<(), _>(ConfigError::NotFound("x".into()))
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert_eq!(store.document(), &before);
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn set_api_key_persists() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        let mut store = ConfigStore::load(&path, dir.path().join("out"));

        store.set_api_key("sk-new").expect("set key");
        store.reload();
        assert_eq!(store.document().api_key, "sk-new");
        assert_eq!(store.document().active_profile(), DEFAULT_NAME);
    }
}
