//! Bounded, most-recent-first log of synthesis results.

use crate::error::ConfigError;
use crate::store::{ConfigStore, HistoryRecord, HISTORY_LIMIT};

/// Mutable view over the history section of a [`ConfigStore`].
pub struct HistoryLog<'a> {
    store: &'a mut ConfigStore,
}

impl<'a> HistoryLog<'a> {
    pub fn new(store: &'a mut ConfigStore) -> Self {
        Self { store }
    }

    /// Prepend `entry`, keep the newest [`HISTORY_LIMIT`] records, persist.
    ///
    /// If the document cannot be written the entry is not kept.
    pub fn record(&mut self, entry: HistoryRecord) -> Result<(), ConfigError> {
        self.store.update(|doc| {
            doc.history.insert(0, entry);
            doc.history.truncate(HISTORY_LIMIT);
            Ok(())
        })
    }

    /// Remove every record and persist.
    pub fn clear(&mut self) -> Result<(), ConfigError> {
        self.store.update(|doc| {
            doc.history.clear();
            Ok(())
        })?;
        log::info!("history cleared");
        Ok(())
    }

    /// Records newest first, read from memory.
    pub fn list(&self) -> impl Iterator<Item = &HistoryRecord> + '_ {
        self.store.document().history.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
