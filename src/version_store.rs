//! Local version history.
//!
//! Named, timestamped scene snapshots persisted under a single key as one
//! JSON array. Every mutation re-reads and re-serializes the entire sequence;
//! there is no partial or append-only format. Two concurrent writers (e.g.
//! two windows over the same storage) race with last-write-wins semantics.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capabilities::AppCapabilities;
use crate::error::StorageError;
use crate::storage::KeyValueStore;
use crate::util::time;

/// Key the serialized version sequence lives under
pub const VERSION_HISTORY_KEY: &str = "sketchboard-edit-history";

/// A named, timestamped snapshot of the full scene. `data` is an opaque
/// serialized scene document; the store never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: String,
    pub name: String,
    pub timestamp: u64,
    pub data: String,
}

impl VersionRecord {
    /// New record with a fresh id, stamped with the current time
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            timestamp: time::timestamp_ms(),
            data: data.into(),
        }
    }
}

/// CRUD and search over the persisted version sequence
#[derive(Debug, Clone)]
pub struct VersionHistoryStore {
    key: &'static str,
}

impl Default for VersionHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionHistoryStore {
    pub fn new() -> Self {
        Self {
            key: VERSION_HISTORY_KEY,
        }
    }

    /// Store reading/writing an alternate key; used by tests
    pub fn with_key(key: &'static str) -> Self {
        Self { key }
    }

    /// Load the full sequence, insertion-ordered. A missing key yields an
    /// empty sequence; a corrupt payload yields an empty sequence and a
    /// warning, never an error.
    pub fn list(&self, store: &dyn KeyValueStore) -> Result<Vec<VersionRecord>, StorageError> {
        let Some(raw) = store.get(self.key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                log::warn!("corrupt version history payload, treating as empty: {}", err);
                Ok(Vec::new())
            }
        }
    }

    /// Append `record`, or replace the stored record with the same id
    pub fn save(
        &self,
        store: &mut dyn KeyValueStore,
        record: VersionRecord,
    ) -> Result<(), StorageError> {
        let mut records = self.list(store)?;
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.persist(store, &records)
    }

    /// Rename the record with the given id; no-op when absent
    pub fn rename(
        &self,
        store: &mut dyn KeyValueStore,
        id: &str,
        new_name: &str,
    ) -> Result<(), StorageError> {
        let mut records = self.list(store)?;
        let Some(record) = records.iter_mut().find(|record| record.id == id) else {
            return Ok(());
        };
        record.name = new_name.to_owned();
        self.persist(store, &records)
    }

    /// Delete the record with the given id. When the host reports that id as
    /// the version currently open in the editor, it is told to reset to a
    /// blank editing state — exactly once, and only after the write
    /// succeeded. Returns whether a record was removed.
    pub fn delete(
        &self,
        store: &mut dyn KeyValueStore,
        id: &str,
        capabilities: &mut dyn AppCapabilities,
    ) -> Result<bool, StorageError> {
        let records = self.list(store)?;
        let before = records.len();
        let remaining: Vec<VersionRecord> = records
            .into_iter()
            .filter(|record| record.id != id)
            .collect();
        if remaining.len() == before {
            return Ok(false);
        }

        let was_current = capabilities.is_currently_editing_version(id);
        self.persist(store, &remaining)?;
        if was_current {
            capabilities.set_current_editing_version_id(None);
            capabilities.on_current_editing_version_deleted();
        }
        Ok(true)
    }

    /// Delete every record, with the same currently-open cascade as `delete`
    /// (fired at most once across the whole sequence)
    pub fn delete_all(
        &self,
        store: &mut dyn KeyValueStore,
        capabilities: &mut dyn AppCapabilities,
    ) -> Result<(), StorageError> {
        let records = self.list(store)?;
        let any_current = records
            .iter()
            .any(|record| capabilities.is_currently_editing_version(&record.id));

        self.persist(store, &[])?;
        if any_current {
            capabilities.set_current_editing_version_id(None);
            capabilities.on_current_editing_version_deleted();
        }
        Ok(())
    }

    /// Case-insensitive substring search on record names. Preserves store
    /// order, never mutates; an empty term returns everything.
    pub fn search(
        &self,
        store: &dyn KeyValueStore,
        term: &str,
    ) -> Result<Vec<VersionRecord>, StorageError> {
        let needle = term.to_lowercase();
        Ok(self
            .list(store)?
            .into_iter()
            .filter(|record| record.name.to_lowercase().contains(&needle))
            .collect())
    }

    fn persist(
        &self,
        store: &mut dyn KeyValueStore,
        records: &[VersionRecord],
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(records)
            .map_err(|err| StorageError::Write(err.to_string()))?;
        store.set(self.key, raw)
    }
}
