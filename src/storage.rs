use std::collections::BTreeMap;

use crate::error::StorageError;

/// The persisted key-value area the version history lives in.
///
/// `eframe::Storage` is the host-provided surface, but its writes are
/// infallible by signature; quota exhaustion is a real failure mode here, so
/// this seam makes reads and writes fallible. `EframeStore` adapts a host
/// storage, `MemoryStore` serves tests and storage-less hosts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Adapter over the storage handle eframe hands the application
pub struct EframeStore<'a> {
    inner: &'a mut dyn eframe::Storage,
}

impl<'a> EframeStore<'a> {
    pub fn new(inner: &'a mut dyn eframe::Storage) -> Self {
        Self { inner }
    }

    /// Ask the backing storage to persist to disk now
    pub fn flush(&mut self) {
        self.inner.flush();
    }
}

impl KeyValueStore for EframeStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.get_string(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.inner.set_string(key, value);
        Ok(())
    }
}

/// In-memory store, used by tests and by hosts running without persistence
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}
