//! Copy-on-write overlay over a base store.
//!
//! All writes within one transaction group land in the overlay; on success
//! the pending set is flushed to the base as one batch, on rejection the
//! overlay is simply dropped. Reads see pending writes first, then the base.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::StorageError;
use crate::traits::{BatchOp, BatchWriter, KvPairs, KvStore};

/// Pending entry: `Some` for a put, `None` for a delete.
type Pending = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

pub struct Overlay<'a, S: KvStore> {
    base: &'a S,
    pending: RwLock<Pending>,
}

impl<'a, S: KvStore> Overlay<'a, S> {
    pub fn new(base: &'a S) -> Self {
        Overlay {
            base,
            pending: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of staged operations.
    pub fn pending_len(&self) -> usize {
        self.pending.read().map(|p| p.len()).unwrap_or(0)
    }

    /// Convert the staged writes into a batch, consuming the overlay.
    pub fn into_batch(self) -> Vec<BatchOp> {
        let pending = self.pending.into_inner().unwrap_or_default();
        pending
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOp::Put { key, value },
                None => BatchOp::Delete { key },
            })
            .collect()
    }
}

impl<'a, S: BatchWriter> Overlay<'a, S> {
    /// Flush all staged writes to the base store as one atomic batch.
    pub fn commit(self) -> Result<(), StorageError> {
        let base = self.base;
        let batch = self.into_batch();
        if batch.is_empty() {
            return Ok(());
        }
        base.write_batch(batch)
    }
}

impl<'a, S: KvStore> KvStore for Overlay<'a, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let pending = self.pending.read().map_err(|e| StorageError::ReadError {
            reason: e.to_string(),
        })?;
        match pending.get(key) {
            Some(entry) => Ok(entry.clone()),
            None => self.base.get(key),
        }
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let mut pending = self.pending.write().map_err(|e| StorageError::WriteError {
            reason: e.to_string(),
        })?;
        pending.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StorageError> {
        let mut pending = self.pending.write().map_err(|e| StorageError::WriteError {
            reason: e.to_string(),
        })?;
        pending.insert(key.to_vec(), None);
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<KvPairs, StorageError> {
        let pending = self.pending.read().map_err(|e| StorageError::ReadError {
            reason: e.to_string(),
        })?;
        // Start from the base view, then apply staged puts and deletes.
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.base.prefix_scan(prefix)?.into_iter().collect();
        for (key, entry) in pending.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match entry {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}
