use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::StorageError;
use crate::traits::{BatchOp, BatchWriter, KvPairs, KvStore};

type Entries = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory store over an ordered map, so prefix scans come straight
/// out of range iteration. The only backend the simulator ships with.
pub struct MemoryStore {
    entries: RwLock<Entries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Entries>, StorageError> {
        self.entries.read().map_err(|e| StorageError::ReadError {
            reason: e.to_string(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Entries>, StorageError> {
        self.entries.write().map_err(|e| StorageError::WriteError {
            reason: e.to_string(),
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.read()?.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.write()?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StorageError> {
        self.write()?.remove(key);
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, StorageError> {
        Ok(self.read()?.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<KvPairs, StorageError> {
        let entries = self.read()?;
        Ok(entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl BatchWriter for MemoryStore {
    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|e| StorageError::BatchError {
            reason: e.to_string(),
        })?;
        for op in ops {
            match op {
                BatchOp::Put { key, value } => {
                    entries.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}
