use crate::error::StorageError;

/// Scan result: key-value byte pairs in ascending key order.
pub type KvPairs = Vec<(Vec<u8>, Vec<u8>)>;

/// One operation of an atomic batch.
#[derive(Debug, Clone)]
pub enum BatchOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// What the ledger needs from a backing store. All bookkeeping (balances,
/// holdings, application state) lives behind this trait; implementations
/// must keep keys ordered so that `prefix_scan` can enumerate one
/// namespace (an application's global state, one account's local state)
/// without touching its neighbors.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Remove a key. Deleting an absent key is not an error.
    fn delete(&self, key: &[u8]) -> Result<(), StorageError>;

    fn exists(&self, key: &[u8]) -> Result<bool, StorageError>;

    /// All entries whose key starts with `prefix`, in key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<KvPairs, StorageError>;
}

/// A store that can apply a whole batch atomically. The ledger commits
/// each transaction group through this, never through individual puts.
pub trait BatchWriter: KvStore {
    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), StorageError>;
}
