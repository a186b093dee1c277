//! State model for Tarn staking pools.
//!
//! The application keeps all of its state in fixed-width byte records inside
//! a primitive key-value store: a singleton `INFO` record, one 64-byte record
//! per pool under an 8-byte big-endian key, and up to four 32-byte deposit
//! slots per account under ASCII digit keys. This crate owns the record
//! types, the codec, and the key derivation; it knows nothing about the
//! ledger or the lifecycle rules.

pub mod codec;
pub mod constants;
pub mod info;
pub mod keys;
pub mod pool;
pub mod primitives;
pub mod slot;
pub mod tags;

pub use codec::CodecError;
pub use info::InfoRecord;
pub use pool::PoolRecord;
pub use slot::SlotRecord;
