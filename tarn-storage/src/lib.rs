//! Storage abstraction for the Tarn ledger simulator.
//!
//! The lifecycle state machine only ever sees an injected [`KvStore`]; the
//! simulator runs each transaction group against an [`Overlay`] of the base
//! store and commits it as a single batch, so a rejected group leaves no
//! trace, the all-or-nothing rule a real ledger provides for free.

pub mod error;
pub mod memory;
pub mod overlay;
pub mod traits;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use overlay::Overlay;
pub use traits::{BatchOp, BatchWriter, KvPairs, KvStore};
