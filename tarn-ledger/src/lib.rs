//! Deterministic ledger simulator for the Tarn staking application.
//!
//! The real system runs as a smart contract under a host ledger that
//! serializes calls, meters fees, and commits transaction groups all-or-
//! nothing. This crate reproduces exactly that execution model as ordinary
//! in-process code: account balances, asset holdings and application state
//! live in an injected [`tarn_storage::KvStore`]; each submitted group runs
//! against a copy-on-write overlay that is committed as one batch on success
//! and dropped entirely on the first failure.
//!
//! Only the pieces the staking contract observes are modeled: payments,
//! asset transfers with the opt-in rule, application calls with grouped
//! atomicity, inner transfers from the escrow, and the global/local state
//! schema limits. Cryptographic signing and networking are out of scope;
//! the `sender` field of a transaction is taken as authenticated identity.

pub mod app;
pub mod book;
pub mod context;
pub mod error;
pub mod guard;
pub mod ledger;
pub mod txn;

pub use app::Application;
pub use context::CallContext;
pub use error::{LedgerError, Rejection};
pub use ledger::{escrow_address, Ledger};
pub use txn::{OnComplete, Transaction, TxnKind, MAX_GROUP_SIZE};
