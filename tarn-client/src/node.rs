//! The collaborator boundary.
//!
//! Everything the client needs from a node: submit groups, dump state,
//! answer opt-in queries. The in-process ledger implements it directly; a
//! networked implementation would wrap its RPC API behind the same trait.

use tarn_ledger::{Ledger, LedgerError, Transaction};
use tarn_state::primitives::{Address, AssetId};
use tarn_storage::{BatchWriter, KvPairs};

pub trait Node {
    /// The application's escrow (custody) address.
    fn escrow(&self) -> Address;

    /// Submit a transaction group for atomic execution.
    fn submit_group(&self, group: Vec<Transaction>) -> Result<(), LedgerError>;

    /// Full application global state, raw keys and values.
    fn global_state(&self) -> Result<KvPairs, LedgerError>;

    /// One account's application local state, raw keys and values.
    fn local_state(&self, addr: &Address) -> Result<KvPairs, LedgerError>;

    fn is_opted_in_asset(&self, addr: &Address, asset: AssetId) -> Result<bool, LedgerError>;

    fn is_opted_in_app(&self, addr: &Address) -> Result<bool, LedgerError>;
}

impl<S: BatchWriter> Node for Ledger<S> {
    fn escrow(&self) -> Address {
        Ledger::escrow(self)
    }

    fn submit_group(&self, group: Vec<Transaction>) -> Result<(), LedgerError> {
        Ledger::submit_group(self, group)
    }

    fn global_state(&self) -> Result<KvPairs, LedgerError> {
        self.app_global_state()
    }

    fn local_state(&self, addr: &Address) -> Result<KvPairs, LedgerError> {
        self.app_local_state(addr)
    }

    fn is_opted_in_asset(&self, addr: &Address, asset: AssetId) -> Result<bool, LedgerError> {
        Ledger::is_opted_in_asset(self, addr, asset)
    }

    fn is_opted_in_app(&self, addr: &Address) -> Result<bool, LedgerError> {
        Ledger::is_opted_in_app(self, addr)
    }
}
