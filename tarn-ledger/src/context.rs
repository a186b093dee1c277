//! Execution context handed to the application for one call.
//!
//! Wraps the group being executed and the overlay store. Every state
//! mutation goes through here, so a rejection anywhere in the group
//! discards all of it.

use tarn_state::constants::{MAX_GLOBAL_ENTRIES, MAX_SLOTS};
use tarn_state::primitives::{Address, AppId, AssetId, Timestamp};
use tarn_storage::{KvPairs, KvStore};

use crate::book;
use crate::error::{LedgerError, Rejection};
use crate::txn::{OnComplete, Transaction, TxnKind};

pub struct CallContext<'a> {
    store: &'a dyn KvStore,
    group: &'a [Transaction],
    index: usize,
    now: Timestamp,
    app_id: AppId,
    escrow: Address,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(
        store: &'a dyn KvStore,
        group: &'a [Transaction],
        index: usize,
        now: Timestamp,
        app_id: AppId,
        escrow: Address,
    ) -> Self {
        CallContext {
            store,
            group,
            index,
            now,
            app_id,
            escrow,
        }
    }

    // ── Group access ────────────────────────────────────────────────────

    /// The whole group, in submission order.
    pub fn group(&self) -> &[Transaction] {
        self.group
    }

    pub fn group_size(&self) -> usize {
        self.group.len()
    }

    /// Position of this application call within the group.
    pub fn group_index(&self) -> usize {
        self.index
    }

    /// This application call itself.
    pub fn txn(&self) -> &Transaction {
        &self.group[self.index]
    }

    /// Another transaction in the group.
    pub fn gtxn(&self, index: usize) -> Option<&Transaction> {
        self.group.get(index)
    }

    // ── Call environment ────────────────────────────────────────────────

    pub fn sender(&self) -> Address {
        self.txn().sender
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn app_id(&self) -> AppId {
        self.app_id
    }

    /// The application's escrow (custody) address.
    pub fn escrow(&self) -> Address {
        self.escrow
    }

    pub fn on_complete(&self) -> OnComplete {
        match &self.txn().kind {
            TxnKind::AppCall { on_complete, .. } => *on_complete,
            _ => OnComplete::NoOp,
        }
    }

    pub fn args(&self) -> &[Vec<u8>] {
        match &self.txn().kind {
            TxnKind::AppCall { args, .. } => args,
            _ => &[],
        }
    }

    pub fn foreign_assets(&self) -> &[AssetId] {
        match &self.txn().kind {
            TxnKind::AppCall { assets, .. } => assets,
            _ => &[],
        }
    }

    pub fn foreign_accounts(&self) -> &[Address] {
        match &self.txn().kind {
            TxnKind::AppCall { accounts, .. } => accounts,
            _ => &[],
        }
    }

    // ── Global state ────────────────────────────────────────────────────

    pub fn global_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Rejection> {
        Ok(self.store.get(&book::global_key(self.app_id, key))?)
    }

    pub fn global_exists(&self, key: &[u8]) -> Result<bool, Rejection> {
        Ok(self.store.exists(&book::global_key(self.app_id, key))?)
    }

    pub fn global_put(&self, key: &[u8], value: &[u8]) -> Result<(), Rejection> {
        let store_key = book::global_key(self.app_id, key);
        if !self.store.exists(&store_key)? {
            let entries = self.store.prefix_scan(&book::global_prefix(self.app_id))?;
            if entries.len() >= MAX_GLOBAL_ENTRIES {
                return Err(Rejection::custom("global state schema exhausted"));
            }
        }
        self.store.put(&store_key, value)?;
        Ok(())
    }

    pub fn global_delete(&self, key: &[u8]) -> Result<(), Rejection> {
        self.store.delete(&book::global_key(self.app_id, key))?;
        Ok(())
    }

    // ── Local state (sender-scoped) ─────────────────────────────────────

    pub fn local_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Rejection> {
        Ok(self
            .store
            .get(&book::local_key(self.app_id, &self.sender(), key))?)
    }

    pub fn local_exists(&self, key: &[u8]) -> Result<bool, Rejection> {
        Ok(self
            .store
            .exists(&book::local_key(self.app_id, &self.sender(), key))?)
    }

    pub fn local_put(&self, key: &[u8], value: &[u8]) -> Result<(), Rejection> {
        let sender = self.sender();
        if !self
            .store
            .exists(&book::app_optin_key(self.app_id, &sender))?
        {
            return Err(Rejection::custom("sender not opted into application"));
        }
        let store_key = book::local_key(self.app_id, &sender, key);
        if !self.store.exists(&store_key)? {
            let entries = self
                .store
                .prefix_scan(&book::local_prefix(self.app_id, &sender))?;
            if entries.len() >= MAX_SLOTS as usize {
                return Err(Rejection::custom("local state schema exhausted"));
            }
        }
        self.store.put(&store_key, value)?;
        Ok(())
    }

    pub fn local_delete(&self, key: &[u8]) -> Result<(), Rejection> {
        self.store
            .delete(&book::local_key(self.app_id, &self.sender(), key))?;
        Ok(())
    }

    /// All of the sender's local entries, keys stripped of the namespace.
    pub fn local_entries(&self) -> Result<KvPairs, Rejection> {
        let prefix = book::local_prefix(self.app_id, &self.sender());
        let entries = self.store.prefix_scan(&prefix)?;
        Ok(entries
            .into_iter()
            .map(|(k, v)| (k[prefix.len()..].to_vec(), v))
            .collect())
    }

    // ── Asset queries and inner transactions ────────────────────────────

    /// Whether `addr` holds (is opted into) `asset`.
    pub fn is_opted_in_asset(&self, addr: &Address, asset: AssetId) -> Result<bool, Rejection> {
        Ok(book::holding(self.store, addr, asset)
            .map_err(ledger_to_rejection)?
            .is_some())
    }

    /// Total supply of an asset.
    pub fn asset_total(&self, asset: AssetId) -> Result<u64, Rejection> {
        book::asset_total(self.store, asset)
            .map_err(ledger_to_rejection)?
            .ok_or_else(|| Rejection::not_found(format!("asset {asset}")))
    }

    /// Issue an inner asset transfer from the escrow. Zero-fee; the outer
    /// call's doubled fee pays for it.
    pub fn inner_transfer(
        &self,
        asset: AssetId,
        receiver: &Address,
        amount: u64,
    ) -> Result<(), Rejection> {
        book::transfer_asset(self.store, asset, &self.escrow, receiver, amount)
            .map_err(ledger_to_rejection)
    }
}

/// Inner-transaction and query failures inside an approval program become
/// rejections of the call.
fn ledger_to_rejection(err: LedgerError) -> Rejection {
    match err {
        LedgerError::InsufficientBalance { .. } => Rejection::InsufficientFunds,
        LedgerError::Rejected(r) => r,
        other => Rejection::custom(other.to_string()),
    }
}
