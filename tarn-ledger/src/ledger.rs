//! The ledger itself: serial group execution with all-or-nothing commit.

use std::cell::Cell;

use tarn_state::primitives::{addr_to_hex, Address, Amount, AppId, AssetId, Timestamp};
use tarn_storage::{BatchWriter, KvPairs, KvStore, MemoryStore, Overlay};

use crate::app::Application;
use crate::book;
use crate::context::CallContext;
use crate::error::LedgerError;
use crate::txn::{OnComplete, Transaction, TxnKind, MAX_GROUP_SIZE};

/// Derive the application's escrow (custody) address from its id.
pub fn escrow_address(app_id: AppId) -> Address {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"tarn/escrow/");
    hasher.update(&app_id.to_be_bytes());
    *hasher.finalize().as_bytes()
}

/// A single-application ledger. Calls are executed strictly serially; each
/// submitted group either fully commits or leaves no trace.
pub struct Ledger<S: BatchWriter = MemoryStore> {
    store: S,
    app: Box<dyn Application>,
    app_id: AppId,
    escrow: Address,
    now: Cell<Timestamp>,
    next_asset_id: AssetId,
}

impl Ledger<MemoryStore> {
    /// Install `app` on a fresh in-memory ledger. Runs the application's
    /// creation path (which writes its genesis state) as `creator`.
    pub fn in_memory(
        app: Box<dyn Application>,
        app_id: AppId,
        creator: Address,
    ) -> Result<Self, LedgerError> {
        Self::new(MemoryStore::new(), app, app_id, creator)
    }
}

impl<S: BatchWriter> Ledger<S> {
    pub fn new(
        store: S,
        app: Box<dyn Application>,
        app_id: AppId,
        creator: Address,
    ) -> Result<Self, LedgerError> {
        let ledger = Ledger {
            store,
            app,
            app_id,
            escrow: escrow_address(app_id),
            now: Cell::new(0),
            next_asset_id: 1,
        };

        // Application creation runs like a group of one, against an overlay,
        // so a failing on_create leaves the store empty.
        let group = vec![Transaction::app_call(
            creator,
            OnComplete::NoOp,
            Vec::new(),
            Vec::new(),
            0,
        )];
        let overlay = Overlay::new(&ledger.store);
        {
            let ctx = CallContext::new(
                &overlay,
                &group,
                0,
                ledger.now.get(),
                ledger.app_id,
                ledger.escrow,
            );
            ledger.app.on_create(&ctx)?;
        }
        overlay.commit()?;

        Ok(ledger)
    }

    // ── Clock ───────────────────────────────────────────────────────────

    pub fn now(&self) -> Timestamp {
        self.now.get()
    }

    pub fn set_time(&self, now: Timestamp) {
        self.now.set(now);
    }

    pub fn advance_time(&self, seconds: u64) {
        self.now.set(self.now.get().saturating_add(seconds));
    }

    // ── Setup helpers (faucet-level, outside fee accounting) ────────────

    /// Credit microalgos to an account.
    pub fn fund(&self, addr: &Address, amount: Amount) -> Result<(), LedgerError> {
        book::credit_algos(&self.store, addr, amount)
    }

    /// Create a new asset; the creator receives the whole supply.
    pub fn create_asset(
        &mut self,
        creator: &Address,
        total: u64,
    ) -> Result<AssetId, LedgerError> {
        let asset = self.next_asset_id;
        self.next_asset_id += 1;
        book::set_asset_total(&self.store, asset, total)?;
        book::set_holding(&self.store, creator, asset, total)?;
        Ok(asset)
    }

    // ── Submission ──────────────────────────────────────────────────────

    pub fn submit(&self, txn: Transaction) -> Result<(), LedgerError> {
        self.submit_group(vec![txn])
    }

    /// Execute a transaction group atomically. Any failing leg (fee not
    /// payable, transfer rule violated, approval rejection) aborts the
    /// whole group with no state change.
    pub fn submit_group(&self, group: Vec<Transaction>) -> Result<(), LedgerError> {
        if group.is_empty() {
            return Err(LedgerError::EmptyGroup);
        }
        if group.len() > MAX_GROUP_SIZE {
            return Err(LedgerError::GroupTooLarge {
                size: group.len(),
                max: MAX_GROUP_SIZE,
            });
        }

        let overlay = Overlay::new(&self.store);
        for (index, txn) in group.iter().enumerate() {
            if let Err(err) = self.execute(&overlay, &group, index, txn) {
                tracing::debug!(
                    sender = %addr_to_hex(&txn.sender),
                    index,
                    error = %err,
                    "group aborted"
                );
                return Err(err);
            }
        }

        let legs = group.len();
        overlay.commit()?;
        tracing::info!(legs, now = self.now.get(), "group committed");
        Ok(())
    }

    fn execute(
        &self,
        overlay: &Overlay<'_, S>,
        group: &[Transaction],
        index: usize,
        txn: &Transaction,
    ) -> Result<(), LedgerError> {
        book::debit_algos(overlay, &txn.sender, txn.fee)?;

        match &txn.kind {
            TxnKind::Payment {
                receiver, amount, ..
            } => {
                book::debit_algos(overlay, &txn.sender, *amount)?;
                book::credit_algos(overlay, receiver, *amount)
            }
            TxnKind::AssetTransfer {
                asset,
                receiver,
                amount,
                ..
            } => book::transfer_asset(overlay, *asset, &txn.sender, receiver, *amount),
            TxnKind::AppCall { on_complete, .. } => {
                self.execute_app_call(overlay, group, index, &txn.sender, *on_complete)
            }
        }
    }

    fn execute_app_call(
        &self,
        overlay: &Overlay<'_, S>,
        group: &[Transaction],
        index: usize,
        sender: &Address,
        on_complete: OnComplete,
    ) -> Result<(), LedgerError> {
        let ctx = CallContext::new(overlay, group, index, self.now.get(), self.app_id, self.escrow);
        let optin_key = book::app_optin_key(self.app_id, sender);

        match on_complete {
            OnComplete::NoOp
            | OnComplete::UpdateApplication
            | OnComplete::DeleteApplication => {
                self.app.approve(&ctx)?;
                Ok(())
            }
            OnComplete::OptIn => {
                if overlay.exists(&optin_key)? {
                    return Err(LedgerError::AlreadyOptedInApp {
                        address: addr_to_hex(sender),
                    });
                }
                self.app.approve(&ctx)?;
                overlay.put(&optin_key, &[1])?;
                Ok(())
            }
            OnComplete::CloseOut => {
                if !overlay.exists(&optin_key)? {
                    return Err(LedgerError::NotOptedInApp {
                        address: addr_to_hex(sender),
                    });
                }
                self.app.approve(&ctx)?;
                self.wipe_local_state(overlay, sender)
            }
            OnComplete::ClearState => {
                if !overlay.exists(&optin_key)? {
                    return Err(LedgerError::NotOptedInApp {
                        address: addr_to_hex(sender),
                    });
                }
                // The clear program cannot refuse the exit.
                self.app.clear_state(&ctx);
                self.wipe_local_state(overlay, sender)
            }
        }
    }

    fn wipe_local_state(
        &self,
        overlay: &Overlay<'_, S>,
        sender: &Address,
    ) -> Result<(), LedgerError> {
        for (key, _) in overlay.prefix_scan(&book::local_prefix(self.app_id, sender))? {
            overlay.delete(&key)?;
        }
        overlay.delete(&book::app_optin_key(self.app_id, sender))?;
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn app_id(&self) -> AppId {
        self.app_id
    }

    pub fn escrow(&self) -> Address {
        self.escrow
    }

    pub fn algo_balance(&self, addr: &Address) -> Result<Amount, LedgerError> {
        book::algo_balance(&self.store, addr)
    }

    /// Asset balance; `None` means not opted in.
    pub fn asset_balance(
        &self,
        addr: &Address,
        asset: AssetId,
    ) -> Result<Option<u64>, LedgerError> {
        book::holding(&self.store, addr, asset)
    }

    pub fn is_opted_in_asset(&self, addr: &Address, asset: AssetId) -> Result<bool, LedgerError> {
        Ok(book::holding(&self.store, addr, asset)?.is_some())
    }

    pub fn is_opted_in_app(&self, addr: &Address) -> Result<bool, LedgerError> {
        Ok(self.store.exists(&book::app_optin_key(self.app_id, addr))?)
    }

    /// Full global state of the application, keys stripped of the namespace.
    pub fn app_global_state(&self) -> Result<KvPairs, LedgerError> {
        let prefix = book::global_prefix(self.app_id);
        let entries = self.store.prefix_scan(&prefix)?;
        Ok(entries
            .into_iter()
            .map(|(k, v)| (k[prefix.len()..].to_vec(), v))
            .collect())
    }

    /// One account's local state, keys stripped of the namespace.
    pub fn app_local_state(&self, addr: &Address) -> Result<KvPairs, LedgerError> {
        let prefix = book::local_prefix(self.app_id, addr);
        let entries = self.store.prefix_scan(&prefix)?;
        Ok(entries
            .into_iter()
            .map(|(k, v)| (k[prefix.len()..].to_vec(), v))
            .collect())
    }
}
