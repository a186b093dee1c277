//! Bookkeeping layout inside the key-value store.
//!
//! Keys are namespaced byte strings; amounts are borsh-encoded u64s. The
//! same helpers run against the base store (queries) and against a group
//! overlay (execution), so every mutation made here is covered by the
//! all-or-nothing commit.

use borsh::BorshDeserialize;

use tarn_state::primitives::{addr_to_hex, Address, Amount, AppId, AssetId};
use tarn_storage::KvStore;

use crate::error::LedgerError;

// ─── Key layout ──────────────────────────────────────────────────────────────

pub fn algo_key(addr: &Address) -> Vec<u8> {
    let mut key = b"acct/".to_vec();
    key.extend_from_slice(addr);
    key.extend_from_slice(b"/algo");
    key
}

pub fn asset_total_key(asset: AssetId) -> Vec<u8> {
    let mut key = b"asset/".to_vec();
    key.extend_from_slice(&asset.to_be_bytes());
    key.extend_from_slice(b"/total");
    key
}

pub fn holding_key(addr: &Address, asset: AssetId) -> Vec<u8> {
    let mut key = b"hold/".to_vec();
    key.extend_from_slice(addr);
    key.push(b'/');
    key.extend_from_slice(&asset.to_be_bytes());
    key
}

pub fn global_prefix(app: AppId) -> Vec<u8> {
    let mut key = b"app/".to_vec();
    key.extend_from_slice(&app.to_be_bytes());
    key.extend_from_slice(b"/global/");
    key
}

pub fn global_key(app: AppId, state_key: &[u8]) -> Vec<u8> {
    let mut key = global_prefix(app);
    key.extend_from_slice(state_key);
    key
}

pub fn local_prefix(app: AppId, addr: &Address) -> Vec<u8> {
    let mut key = b"app/".to_vec();
    key.extend_from_slice(&app.to_be_bytes());
    key.extend_from_slice(b"/local/");
    key.extend_from_slice(addr);
    key.push(b'/');
    key
}

pub fn local_key(app: AppId, addr: &Address, state_key: &[u8]) -> Vec<u8> {
    let mut key = local_prefix(app, addr);
    key.extend_from_slice(state_key);
    key
}

pub fn app_optin_key(app: AppId, addr: &Address) -> Vec<u8> {
    let mut key = b"app/".to_vec();
    key.extend_from_slice(&app.to_be_bytes());
    key.extend_from_slice(b"/optin/");
    key.extend_from_slice(addr);
    key
}

// ─── Amount accessors ────────────────────────────────────────────────────────

fn get_u64<S: KvStore + ?Sized>(store: &S, key: &[u8]) -> Result<Option<u64>, LedgerError> {
    match store.get(key)? {
        Some(bytes) => {
            let value = u64::try_from_slice(&bytes).map_err(|e| {
                LedgerError::Storage(tarn_storage::StorageError::ReadError {
                    reason: format!("corrupt amount at {key:02x?}: {e}"),
                })
            })?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

fn put_u64<S: KvStore + ?Sized>(store: &S, key: &[u8], value: u64) -> Result<(), LedgerError> {
    let bytes = borsh::to_vec(&value).expect("u64 borsh encoding is infallible");
    store.put(key, &bytes)?;
    Ok(())
}

// ─── Algos ───────────────────────────────────────────────────────────────────

pub fn algo_balance<S: KvStore + ?Sized>(
    store: &S,
    addr: &Address,
) -> Result<Amount, LedgerError> {
    Ok(get_u64(store, &algo_key(addr))?.unwrap_or(0))
}

pub fn credit_algos<S: KvStore + ?Sized>(
    store: &S,
    addr: &Address,
    amount: Amount,
) -> Result<(), LedgerError> {
    let balance = algo_balance(store, addr)?;
    put_u64(store, &algo_key(addr), balance.saturating_add(amount))
}

pub fn debit_algos<S: KvStore + ?Sized>(
    store: &S,
    addr: &Address,
    amount: Amount,
) -> Result<(), LedgerError> {
    let balance = algo_balance(store, addr)?;
    let remaining = balance
        .checked_sub(amount)
        .ok_or_else(|| LedgerError::InsufficientBalance {
            address: addr_to_hex(addr),
            available: balance,
            required: amount,
        })?;
    put_u64(store, &algo_key(addr), remaining)
}

// ─── Assets ──────────────────────────────────────────────────────────────────

pub fn asset_total<S: KvStore + ?Sized>(
    store: &S,
    asset: AssetId,
) -> Result<Option<u64>, LedgerError> {
    get_u64(store, &asset_total_key(asset))
}

pub fn set_asset_total<S: KvStore + ?Sized>(
    store: &S,
    asset: AssetId,
    total: u64,
) -> Result<(), LedgerError> {
    put_u64(store, &asset_total_key(asset), total)
}

/// Asset balance of an account; `None` means not opted in.
pub fn holding<S: KvStore + ?Sized>(
    store: &S,
    addr: &Address,
    asset: AssetId,
) -> Result<Option<u64>, LedgerError> {
    get_u64(store, &holding_key(addr, asset))
}

pub fn set_holding<S: KvStore + ?Sized>(
    store: &S,
    addr: &Address,
    asset: AssetId,
    amount: u64,
) -> Result<(), LedgerError> {
    put_u64(store, &holding_key(addr, asset), amount)
}

/// Move `amount` of `asset` between accounts, enforcing the opt-in rule:
/// the receiver must already hold the asset, except that a zero-amount
/// self-transfer creates the holding (this is how an account opts in).
pub fn transfer_asset<S: KvStore + ?Sized>(
    store: &S,
    asset: AssetId,
    from: &Address,
    to: &Address,
    amount: u64,
) -> Result<(), LedgerError> {
    if asset_total(store, asset)?.is_none() {
        return Err(LedgerError::UnknownAsset(asset));
    }

    if from == to && amount == 0 {
        if holding(store, from, asset)?.is_none() {
            set_holding(store, from, asset, 0)?;
        }
        return Ok(());
    }

    let from_balance =
        holding(store, from, asset)?.ok_or_else(|| LedgerError::NotOptedInAsset {
            address: addr_to_hex(from),
            asset,
        })?;
    let to_balance = holding(store, to, asset)?.ok_or_else(|| LedgerError::NotOptedInAsset {
        address: addr_to_hex(to),
        asset,
    })?;

    let from_remaining =
        from_balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientBalance {
                address: addr_to_hex(from),
                available: from_balance,
                required: amount,
            })?;

    set_holding(store, from, asset, from_remaining)?;
    set_holding(store, to, asset, to_balance.saturating_add(amount))
}
