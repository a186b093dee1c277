//! Transaction-group builders, one per call tag.
//!
//! Builders are pure: they take everything they need as arguments and
//! return unsigned transactions ready for submission. The grouped shapes
//! put the funding leg first and the application call second, which is the
//! order the contract checks.

use tarn_ledger::{OnComplete, Transaction};
use tarn_state::constants::{MIN_BALANCE_PER_ASSET, TX_FEE};
use tarn_state::primitives::{Address, Amount, AssetId, PoolId, Timestamp};
use tarn_state::tags::{
    TAG_CLAIM, TAG_CREATE_POOL, TAG_DELETE_POOL, TAG_DEPOSIT, TAG_ESCROW_OPT_IN, TAG_WITHDRAW,
};

fn noop_call(sender: Address, args: Vec<Vec<u8>>, asset: AssetId, fee: Amount) -> Transaction {
    Transaction::app_call(sender, OnComplete::NoOp, args, vec![asset], fee)
}

/// `[payment, call]`: fund the escrow's raised minimum balance and have the
/// application opt its escrow into `asset`.
pub fn escrow_opt_in_group(sender: Address, escrow: Address, asset: AssetId) -> Vec<Transaction> {
    vec![
        Transaction::payment(sender, escrow, MIN_BALANCE_PER_ASSET + TX_FEE, TX_FEE),
        noop_call(sender, vec![TAG_ESCROW_OPT_IN.to_vec()], asset, TX_FEE),
    ]
}

/// `[asset transfer, call]`: move the full reward amount into the escrow
/// and register the pool.
pub fn create_pool_group(
    sender: Address,
    escrow: Address,
    asset: AssetId,
    rewards: u64,
    start_time: Timestamp,
    time_delta: u64,
) -> Vec<Transaction> {
    vec![
        Transaction::asset_transfer(sender, asset, escrow, rewards, TX_FEE),
        noop_call(
            sender,
            vec![
                TAG_CREATE_POOL.to_vec(),
                start_time.to_be_bytes().to_vec(),
                time_delta.to_be_bytes().to_vec(),
            ],
            asset,
            TX_FEE,
        ),
    ]
}

/// `[asset transfer, call]`: stake into a running pool.
pub fn deposit_group(
    sender: Address,
    escrow: Address,
    asset: AssetId,
    pool_id: PoolId,
    amount: u64,
) -> Vec<Transaction> {
    vec![
        Transaction::asset_transfer(sender, asset, escrow, amount, TX_FEE),
        noop_call(
            sender,
            vec![TAG_DEPOSIT.to_vec(), pool_id.to_be_bytes().to_vec()],
            asset,
            TX_FEE,
        ),
    ]
}

/// Standalone claim; the doubled fee pays for the inner payout transfer.
pub fn claim_call(sender: Address, asset: AssetId, pool_id: PoolId) -> Transaction {
    noop_call(
        sender,
        vec![TAG_CLAIM.to_vec(), pool_id.to_be_bytes().to_vec()],
        asset,
        2 * TX_FEE,
    )
}

/// Standalone withdraw from a deleted pool; doubled fee.
pub fn withdraw_call(sender: Address, asset: AssetId, pool_id: PoolId) -> Transaction {
    noop_call(
        sender,
        vec![TAG_WITHDRAW.to_vec(), pool_id.to_be_bytes().to_vec()],
        asset,
        2 * TX_FEE,
    )
}

/// Standalone pool deletion; doubled fee pays for the sweep transfer.
pub fn delete_pool_call(sender: Address, asset: AssetId, pool_id: PoolId) -> Transaction {
    noop_call(
        sender,
        vec![TAG_DELETE_POOL.to_vec(), pool_id.to_be_bytes().to_vec()],
        asset,
        2 * TX_FEE,
    )
}

/// Opt the sender into the application, allocating its deposit slots.
pub fn app_opt_in(sender: Address) -> Transaction {
    Transaction::app_call(sender, OnComplete::OptIn, vec![], vec![], TX_FEE)
}

/// Leave the application; the contract refuses while slots are occupied.
pub fn app_close_out(sender: Address) -> Transaction {
    Transaction::app_call(sender, OnComplete::CloseOut, vec![], vec![], TX_FEE)
}
