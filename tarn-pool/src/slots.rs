//! Deposit-slot scans over the caller's local state.
//!
//! Slots are keyed `"1"`..`"4"`; lookups are linear scans in key order,
//! matching the bounded on-chain storage they model.

use tarn_ledger::{CallContext, Rejection};
use tarn_state::keys::slot_key;
use tarn_state::primitives::{PoolId, SlotIndex};
use tarn_state::SlotRecord;

/// Read one slot if occupied.
pub fn read(ctx: &CallContext<'_>, index: SlotIndex) -> Result<Option<SlotRecord>, Rejection> {
    match ctx.local_get(&slot_key(index))? {
        Some(bytes) => Ok(Some(SlotRecord::decode(&bytes)?)),
        None => Ok(None),
    }
}

/// Find the caller's slot for `pool_id`, if any.
pub fn find(
    ctx: &CallContext<'_>,
    pool_id: PoolId,
) -> Result<Option<(SlotIndex, SlotRecord)>, Rejection> {
    for index in SlotIndex::all() {
        if let Some(slot) = read(ctx, index)? {
            if slot.pool_id == pool_id {
                return Ok(Some((index, slot)));
            }
        }
    }
    Ok(None)
}

/// First unoccupied slot index, or `None` when the table is full.
pub fn first_free(ctx: &CallContext<'_>) -> Result<Option<SlotIndex>, Rejection> {
    for index in SlotIndex::all() {
        if ctx.local_get(&slot_key(index))?.is_none() {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// All occupied slots, in scan order.
pub fn occupied(ctx: &CallContext<'_>) -> Result<Vec<(SlotIndex, SlotRecord)>, Rejection> {
    let mut out = Vec::new();
    for index in SlotIndex::all() {
        if let Some(slot) = read(ctx, index)? {
            out.push((index, slot));
        }
    }
    Ok(out)
}
