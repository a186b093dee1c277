//! Account exit paths: voluntary close-out and forced clear.

use tarn_ledger::{ensure, CallContext, Rejection};
use tarn_state::keys::pool_key;
use tarn_state::{pool, PoolRecord};

use crate::ops::guards;
use crate::slots;

/// Voluntary close-out. Refused while any deposit slot is occupied, so
/// stake can never be stranded by leaving politely.
pub fn close_out(ctx: &CallContext<'_>) -> Result<(), Rejection> {
    ensure!(
        ctx.group_size() == 1,
        Rejection::invalid_input("close-out must be standalone")
    );
    guards::no_rekey(ctx.txn())?;
    ensure!(
        slots::occupied(ctx)?.is_empty(),
        Rejection::invalid_input("deposit slots still occupied")
    );
    Ok(())
}

/// Forced clear. The host wipes the account's local state no matter what,
/// so this is best effort: back each abandoned slot's contribution out of
/// its pool's totals where the pool still exists. The stake itself stays
/// in the escrow, clearing forfeits it.
pub fn clear(ctx: &CallContext<'_>) {
    if let Err(err) = reconcile(ctx) {
        tracing::warn!(error = %err, "clear-state reconciliation incomplete");
    }
}

fn reconcile(ctx: &CallContext<'_>) -> Result<(), Rejection> {
    for (index, slot) in slots::occupied(ctx)? {
        let key = pool_key(slot.pool_id);
        let Some(bytes) = ctx.global_get(&key)? else {
            continue;
        };
        let record = PoolRecord::decode(&bytes)?;
        // Saturating on purpose: a half-reconciled pool must not block the
        // wipe of the remaining slots.
        let spliced = pool::splice_join(
            &bytes,
            record.user_count.saturating_sub(1),
            record.total_staked.saturating_sub(slot.staked),
            record.total_score.saturating_sub(slot.score),
        )?;
        ctx.global_put(&key, &spliced)?;
        tracing::debug!(pool = slot.pool_id, slot = %index, "abandoned slot backed out");
    }
    Ok(())
}
