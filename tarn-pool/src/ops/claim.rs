//! Claiming principal plus reward after a pool ends.

use tarn_ledger::{ensure, CallContext, Rejection};
use tarn_state::keys::{pool_key, slot_key};
use tarn_state::{pool, PoolRecord};

use crate::ops::guards;
use crate::{arg_u64, math, reward, slots};

pub fn claim(ctx: &CallContext<'_>) -> Result<(), Rejection> {
    let asset = guards::standalone_double_fee(ctx)?;
    let pool_id = arg_u64(ctx.args(), 1)?;
    let key = pool_key(pool_id);
    let bytes = ctx
        .global_get(&key)?
        .ok_or_else(|| Rejection::not_found(format!("pool {pool_id}")))?;
    let record = PoolRecord::decode(&bytes)?;
    let (index, slot) = slots::find(ctx, pool_id)?
        .ok_or_else(|| Rejection::not_found(format!("deposit slot for pool {pool_id}")))?;
    ensure!(
        asset == record.asset_id,
        Rejection::invalid_input("asset does not match the pool")
    );
    ensure!(
        record.has_ended(ctx.now()),
        Rejection::invalid_input("pool has not ended")
    );

    let earned = reward::claimable(&record, &slot)?;
    let payout = math::add(slot.staked, earned)?;
    ctx.inner_transfer(asset, &ctx.sender(), payout)?;
    ctx.local_delete(&slot_key(index))?;

    let spliced = pool::splice_claim(
        &bytes,
        math::sub(record.user_count, 1)?,
        math::sub(record.to_be_claimed, earned)?,
    )?;
    ctx.global_put(&key, &spliced)?;

    tracing::debug!(pool = pool_id, slot = %index, payout, reward = earned, "claim paid");
    Ok(())
}
