//! Pool deletion and sweep of unclaimed rewards.
//!
//! Allowed once the pool has ended and either every slot has been claimed
//! or the claim window has elapsed. The unclaimed remainder goes back to
//! the manager; stragglers keep their principal via withdraw.

use tarn_ledger::{ensure, CallContext, Rejection};
use tarn_state::keys::{pool_key, INFO_KEY};
use tarn_state::{info, InfoRecord, PoolRecord};

use crate::ops::guards;
use crate::{arg_u64, math, StakingApp};

pub fn delete_pool(app: &StakingApp, ctx: &CallContext<'_>) -> Result<(), Rejection> {
    let asset = guards::standalone_double_fee(ctx)?;
    ensure!(ctx.sender() == app.manager(), Rejection::Unauthorized);
    let pool_id = arg_u64(ctx.args(), 1)?;
    let key = pool_key(pool_id);
    let bytes = ctx
        .global_get(&key)?
        .ok_or_else(|| Rejection::not_found(format!("pool {pool_id}")))?;
    let record = PoolRecord::decode(&bytes)?;
    ensure!(
        asset == record.asset_id,
        Rejection::invalid_input("asset does not match the pool")
    );
    ensure!(
        record.has_ended(ctx.now()),
        Rejection::invalid_input("pool has not ended")
    );
    if record.user_count != 0 {
        let end = record.end_time().ok_or(Rejection::Overflow)?;
        ensure!(
            ctx.now() > math::add(end, app.claim_window())?,
            Rejection::invalid_input("claim window still open")
        );
    }

    if record.to_be_claimed != 0 {
        ctx.inner_transfer(asset, &ctx.sender(), record.to_be_claimed)?;
    }
    ctx.global_delete(&key)?;

    let info_bytes = ctx
        .global_get(INFO_KEY)?
        .ok_or_else(|| Rejection::not_found("INFO record"))?;
    let count = InfoRecord::decode(&info_bytes)?.pool_count;
    ctx.global_put(INFO_KEY, &info::splice_pool_count(&info_bytes, math::sub(count, 1)?)?)?;

    tracing::debug!(pool = pool_id, swept = record.to_be_claimed, "pool deleted");
    Ok(())
}
