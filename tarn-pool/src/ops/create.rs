//! Pool creation.
//!
//! The manager transfers the full reward amount into the escrow and the
//! call registers a pool keyed by the current time. The effective start
//! is the later of the requested start and now, so a pool can never begin
//! in the past.

use tarn_ledger::{ensure, CallContext, Rejection};
use tarn_state::keys::{pool_key, INFO_KEY};
use tarn_state::{info, InfoRecord, PoolRecord};

use crate::ops::guards;
use crate::{arg_u64, math, StakingApp};

pub fn create_pool(app: &StakingApp, ctx: &CallContext<'_>) -> Result<(), Rejection> {
    let (asset, rewards) = guards::grouped_stake_transfer(ctx)?;
    ensure!(ctx.sender() == app.manager(), Rejection::Unauthorized);
    ensure!(
        ctx.is_opted_in_asset(&ctx.escrow(), asset)?,
        Rejection::invalid_input("escrow does not hold the asset")
    );

    let start_arg = arg_u64(ctx.args(), 1)?;
    let time_delta = arg_u64(ctx.args(), 2)?;
    ensure!(
        time_delta != 0,
        Rejection::invalid_input("pool duration must be nonzero")
    );

    // Score arithmetic stays in range for every possible deposit as long
    // as duration times total supply fits in 64 bits.
    let supply = ctx.asset_total(asset)?;
    ensure!(
        time_delta.checked_mul(supply).is_some(),
        Rejection::invalid_input("duration times asset supply exceeds the score range")
    );

    let pool_id = ctx.now();
    let key = pool_key(pool_id);
    ensure!(
        !ctx.global_exists(&key)?,
        Rejection::invalid_input("a pool was already created at this time")
    );

    let start = start_arg.max(ctx.now());
    math::add(start, time_delta)?;

    let record = PoolRecord::create(rewards, start, time_delta, asset);
    ctx.global_put(&key, &record.encode())?;

    let info_bytes = ctx
        .global_get(INFO_KEY)?
        .ok_or_else(|| Rejection::not_found("INFO record"))?;
    let count = InfoRecord::decode(&info_bytes)?.pool_count;
    ctx.global_put(INFO_KEY, &info::splice_pool_count(&info_bytes, math::add(count, 1)?)?)?;

    tracing::debug!(
        pool = pool_id,
        asset,
        rewards,
        start,
        time_delta,
        "pool created"
    );
    Ok(())
}
