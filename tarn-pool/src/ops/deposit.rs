//! Staking into a running pool.
//!
//! The stake earns a score of `amount × weight` where the weight is the
//! pool's full duration before it starts and the remaining seconds once it
//! has. A repeat deposit into the same pool accumulates in the existing
//! slot; a first deposit takes the lowest free slot and bumps the pool's
//! user count.

use tarn_ledger::{ensure, CallContext, Rejection};
use tarn_state::keys::{pool_key, slot_key};
use tarn_state::{pool, PoolRecord, SlotRecord};

use crate::ops::guards;
use crate::{arg_u64, math, slots};

pub fn deposit(ctx: &CallContext<'_>) -> Result<(), Rejection> {
    let (asset, amount) = guards::grouped_stake_transfer(ctx)?;
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
        record.accepts_deposits(ctx.now()),
        Rejection::invalid_input("pool no longer accepts deposits")
    );

    let weight = record
        .deposit_weight(ctx.now())
        .ok_or(Rejection::Overflow)?;
    let score = math::mul(weight, amount)?;

    match slots::find(ctx, pool_id)? {
        Some((index, slot)) => {
            let updated = SlotRecord {
                pool_id,
                staked: math::add(slot.staked, amount)?,
                score: math::add(slot.score, score)?,
                asset_id: asset,
            };
            ctx.local_put(&slot_key(index), &updated.encode())?;
            let spliced = pool::splice_aggregates(
                &bytes,
                math::add(record.total_staked, amount)?,
                math::add(record.total_score, score)?,
            )?;
            ctx.global_put(&key, &spliced)?;
            tracing::debug!(pool = pool_id, slot = %index, amount, score, "deposit accumulated");
        }
        None => {
            let index = slots::first_free(ctx)?
                .ok_or_else(|| Rejection::custom("all deposit slots are occupied"))?;
            let slot = SlotRecord {
                pool_id,
                staked: amount,
                score,
                asset_id: asset,
            };
            ctx.local_put(&slot_key(index), &slot.encode())?;
            let spliced = pool::splice_join(
                &bytes,
                math::add(record.user_count, 1)?,
                math::add(record.total_staked, amount)?,
                math::add(record.total_score, score)?,
            )?;
            ctx.global_put(&key, &spliced)?;
            tracing::debug!(pool = pool_id, slot = %index, amount, score, "deposit opened slot");
        }
    }
    Ok(())
}
