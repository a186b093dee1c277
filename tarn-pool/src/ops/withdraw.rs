//! Principal recovery from a deleted pool.
//!
//! Once the manager has deleted a pool its record is gone, so any reward
//! share is unrecoverable; the depositor gets exactly the staked amount
//! back. Refused while the pool still exists, claiming is strictly better
//! then.

use tarn_ledger::{ensure, CallContext, Rejection};
use tarn_state::keys::{pool_key, slot_key};

use crate::ops::guards;
use crate::{arg_u64, slots};

pub fn withdraw(ctx: &CallContext<'_>) -> Result<(), Rejection> {
    let asset = guards::standalone_double_fee(ctx)?;
    let pool_id = arg_u64(ctx.args(), 1)?;
    ensure!(
        !ctx.global_exists(&pool_key(pool_id))?,
        Rejection::invalid_input("pool still exists, claim instead")
    );
    let (index, slot) = slots::find(ctx, pool_id)?
        .ok_or_else(|| Rejection::not_found(format!("deposit slot for pool {pool_id}")))?;
    ensure!(
        asset == slot.asset_id,
        Rejection::invalid_input("asset does not match the deposit")
    );

    ctx.inner_transfer(asset, &ctx.sender(), slot.staked)?;
    ctx.local_delete(&slot_key(index))?;

    tracing::debug!(pool = pool_id, slot = %index, amount = slot.staked, "stake withdrawn");
    Ok(())
}
