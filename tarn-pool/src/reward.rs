//! Proportional reward computation.
//!
//! A depositor's reward is `⌊total_rewards × score / total_score⌋`, capped
//! at whatever remains unclaimed. The multiply runs in 128 bits: the
//! operands are u64 and their product can exceed 64 bits even with the
//! create-time supply guard in place.

use tarn_ledger::Rejection;
use tarn_state::{PoolRecord, SlotRecord};

/// Wide multiply-then-divide, `⌊a × b / d⌋`.
pub fn wide_ratio(a: u64, b: u64, d: u64) -> Result<u64, Rejection> {
    if d == 0 {
        return Err(Rejection::custom("division by zero"));
    }
    let wide = (a as u128) * (b as u128) / (d as u128);
    u64::try_from(wide).map_err(|_| Rejection::Overflow)
}

/// The reward a slot earns from its pool, capped at the remaining
/// unclaimed amount. Callers must have verified that the slot belongs to
/// the pool; a held slot implies `total_score > 0`.
pub fn claimable(pool: &PoolRecord, slot: &SlotRecord) -> Result<u64, Rejection> {
    let reward = wide_ratio(pool.total_rewards, slot.score, pool.total_score)?;
    Ok(reward.min(pool.to_be_claimed))
}
