//! The 64-byte pool record and its byte-splice update paths.
//!
//! Field order (all big-endian u64): total rewards, user count, to-be-claimed,
//! total staked, total score, start time, time delta, asset id. The lifecycle
//! code never rewrites a whole record from typed fields when only a few
//! change; it splices the re-encoded fields between the untouched byte
//! ranges, mirroring how the record is maintained on chain.

use serde::{Deserialize, Serialize};

use crate::codec::{check_len, read_u64, write_u64, CodecError};
use crate::constants::POOL_RECORD_LEN;
use crate::primitives::{AssetId, Timestamp};

// Field offsets.
pub const TOTAL_REWARDS: usize = 0;
pub const USER_COUNT: usize = 8;
pub const TO_BE_CLAIMED: usize = 16;
pub const TOTAL_STAKED: usize = 24;
pub const TOTAL_SCORE: usize = 32;
pub const START_TIME: usize = 40;
pub const TIME_DELTA: usize = 48;
pub const ASSET_ID: usize = 56;

/// One reward-distribution campaign.
///
/// Invariants maintained by the lifecycle code: `to_be_claimed <=
/// total_rewards`; `total_staked` / `total_score` equal the sums over all
/// open deposit slots (modulo forced clears, which subtract exactly one
/// slot's contribution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub total_rewards: u64,
    pub user_count: u64,
    pub to_be_claimed: u64,
    pub total_staked: u64,
    pub total_score: u64,
    pub start_time: Timestamp,
    pub time_delta: u64,
    pub asset_id: AssetId,
}

impl PoolRecord {
    /// Fresh record at creation: full rewards outstanding, nothing staked.
    pub fn create(total_rewards: u64, start_time: Timestamp, time_delta: u64, asset_id: AssetId) -> Self {
        PoolRecord {
            total_rewards,
            user_count: 0,
            to_be_claimed: total_rewards,
            total_staked: 0,
            total_score: 0,
            start_time,
            time_delta,
            asset_id,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; POOL_RECORD_LEN];
        write_u64(&mut buf, TOTAL_REWARDS, self.total_rewards);
        write_u64(&mut buf, USER_COUNT, self.user_count);
        write_u64(&mut buf, TO_BE_CLAIMED, self.to_be_claimed);
        write_u64(&mut buf, TOTAL_STAKED, self.total_staked);
        write_u64(&mut buf, TOTAL_SCORE, self.total_score);
        write_u64(&mut buf, START_TIME, self.start_time);
        write_u64(&mut buf, TIME_DELTA, self.time_delta);
        write_u64(&mut buf, ASSET_ID, self.asset_id);
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        check_len(buf, POOL_RECORD_LEN)?;
        Ok(PoolRecord {
            total_rewards: read_u64(buf, TOTAL_REWARDS),
            user_count: read_u64(buf, USER_COUNT),
            to_be_claimed: read_u64(buf, TO_BE_CLAIMED),
            total_staked: read_u64(buf, TOTAL_STAKED),
            total_score: read_u64(buf, TOTAL_SCORE),
            start_time: read_u64(buf, START_TIME),
            time_delta: read_u64(buf, TIME_DELTA),
            asset_id: read_u64(buf, ASSET_ID),
        })
    }

    /// Pool end: `start_time + time_delta`. None if the sum overflows,
    /// which create-time validation prevents for real pools.
    pub fn end_time(&self) -> Option<Timestamp> {
        self.start_time.checked_add(self.time_delta)
    }

    /// A pool has ended strictly after its end time.
    pub fn has_ended(&self, now: Timestamp) -> bool {
        match self.end_time() {
            Some(end) => now > end,
            None => false,
        }
    }

    /// Deposits are accepted strictly before the end time.
    pub fn accepts_deposits(&self, now: Timestamp) -> bool {
        match self.end_time() {
            Some(end) => now < end,
            None => true,
        }
    }

    /// Time weight applied to a deposit made at `now`: the full duration when
    /// the pool has not started yet, otherwise the remaining duration.
    /// None once the pool has ended (the weight would underflow).
    pub fn deposit_weight(&self, now: Timestamp) -> Option<u64> {
        if now <= self.start_time {
            Some(self.time_delta)
        } else {
            let end = self.end_time()?;
            end.checked_sub(now)
        }
    }
}

// ─── Byte-splice updates ─────────────────────────────────────────────────────

/// Deposit into an already-held slot: rewrite only the staked/score totals
/// (bytes 24..40).
pub fn splice_aggregates(
    value: &[u8],
    total_staked: u64,
    total_score: u64,
) -> Result<Vec<u8>, CodecError> {
    check_len(value, POOL_RECORD_LEN)?;
    let mut out = value.to_vec();
    write_u64(&mut out, TOTAL_STAKED, total_staked);
    write_u64(&mut out, TOTAL_SCORE, total_score);
    Ok(out)
}

/// First deposit by an account: additionally rewrite the user count
/// (bytes 8..16 and 24..40). Also the shape of a forced-clear reconciliation.
pub fn splice_join(
    value: &[u8],
    user_count: u64,
    total_staked: u64,
    total_score: u64,
) -> Result<Vec<u8>, CodecError> {
    check_len(value, POOL_RECORD_LEN)?;
    let mut out = value.to_vec();
    write_u64(&mut out, USER_COUNT, user_count);
    write_u64(&mut out, TOTAL_STAKED, total_staked);
    write_u64(&mut out, TOTAL_SCORE, total_score);
    Ok(out)
}

/// Claim payout: rewrite the user count and the unclaimed remainder
/// (bytes 8..24).
pub fn splice_claim(
    value: &[u8],
    user_count: u64,
    to_be_claimed: u64,
) -> Result<Vec<u8>, CodecError> {
    check_len(value, POOL_RECORD_LEN)?;
    let mut out = value.to_vec();
    write_u64(&mut out, USER_COUNT, user_count);
    write_u64(&mut out, TO_BE_CLAIMED, to_be_claimed);
    Ok(out)
}
