//! Typed, serializable views over raw application state.

use serde::Serialize;

use tarn_state::primitives::{AssetId, PoolId};
use tarn_state::{CodecError, PoolRecord, SlotRecord};

use crate::error::ClientError;

/// One pool as read from global state, id included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolInfo {
    pub id: PoolId,
    pub total_rewards: u64,
    pub user_count: u64,
    pub to_be_claimed: u64,
    pub total_staked: u64,
    pub total_score: u64,
    pub start_time: u64,
    pub time_delta: u64,
    pub asset_id: AssetId,
}

impl PoolInfo {
    pub fn new(id: PoolId, record: PoolRecord) -> Self {
        PoolInfo {
            id,
            total_rewards: record.total_rewards,
            user_count: record.user_count,
            to_be_claimed: record.to_be_claimed,
            total_staked: record.total_staked,
            total_score: record.total_score,
            start_time: record.start_time,
            time_delta: record.time_delta,
            asset_id: record.asset_id,
        }
    }

    pub fn decode(id: PoolId, value: &[u8]) -> Result<Self, CodecError> {
        Ok(PoolInfo::new(id, PoolRecord::decode(value)?))
    }

    pub fn end_time(&self) -> Option<u64> {
        self.start_time.checked_add(self.time_delta)
    }

    pub fn to_json(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One deposit slot of an account, formatted for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StakeView {
    pub pool_id: PoolId,
    pub staked: u64,
    pub score: u64,
    pub asset_id: AssetId,
}

impl From<SlotRecord> for StakeView {
    fn from(slot: SlotRecord) -> Self {
        StakeView {
            pool_id: slot.pool_id,
            staked: slot.staked,
            score: slot.score,
            asset_id: slot.asset_id,
        }
    }
}

impl StakeView {
    pub fn to_json(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string(self)?)
    }
}
