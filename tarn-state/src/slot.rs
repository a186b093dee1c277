//! The 32-byte per-account deposit-slot record.

use serde::{Deserialize, Serialize};

use crate::codec::{check_len, read_u64, write_u64, CodecError};
use crate::constants::SLOT_RECORD_LEN;
use crate::primitives::{AssetId, PoolId};

pub const POOL_ID: usize = 0;
pub const STAKED: usize = 8;
pub const SCORE: usize = 16;
pub const ASSET_ID: usize = 24;

/// One account's position in one pool. Slots accumulate across repeated
/// deposits into the same pool and are deleted on claim or withdraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub pool_id: PoolId,
    pub staked: u64,
    pub score: u64,
    pub asset_id: AssetId,
}

impl SlotRecord {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; SLOT_RECORD_LEN];
        write_u64(&mut buf, POOL_ID, self.pool_id);
        write_u64(&mut buf, STAKED, self.staked);
        write_u64(&mut buf, SCORE, self.score);
        write_u64(&mut buf, ASSET_ID, self.asset_id);
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        check_len(buf, SLOT_RECORD_LEN)?;
        Ok(SlotRecord {
            pool_id: read_u64(buf, POOL_ID),
            staked: read_u64(buf, STAKED),
            score: read_u64(buf, SCORE),
            asset_id: read_u64(buf, ASSET_ID),
        })
    }
}
