//! The singleton `INFO` record: manager address and live pool count.

use serde::{Deserialize, Serialize};

use crate::codec::{check_len, read_u64, write_u64, CodecError};
use crate::constants::INFO_RECORD_LEN;
use crate::primitives::Address;

/// Offset of the pool-count field inside the INFO record.
pub const POOL_COUNT_OFFSET: usize = 32;

/// Manager identity plus the number of pools currently registered.
/// Written once at application creation, count-spliced on every pool
/// create/delete, never removed while the application lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoRecord {
    pub manager: Address,
    pub pool_count: u64,
}

impl InfoRecord {
    pub fn new(manager: Address) -> Self {
        InfoRecord {
            manager,
            pool_count: 0,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; INFO_RECORD_LEN];
        buf[..32].copy_from_slice(&self.manager);
        write_u64(&mut buf, POOL_COUNT_OFFSET, self.pool_count);
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        check_len(buf, INFO_RECORD_LEN)?;
        let mut manager = [0u8; 32];
        manager.copy_from_slice(&buf[..32]);
        Ok(InfoRecord {
            manager,
            pool_count: read_u64(buf, POOL_COUNT_OFFSET),
        })
    }
}

/// Splice a new pool count into a stored INFO record, leaving the manager
/// bytes untouched.
pub fn splice_pool_count(value: &[u8], pool_count: u64) -> Result<Vec<u8>, CodecError> {
    check_len(value, INFO_RECORD_LEN)?;
    let mut out = value.to_vec();
    write_u64(&mut out, POOL_COUNT_OFFSET, pool_count);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let rec = InfoRecord {
            manager: [7u8; 32],
            pool_count: 12,
        };
        assert_eq!(InfoRecord::decode(&rec.encode()).unwrap(), rec);
    }

    #[test]
    fn splice_matches_full_reencode() {
        let rec = InfoRecord {
            manager: [9u8; 32],
            pool_count: 3,
        };
        let spliced = splice_pool_count(&rec.encode(), 4).unwrap();
        let expected = InfoRecord {
            pool_count: 4,
            ..rec
        };
        assert_eq!(spliced, expected.encode());
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert!(InfoRecord::decode(&[0u8; 39]).is_err());
    }
}
