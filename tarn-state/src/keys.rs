//! Key derivation for global and local application state.
//!
//! Global state holds the 4-byte `INFO` key and 8-byte big-endian pool keys;
//! the lengths differ so the two can never collide. Local slot keys are the
//! ASCII digit strings `"1"` through `"4"`.

use crate::codec::CodecError;
use crate::constants::MAX_SLOTS;
use crate::primitives::{PoolId, SlotIndex};

/// Global key of the singleton info record.
pub const INFO_KEY: &[u8] = b"INFO";

/// Global key of a pool record.
pub fn pool_key(id: PoolId) -> [u8; 8] {
    id.to_be_bytes()
}

/// Parse a global key as a pool id. Returns `None` for the INFO key or any
/// other non-pool key.
pub fn parse_pool_key(key: &[u8]) -> Option<PoolId> {
    if key.len() != 8 {
        return None;
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(key);
    Some(PoolId::from_be_bytes(bytes))
}

/// Local key of a deposit slot.
pub fn slot_key(index: SlotIndex) -> Vec<u8> {
    index.0.to_string().into_bytes()
}

/// Parse a local key back into a slot index.
pub fn parse_slot_key(key: &[u8]) -> Result<SlotIndex, CodecError> {
    let s = std::str::from_utf8(key)
        .map_err(|_| CodecError::Key(format!("non-utf8 slot key {key:02x?}")))?;
    let index: u8 = s
        .parse()
        .map_err(|_| CodecError::Key(format!("non-numeric slot key {s:?}")))?;
    if index == 0 || index > MAX_SLOTS {
        return Err(CodecError::Key(format!("slot index {index} out of range")));
    }
    Ok(SlotIndex(index))
}
