use serde::{Deserialize, Serialize};

/// 32-byte account address.
pub type Address = [u8; 32];

/// Ledger-assigned asset identifier.
pub type AssetId = u64;

/// Application identifier.
pub type AppId = u64;

/// Pool identifier: the ledger timestamp at pool creation.
pub type PoolId = u64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Amount in base units (microalgos for the native token).
pub type Amount = u64;

/// The zero address.
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Render an address as a lowercase hex string (no prefix).
pub fn addr_to_hex(addr: &Address) -> String {
    hex::encode(addr)
}

/// A deposit-slot index, 1-based. Index 0 is never a valid slot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SlotIndex(pub u8);

impl SlotIndex {
    /// All valid slot indices, in scan order.
    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (1..=crate::constants::MAX_SLOTS).map(SlotIndex)
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
