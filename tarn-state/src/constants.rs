use crate::primitives::Amount;

// ─── Fees and balances ───────────────────────────────────────────────────────

/// Flat fee per transaction, in microalgos.
pub const TX_FEE: Amount = 1_000;

/// Minimum-balance increase the escrow needs per asset it opts into.
pub const MIN_BALANCE_PER_ASSET: Amount = 100_000;

// ─── Storage schema ──────────────────────────────────────────────────────────

/// Deposit slots per account. An account can stake in at most this many
/// pools concurrently.
pub const MAX_SLOTS: u8 = 4;

/// Global byte-slice entries available to the application: the INFO record
/// plus up to 63 pool records.
pub const MAX_GLOBAL_ENTRIES: usize = 64;

/// Length of the INFO record: 32-byte manager address + u64 pool count.
pub const INFO_RECORD_LEN: usize = 40;

/// Length of a pool record: eight big-endian u64 fields.
pub const POOL_RECORD_LEN: usize = 64;

/// Length of a deposit-slot record: four big-endian u64 fields.
pub const SLOT_RECORD_LEN: usize = 32;

// ─── Pool lifecycle ──────────────────────────────────────────────────────────

/// Default window after pool end during which depositors may still claim.
/// Once it elapses the manager may delete the pool even with open slots.
pub const DEFAULT_CLAIM_WINDOW: u64 = 60 * 60 * 24 * 365;
