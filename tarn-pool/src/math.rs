//! Checked arithmetic helpers.
//!
//! The host's rule is that arithmetic faults abort the transaction, so
//! every add/sub/mul in the lifecycle code goes through these and maps
//! overflow to a rejection.

use tarn_ledger::Rejection;

pub fn add(a: u64, b: u64) -> Result<u64, Rejection> {
    a.checked_add(b).ok_or(Rejection::Overflow)
}

pub fn sub(a: u64, b: u64) -> Result<u64, Rejection> {
    a.checked_sub(b).ok_or(Rejection::Overflow)
}

pub fn mul(a: u64, b: u64) -> Result<u64, Rejection> {
    a.checked_mul(b).ok_or(Rejection::Overflow)
}
