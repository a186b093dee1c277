//! Big-endian field helpers shared by the record codecs.
//!
//! Records are packed as fixed-offset big-endian u64 fields (plus the 32-byte
//! manager address in the INFO record). Every reader checks the total record
//! length once; field reads then slice at compile-time-known offsets.

use thiserror::Error;

/// Errors from decoding a stored record.
///
/// Only the application itself writes these records, so a length or key
/// mismatch on decode indicates a contract-logic bug, not bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("record length mismatch: expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("invalid state key: {0}")]
    Key(String),
}

/// Read a big-endian u64 at `offset`. Panics if out of range; callers must
/// have length-checked the buffer first.
pub(crate) fn read_u64(buf: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_be_bytes(bytes)
}

/// Write a big-endian u64 at `offset`.
pub(crate) fn write_u64(buf: &mut [u8], offset: usize, value: u64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_be_bytes());
}

/// Length-check a record buffer.
pub(crate) fn check_len(buf: &[u8], expected: usize) -> Result<(), CodecError> {
    if buf.len() != expected {
        return Err(CodecError::Length {
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}
