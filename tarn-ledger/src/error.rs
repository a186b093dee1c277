use thiserror::Error;

use tarn_state::primitives::{Amount, AssetId};

/// Why an approval program refused a call.
///
/// The host treats every variant the same way (the whole group aborts with
/// no state change), but the typed reasons make the precondition tests
/// precise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{0}")]
    Custom(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("insufficient funds")]
    InsufficientFunds,
}

impl Rejection {
    pub fn custom(msg: impl Into<String>) -> Self {
        Rejection::Custom(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Rejection::NotFound(what.into())
    }

    pub fn invalid_input(what: impl Into<String>) -> Self {
        Rejection::InvalidInput(what.into())
    }
}

impl From<&str> for Rejection {
    fn from(msg: &str) -> Self {
        Rejection::Custom(String::from(msg))
    }
}

impl From<tarn_storage::StorageError> for Rejection {
    fn from(err: tarn_storage::StorageError) -> Self {
        Rejection::Custom(format!("storage: {err}"))
    }
}

impl From<tarn_state::CodecError> for Rejection {
    fn from(err: tarn_state::CodecError) -> Self {
        Rejection::Custom(format!("codec: {err}"))
    }
}

/// Errors surfaced by the simulator itself.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("empty transaction group")]
    EmptyGroup,

    #[error("group too large: {size} > {max}")]
    GroupTooLarge { size: usize, max: usize },

    #[error("insufficient balance for {address}: have {available}, need {required}")]
    InsufficientBalance {
        address: String,
        available: Amount,
        required: Amount,
    },

    #[error("unknown asset: {0}")]
    UnknownAsset(AssetId),

    #[error("account {address} does not hold asset {asset}")]
    NotOptedInAsset { address: String, asset: AssetId },

    #[error("account {address} is not opted into the application")]
    NotOptedInApp { address: String },

    #[error("account {address} is already opted into the application")]
    AlreadyOptedInApp { address: String },

    #[error("application rejected the call: {0}")]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Storage(#[from] tarn_storage::StorageError),
}
