use thiserror::Error;

use tarn_state::primitives::{AssetId, PoolId};

/// Client-side failures. The advisory variants are raised before anything
/// is submitted; the caller can recover (refresh the cache, opt in, fall
/// back to withdraw) and try again.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("escrow already opted into asset {asset}")]
    EscrowAlreadyOptedIn { asset: AssetId },

    #[error("{address} is already opted into the application")]
    AlreadyOptedIn { address: String },

    #[error("{address} is not opted into the application")]
    NotOptedIn { address: String },

    #[error("pool {0} not found, refresh the cache or check the id")]
    PoolNotFound(PoolId),

    #[error("pool {0} has been deleted, try a withdraw call")]
    PoolDeleted(PoolId),

    #[error("no stake recorded for pool {0}")]
    NoStakeInPool(PoolId),

    #[error("no pools exist")]
    NoPools,

    #[error("application INFO record is missing")]
    MissingInfo,

    #[error(transparent)]
    Codec(#[from] tarn_state::CodecError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Ledger(#[from] tarn_ledger::LedgerError),
}
