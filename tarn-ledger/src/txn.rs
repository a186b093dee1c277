//! Transaction and group types accepted by the simulator.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use tarn_state::primitives::{Address, Amount, AssetId};

/// Maximum number of transactions in one atomic group.
pub const MAX_GROUP_SIZE: usize = 16;

/// What an application call does to the caller's participation on completion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum OnComplete {
    NoOp,
    OptIn,
    CloseOut,
    ClearState,
    UpdateApplication,
    DeleteApplication,
}

/// Transaction payload.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum TxnKind {
    Payment {
        receiver: Address,
        amount: Amount,
        close_to: Option<Address>,
    },
    AssetTransfer {
        asset: AssetId,
        receiver: Address,
        amount: u64,
        close_to: Option<Address>,
    },
    AppCall {
        on_complete: OnComplete,
        args: Vec<Vec<u8>>,
        assets: Vec<AssetId>,
        accounts: Vec<Address>,
    },
}

/// One transaction. The sender is treated as authenticated; signing is the
/// collaborator's concern. `rekey_to` is carried but never acted on; the
/// contract rejects any call that sets it, which is what the field is for.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: Address,
    pub fee: Amount,
    pub rekey_to: Option<Address>,
    pub kind: TxnKind,
}

impl Transaction {
    pub fn payment(sender: Address, receiver: Address, amount: Amount, fee: Amount) -> Self {
        Transaction {
            sender,
            fee,
            rekey_to: None,
            kind: TxnKind::Payment {
                receiver,
                amount,
                close_to: None,
            },
        }
    }

    pub fn asset_transfer(
        sender: Address,
        asset: AssetId,
        receiver: Address,
        amount: u64,
        fee: Amount,
    ) -> Self {
        Transaction {
            sender,
            fee,
            rekey_to: None,
            kind: TxnKind::AssetTransfer {
                asset,
                receiver,
                amount,
                close_to: None,
            },
        }
    }

    pub fn app_call(
        sender: Address,
        on_complete: OnComplete,
        args: Vec<Vec<u8>>,
        assets: Vec<AssetId>,
        fee: Amount,
    ) -> Self {
        Transaction {
            sender,
            fee,
            rekey_to: None,
            kind: TxnKind::AppCall {
                on_complete,
                args,
                assets,
                accounts: Vec::new(),
            },
        }
    }
}
