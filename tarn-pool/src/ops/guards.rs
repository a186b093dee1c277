//! Shared transaction-group shape checks.
//!
//! Two shapes recur across the lifecycle: a two-transaction group whose
//! first leg moves the stake or reward into the escrow, and a standalone
//! call whose doubled fee pays for one inner transfer back out.

use tarn_ledger::{ensure, CallContext, Rejection, Transaction, TxnKind};
use tarn_state::constants::TX_FEE;
use tarn_state::primitives::{Amount, AssetId};

/// Reject any transaction that tries to rekey its sender.
pub fn no_rekey(txn: &Transaction) -> Result<(), Rejection> {
    ensure!(
        txn.rekey_to.is_none(),
        Rejection::invalid_input("rekey-to must be unset")
    );
    Ok(())
}

/// The call's single declared foreign asset. The foreign-accounts list
/// must be empty for every lifecycle operation.
pub fn sole_foreign_asset(ctx: &CallContext<'_>) -> Result<AssetId, Rejection> {
    ensure!(
        ctx.foreign_accounts().is_empty(),
        Rejection::invalid_input("unexpected foreign accounts")
    );
    match ctx.foreign_assets() {
        [asset] => Ok(*asset),
        _ => Err(Rejection::invalid_input(
            "exactly one foreign asset required",
        )),
    }
}

/// Validate the `[asset transfer, call]` group shape shared by pool
/// creation and deposits: the leading leg is an asset transfer of a
/// nonzero amount into the escrow, sent by the caller, moving the asset
/// the call declares, with no rekey or close-to on either leg.
///
/// Returns the transferred asset and amount.
pub fn grouped_stake_transfer(ctx: &CallContext<'_>) -> Result<(AssetId, Amount), Rejection> {
    ensure!(
        ctx.group_size() == 2 && ctx.group_index() == 1,
        Rejection::invalid_input("expected [asset transfer, call] group")
    );
    let declared = sole_foreign_asset(ctx)?;
    let leg = ctx
        .gtxn(0)
        .ok_or_else(|| Rejection::invalid_input("missing funding leg"))?;
    no_rekey(leg)?;
    no_rekey(ctx.txn())?;
    ensure!(
        leg.sender == ctx.sender(),
        Rejection::invalid_input("both legs must share a sender")
    );
    match leg.kind {
        TxnKind::AssetTransfer {
            asset,
            receiver,
            amount,
            close_to,
        } => {
            ensure!(
                close_to.is_none(),
                Rejection::invalid_input("close-to must be unset")
            );
            ensure!(
                receiver == ctx.escrow(),
                Rejection::invalid_input("transfer must pay the escrow")
            );
            ensure!(
                asset == declared,
                Rejection::invalid_input("transferred asset does not match the call")
            );
            ensure!(
                amount != 0,
                Rejection::invalid_input("transfer amount must be nonzero")
            );
            Ok((asset, amount))
        }
        _ => Err(Rejection::invalid_input(
            "leading leg must be an asset transfer",
        )),
    }
}

/// Validate a standalone call whose fee covers one zero-fee inner
/// transfer. Returns the call's declared asset.
pub fn standalone_double_fee(ctx: &CallContext<'_>) -> Result<AssetId, Rejection> {
    ensure!(
        ctx.group_size() == 1,
        Rejection::invalid_input("call must be standalone")
    );
    ensure!(
        ctx.txn().fee == 2 * TX_FEE,
        Rejection::invalid_input("fee must cover the inner transfer")
    );
    no_rekey(ctx.txn())?;
    sole_foreign_asset(ctx)
}
