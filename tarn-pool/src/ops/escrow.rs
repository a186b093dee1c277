//! Escrow asset opt-in.
//!
//! Before a pool can exist for an asset the escrow must hold that asset.
//! The manager funds the escrow's raised minimum balance plus the inner
//! fee, and the contract opts in with a zero self-transfer.

use tarn_ledger::{ensure, CallContext, Rejection, TxnKind};
use tarn_state::constants::{MIN_BALANCE_PER_ASSET, TX_FEE};

use crate::ops::guards;
use crate::StakingApp;

pub fn opt_in_asset(app: &StakingApp, ctx: &CallContext<'_>) -> Result<(), Rejection> {
    ensure!(
        ctx.group_size() == 2 && ctx.group_index() == 1,
        Rejection::invalid_input("expected [payment, call] group")
    );
    let asset = guards::sole_foreign_asset(ctx)?;
    let funding = ctx
        .gtxn(0)
        .ok_or_else(|| Rejection::invalid_input("missing funding leg"))?;
    guards::no_rekey(funding)?;
    guards::no_rekey(ctx.txn())?;
    ensure!(funding.sender == app.manager(), Rejection::Unauthorized);
    ensure!(
        ctx.sender() == funding.sender,
        Rejection::invalid_input("both legs must share a sender")
    );
    match funding.kind {
        TxnKind::Payment {
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
                Rejection::invalid_input("payment must fund the escrow")
            );
            ensure!(
                amount == MIN_BALANCE_PER_ASSET + TX_FEE,
                Rejection::invalid_input("payment must cover minimum balance plus inner fee")
            );
        }
        _ => {
            return Err(Rejection::invalid_input(
                "leading leg must be a payment",
            ))
        }
    }
    ensure!(
        !ctx.is_opted_in_asset(&ctx.escrow(), asset)?,
        Rejection::invalid_input("escrow already holds the asset")
    );

    // A zero self-transfer establishes the holding.
    ctx.inner_transfer(asset, &ctx.escrow(), 0)?;
    tracing::debug!(asset, "escrow opted into asset");
    Ok(())
}
