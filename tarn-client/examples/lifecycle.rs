//! Full staking lifecycle against the in-memory ledger.
//!
//! Run with `RUST_LOG=debug cargo run --example lifecycle` to watch the
//! group execution logs.

use tarn_client::StakingClient;
use tarn_ledger::{Ledger, Transaction};
use tarn_pool::StakingApp;
use tarn_state::constants::TX_FEE;
use tarn_state::primitives::Address;
use tracing_subscriber::EnvFilter;

const MANAGER: Address = [0xAA; 32];
const ALICE: Address = [1u8; 32];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut ledger = Ledger::in_memory(Box::new(StakingApp::new(MANAGER)), 1, MANAGER)?;
    ledger.set_time(1_700_000_000);
    ledger.fund(&MANAGER, 10_000_000)?;
    ledger.fund(&ALICE, 10_000_000)?;
    let asset = ledger.create_asset(&MANAGER, 1_000_000)?;
    ledger.submit(Transaction::asset_transfer(ALICE, asset, ALICE, 0, TX_FEE))?;
    ledger.submit(Transaction::asset_transfer(MANAGER, asset, ALICE, 10_000, TX_FEE))?;

    let mut client = StakingClient::new(ledger)?;
    client.submit_escrow_opt_in(MANAGER, asset)?;

    let start = client.node().now();
    client.submit_create_pool(MANAGER, asset, 1_000, start, 60)?;
    client.refresh()?;
    let pool = *client.latest_pool()?;
    println!("pool: {}", pool.to_json()?);

    client.submit_app_opt_in(ALICE)?;
    client.submit_deposit(ALICE, pool.id, 100)?;
    for stake in client.stakes(&ALICE)? {
        println!("stake: {}", stake.to_json()?);
    }

    client.node().set_time(start + 61);
    client.submit_claim(ALICE, pool.id)?;
    println!(
        "balance after claim: {}",
        client.node().asset_balance(&ALICE, asset)?.unwrap_or(0)
    );

    client.submit_delete_pool(MANAGER, pool.id)?;
    client.refresh()?;
    println!("pools remaining: {}", client.pool_count());
    Ok(())
}
