//! The client facade driven against the in-memory ledger.

use tarn_client::{ClientError, StakingClient};
use tarn_ledger::{Ledger, Transaction};
use tarn_pool::StakingApp;
use tarn_state::constants::TX_FEE;
use tarn_state::primitives::{Address, AssetId, PoolId};

const MANAGER: Address = [0xAA; 32];
const ALICE: Address = [1u8; 32];
const BOB: Address = [2u8; 32];

const SUPPLY: u64 = 1_000_000;
const CLAIM_WINDOW: u64 = 1_000;

/// Client over a fresh ledger: application installed, parties funded and
/// holding the asset, escrow opted in.
fn setup() -> (StakingClient<Ledger>, AssetId) {
    let app = StakingApp::new(MANAGER).with_claim_window(CLAIM_WINDOW);
    let mut ledger = Ledger::in_memory(Box::new(app), 1, MANAGER).unwrap();
    ledger.set_time(1_000_000);
    for addr in [MANAGER, ALICE, BOB] {
        ledger.fund(&addr, 10_000_000).unwrap();
    }
    let asset = ledger.create_asset(&MANAGER, SUPPLY).unwrap();
    for addr in [ALICE, BOB] {
        ledger
            .submit(Transaction::asset_transfer(addr, asset, addr, 0, TX_FEE))
            .unwrap();
        ledger
            .submit(Transaction::asset_transfer(MANAGER, asset, addr, 10_000, TX_FEE))
            .unwrap();
    }

    let client = StakingClient::new(ledger).unwrap();
    client.submit_escrow_opt_in(MANAGER, asset).unwrap();
    (client, asset)
}

fn create_pool(client: &mut StakingClient<Ledger>, asset: AssetId, rewards: u64, delta: u64) -> PoolId {
    let now = client.node().now();
    client
        .submit_create_pool(MANAGER, asset, rewards, now, delta)
        .unwrap();
    client.refresh().unwrap();
    now
}

fn balance(client: &StakingClient<Ledger>, addr: &Address, asset: AssetId) -> u64 {
    client.node().asset_balance(addr, asset).unwrap().unwrap()
}

#[test]
fn full_lifecycle_through_the_client() {
    let (mut client, asset) = setup();
    assert_eq!(client.manager(), MANAGER);
    assert_eq!(client.pool_count(), 0);

    let pool_id = create_pool(&mut client, asset, 1_000, 60);
    assert_eq!(client.pool_count(), 1);
    let pool = client.pool(pool_id).unwrap();
    assert_eq!(pool.asset_id, asset);
    assert_eq!(pool.to_be_claimed, 1_000);

    client.submit_app_opt_in(ALICE).unwrap();
    client.submit_deposit(ALICE, pool_id, 100).unwrap();

    let stakes = client.stakes(&ALICE).unwrap();
    assert_eq!(stakes.len(), 1);
    assert_eq!(stakes[0].pool_id, pool_id);
    assert_eq!(stakes[0].staked, 100);
    assert_eq!(stakes[0].score, 6_000);

    client.node().set_time(pool_id + 61);
    client.submit_claim(ALICE, pool_id).unwrap();
    assert_eq!(balance(&client, &ALICE, asset), 10_000 + 1_000);
    assert!(client.stakes(&ALICE).unwrap().is_empty());

    client.submit_app_close_out(ALICE).unwrap();
    client.submit_delete_pool(MANAGER, pool_id).unwrap();
    client.refresh().unwrap();
    assert_eq!(client.pool_count(), 0);
    assert!(matches!(
        client.pool(pool_id),
        Err(ClientError::PoolNotFound(_))
    ));
}

#[test]
fn refresh_reconciles_the_pool_cache() {
    let (mut client, asset) = setup();
    let first = create_pool(&mut client, asset, 1_000, 60);
    client.node().advance_time(5);
    let second = create_pool(&mut client, asset, 2_000, 600);
    assert_eq!(client.pool_count(), 2);
    assert_eq!(client.latest_pool().unwrap().id, second);

    // The first pool ends, nobody staked, the manager deletes it.
    client.node().set_time(first + 61);
    client.submit_delete_pool(MANAGER, first).unwrap();
    client.refresh().unwrap();

    assert_eq!(client.pool_count(), 1);
    assert!(matches!(
        client.pool(first),
        Err(ClientError::PoolNotFound(_))
    ));
    // The surviving pool was updated in place, not duplicated.
    assert_eq!(client.pools().count(), 1);
    assert_eq!(client.pool(second).unwrap().total_rewards, 2_000);
}

#[test]
fn withdraw_falls_back_to_local_state_for_deleted_pools() {
    let (mut client, asset) = setup();
    let pool_id = create_pool(&mut client, asset, 1_000, 60);
    client.submit_app_opt_in(ALICE).unwrap();
    client.submit_deposit(ALICE, pool_id, 100).unwrap();

    client.node().set_time(pool_id + 60 + CLAIM_WINDOW + 1);
    client.submit_delete_pool(MANAGER, pool_id).unwrap();
    client.refresh().unwrap();

    // Claim now reports the deletion; withdraw recovers the asset id from
    // Alice's own slot even though the pool is gone from the cache.
    assert!(matches!(
        client.submit_claim(ALICE, pool_id),
        Err(ClientError::PoolDeleted(_))
    ));
    let before = balance(&client, &ALICE, asset);
    client.submit_withdraw(ALICE, pool_id).unwrap();
    assert_eq!(balance(&client, &ALICE, asset), before + 100);

    // Bob never staked; the fallback finds nothing for him.
    client.submit_app_opt_in(BOB).unwrap();
    assert!(matches!(
        client.submit_withdraw(BOB, pool_id),
        Err(ClientError::NoStakeInPool(_))
    ));
}

#[test]
fn advisory_errors_fire_before_submission() {
    let (mut client, asset) = setup();

    assert!(matches!(
        client.submit_escrow_opt_in(MANAGER, asset),
        Err(ClientError::EscrowAlreadyOptedIn { .. })
    ));

    client.submit_app_opt_in(ALICE).unwrap();
    assert!(matches!(
        client.submit_app_opt_in(ALICE),
        Err(ClientError::AlreadyOptedIn { .. })
    ));
    assert!(matches!(
        client.submit_app_close_out(BOB),
        Err(ClientError::NotOptedIn { .. })
    ));

    assert!(matches!(
        client.submit_deposit(ALICE, 12345, 100),
        Err(ClientError::PoolNotFound(12345))
    ));
    assert!(matches!(client.latest_pool(), Err(ClientError::NoPools)));

    let _ = create_pool(&mut client, asset, 1_000, 60);
    assert!(client.latest_pool().is_ok());
}

#[test]
fn pool_views_serialize() {
    let (mut client, asset) = setup();
    let pool_id = create_pool(&mut client, asset, 1_000, 60);
    let json = client.pool(pool_id).unwrap().to_json().unwrap();
    assert!(json.contains(&format!("\"id\":{pool_id}")));
    assert!(json.contains("\"total_rewards\":1000"));
}
