//! End-to-end lifecycle tests against the in-memory ledger.

use tarn_ledger::{Ledger, LedgerError, OnComplete, Transaction};
use tarn_state::constants::{MIN_BALANCE_PER_ASSET, TX_FEE};
use tarn_state::keys::{pool_key, slot_key, INFO_KEY};
use tarn_state::primitives::{Address, AssetId, PoolId, SlotIndex};
use tarn_state::{InfoRecord, PoolRecord, SlotRecord};

use tarn_pool::{
    StakingApp, TAG_CLAIM, TAG_CREATE_POOL, TAG_DELETE_POOL, TAG_DEPOSIT, TAG_ESCROW_OPT_IN,
    TAG_WITHDRAW,
};

const MANAGER: Address = [0xAA; 32];
const ALICE: Address = [1u8; 32];
const BOB: Address = [2u8; 32];

const SUPPLY: u64 = 1_000_000;
const CLAIM_WINDOW: u64 = 1_000;

struct Harness {
    ledger: Ledger,
    asset: AssetId,
}

impl Harness {
    /// Fresh ledger with the application installed, the escrow opted into a
    /// new asset, and all three parties funded.
    fn new() -> Harness {
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

        let harness = Harness { ledger, asset };
        harness
            .ledger
            .submit_group(vec![
                Transaction::payment(
                    MANAGER,
                    harness.ledger.escrow(),
                    MIN_BALANCE_PER_ASSET + TX_FEE,
                    TX_FEE,
                ),
                harness.call(MANAGER, vec![TAG_ESCROW_OPT_IN.to_vec()], TX_FEE),
            ])
            .unwrap();
        harness
    }

    fn call(&self, sender: Address, args: Vec<Vec<u8>>, fee: u64) -> Transaction {
        Transaction::app_call(sender, OnComplete::NoOp, args, vec![self.asset], fee)
    }

    fn opt_in_app(&self, sender: Address) {
        self.ledger
            .submit(Transaction::app_call(
                sender,
                OnComplete::OptIn,
                vec![],
                vec![],
                TX_FEE,
            ))
            .unwrap();
    }

    /// Create a pool starting now and return its id (the creation time).
    fn create_pool(&self, rewards: u64, time_delta: u64) -> PoolId {
        let now = self.ledger.now();
        self.create_pool_at(rewards, now, time_delta).unwrap();
        now
    }

    fn create_pool_at(
        &self,
        rewards: u64,
        start: u64,
        time_delta: u64,
    ) -> Result<(), LedgerError> {
        self.ledger.submit_group(vec![
            Transaction::asset_transfer(MANAGER, self.asset, self.ledger.escrow(), rewards, TX_FEE),
            self.call(
                MANAGER,
                vec![
                    TAG_CREATE_POOL.to_vec(),
                    start.to_be_bytes().to_vec(),
                    time_delta.to_be_bytes().to_vec(),
                ],
                TX_FEE,
            ),
        ])
    }

    fn deposit(&self, sender: Address, pool_id: PoolId, amount: u64) -> Result<(), LedgerError> {
        self.ledger.submit_group(vec![
            Transaction::asset_transfer(sender, self.asset, self.ledger.escrow(), amount, TX_FEE),
            self.call(
                sender,
                vec![TAG_DEPOSIT.to_vec(), pool_id.to_be_bytes().to_vec()],
                TX_FEE,
            ),
        ])
    }

    fn claim(&self, sender: Address, pool_id: PoolId) -> Result<(), LedgerError> {
        self.ledger.submit(self.call(
            sender,
            vec![TAG_CLAIM.to_vec(), pool_id.to_be_bytes().to_vec()],
            2 * TX_FEE,
        ))
    }

    fn withdraw(&self, sender: Address, pool_id: PoolId) -> Result<(), LedgerError> {
        self.ledger.submit(self.call(
            sender,
            vec![TAG_WITHDRAW.to_vec(), pool_id.to_be_bytes().to_vec()],
            2 * TX_FEE,
        ))
    }

    fn delete_pool(&self, sender: Address, pool_id: PoolId) -> Result<(), LedgerError> {
        self.ledger.submit(self.call(
            sender,
            vec![TAG_DELETE_POOL.to_vec(), pool_id.to_be_bytes().to_vec()],
            2 * TX_FEE,
        ))
    }

    fn info(&self) -> InfoRecord {
        let state = self.ledger.app_global_state().unwrap();
        let (_, value) = state.iter().find(|(k, _)| k == INFO_KEY).unwrap();
        InfoRecord::decode(value).unwrap()
    }

    fn pool(&self, pool_id: PoolId) -> Option<PoolRecord> {
        let key = pool_key(pool_id).to_vec();
        let state = self.ledger.app_global_state().unwrap();
        state
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| PoolRecord::decode(v).unwrap())
    }

    fn slot(&self, addr: &Address, index: u8) -> Option<SlotRecord> {
        let key = slot_key(SlotIndex(index));
        let state = self.ledger.app_local_state(addr).unwrap();
        state
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| SlotRecord::decode(v).unwrap())
    }

    fn asset_balance(&self, addr: &Address) -> u64 {
        self.ledger.asset_balance(addr, self.asset).unwrap().unwrap()
    }

    fn escrow_balance(&self) -> u64 {
        self.ledger
            .asset_balance(&self.ledger.escrow(), self.asset)
            .unwrap()
            .unwrap()
    }
}

fn rejected(result: Result<(), LedgerError>) -> bool {
    matches!(result, Err(LedgerError::Rejected(_)))
}

// ─── Escrow opt-in ───────────────────────────────────────────────────────────

#[test]
fn escrow_opt_in_establishes_holding() {
    let h = Harness::new();
    assert!(h
        .ledger
        .is_opted_in_asset(&h.ledger.escrow(), h.asset)
        .unwrap());
    assert_eq!(h.escrow_balance(), 0);
}

#[test]
fn escrow_opt_in_is_manager_only_and_once() {
    let h = Harness::new();

    // Repeat opt-in for the same asset.
    let repeat = h.ledger.submit_group(vec![
        Transaction::payment(
            MANAGER,
            h.ledger.escrow(),
            MIN_BALANCE_PER_ASSET + TX_FEE,
            TX_FEE,
        ),
        h.call(MANAGER, vec![TAG_ESCROW_OPT_IN.to_vec()], TX_FEE),
    ]);
    assert!(rejected(repeat));

    // Non-manager funding leg.
    let imposter = h.ledger.submit_group(vec![
        Transaction::payment(ALICE, h.ledger.escrow(), MIN_BALANCE_PER_ASSET + TX_FEE, TX_FEE),
        h.call(ALICE, vec![TAG_ESCROW_OPT_IN.to_vec()], TX_FEE),
    ]);
    assert!(rejected(imposter));
}

#[test]
fn escrow_opt_in_checks_payment_amount() {
    let mut h = Harness::new();
    let asset2 = h.ledger.create_asset(&MANAGER, SUPPLY).unwrap();
    let short = h.ledger.submit_group(vec![
        Transaction::payment(MANAGER, h.ledger.escrow(), MIN_BALANCE_PER_ASSET, TX_FEE),
        Transaction::app_call(
            MANAGER,
            OnComplete::NoOp,
            vec![TAG_ESCROW_OPT_IN.to_vec()],
            vec![asset2],
            TX_FEE,
        ),
    ]);
    assert!(rejected(short));
}

// ─── Pool creation ───────────────────────────────────────────────────────────

#[test]
fn create_pool_registers_record_and_bumps_count() {
    let h = Harness::new();
    let pool_id = h.create_pool(1_000, 60);

    let record = h.pool(pool_id).unwrap();
    assert_eq!(record.total_rewards, 1_000);
    assert_eq!(record.to_be_claimed, 1_000);
    assert_eq!(record.user_count, 0);
    assert_eq!(record.total_staked, 0);
    assert_eq!(record.total_score, 0);
    assert_eq!(record.start_time, pool_id);
    assert_eq!(record.time_delta, 60);
    assert_eq!(record.asset_id, h.asset);
    assert_eq!(h.info().pool_count, 1);
    assert_eq!(h.escrow_balance(), 1_000);
}

#[test]
fn create_pool_clamps_past_start_to_now() {
    let h = Harness::new();
    let now = h.ledger.now();
    h.create_pool_at(1_000, now - 500, 60).unwrap();
    assert_eq!(h.pool(now).unwrap().start_time, now);
}

#[test]
fn create_pool_is_manager_only() {
    let h = Harness::new();
    let result = h.ledger.submit_group(vec![
        Transaction::asset_transfer(ALICE, h.asset, h.ledger.escrow(), 1_000, TX_FEE),
        h.call(
            ALICE,
            vec![
                TAG_CREATE_POOL.to_vec(),
                h.ledger.now().to_be_bytes().to_vec(),
                60u64.to_be_bytes().to_vec(),
            ],
            TX_FEE,
        ),
    ]);
    assert!(rejected(result));
    assert_eq!(h.info().pool_count, 0);
}

#[test]
fn create_pool_rejects_same_instant_twice() {
    let h = Harness::new();
    h.create_pool(1_000, 60);
    let collision = h.create_pool_at(500, h.ledger.now(), 60);
    assert!(rejected(collision));
    assert_eq!(h.info().pool_count, 1);
}

#[test]
fn create_pool_rejects_score_range_overflow() {
    let h = Harness::new();
    // duration × total supply must fit in 64 bits.
    let too_long = u64::MAX / SUPPLY + 1;
    assert!(rejected(h.create_pool_at(1_000, h.ledger.now(), too_long)));
}

#[test]
fn create_pool_rejects_when_global_schema_is_full() {
    let h = Harness::new();
    // The INFO record plus 63 pool records exhaust the global schema.
    for _ in 0..63 {
        h.create_pool(1_000, 6_000);
        h.ledger.advance_time(1);
    }
    assert_eq!(h.info().pool_count, 63);

    assert!(rejected(h.create_pool_at(1_000, h.ledger.now(), 6_000)));
    assert_eq!(h.info().pool_count, 63);
    // The rewards leg of the refused create rolled back too.
    assert_eq!(h.escrow_balance(), 63 * 1_000);
}

#[test]
fn create_pool_rejects_zero_transfer() {
    let h = Harness::new();
    assert!(rejected(h.ledger.submit_group(vec![
        Transaction::asset_transfer(MANAGER, h.asset, h.ledger.escrow(), 0, TX_FEE),
        h.call(
            MANAGER,
            vec![
                TAG_CREATE_POOL.to_vec(),
                h.ledger.now().to_be_bytes().to_vec(),
                60u64.to_be_bytes().to_vec(),
            ],
            TX_FEE,
        ),
    ])));
}

// ─── Deposits ────────────────────────────────────────────────────────────────

#[test]
fn deposit_opens_slot_and_repeat_accumulates() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    let pool_id = h.create_pool(1_000, 60);

    h.deposit(ALICE, pool_id, 100).unwrap();
    let slot = h.slot(&ALICE, 1).unwrap();
    assert_eq!(slot.pool_id, pool_id);
    assert_eq!(slot.staked, 100);
    assert_eq!(slot.score, 6_000); // 100 × 60, deposited at start
    let record = h.pool(pool_id).unwrap();
    assert_eq!(record.user_count, 1);
    assert_eq!(record.total_staked, 100);
    assert_eq!(record.total_score, 6_000);

    // Thirty seconds in, the same account tops up; same slot, lower weight.
    h.ledger.advance_time(30);
    h.deposit(ALICE, pool_id, 100).unwrap();
    let slot = h.slot(&ALICE, 1).unwrap();
    assert_eq!(slot.staked, 200);
    assert_eq!(slot.score, 6_000 + 100 * 30);
    let record = h.pool(pool_id).unwrap();
    assert_eq!(record.user_count, 1);
    assert_eq!(record.total_staked, 200);
    assert!(h.slot(&ALICE, 2).is_none());
}

#[test]
fn same_instant_deposits_aggregate_like_one() {
    // Splitting a stake across two same-second deposits must land on
    // exactly the records a single combined deposit would produce.
    let split = Harness::new();
    split.opt_in_app(ALICE);
    let pool_id = split.create_pool(1_000, 60);
    split.deposit(ALICE, pool_id, 30).unwrap();
    split.deposit(ALICE, pool_id, 70).unwrap();

    let combined = Harness::new();
    combined.opt_in_app(ALICE);
    assert_eq!(combined.create_pool(1_000, 60), pool_id);
    combined.deposit(ALICE, pool_id, 100).unwrap();

    assert_eq!(split.slot(&ALICE, 1), combined.slot(&ALICE, 1));
    assert_eq!(split.pool(pool_id), combined.pool(pool_id));
    let record = split.pool(pool_id).unwrap();
    assert_eq!(record.user_count, 1);
    assert_eq!(record.total_staked, 100);
    assert_eq!(record.total_score, 6_000);
}

#[test]
fn deposit_before_start_earns_full_weight() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    let now = h.ledger.now();
    h.create_pool_at(1_000, now + 500, 60).unwrap();
    h.ledger.advance_time(100); // still before start
    h.deposit(ALICE, now, 10).unwrap();
    assert_eq!(h.slot(&ALICE, 1).unwrap().score, 600);
}

#[test]
fn deposit_requires_running_pool() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    let pool_id = h.create_pool(1_000, 60);

    h.ledger.set_time(pool_id + 60); // exactly at end
    assert!(rejected(h.deposit(ALICE, pool_id, 100)));

    assert!(rejected(h.deposit(ALICE, pool_id + 7, 100))); // no such pool
}

#[test]
fn deposit_rejects_fifth_concurrent_pool() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    let mut pools = Vec::new();
    for _ in 0..5 {
        pools.push(h.create_pool(1_000, 600));
        h.ledger.advance_time(1); // distinct creation instants
    }
    for pool_id in &pools[..4] {
        h.deposit(ALICE, *pool_id, 10).unwrap();
    }
    assert!(rejected(h.deposit(ALICE, pools[4], 10)));
    // Existing positions are untouched.
    for index in 1..=4 {
        assert!(h.slot(&ALICE, index).is_some());
    }
}

#[test]
fn deposit_requires_app_opt_in() {
    let h = Harness::new();
    let pool_id = h.create_pool(1_000, 60);
    assert!(rejected(h.deposit(ALICE, pool_id, 100)));
    // The stake leg rolled back with the group.
    assert_eq!(h.asset_balance(&ALICE), 10_000);
}

// ─── Claims ──────────────────────────────────────────────────────────────────

#[test]
fn sole_depositor_claims_stake_plus_all_rewards() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    let pool_id = h.create_pool(1_000, 60);
    h.deposit(ALICE, pool_id, 100).unwrap();

    h.ledger.set_time(pool_id + 61);
    h.claim(ALICE, pool_id).unwrap();

    assert_eq!(h.asset_balance(&ALICE), 10_000 + 1_000);
    assert_eq!(h.escrow_balance(), 0);
    assert!(h.slot(&ALICE, 1).is_none());
    let record = h.pool(pool_id).unwrap();
    assert_eq!(record.user_count, 0);
    assert_eq!(record.to_be_claimed, 0);
}

#[test]
fn rewards_split_by_score_and_remainder_stays() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    h.opt_in_app(BOB);
    let pool_id = h.create_pool(1_000, 60);
    h.deposit(ALICE, pool_id, 100).unwrap(); // score 6000
    h.ledger.advance_time(30);
    h.deposit(BOB, pool_id, 100).unwrap(); // score 3000

    h.ledger.set_time(pool_id + 61);
    h.claim(ALICE, pool_id).unwrap();
    h.claim(BOB, pool_id).unwrap();

    // 1000×6000/9000 = 666, 1000×3000/9000 = 333; one unit of dust remains.
    assert_eq!(h.asset_balance(&ALICE), 10_000 + 666);
    assert_eq!(h.asset_balance(&BOB), 10_000 + 333);
    let record = h.pool(pool_id).unwrap();
    assert_eq!(record.to_be_claimed, 1);
    assert_eq!(record.user_count, 0);
}

#[test]
fn claim_rejected_until_strictly_after_end() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    let pool_id = h.create_pool(1_000, 60);
    h.deposit(ALICE, pool_id, 100).unwrap();

    h.ledger.set_time(pool_id + 60); // exactly at end
    assert!(rejected(h.claim(ALICE, pool_id)));
    h.ledger.advance_time(1);
    h.claim(ALICE, pool_id).unwrap();
}

#[test]
fn claim_requires_doubled_fee_and_a_slot() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    h.opt_in_app(BOB);
    let pool_id = h.create_pool(1_000, 60);
    h.deposit(ALICE, pool_id, 100).unwrap();
    h.ledger.set_time(pool_id + 61);

    let single_fee = h.ledger.submit(h.call(
        ALICE,
        vec![TAG_CLAIM.to_vec(), pool_id.to_be_bytes().to_vec()],
        TX_FEE,
    ));
    assert!(rejected(single_fee));

    // Bob never deposited.
    assert!(rejected(h.claim(BOB, pool_id)));
}

// ─── Withdraw ────────────────────────────────────────────────────────────────

#[test]
fn withdraw_returns_stake_after_pool_deletion() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    let pool_id = h.create_pool(1_000, 60);
    h.deposit(ALICE, pool_id, 100).unwrap();

    // While the pool exists, withdraw is refused.
    h.ledger.set_time(pool_id + 61);
    assert!(rejected(h.withdraw(ALICE, pool_id)));

    h.ledger.set_time(pool_id + 60 + CLAIM_WINDOW + 1);
    h.delete_pool(MANAGER, pool_id).unwrap();

    h.withdraw(ALICE, pool_id).unwrap();
    // Principal only; the reward share went back to the manager.
    assert_eq!(h.asset_balance(&ALICE), 10_000);
    assert!(h.slot(&ALICE, 1).is_none());
    assert!(rejected(h.withdraw(ALICE, pool_id)));
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[test]
fn delete_waits_for_end_and_claim_window() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    let pool_id = h.create_pool(1_000, 60);
    h.deposit(ALICE, pool_id, 100).unwrap();

    assert!(rejected(h.delete_pool(MANAGER, pool_id))); // still running
    h.ledger.set_time(pool_id + 61);
    assert!(rejected(h.delete_pool(MANAGER, pool_id))); // window open, slot held
    h.ledger.set_time(pool_id + 60 + CLAIM_WINDOW + 1);
    assert!(rejected(h.delete_pool(ALICE, pool_id))); // manager only

    let manager_before = h.asset_balance(&MANAGER);
    h.delete_pool(MANAGER, pool_id).unwrap();
    assert!(h.pool(pool_id).is_none());
    assert_eq!(h.info().pool_count, 0);
    assert_eq!(h.asset_balance(&MANAGER), manager_before + 1_000);
    // Alice's principal is still in escrow for withdrawal.
    assert_eq!(h.escrow_balance(), 100);
}

#[test]
fn delete_allowed_early_once_all_claims_are_in() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    let pool_id = h.create_pool(1_000, 60);
    h.deposit(ALICE, pool_id, 100).unwrap();
    h.ledger.set_time(pool_id + 61);
    h.claim(ALICE, pool_id).unwrap();

    // Within the claim window, but no slots remain.
    h.delete_pool(MANAGER, pool_id).unwrap();
    assert_eq!(h.info().pool_count, 0);
}

// ─── Account exit ────────────────────────────────────────────────────────────

#[test]
fn close_out_refused_while_slots_open() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    let pool_id = h.create_pool(1_000, 60);
    h.deposit(ALICE, pool_id, 100).unwrap();

    let close = Transaction::app_call(ALICE, OnComplete::CloseOut, vec![], vec![], TX_FEE);
    assert!(rejected(h.ledger.submit(close.clone())));

    h.ledger.set_time(pool_id + 61);
    h.claim(ALICE, pool_id).unwrap();
    h.ledger.submit(close).unwrap();
    assert!(!h.ledger.is_opted_in_app(&ALICE).unwrap());
}

#[test]
fn clear_state_backs_contribution_out_of_totals() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    h.opt_in_app(BOB);
    let pool_id = h.create_pool(1_000, 60);
    h.deposit(ALICE, pool_id, 100).unwrap(); // score 6000
    h.deposit(BOB, pool_id, 100).unwrap(); // score 6000

    h.ledger
        .submit(Transaction::app_call(
            ALICE,
            OnComplete::ClearState,
            vec![],
            vec![],
            TX_FEE,
        ))
        .unwrap();

    assert!(!h.ledger.is_opted_in_app(&ALICE).unwrap());
    let record = h.pool(pool_id).unwrap();
    assert_eq!(record.user_count, 1);
    assert_eq!(record.total_staked, 100);
    assert_eq!(record.total_score, 6_000);

    // Bob now holds the entire score and claims all rewards.
    h.ledger.set_time(pool_id + 61);
    h.claim(BOB, pool_id).unwrap();
    assert_eq!(h.asset_balance(&BOB), 10_000 + 1_000);
    // Alice's forfeited stake stays in escrow.
    assert_eq!(h.escrow_balance(), 100);
}

#[test]
fn update_and_delete_application_are_refused() {
    let h = Harness::new();
    for on_complete in [OnComplete::UpdateApplication, OnComplete::DeleteApplication] {
        let result = h.ledger.submit(Transaction::app_call(
            MANAGER,
            on_complete,
            vec![],
            vec![],
            TX_FEE,
        ));
        assert!(rejected(result));
    }
}

// ─── Group shape ─────────────────────────────────────────────────────────────

#[test]
fn rekeying_legs_are_refused() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    let pool_id = h.create_pool(1_000, 60);

    let mut transfer =
        Transaction::asset_transfer(ALICE, h.asset, h.ledger.escrow(), 100, TX_FEE);
    transfer.rekey_to = Some(BOB);
    let result = h.ledger.submit_group(vec![
        transfer,
        h.call(
            ALICE,
            vec![TAG_DEPOSIT.to_vec(), pool_id.to_be_bytes().to_vec()],
            TX_FEE,
        ),
    ]);
    assert!(rejected(result));
}

#[test]
fn stake_leg_must_pay_the_escrow() {
    let h = Harness::new();
    h.opt_in_app(ALICE);
    h.opt_in_app(BOB);
    let pool_id = h.create_pool(1_000, 60);

    let result = h.ledger.submit_group(vec![
        Transaction::asset_transfer(ALICE, h.asset, BOB, 100, TX_FEE),
        h.call(
            ALICE,
            vec![TAG_DEPOSIT.to_vec(), pool_id.to_be_bytes().to_vec()],
            TX_FEE,
        ),
    ]);
    assert!(rejected(result));
}

#[test]
fn unknown_tag_is_refused() {
    let h = Harness::new();
    let result = h
        .ledger
        .submit(h.call(MANAGER, vec![b"XX".to_vec()], TX_FEE));
    assert!(rejected(result));
}
