//! The staking client: a pool cache over a [`Node`] plus submit helpers.
//!
//! The cache is filled from a global-state dump at construction and
//! reconciled on [`StakingClient::refresh`]: pools that disappeared are
//! dropped, existing ones are updated in place, new ones are added. Submit
//! helpers raise advisory [`ClientError`]s before sending anything the
//! contract would reject for a reason the client can already see.

use std::collections::BTreeMap;

use tarn_state::keys::{parse_pool_key, parse_slot_key, INFO_KEY};
use tarn_state::primitives::{addr_to_hex, Address, AssetId, PoolId};
use tarn_state::{InfoRecord, SlotRecord};

use crate::error::ClientError;
use crate::groups;
use crate::node::Node;
use crate::view::{PoolInfo, StakeView};

pub struct StakingClient<N: Node> {
    node: N,
    manager: Address,
    pool_count: u64,
    pools: BTreeMap<PoolId, PoolInfo>,
}

impl<N: Node> StakingClient<N> {
    /// Connect and load the current global state into the cache.
    pub fn new(node: N) -> Result<Self, ClientError> {
        let mut client = StakingClient {
            node,
            manager: [0u8; 32],
            pool_count: 0,
            pools: BTreeMap::new(),
        };
        client.refresh()?;
        Ok(client)
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    /// Reconcile the cache against a fresh global-state dump.
    pub fn refresh(&mut self) -> Result<(), ClientError> {
        let state = self.node.global_state()?;
        let mut seen = Vec::new();
        let mut info = None;
        for (key, value) in &state {
            if key == INFO_KEY {
                info = Some(InfoRecord::decode(value)?);
            } else if let Some(id) = parse_pool_key(key) {
                self.pools.insert(id, PoolInfo::decode(id, value)?);
                seen.push(id);
            }
        }
        let info = info.ok_or(ClientError::MissingInfo)?;
        self.manager = info.manager;
        self.pool_count = info.pool_count;
        self.pools.retain(|id, _| seen.contains(id));
        tracing::debug!(pools = self.pools.len(), "cache refreshed");
        Ok(())
    }

    // ── Cache accessors ─────────────────────────────────────────────────

    pub fn manager(&self) -> Address {
        self.manager
    }

    pub fn pool_count(&self) -> u64 {
        self.pool_count
    }

    pub fn pool(&self, id: PoolId) -> Result<&PoolInfo, ClientError> {
        self.pools.get(&id).ok_or(ClientError::PoolNotFound(id))
    }

    pub fn pools(&self) -> impl Iterator<Item = &PoolInfo> {
        self.pools.values()
    }

    /// The most recently created pool (pool ids are creation timestamps).
    pub fn latest_pool(&self) -> Result<&PoolInfo, ClientError> {
        self.pools.values().next_back().ok_or(ClientError::NoPools)
    }

    /// An account's open deposit slots, decoded for display.
    pub fn stakes(&self, addr: &Address) -> Result<Vec<StakeView>, ClientError> {
        let mut out = Vec::new();
        for (key, value) in self.node.local_state(addr)? {
            if parse_slot_key(&key).is_ok() {
                out.push(StakeView::from(SlotRecord::decode(&value)?));
            }
        }
        Ok(out)
    }

    // ── Submission helpers ──────────────────────────────────────────────

    /// Opt the escrow into a new staking asset. Advisory failure if the
    /// escrow already holds it.
    pub fn submit_escrow_opt_in(
        &self,
        sender: Address,
        asset: AssetId,
    ) -> Result<(), ClientError> {
        if self.node.is_opted_in_asset(&self.node.escrow(), asset)? {
            return Err(ClientError::EscrowAlreadyOptedIn { asset });
        }
        let group = groups::escrow_opt_in_group(sender, self.node.escrow(), asset);
        Ok(self.node.submit_group(group)?)
    }

    pub fn submit_create_pool(
        &self,
        sender: Address,
        asset: AssetId,
        rewards: u64,
        start_time: u64,
        time_delta: u64,
    ) -> Result<(), ClientError> {
        let group = groups::create_pool_group(
            sender,
            self.node.escrow(),
            asset,
            rewards,
            start_time,
            time_delta,
        );
        Ok(self.node.submit_group(group)?)
    }

    /// Stake into a cached pool; the asset id comes from the cache.
    pub fn submit_deposit(
        &self,
        sender: Address,
        pool_id: PoolId,
        amount: u64,
    ) -> Result<(), ClientError> {
        let asset = self.pool(pool_id)?.asset_id;
        let group = groups::deposit_group(sender, self.node.escrow(), asset, pool_id, amount);
        Ok(self.node.submit_group(group)?)
    }

    /// Claim from a cached pool. A cache miss is reported as a deletion,
    /// pointing the caller at withdraw.
    pub fn submit_claim(&self, sender: Address, pool_id: PoolId) -> Result<(), ClientError> {
        let asset = self
            .pool(pool_id)
            .map_err(|_| ClientError::PoolDeleted(pool_id))?
            .asset_id;
        Ok(self.node.submit_group(vec![groups::claim_call(
            sender, asset, pool_id,
        )])?)
    }

    /// Withdraw the principal from a deleted pool. The pool record is gone,
    /// so the asset id is recovered from the sender's own deposit slots.
    pub fn submit_withdraw(&self, sender: Address, pool_id: PoolId) -> Result<(), ClientError> {
        let asset = match self.pool(pool_id) {
            Ok(pool) => pool.asset_id,
            Err(_) => self
                .stakes(&sender)?
                .into_iter()
                .find(|stake| stake.pool_id == pool_id)
                .map(|stake| stake.asset_id)
                .ok_or(ClientError::NoStakeInPool(pool_id))?,
        };
        Ok(self.node.submit_group(vec![groups::withdraw_call(
            sender, asset, pool_id,
        )])?)
    }

    pub fn submit_delete_pool(&self, sender: Address, pool_id: PoolId) -> Result<(), ClientError> {
        let asset = self.pool(pool_id)?.asset_id;
        Ok(self.node.submit_group(vec![groups::delete_pool_call(
            sender, asset, pool_id,
        )])?)
    }

    /// Opt an account into the application. Advisory failure if it already is.
    pub fn submit_app_opt_in(&self, sender: Address) -> Result<(), ClientError> {
        if self.node.is_opted_in_app(&sender)? {
            return Err(ClientError::AlreadyOptedIn {
                address: addr_to_hex(&sender),
            });
        }
        Ok(self.node.submit_group(vec![groups::app_opt_in(sender)])?)
    }

    /// Close an account out of the application. Advisory failure if it is
    /// not opted in.
    pub fn submit_app_close_out(&self, sender: Address) -> Result<(), ClientError> {
        if !self.node.is_opted_in_app(&sender)? {
            return Err(ClientError::NotOptedIn {
                address: addr_to_hex(&sender),
            });
        }
        Ok(self.node.submit_group(vec![groups::app_close_out(sender)])?)
    }
}
