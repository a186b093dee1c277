//! Client facade for the Tarn staking application.
//!
//! What a user-facing SDK does for the on-chain deployment: build the
//! transaction groups each operation expects, decode raw global and local
//! state into typed views, and keep a refreshable cache of the live pools.
//! The [`Node`] trait is the collaborator boundary; the in-process ledger
//! implements it, so the whole facade is testable end to end without a
//! network.

pub mod client;
pub mod error;
pub mod groups;
pub mod node;
pub mod view;

pub use client::StakingClient;
pub use error::ClientError;
pub use node::Node;
pub use view::{PoolInfo, StakeView};
