//! One module per lifecycle operation, plus the shared group-shape guards.

pub mod account;
pub mod claim;
pub mod create;
pub mod delete;
pub mod deposit;
pub mod escrow;
pub mod guards;
pub mod withdraw;
