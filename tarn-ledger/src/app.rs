//! The application interface the ledger dispatches into.

use crate::context::CallContext;
use crate::error::Rejection;

/// A deterministic application program.
///
/// `approve` is the approval program: it validates the call against the
/// whole group and applies state changes through the context. Returning an
/// error rejects the call, which aborts the entire group.
///
/// `clear_state` is the forced-exit program: it cannot refuse: whatever it
/// manages to write is kept, and the caller's local state is discarded by
/// the host afterwards regardless.
pub trait Application: Send + Sync {
    /// Run once when the application is installed. Used to write the
    /// genesis state (the INFO record).
    fn on_create(&self, ctx: &CallContext<'_>) -> Result<(), Rejection>;

    /// Approval program for every grouped or standalone call.
    fn approve(&self, ctx: &CallContext<'_>) -> Result<(), Rejection>;

    /// Clear-state program; best-effort, never rejects.
    fn clear_state(&self, ctx: &CallContext<'_>);
}
