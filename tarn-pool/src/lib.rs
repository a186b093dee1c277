//! The Tarn staking-pool application.
//!
//! A manager funds time-bounded reward pools; depositors stake the pool's
//! asset while it runs and accrue a score of `amount × remaining time`.
//! After the pool ends each depositor claims principal plus a reward
//! proportional to their share of the total score. Each account holds at
//! most four concurrent positions, recorded in its local state.
//!
//! Every operation is a precondition set over the submitted transaction
//! group followed by byte-splice state updates, executed under the host's
//! all-or-nothing commit. The call vocabulary (first argument):
//!
//! | tag  | args | operation            | group shape                       |
//! |------|------|----------------------|-----------------------------------|
//! | `OI` | 1    | escrow asset opt-in  | [funding payment, call]           |
//! | `CP` | 3    | create pool          | [reward asset transfer, call]     |
//! | `DP` | 2    | deposit              | [stake asset transfer, call]      |
//! | `CL` | 2    | claim                | [call], double fee                |
//! | `WD` | 2    | withdraw             | [call], double fee                |
//! | `DL` | 2    | delete pool          | [call], double fee                |

pub mod ops;
pub mod reward;
pub mod slots;

mod math;

use tarn_ledger::{Application, CallContext, OnComplete, Rejection};
use tarn_state::constants::DEFAULT_CLAIM_WINDOW;
use tarn_state::keys::INFO_KEY;
use tarn_state::primitives::Address;
use tarn_state::InfoRecord;

pub use tarn_state::tags::{
    TAG_CLAIM, TAG_CREATE_POOL, TAG_DELETE_POOL, TAG_DEPOSIT, TAG_ESCROW_OPT_IN, TAG_WITHDRAW,
};

/// The staking application. Deployment parameters are fixed at install
/// time; the contract itself is immutable and non-deletable.
pub struct StakingApp {
    manager: Address,
    claim_window: u64,
}

impl StakingApp {
    pub fn new(manager: Address) -> Self {
        StakingApp {
            manager,
            claim_window: DEFAULT_CLAIM_WINDOW,
        }
    }

    /// Override the post-end claim window (seconds). After a pool has been
    /// over for this long the manager may delete it even with open slots.
    pub fn with_claim_window(mut self, claim_window: u64) -> Self {
        self.claim_window = claim_window;
        self
    }

    pub fn manager(&self) -> Address {
        self.manager
    }

    pub fn claim_window(&self) -> u64 {
        self.claim_window
    }

    fn dispatch_noop(&self, ctx: &CallContext<'_>) -> Result<(), Rejection> {
        let args = ctx.args();
        let tag = args
            .first()
            .map(|a| a.as_slice())
            .ok_or_else(|| Rejection::invalid_input("missing call tag"))?;

        match (tag, args.len()) {
            (t, 1) if t == TAG_ESCROW_OPT_IN => ops::escrow::opt_in_asset(self, ctx),
            (t, 3) if t == TAG_CREATE_POOL => ops::create::create_pool(self, ctx),
            (t, 2) if t == TAG_DEPOSIT => ops::deposit::deposit(ctx),
            (t, 2) if t == TAG_CLAIM => ops::claim::claim(ctx),
            (t, 2) if t == TAG_WITHDRAW => ops::withdraw::withdraw(ctx),
            (t, 2) if t == TAG_DELETE_POOL => ops::delete::delete_pool(self, ctx),
            _ => Err(Rejection::invalid_input(format!(
                "unknown tag {:?} with {} args",
                String::from_utf8_lossy(tag),
                args.len()
            ))),
        }
    }
}

impl Application for StakingApp {
    fn on_create(&self, ctx: &CallContext<'_>) -> Result<(), Rejection> {
        ctx.global_put(INFO_KEY, &InfoRecord::new(self.manager).encode())
    }

    fn approve(&self, ctx: &CallContext<'_>) -> Result<(), Rejection> {
        match ctx.on_complete() {
            OnComplete::NoOp => self.dispatch_noop(ctx),
            OnComplete::OptIn => Ok(()),
            OnComplete::CloseOut => ops::account::close_out(ctx),
            // Immutable and non-deletable once deployed: depositors can rely
            // on the rules never changing underneath them.
            OnComplete::UpdateApplication | OnComplete::DeleteApplication => {
                Err(Rejection::custom("application is immutable"))
            }
            OnComplete::ClearState => Err(Rejection::custom("clear state bypasses approval")),
        }
    }

    fn clear_state(&self, ctx: &CallContext<'_>) {
        ops::account::clear(ctx);
    }
}

/// Parse an 8-byte big-endian u64 call argument.
pub(crate) fn arg_u64(args: &[Vec<u8>], index: usize) -> Result<u64, Rejection> {
    let arg = args
        .get(index)
        .ok_or_else(|| Rejection::invalid_input(format!("missing argument {index}")))?;
    let bytes: [u8; 8] = arg
        .as_slice()
        .try_into()
        .map_err(|_| Rejection::invalid_input(format!("argument {index} is not 8 bytes")))?;
    Ok(u64::from_be_bytes(bytes))
}
