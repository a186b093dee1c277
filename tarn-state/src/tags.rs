//! Call tags: the first application argument of every plain call names the
//! operation being invoked.

pub const TAG_ESCROW_OPT_IN: &[u8] = b"OI";
pub const TAG_CREATE_POOL: &[u8] = b"CP";
pub const TAG_DEPOSIT: &[u8] = b"DP";
pub const TAG_CLAIM: &[u8] = b"CL";
pub const TAG_WITHDRAW: &[u8] = b"WD";
pub const TAG_DELETE_POOL: &[u8] = b"DL";
