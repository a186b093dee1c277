//! Precondition macros for approval programs.
//!
//! Each guard returns early with the given error when its condition fails.
//! The error expression goes through `Into`, so a bare `&str` becomes
//! [`Rejection::Custom`](crate::Rejection::Custom).

/// Return early with an error unless a condition holds.
///
/// ```ignore
/// ensure!(amount > 0, "amount must be positive");
/// ensure!(ctx.sender() == manager, Rejection::Unauthorized);
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return ::core::result::Result::Err(::core::convert::Into::into($err));
        }
    };
}

/// Return early with an error if two values are not equal.
#[macro_export]
macro_rules! ensure_eq {
    ($left:expr, $right:expr, $err:expr) => {
        if $left != $right {
            return ::core::result::Result::Err(::core::convert::Into::into($err));
        }
    };
}
