//! Precondition checks for transition invocations.
//!
//! The channel-presence contract uses Stillwater's `Validation` type so a
//! rejected invocation reports every missing or mismatched channel in one
//! pass instead of the first one only.
//!
//! # Example
//!
//! ```rust
//! use tapeworks::enforcement::require;
//!
//! #[derive(Debug, PartialEq)]
//! struct TooSmall(usize);
//!
//! assert_eq!(require(4 > 2, || TooSmall(4)), Ok(()));
//! assert_eq!(require(1 > 2, || TooSmall(1)), Err(TooSmall(1)));
//! ```

pub mod contract;
pub mod violations;

pub use contract::ChannelContract;
pub use violations::{BindingViolation, ContractViolation};

/// Fail with the error produced by `error` unless `condition` holds.
pub fn require<E>(condition: bool, error: impl FnOnce() -> E) -> Result<(), E> {
    if condition {
        Ok(())
    } else {
        Err(error())
    }
}
