//! Named tapes that transitions declare and automata are bound to.
//!
//! A channel never carries data. It is only the key under which a caller
//! supplies an [`Automaton`](crate::engine::Automaton) when driving a
//! transition.

use crate::builder::BuildError;
use crate::enforcement::require;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

const SELF_IDENTITY: &str = "self";
const TRACE_IDENTITY: &str = "trace";

/// Identity of an auxiliary tape plus whether it must be bound.
///
/// Equality and hashing use the identity only: two channels with the same
/// identity are interchangeable regardless of how they were constructed.
///
/// # Example
///
/// ```rust
/// use tapeworks::core::Channel;
///
/// let input = Channel::mandatory("input").unwrap();
/// let also_input = Channel::optional("input").unwrap();
///
/// assert!(input.is_mandatory());
/// assert_eq!(input, also_input);
/// assert!(Channel::mandatory("").is_err());
/// assert!(Channel::optional("trace").is_err());
/// ```
#[derive(Clone)]
pub struct Channel {
    identity: Cow<'static, str>,
    mandatory: bool,
}

impl Channel {
    /// The automaton currently attempting to advance.
    ///
    /// Never passed explicitly: the driving automaton fills this slot itself.
    pub const SELF: Channel = Channel::reserved(SELF_IDENTITY, true);

    /// The optional trace sink. Defaults to the null sink when unbound.
    pub const TRACE: Channel = Channel::reserved(TRACE_IDENTITY, false);

    /// Create a channel that must always be bound.
    pub fn mandatory(identity: impl Into<Cow<'static, str>>) -> Result<Self, BuildError> {
        Self::declare(identity.into(), true)
    }

    /// Create a channel that defaults to the null sink when left unbound.
    pub fn optional(identity: impl Into<Cow<'static, str>>) -> Result<Self, BuildError> {
        Self::declare(identity.into(), false)
    }

    pub(crate) const fn reserved(identity: &'static str, mandatory: bool) -> Self {
        Channel {
            identity: Cow::Borrowed(identity),
            mandatory,
        }
    }

    fn declare(identity: Cow<'static, str>, mandatory: bool) -> Result<Self, BuildError> {
        require(!identity.trim().is_empty(), || {
            BuildError::EmptyChannelIdentity
        })?;
        require(
            identity != SELF_IDENTITY && identity != TRACE_IDENTITY,
            || BuildError::ReservedChannelIdentity(identity.to_string()),
        )?;
        Ok(Channel {
            identity,
            mandatory,
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// True for [`Channel::SELF`], which callers never supply.
    pub fn is_implicit(&self) -> bool {
        self.identity == SELF_IDENTITY
    }
}

impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Channel {}

impl Hash for Channel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.mandatory { "mandatory" } else { "optional" };
        write!(f, "Channel({}, {})", self.identity, kind)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity)
    }
}
