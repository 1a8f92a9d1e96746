//! Transition behaviors attached to graph edges.

use crate::core::Channel;
use crate::engine::composite::Composite;
use crate::engine::machine::{Automaton, Binding};
use crate::engine::write::Write;
use crate::enforcement::{ChannelContract, ContractViolation};
use crate::trace;
use std::fmt;
use std::sync::Arc;

static TRACE_ONLY: [Channel; 1] = [Channel::TRACE];

/// Extension point for domain-specific transitions.
///
/// `apply` receives one automaton per declared channel, in declaration
/// order, after the channel contract has been satisfied. It may change the
/// graph or position of any automaton it is handed, but never the
/// automaton driving it: that one only moves when `apply` returns `true`.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tapeworks::core::{Channel, StateValue};
/// use tapeworks::engine::{Automaton, Behavior, Transition};
/// use tapeworks::graph::FrozenGraph;
///
/// /// Passes while the bound tape sits at its entry node.
/// struct AtStart {
///     channels: Vec<Channel>,
/// }
///
/// impl Behavior for AtStart {
///     fn name(&self) -> &str {
///         "at-start"
///     }
///
///     fn channels(&self) -> &[Channel] {
///         &self.channels
///     }
///
///     fn apply(&self, bound: &[Automaton]) -> bool {
///         bound[0].is_at_entry()
///     }
/// }
///
/// let tape = Channel::mandatory("tape").unwrap();
/// let transition = Transition::custom(Arc::new(AtStart { channels: vec![tape] }));
///
/// let bound = Automaton::new(FrozenGraph::empty());
/// assert!(transition.invoke(&[Some(bound)]).unwrap());
/// assert!(transition.invoke(&[None]).is_err());
/// ```
pub trait Behavior: Send + Sync {
    fn name(&self) -> &str;

    /// Channels this behavior needs bound. Fixed for its whole lifetime.
    fn channels(&self) -> &[Channel];

    fn apply(&self, bound: &[Automaton]) -> bool;
}

/// The behavior bound to one edge.
///
/// Built-in kinds are variants; anything else goes through
/// [`Behavior`] as [`Transition::Custom`].
#[derive(Clone)]
pub enum Transition {
    /// Always succeeds.
    Automatic,
    /// Always fails.
    Impossible,
    /// Runs a private sub-automaton to completion.
    Composite(Arc<Composite>),
    /// Appends an edge to a bound automaton's graph.
    Write(Arc<Write>),
    Custom(Arc<dyn Behavior>),
}

impl Transition {
    pub fn custom(behavior: Arc<dyn Behavior>) -> Self {
        Self::Custom(behavior)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Automatic => "automatic",
            Self::Impossible => "impossible",
            Self::Composite(composite) => composite.name(),
            Self::Write(write) => write.name(),
            Self::Custom(behavior) => behavior.name(),
        }
    }

    /// Channels this transition must be bound to, in binding order.
    pub fn channels(&self) -> &[Channel] {
        match self {
            Self::Automatic | Self::Impossible => &TRACE_ONLY,
            Self::Composite(composite) => composite.channels(),
            Self::Write(write) => write.channels(),
            Self::Custom(behavior) => behavior.channels(),
        }
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self, Self::Automatic)
    }

    /// Check the bindings against the channel contract, then run.
    ///
    /// An absent optional slot defaults to [`Automaton::null`], as it does
    /// for [`Automaton::advance`]; an absent mandatory slot is rejected.
    pub fn invoke(&self, bindings: &[Binding]) -> Result<bool, ContractViolation> {
        let bound = ChannelContract::new(self.name(), self.channels()).resolve(bindings)?;
        self.apply(&bound)
    }

    /// Run with bindings that already satisfy the contract.
    pub(crate) fn apply(&self, bound: &[Automaton]) -> Result<bool, ContractViolation> {
        match self {
            Self::Automatic => {
                if let Some(sink) = trace::sink_in(self.channels(), bound) {
                    trace::emit(sink, "automatic: taken");
                }
                Ok(true)
            }
            Self::Impossible => {
                if let Some(sink) = trace::sink_in(self.channels(), bound) {
                    trace::emit(sink, "impossible: refused");
                }
                Ok(false)
            }
            Self::Composite(composite) => composite.run(bound),
            Self::Write(write) => Ok(write.apply(bound)),
            Self::Custom(behavior) => Ok(behavior.apply(bound)),
        }
    }
}

impl From<Composite> for Transition {
    fn from(composite: Composite) -> Self {
        Self::Composite(Arc::new(composite))
    }
}

impl From<Write> for Transition {
    fn from(write: Write) -> Self {
        Self::Write(Arc::new(write))
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transition({})", self.name())
    }
}
