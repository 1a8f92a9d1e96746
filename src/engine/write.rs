//! The mutating transition: grows another automaton's graph.

use crate::builder::BuildError;
use crate::core::{Channel, StateValue};
use crate::engine::machine::Automaton;
use crate::engine::transition::Transition;
use crate::enforcement::require;
use crate::trace;
use tracing::{debug, warn};

const TRACE_TARGET: Channel = Channel::reserved("trace.target", true);

/// Appends an edge to the automaton bound to its data channel and moves
/// that automaton onto the new node.
///
/// The appended edge runs from the bound automaton's current node, carries
/// the configured transition, and ends at a fresh node holding the
/// configured state value. The change is visible to every automaton
/// sharing the graph. Frozen graphs cannot grow, so writing to an
/// automaton over one fails and changes nothing.
///
/// # Example
///
/// ```rust
/// use tapeworks::core::{Channel, StateValue};
/// use tapeworks::engine::{Automaton, Transition, Write};
/// use tapeworks::graph::{FrozenGraph, MutableGraph};
///
/// let tape = Channel::mandatory("tape").unwrap();
/// let write = Transition::from(Write::new(tape, Transition::Automatic, "mark").unwrap());
///
/// let growable = Automaton::new(MutableGraph::new(StateValue::Entry, StateValue::Exit));
/// assert!(write.invoke(&[Some(growable.clone()), Some(Automaton::null())]).unwrap());
/// assert_eq!(growable.current_state(), StateValue::from("mark"));
///
/// let frozen = Automaton::new(FrozenGraph::empty());
/// assert!(!write.invoke(&[Some(frozen), Some(Automaton::null())]).unwrap());
/// ```
#[derive(Debug)]
pub struct Write {
    name: String,
    channels: [Channel; 2],
    transition: Transition,
    destination: StateValue,
}

impl Write {
    /// Create a write bound to `channel`, which must be a mandatory,
    /// explicit channel.
    pub fn new(
        channel: Channel,
        transition: Transition,
        destination: impl Into<StateValue>,
    ) -> Result<Self, BuildError> {
        require(!channel.is_implicit(), || BuildError::ImplicitDataChannel)?;
        require(channel.is_mandatory(), || {
            BuildError::OptionalDataChannel(channel.identity().to_string())
        })?;
        Ok(Self::assemble(channel, transition, destination.into()))
    }

    /// The write used to append one record to a trace sink.
    pub(crate) fn to_sink(destination: StateValue) -> Self {
        Self::assemble(TRACE_TARGET, Transition::Automatic, destination)
    }

    fn assemble(channel: Channel, transition: Transition, destination: StateValue) -> Self {
        Self {
            name: format!("write({})", channel.identity()),
            channels: [channel, Channel::TRACE],
            transition,
            destination,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The data channel followed by the trace channel.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self) -> &Channel {
        &self.channels[0]
    }

    /// Transition placed on every appended edge.
    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn destination(&self) -> &StateValue {
        &self.destination
    }

    pub(crate) fn apply(&self, bound: &[Automaton]) -> bool {
        let [target, sink] = bound else {
            return false;
        };

        let Some(graph) = target.graph().as_mutable() else {
            debug!(write = %self.name, graph = %target.graph().id(), "target graph is frozen");
            trace::emit(sink, format!("{}: target graph is frozen", self.name));
            return false;
        };

        let from = target.current_node();
        let appended = graph
            .append(from, self.transition.clone(), self.destination.clone())
            .and_then(|node| target.force_state(node).map(|()| node));

        match appended {
            Ok(node) => {
                debug!(write = %self.name, from = %from, to = %node, "appended edge");
                trace::emit(
                    sink,
                    format!("{}: appended {} -> {}", self.name, from, node),
                );
                true
            }
            Err(error) => {
                warn!(write = %self.name, %error, "append failed");
                false
            }
        }
    }
}
