//! Growable graph shared between builders and running automata.

use super::arena::Arena;
use super::{EdgeId, FrozenGraph, GraphId, NodeId};
use crate::builder::BuildError;
use crate::core::{Guard, StateValue};
use crate::engine::Transition;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A graph that accepts appends while automata run over it.
///
/// Clones share the same storage. Every append and every
/// [`freeze`](MutableGraph::freeze) holds the graph's lock for its whole
/// duration, so each one is atomic to concurrent readers.
///
/// # Example
///
/// ```rust
/// use tapeworks::core::StateValue;
/// use tapeworks::engine::Transition;
/// use tapeworks::graph::MutableGraph;
///
/// let graph = MutableGraph::new(StateValue::Entry, StateValue::Exit);
/// let middle = graph.new_node("middle");
/// graph.add_edge(graph.entry(), Transition::Automatic, middle).unwrap();
/// graph.add_edge(middle, Transition::Automatic, graph.exit()).unwrap();
///
/// let frozen = graph.freeze();
/// assert_eq!(frozen.edge_count(), 2);
/// ```
#[derive(Clone)]
pub struct MutableGraph {
    id: GraphId,
    entry: NodeId,
    exit: NodeId,
    arena: Arc<Mutex<Arena>>,
}

impl MutableGraph {
    /// Create a graph holding only its entry and exit nodes.
    pub fn new(entry: impl Into<StateValue>, exit: impl Into<StateValue>) -> Self {
        let arena = Arena::new(entry.into(), exit.into());
        Self {
            id: arena.id(),
            entry: arena.entry(),
            exit: arena.exit(),
            arena: Arc::new(Mutex::new(arena)),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn entry(&self) -> NodeId {
        self.entry
    }

    pub fn exit(&self) -> NodeId {
        self.exit
    }

    pub fn new_node(&self, value: impl Into<StateValue>) -> NodeId {
        self.arena.lock().push_node(value.into())
    }

    /// Connect two existing nodes with an unguarded edge.
    pub fn add_edge(
        &self,
        from: NodeId,
        transition: Transition,
        to: NodeId,
    ) -> Result<EdgeId, BuildError> {
        self.arena.lock().push_edge(from, transition, None, to)
    }

    pub fn add_guarded_edge(
        &self,
        from: NodeId,
        transition: Transition,
        guard: Guard,
        to: NodeId,
    ) -> Result<EdgeId, BuildError> {
        self.arena.lock().push_edge(from, transition, Some(guard), to)
    }

    /// Add a fresh node holding `value` and an edge from `from` to it.
    ///
    /// Both are added under a single lock acquisition.
    pub fn append(
        &self,
        from: NodeId,
        transition: Transition,
        value: impl Into<StateValue>,
    ) -> Result<NodeId, BuildError> {
        let mut arena = self.arena.lock();
        let node = arena.append(from, transition, value.into())?;
        trace!(graph = %self.id, nodes = arena.node_count(), "appended edge");
        Ok(node)
    }

    /// Take an immutable snapshot of the graph as it is right now.
    ///
    /// The snapshot keeps this graph's identity, so node handles stay
    /// valid in it.
    pub fn freeze(&self) -> FrozenGraph {
        let arena = self.arena.lock().clone();
        FrozenGraph::from_arena(arena)
    }

    pub fn node_count(&self) -> usize {
        self.arena.lock().node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.arena.lock().edge_count()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Arena) -> R) -> R {
        f(&self.arena.lock())
    }
}

impl fmt::Debug for MutableGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arena = self.arena.lock();
        f.debug_struct("MutableGraph")
            .field("id", &self.id)
            .field("nodes", &arena.node_count())
            .field("edges", &arena.edge_count())
            .finish()
    }
}
