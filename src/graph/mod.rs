//! Arena-backed automaton graphs.
//!
//! Nodes and edges live in vectors and refer to each other by index, so
//! appending an edge at runtime is a plain push. A graph comes in two
//! flavors:
//!
//! - [`MutableGraph`]: shared, lock-guarded, accepts appends
//! - [`FrozenGraph`]: immutable snapshot, used for most execution
//!
//! Nodes and edges are never removed or rewired.

mod arena;
mod frozen;
mod mutable;

pub(crate) use arena::Arena;
use arena::channel_union;
pub use frozen::FrozenGraph;
pub use mutable::MutableGraph;

use crate::core::{Channel, Guard, StateValue};
use crate::engine::Transition;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity shared by a mutable graph and every snapshot frozen from it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct GraphId(Uuid);

impl GraphId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Handle to a node, valid only in the graph that minted it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId {
    graph: GraphId,
    index: usize,
}

impl NodeId {
    pub(crate) fn new(graph: GraphId, index: usize) -> Self {
        Self { graph, index }
    }

    pub fn graph(&self) -> GraphId {
        self.graph
    }

    /// Position of the node in insertion order.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Position of an edge in insertion order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A transition-labelled edge.
#[derive(Clone, Debug)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub transition: Transition,
    pub guard: Option<Guard>,
    pub to: NodeId,
}

/// Either graph flavor, as held by an automaton.
#[derive(Clone, Debug)]
pub enum Graph {
    Mutable(MutableGraph),
    Frozen(FrozenGraph),
}

impl Graph {
    pub fn id(&self) -> GraphId {
        match self {
            Self::Mutable(graph) => graph.id(),
            Self::Frozen(graph) => graph.id(),
        }
    }

    pub fn entry(&self) -> NodeId {
        match self {
            Self::Mutable(graph) => graph.entry(),
            Self::Frozen(graph) => graph.entry(),
        }
    }

    pub fn exit(&self) -> NodeId {
        match self {
            Self::Mutable(graph) => graph.exit(),
            Self::Frozen(graph) => graph.exit(),
        }
    }

    pub fn is_mutable(&self) -> bool {
        matches!(self, Self::Mutable(_))
    }

    /// The growable graph, or `None` when this graph is frozen.
    pub fn as_mutable(&self) -> Option<&MutableGraph> {
        match self {
            Self::Mutable(graph) => Some(graph),
            Self::Frozen(_) => None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.read(Arena::node_count)
    }

    pub fn edge_count(&self) -> usize {
        self.read(Arena::edge_count)
    }

    /// Handle of the node at `index`, if the graph has that many nodes.
    pub fn node(&self, index: usize) -> Option<NodeId> {
        self.read(|arena| arena.node(index))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.read(|arena| arena.locate(node).is_ok())
    }

    pub fn state(&self, node: NodeId) -> Option<StateValue> {
        self.read(|arena| arena.state(node).cloned())
    }

    /// Outgoing edges of `node` in insertion order.
    pub fn outgoing(&self, node: NodeId) -> Vec<Edge> {
        self.read(|arena| arena.outgoing(node))
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.read(|arena| arena.edges().to_vec())
    }

    pub fn states(&self) -> Vec<StateValue> {
        self.read(|arena| arena.nodes().to_vec())
    }

    /// Channels declared by the graph's edges, first-seen order.
    ///
    /// Transitions are copied out first so their channel lists are read
    /// without the graph lock held.
    pub fn channels(&self) -> Vec<Channel> {
        channel_union(&self.read(Arena::transitions))
    }

    /// An immutable view: freezes a mutable graph, clones a frozen one.
    pub fn snapshot(&self) -> FrozenGraph {
        match self {
            Self::Mutable(graph) => graph.freeze(),
            Self::Frozen(graph) => graph.clone(),
        }
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Arena) -> R) -> R {
        match self {
            Self::Mutable(graph) => graph.read(f),
            Self::Frozen(graph) => graph.read(f),
        }
    }
}

impl From<MutableGraph> for Graph {
    fn from(graph: MutableGraph) -> Self {
        Self::Mutable(graph)
    }
}

impl From<FrozenGraph> for Graph {
    fn from(graph: FrozenGraph) -> Self {
        Self::Frozen(graph)
    }
}
