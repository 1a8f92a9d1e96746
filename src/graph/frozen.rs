//! Read-only graph snapshots.

use super::arena::Arena;
use super::{Edge, GraphId, NodeId};
use crate::core::StateValue;
use std::fmt;
use std::sync::Arc;

/// An immutable graph. Cheap to clone; never changes after creation.
#[derive(Clone)]
pub struct FrozenGraph {
    arena: Arc<Arena>,
}

impl FrozenGraph {
    pub(crate) fn from_arena(arena: Arena) -> Self {
        Self {
            arena: Arc::new(arena),
        }
    }

    /// A frozen graph with no edges at all.
    pub fn empty() -> Self {
        Self::from_arena(Arena::new(StateValue::Entry, StateValue::Exit))
    }

    pub fn id(&self) -> GraphId {
        self.arena.id()
    }

    pub fn entry(&self) -> NodeId {
        self.arena.entry()
    }

    pub fn exit(&self) -> NodeId {
        self.arena.exit()
    }

    pub fn node_count(&self) -> usize {
        self.arena.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.arena.edge_count()
    }

    pub fn state(&self, node: NodeId) -> Option<&StateValue> {
        self.arena.state(node)
    }

    pub fn edges(&self) -> &[Edge] {
        self.arena.edges()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Arena) -> R) -> R {
        f(&self.arena)
    }
}

impl fmt::Debug for FrozenGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrozenGraph")
            .field("id", &self.id())
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}
