//! Index-addressed storage behind both graph flavors.

use super::{Edge, EdgeId, GraphId, NodeId};
use crate::builder::BuildError;
use crate::core::{Channel, Guard, StateValue};
use crate::engine::Transition;

/// Nodes and edges addressed by position. Only ever grows.
#[derive(Clone, Debug)]
pub(crate) struct Arena {
    id: GraphId,
    nodes: Vec<StateValue>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<usize>>,
    entry: NodeId,
    exit: NodeId,
}

impl Arena {
    pub(crate) fn new(entry: StateValue, exit: StateValue) -> Self {
        let id = GraphId::new();
        let mut arena = Arena {
            id,
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            entry: NodeId::new(id, 0),
            exit: NodeId::new(id, 1),
        };
        arena.push_node(entry);
        arena.push_node(exit);
        arena
    }

    pub(crate) fn id(&self) -> GraphId {
        self.id
    }

    pub(crate) fn entry(&self) -> NodeId {
        self.entry
    }

    pub(crate) fn exit(&self) -> NodeId {
        self.exit
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn nodes(&self) -> &[StateValue] {
        &self.nodes
    }

    pub(crate) fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(crate) fn node(&self, index: usize) -> Option<NodeId> {
        (index < self.nodes.len()).then(|| NodeId::new(self.id, index))
    }

    pub(crate) fn state(&self, node: NodeId) -> Option<&StateValue> {
        self.locate(node).ok().map(|index| &self.nodes[index])
    }

    pub(crate) fn outgoing(&self, node: NodeId) -> Vec<Edge> {
        match self.locate(node) {
            Ok(index) => self.outgoing[index]
                .iter()
                .map(|&edge| self.edges[edge].clone())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Resolve a handle to a position, rejecting handles minted elsewhere.
    pub(crate) fn locate(&self, node: NodeId) -> Result<usize, BuildError> {
        if node.graph() != self.id {
            return Err(BuildError::ForeignNode {
                node,
                graph: self.id,
            });
        }
        if node.index() >= self.nodes.len() {
            return Err(BuildError::UnknownNode {
                index: node.index(),
                len: self.nodes.len(),
            });
        }
        Ok(node.index())
    }

    pub(crate) fn push_node(&mut self, value: StateValue) -> NodeId {
        let node = NodeId::new(self.id, self.nodes.len());
        self.nodes.push(value);
        self.outgoing.push(Vec::new());
        node
    }

    pub(crate) fn push_edge(
        &mut self,
        from: NodeId,
        transition: Transition,
        guard: Option<Guard>,
        to: NodeId,
    ) -> Result<EdgeId, BuildError> {
        let source = self.locate(from)?;
        self.locate(to)?;

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            id,
            from,
            transition,
            guard,
            to,
        });
        self.outgoing[source].push(id.0);
        Ok(id)
    }

    /// Add a fresh destination node and an edge to it in one step.
    pub(crate) fn append(
        &mut self,
        from: NodeId,
        transition: Transition,
        value: StateValue,
    ) -> Result<NodeId, BuildError> {
        self.locate(from)?;
        let to = self.push_node(value);
        self.push_edge(from, transition, None, to)?;
        Ok(to)
    }

    /// Every edge's transition, in insertion order.
    pub(crate) fn transitions(&self) -> Vec<Transition> {
        self.edges
            .iter()
            .map(|edge| edge.transition.clone())
            .collect()
    }
}

/// Channels declared by `transitions`, first-seen order, `SELF` left out.
///
/// Runs user `Behavior::channels`, so callers must not hold a graph lock.
pub(crate) fn channel_union(transitions: &[Transition]) -> Vec<Channel> {
    let mut channels: Vec<Channel> = Vec::new();
    for transition in transitions {
        for channel in transition.channels() {
            if !channel.is_implicit() && !channels.contains(channel) {
                channels.push(channel.clone());
            }
        }
    }
    channels
}
