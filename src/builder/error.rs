//! Errors for structural misuse while building graphs, channels and automata.

use crate::graph::{GraphId, NodeId};
use thiserror::Error;

/// Errors that can occur when building channels, graphs and automata.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Channel identity must not be empty")]
    EmptyChannelIdentity,

    #[error("Channel identity '{0}' is reserved")]
    ReservedChannelIdentity(String),

    #[error("Write target channel '{0}' must be mandatory")]
    OptionalDataChannel(String),

    #[error("Write target cannot be the implicit 'self' channel")]
    ImplicitDataChannel,

    #[error("Node {node} belongs to graph {}, not graph {graph}", .node.graph())]
    ForeignNode { node: NodeId, graph: GraphId },

    #[error("Node index {index} out of range for a graph with {len} nodes")]
    UnknownNode { index: usize, len: usize },

    #[error("Graph not specified. Call .graph(graph) before .build()")]
    MissingGraph,
}
