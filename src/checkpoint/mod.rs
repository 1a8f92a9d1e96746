//! Checkpoint and resume for automata.
//!
//! A checkpoint records where an automaton stands on its graph, the edges
//! it has taken, and a structural snapshot of the graph itself. Transition
//! behaviors are not serializable, so resuming takes a graph supplied by
//! the caller and checks it against the snapshot before placing a fresh
//! automaton on the recorded node.

use crate::builder::AutomatonOptions;
use crate::core::{StateHistory, StateValue};
use crate::engine::Automaton;
use crate::graph::Graph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// One edge of a graph snapshot, by node index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub from: usize,
    pub to: usize,
    pub transition: String,
}

/// Structure of a graph at capture time: node values in index order and
/// edges in insertion order, with transitions recorded by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<StateValue>,
    pub edges: Vec<EdgeSnapshot>,
    pub entry: usize,
    pub exit: usize,
    pub mutable: bool,
}

impl GraphSnapshot {
    pub fn of(graph: &Graph) -> Self {
        let edges = graph
            .edges()
            .into_iter()
            .map(|edge| EdgeSnapshot {
                from: edge.from.index(),
                to: edge.to.index(),
                transition: edge.transition.name().to_string(),
            })
            .collect();

        Self {
            nodes: graph.states(),
            edges,
            entry: graph.entry().index(),
            exit: graph.exit().index(),
            mutable: graph.is_mutable(),
        }
    }

    /// Check that `graph` still starts with the snapshot's nodes and edges.
    ///
    /// A mutable graph may have grown since the capture; anything appended
    /// after the recorded prefix is accepted.
    fn matches(&self, graph: &Graph) -> Result<(), CheckpointError> {
        let current = Self::of(graph);

        if current.entry != self.entry || current.exit != self.exit {
            return Err(CheckpointError::ValidationFailed(
                "entry or exit node moved".to_string(),
            ));
        }
        if !current.nodes.starts_with(&self.nodes) {
            return Err(CheckpointError::ValidationFailed(format!(
                "graph does not start with the {} recorded nodes",
                self.nodes.len()
            )));
        }
        if !current.edges.starts_with(&self.edges) {
            return Err(CheckpointError::ValidationFailed(format!(
                "graph does not start with the {} recorded edges",
                self.edges.len()
            )));
        }
        Ok(())
    }
}

/// Serializable checkpoint of an automaton.
/// Does NOT include transition behaviors (not serializable).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Index of the node the automaton sat on
    pub current_node: usize,

    /// Value held by that node
    pub current_state: StateValue,

    pub options: AutomatonOptions,

    /// Complete transition history
    pub history: StateHistory,

    pub graph: GraphSnapshot,
}

impl Checkpoint {
    /// Record the current position of `automaton`.
    pub fn capture(automaton: &Automaton) -> Self {
        let node = automaton.current_node();
        let checkpoint = Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            current_node: node.index(),
            current_state: automaton.current_state(),
            options: automaton.options(),
            history: automaton.history(),
            graph: GraphSnapshot::of(automaton.graph()),
        };
        debug!(
            checkpoint = %checkpoint.id,
            node = checkpoint.current_node,
            steps = checkpoint.history.len(),
            "captured checkpoint"
        );
        checkpoint
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    /// Check internal consistency without a graph at hand.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        match self.graph.nodes.get(self.current_node) {
            Some(state) if *state == self.current_state => Ok(()),
            Some(state) => Err(CheckpointError::ValidationFailed(format!(
                "node #{} holds {}, checkpoint says {}",
                self.current_node, state, self.current_state
            ))),
            None => Err(CheckpointError::ValidationFailed(format!(
                "node #{} is outside the {} recorded nodes",
                self.current_node,
                self.graph.nodes.len()
            ))),
        }
    }

    /// Create an automaton over `graph` positioned where this checkpoint
    /// left off, with the recorded history.
    ///
    /// `graph` must start with the recorded nodes and edges.
    pub fn restore(&self, graph: impl Into<Graph>) -> Result<Automaton, CheckpointError> {
        self.validate()?;
        let graph = graph.into();
        self.graph.matches(&graph)?;

        let node = graph.node(self.current_node).ok_or_else(|| {
            CheckpointError::ValidationFailed(format!("node #{} is missing", self.current_node))
        })?;

        let automaton = Automaton::with_options(graph, self.options);
        automaton
            .force_state(node)
            .map_err(|e| CheckpointError::ValidationFailed(e.to_string()))?;
        automaton.replace_history(self.history.clone());

        debug!(checkpoint = %self.id, node = self.current_node, "restored checkpoint");
        Ok(automaton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::chain;
    use crate::core::Channel;
    use crate::engine::{Transition, Write};
    use crate::graph::MutableGraph;

    fn walked() -> (crate::graph::FrozenGraph, Automaton) {
        let graph = chain([
            Transition::Automatic,
            Transition::Automatic,
            Transition::Automatic,
        ])
        .freeze();
        let automaton = Automaton::new(graph.clone());
        automaton.advance(&[None]).unwrap();
        automaton.advance(&[None]).unwrap();
        (graph, automaton)
    }

    #[test]
    fn capture_records_position_and_history() {
        let (_, automaton) = walked();
        let checkpoint = Checkpoint::capture(&automaton);

        assert_eq!(checkpoint.version, CHECKPOINT_VERSION);
        assert_eq!(checkpoint.current_node, automaton.current_node().index());
        assert_eq!(checkpoint.current_state, StateValue::Step(2));
        assert_eq!(checkpoint.history.len(), 2);
        assert_eq!(checkpoint.graph.nodes.len(), 4);
        assert_eq!(checkpoint.graph.edges.len(), 3);
        assert!(!checkpoint.graph.mutable);
        assert!(Uuid::parse_str(&checkpoint.id).is_ok());
    }

    #[test]
    fn json_round_trip_restores_and_continues() {
        let (graph, automaton) = walked();
        let json = Checkpoint::capture(&automaton).to_json().unwrap();

        let restored = Checkpoint::from_json(&json).unwrap().restore(graph).unwrap();
        assert_eq!(restored.current_state(), StateValue::Step(2));
        assert_eq!(restored.history(), automaton.history());

        assert!(restored.advance(&[None]).unwrap());
        assert!(restored.is_at_exit());
    }

    #[test]
    fn binary_round_trip() {
        let (graph, automaton) = walked();
        let bytes = Checkpoint::capture(&automaton).to_bytes().unwrap();

        let restored = Checkpoint::from_bytes(&bytes).unwrap().restore(graph).unwrap();
        assert_eq!(restored.current_node().index(), automaton.current_node().index());
    }

    #[test]
    fn rejects_unknown_version() {
        let (_, automaton) = walked();
        let mut checkpoint = Checkpoint::capture(&automaton);
        checkpoint.version = 99;

        let json = checkpoint.to_json().unwrap();
        assert!(matches!(
            Checkpoint::from_json(&json),
            Err(CheckpointError::UnsupportedVersion { found: 99, supported: 1 })
        ));
    }

    #[test]
    fn rejects_a_graph_with_different_structure() {
        let (_, automaton) = walked();
        let checkpoint = Checkpoint::capture(&automaton);

        let other = chain([Transition::Automatic]).freeze();
        assert!(matches!(
            checkpoint.restore(other),
            Err(CheckpointError::ValidationFailed(_))
        ));

        let same_shape = chain([
            Transition::Impossible,
            Transition::Automatic,
            Transition::Automatic,
        ])
        .freeze();
        assert!(matches!(
            checkpoint.restore(same_shape),
            Err(CheckpointError::ValidationFailed(_))
        ));
    }

    #[test]
    fn accepts_a_tape_that_grew_after_capture() {
        let tape = Channel::mandatory("tape").unwrap();
        let graph = MutableGraph::new(StateValue::Entry, StateValue::Exit);
        let target = Automaton::new(graph.clone());
        let write = Transition::from(Write::new(tape, Transition::Automatic, "cell").unwrap());

        write
            .invoke(&[Some(target.clone()), Some(Automaton::null())])
            .unwrap();
        let checkpoint = Checkpoint::capture(&target);
        assert!(checkpoint.graph.mutable);

        write
            .invoke(&[Some(target.clone()), Some(Automaton::null())])
            .unwrap();

        let restored = checkpoint.restore(graph).unwrap();
        assert_eq!(restored.current_node().index(), 2);
        assert_eq!(restored.current_state(), StateValue::from("cell"));
    }

    #[test]
    fn tampered_state_fails_validation() {
        let (_, automaton) = walked();
        let mut checkpoint = Checkpoint::capture(&automaton);
        checkpoint.current_state = StateValue::Exit;

        assert!(matches!(
            checkpoint.validate(),
            Err(CheckpointError::ValidationFailed(_))
        ));

        checkpoint.current_node = 40;
        assert!(checkpoint.validate().is_err());
    }
}
