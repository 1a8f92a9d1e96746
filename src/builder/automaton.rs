//! Builder and options for constructing automata.

use crate::builder::error::BuildError;
use crate::engine::Automaton;
use crate::graph::Graph;
use serde::{Deserialize, Serialize};

/// Behavior switches for a single automaton.
///
/// Deserializable so hosts can keep them in configuration files.
///
/// # Example
///
/// ```rust
/// use tapeworks::builder::AutomatonOptions;
///
/// let options: AutomatonOptions =
///     serde_json::from_str(r#"{ "allow_auto_advance_on_entry": true }"#).unwrap();
///
/// assert!(options.allow_auto_advance_on_entry);
/// assert!(options.traceable);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatonOptions {
    /// Follow unguarded automatic edges out of the entry node on
    /// construction and on reset.
    pub allow_auto_advance_on_entry: bool,
    /// Accept trace records when bound to the trace channel.
    pub traceable: bool,
}

impl Default for AutomatonOptions {
    fn default() -> Self {
        Self {
            allow_auto_advance_on_entry: false,
            traceable: true,
        }
    }
}

/// Builder for constructing automata with a fluent API.
#[derive(Debug, Default)]
pub struct AutomatonBuilder {
    graph: Option<Graph>,
    options: AutomatonOptions,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the graph to run over (required).
    pub fn graph(mut self, graph: impl Into<Graph>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    pub fn allow_auto_advance_on_entry(mut self, allow: bool) -> Self {
        self.options.allow_auto_advance_on_entry = allow;
        self
    }

    pub fn traceable(mut self, traceable: bool) -> Self {
        self.options.traceable = traceable;
        self
    }

    /// Replace every option at once.
    pub fn options(mut self, options: AutomatonOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the automaton, positioned at the graph's entry node.
    pub fn build(self) -> Result<Automaton, BuildError> {
        let graph = self.graph.ok_or(BuildError::MissingGraph)?;
        Ok(Automaton::with_options(graph, self.options))
    }
}
