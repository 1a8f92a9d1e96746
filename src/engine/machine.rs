//! Automaton that walks a graph by running the transitions on its edges.

use crate::builder::{AutomatonOptions, BuildError};
use crate::core::{Channel, StateHistory, StateValue, StepRecord};
use crate::engine::transition::Transition;
use crate::enforcement::{BindingViolation, ChannelContract, ContractViolation};
use crate::graph::{Edge, FrozenGraph, Graph, NodeId};
use chrono::Utc;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// One slot of an invocation: the automaton bound to a channel, if any.
pub type Binding = Option<Automaton>;

const SUBJECT: &str = "automaton";

static NULL_SINK: OnceLock<Automaton> = OnceLock::new();

/// A current-node pointer over a shared graph.
///
/// Cloning an `Automaton` yields another handle to the same automaton, so
/// the same value can be bound to several channels or drive one graph
/// while being written to as a tape by another.
///
/// # Example
///
/// ```rust
/// use tapeworks::builder::chain;
/// use tapeworks::core::{Channel, StateValue};
/// use tapeworks::engine::{Automaton, Transition};
///
/// let automaton = Automaton::new(chain([Transition::Automatic, Transition::Automatic]));
/// assert_eq!(automaton.channels(), &[Channel::TRACE]);
///
/// assert!(automaton.advance(&[None]).unwrap());
/// assert_eq!(automaton.current_state(), StateValue::Step(1));
///
/// assert!(automaton.advance(&[None]).unwrap());
/// assert!(automaton.is_at_exit());
/// ```
#[derive(Clone)]
pub struct Automaton {
    inner: Arc<Inner>,
}

struct Inner {
    graph: Graph,
    channels: Vec<Channel>,
    options: AutomatonOptions,
    cursor: Mutex<Cursor>,
}

struct Cursor {
    node: NodeId,
    history: StateHistory,
}

impl Automaton {
    /// Create an automaton at the graph's entry node with default options.
    pub fn new(graph: impl Into<Graph>) -> Self {
        Self::with_options(graph, AutomatonOptions::default())
    }

    pub fn with_options(graph: impl Into<Graph>, options: AutomatonOptions) -> Self {
        let graph = graph.into();
        let channels = graph.channels();
        Self::assemble(graph, channels, options)
    }

    /// Create an automaton whose channel list is fixed by the caller rather
    /// than read off the graph.
    pub(crate) fn with_channels(graph: Graph, channels: Vec<Channel>) -> Self {
        Self::assemble(graph, channels, AutomatonOptions::default())
    }

    fn assemble(graph: Graph, channels: Vec<Channel>, options: AutomatonOptions) -> Self {
        let entry = graph.entry();
        let automaton = Automaton {
            inner: Arc::new(Inner {
                graph,
                channels,
                options,
                cursor: Mutex::new(Cursor {
                    node: entry,
                    history: StateHistory::new(),
                }),
            }),
        };
        if options.allow_auto_advance_on_entry {
            automaton.auto_advance();
        }
        automaton
    }

    /// The shared "no trace sink bound" sentinel.
    ///
    /// Runs over an empty frozen graph and refuses trace records.
    pub fn null() -> Self {
        NULL_SINK
            .get_or_init(|| {
                Automaton::with_options(
                    FrozenGraph::empty(),
                    AutomatonOptions {
                        allow_auto_advance_on_entry: false,
                        traceable: false,
                    },
                )
            })
            .clone()
    }

    pub fn is_null(&self) -> bool {
        NULL_SINK.get().is_some_and(|null| self.ptr_eq(null))
    }

    /// True when both handles refer to the same automaton.
    pub fn ptr_eq(&self, other: &Automaton) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn graph(&self) -> &Graph {
        &self.inner.graph
    }

    /// Channels callers must bind, in binding order.
    ///
    /// The union of the channels declared by the graph's edges when the
    /// automaton was created, first-seen order, without [`Channel::SELF`].
    pub fn channels(&self) -> &[Channel] {
        &self.inner.channels
    }

    pub fn required_channels(&self) -> Vec<Channel> {
        self.channels()
            .iter()
            .filter(|c| c.is_mandatory())
            .cloned()
            .collect()
    }

    pub fn optional_channels(&self) -> Vec<Channel> {
        self.channels()
            .iter()
            .filter(|c| !c.is_mandatory())
            .cloned()
            .collect()
    }

    pub fn options(&self) -> AutomatonOptions {
        self.inner.options
    }

    pub fn is_traceable(&self) -> bool {
        self.inner.options.traceable
    }

    pub fn allows_auto_advance_on_entry(&self) -> bool {
        self.inner.options.allow_auto_advance_on_entry
    }

    pub fn current_node(&self) -> NodeId {
        self.inner.cursor.lock().node
    }

    pub fn current_state(&self) -> StateValue {
        self.state_of(self.current_node())
    }

    pub fn is_at_exit(&self) -> bool {
        self.current_node() == self.inner.graph.exit()
    }

    pub fn is_at_entry(&self) -> bool {
        self.current_node() == self.inner.graph.entry()
    }

    /// A copy of every edge taken so far.
    pub fn history(&self) -> StateHistory {
        self.inner.cursor.lock().history.clone()
    }

    /// Try to take one outgoing edge of the current node.
    ///
    /// `bindings` follow [`channels`](Automaton::channels); an absent
    /// optional slot defaults to the null sink. Outgoing edges are tried in
    /// insertion order and the first one whose guard accepts and whose
    /// transition succeeds is taken.
    ///
    /// Returns `Ok(true)` when an edge was taken or the automaton already
    /// sits at its exit node, `Ok(false)` when no edge could be taken.
    /// Binding violations abort with `Err`.
    pub fn advance(&self, bindings: &[Binding]) -> Result<bool, ContractViolation> {
        let bound = ChannelContract::new(SUBJECT, &self.inner.channels).resolve(bindings)?;

        if self.is_at_exit() {
            return Ok(true);
        }

        let from = self.current_node();
        let edges = self.inner.graph.outgoing(from);
        for edge in &edges {
            let slots = self.select(&edge.transition, &bound)?;
            if let Some(guard) = &edge.guard {
                if !guard.check(&slots) {
                    continue;
                }
            }
            if edge.transition.apply(&slots)? {
                self.take(edge);
                return Ok(true);
            }
        }

        debug!(
            graph = %self.inner.graph.id(),
            node = %from,
            edges = edges.len(),
            "no edge could be taken"
        );
        Ok(false)
    }

    /// Move to `node` unconditionally.
    ///
    /// Used after a structural change to this automaton's graph; the node
    /// must belong to that graph.
    pub fn force_state(&self, node: NodeId) -> Result<(), BuildError> {
        self.inner.graph.read(|arena| arena.locate(node))?;
        self.inner.cursor.lock().node = node;
        Ok(())
    }

    /// Return to the entry node and forget the history.
    pub fn reset(&self) {
        {
            let mut cursor = self.inner.cursor.lock();
            cursor.node = self.inner.graph.entry();
            cursor.history = StateHistory::new();
        }
        if self.inner.options.allow_auto_advance_on_entry {
            self.auto_advance();
        }
    }

    pub(crate) fn replace_history(&self, history: StateHistory) {
        self.inner.cursor.lock().history = history;
    }

    /// Gather the slots an edge's transition declares from the automaton's
    /// bound channels.
    fn select(
        &self,
        transition: &Transition,
        bound: &[Automaton],
    ) -> Result<Vec<Automaton>, ContractViolation> {
        let declared = transition.channels();
        let mut slots = Vec::with_capacity(declared.len());
        let mut violations = Vec::new();

        for (position, channel) in declared.iter().enumerate() {
            if channel.is_implicit() {
                slots.push(self.clone());
                continue;
            }
            match self.inner.channels.iter().position(|c| c == channel) {
                Some(index) => slots.push(bound[index].clone()),
                None if !channel.is_mandatory() => slots.push(Automaton::null()),
                None => violations.push(BindingViolation::BindingAbsent {
                    channel: channel.identity().to_string(),
                    position,
                }),
            }
        }

        if violations.is_empty() {
            Ok(slots)
        } else {
            Err(ContractViolation {
                subject: transition.name().to_string(),
                violations,
            })
        }
    }

    fn take(&self, edge: &Edge) {
        let step = StepRecord {
            from: self.state_of(edge.from),
            to: self.state_of(edge.to),
            transition: edge.transition.name().to_string(),
            timestamp: Utc::now(),
        };
        debug!(
            graph = %self.inner.graph.id(),
            from = %step.from,
            to = %step.to,
            transition = %step.transition,
            "advanced"
        );

        let mut cursor = self.inner.cursor.lock();
        cursor.node = edge.to;
        cursor.history.record(step);
    }

    /// Follow unguarded automatic edges out of the entry node.
    ///
    /// Bounded by the node count so an automatic cycle cannot spin.
    fn auto_advance(&self) {
        let exit = self.inner.graph.exit();
        for _ in 0..self.inner.graph.node_count() {
            let from = self.current_node();
            if from == exit {
                break;
            }
            let next = self
                .inner
                .graph
                .outgoing(from)
                .into_iter()
                .find(|edge| edge.guard.is_none() && edge.transition.is_automatic());
            match next {
                Some(edge) => self.take(&edge),
                None => break,
            }
        }
    }

    fn state_of(&self, node: NodeId) -> StateValue {
        self.inner
            .graph
            .state(node)
            .expect("automaton nodes always belong to its graph")
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("graph", &self.inner.graph.id())
            .field("node", &self.current_node())
            .field("channels", &self.inner.channels)
            .field("options", &self.inner.options)
            .finish()
    }
}
