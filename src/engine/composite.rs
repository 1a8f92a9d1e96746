//! Transitions that run a whole sub-automaton as one edge.

use crate::builder::chain;
use crate::core::Channel;
use crate::engine::machine::{Automaton, Binding};
use crate::engine::transition::Transition;
use crate::enforcement::ContractViolation;
use crate::graph::Graph;
use crate::trace;
use std::cell::Cell;
use tracing::{debug, warn};

/// Maximum number of sub-automaton steps a composite takes before giving up.
pub const ITERATION_CEILING: usize = 16_384;

/// Maximum number of composite runs nested inside one another on a thread.
///
/// A composite reachable from its own sub-graph would otherwise recurse
/// until the stack overflows.
pub const NESTING_CEILING: usize = 64;

thread_local! {
    static NESTING: Cell<usize> = const { Cell::new(0) };
}

/// One level of composite nesting, released on drop.
struct Nesting;

impl Nesting {
    fn enter() -> Option<Self> {
        NESTING.with(|depth| {
            let current = depth.get();
            if current >= NESTING_CEILING {
                None
            } else {
                depth.set(current + 1);
                Some(Nesting)
            }
        })
    }
}

impl Drop for Nesting {
    fn drop(&mut self) {
        NESTING.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Sequence of child transitions run as if they were a single edge.
///
/// Each invocation drives a fresh automaton over the private sub-graph
/// from its entry node. The composite succeeds when that automaton reaches
/// the exit node and fails when it gets stuck. Children that append to the
/// sub-graph while it is walked can keep it from ever finishing, so the
/// walk is cut off after [`ITERATION_CEILING`] steps. A composite that
/// reaches itself through its own sub-graph fails once runs are nested
/// [`NESTING_CEILING`] deep.
///
/// # Example
///
/// ```rust
/// use tapeworks::engine::{Composite, Transition};
///
/// let all_pass = Transition::from(Composite::new([Transition::Automatic, Transition::Automatic]));
/// assert!(all_pass.invoke(&[Some(tapeworks::engine::Automaton::null())]).unwrap());
///
/// let blocked = Transition::from(Composite::new([Transition::Automatic, Transition::Impossible]));
/// assert!(!blocked.invoke(&[Some(tapeworks::engine::Automaton::null())]).unwrap());
/// ```
#[derive(Debug)]
pub struct Composite {
    name: String,
    graph: Graph,
    channels: Vec<Channel>,
    ceiling: usize,
}

impl Composite {
    /// Build a frozen linear sub-graph running `children` in order.
    ///
    /// With no children the sub-graph is a single automatic edge, so the
    /// composite always succeeds and declares the trace channel only.
    pub fn new<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Transition>,
    {
        Self::from_graph(chain(children).freeze())
    }

    /// Use an already-built sub-graph.
    ///
    /// The channel list is read off a throwaway automaton over the graph
    /// now and stays fixed even if the graph grows later.
    pub fn from_graph(graph: impl Into<Graph>) -> Self {
        let graph = graph.into();
        let channels = Automaton::new(graph.clone()).channels().to_vec();
        Self {
            name: "composite".to_string(),
            graph,
            channels,
            ceiling: ITERATION_CEILING,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the iteration ceiling. Values below one are raised to one.
    pub fn with_ceiling(mut self, ceiling: usize) -> Self {
        self.ceiling = ceiling.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    pub(crate) fn run(&self, bound: &[Automaton]) -> Result<bool, ContractViolation> {
        let driver = Automaton::with_channels(self.graph.clone(), self.channels.clone());
        let bindings: Vec<Binding> = bound.iter().cloned().map(Some).collect();
        let sink = trace::sink_in(&self.channels, bound);

        let Some(_nesting) = Nesting::enter() else {
            warn!(composite = %self.name, depth = NESTING_CEILING, "nesting ceiling reached");
            if let Some(sink) = sink {
                trace::emit(
                    sink,
                    format!("{}: gave up at nesting depth {}", self.name, NESTING_CEILING),
                );
            }
            return Ok(false);
        };

        let mut iterations = 0;
        loop {
            if iterations >= self.ceiling {
                warn!(composite = %self.name, iterations, "iteration ceiling reached");
                if let Some(sink) = sink {
                    trace::emit(
                        sink,
                        format!("{}: gave up after {} iterations", self.name, iterations),
                    );
                }
                return Ok(false);
            }
            iterations += 1;

            let advanced = driver.advance(&bindings)?;
            if driver.is_at_exit() {
                debug!(composite = %self.name, iterations, "sub-automaton reached exit");
                return Ok(true);
            }
            if !advanced {
                debug!(
                    composite = %self.name,
                    iterations,
                    state = %driver.current_state(),
                    "sub-automaton stalled"
                );
                if let Some(sink) = sink {
                    trace::emit(
                        sink,
                        format!("{}: stalled at {}", self.name, driver.current_state()),
                    );
                }
                return Ok(false);
            }
        }
    }
}
