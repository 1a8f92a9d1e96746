//! Trace sinks: automata used as append-only logs.
//!
//! Recording a line is an ordinary [`Write`] applied to the sink
//! automaton, so every message becomes one more node on the sink's graph.
//! When the trace channel is left unbound it resolves to
//! [`Automaton::null`], which refuses records, and nothing is written.

use crate::core::{Channel, StateValue, TraceRecord};
use crate::engine::{Automaton, Binding, Write};
use crate::graph::MutableGraph;

/// A traceable automaton over its own growable graph.
///
/// # Example
///
/// ```rust
/// use tapeworks::engine::Transition;
/// use tapeworks::trace::TraceSink;
///
/// let sink = TraceSink::new();
/// Transition::Automatic.invoke(&[sink.binding()]).unwrap();
///
/// assert_eq!(sink.messages(), vec!["automatic: taken".to_string()]);
/// ```
#[derive(Clone, Debug)]
pub struct TraceSink {
    automaton: Automaton,
}

impl TraceSink {
    pub fn new() -> Self {
        Self {
            automaton: Automaton::new(MutableGraph::new(StateValue::Entry, StateValue::Exit)),
        }
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// The sink as a binding for the trace channel.
    pub fn binding(&self) -> Binding {
        Some(self.automaton.clone())
    }

    pub fn emit(&self, message: impl Into<String>) {
        emit(&self.automaton, message);
    }

    /// Every record written so far, oldest first.
    pub fn records(&self) -> Vec<TraceRecord> {
        self.automaton
            .graph()
            .states()
            .into_iter()
            .filter_map(|state| match state {
                StateValue::Record(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .map(|record| record.message)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TraceSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Append a timestamped message to `sink` unless it refuses records.
pub fn emit(sink: &Automaton, message: impl Into<String>) {
    if !sink.is_traceable() {
        return;
    }
    let write = Write::to_sink(StateValue::Record(TraceRecord::now(message)));
    write.apply(&[sink.clone(), Automaton::null()]);
}

/// The automaton bound to the trace channel, if `channels` declares one.
pub(crate) fn sink_in<'a>(channels: &[Channel], bound: &'a [Automaton]) -> Option<&'a Automaton> {
    channels
        .iter()
        .position(|channel| *channel == Channel::TRACE)
        .and_then(|index| bound.get(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AutomatonOptions;
    use crate::graph::FrozenGraph;

    #[test]
    fn records_are_kept_in_order() {
        let sink = TraceSink::new();
        sink.emit("first");
        sink.emit("second");

        assert_eq!(sink.messages(), vec!["first", "second"]);
        assert_eq!(sink.len(), 2);

        let records = sink.records();
        assert!(records[0].timestamp <= records[1].timestamp);
    }

    #[test]
    fn each_record_is_a_node_on_the_sink_graph() {
        let sink = TraceSink::new();
        sink.emit("line");

        let automaton = sink.automaton();
        assert_eq!(automaton.graph().node_count(), 3);
        assert_eq!(automaton.graph().edge_count(), 1);
        assert_eq!(
            automaton.current_state().as_record().map(|r| r.message.as_str()),
            Some("line")
        );
    }

    #[test]
    fn null_sink_skips_writes() {
        let null = Automaton::null();
        emit(&null, "dropped");

        assert_eq!(null.graph().node_count(), 2);
        assert_eq!(null.graph().edge_count(), 0);
    }

    #[test]
    fn untraceable_automaton_skips_writes() {
        let options = AutomatonOptions {
            allow_auto_advance_on_entry: false,
            traceable: false,
        };
        let quiet = Automaton::with_options(
            MutableGraph::new(StateValue::Entry, StateValue::Exit),
            options,
        );
        emit(&quiet, "dropped");

        assert_eq!(quiet.graph().edge_count(), 0);
    }

    #[test]
    fn frozen_sink_drops_records() {
        let frozen = Automaton::new(FrozenGraph::empty());
        emit(&frozen, "dropped");
        assert_eq!(frozen.graph().node_count(), 2);
    }

    #[test]
    fn sink_in_finds_the_trace_slot() {
        let tape = Channel::mandatory("tape").unwrap();
        let sink = TraceSink::new();
        let data = Automaton::new(FrozenGraph::empty());
        let bound = [data.clone(), sink.automaton().clone()];

        let found = sink_in(&[tape.clone(), Channel::TRACE], &bound).unwrap();
        assert!(found.ptr_eq(sink.automaton()));
        assert!(sink_in(&[tape], &bound[..1]).is_none());
    }

    #[test]
    fn new_sink_is_empty() {
        assert!(TraceSink::default().is_empty());
    }
}
