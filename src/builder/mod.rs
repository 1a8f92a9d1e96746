//! Construction helpers for graphs and automata.
//!
//! [`MutableGraph`] is itself the low-level graph builder (`new_node`,
//! `add_edge`, `freeze`). This module adds the fluent [`AutomatonBuilder`],
//! its [`AutomatonOptions`], and [`chain`] for the common linear graph.

pub mod automaton;
pub mod error;

pub use automaton::{AutomatonBuilder, AutomatonOptions};
pub use error::BuildError;

use crate::core::StateValue;
use crate::engine::Transition;
use crate::graph::MutableGraph;

/// Build a linear graph running the transitions in order.
///
/// The entry node's edge carries the first transition, each following
/// `Step(i)` node carries transition `i + 1`, and the last transition leads
/// to the exit node. With no transitions the entry connects straight to the
/// exit through an automatic edge.
///
/// # Example
///
/// ```
/// use tapeworks::builder::chain;
/// use tapeworks::engine::Transition;
///
/// let graph = chain([Transition::Automatic, Transition::Impossible]);
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// ```
pub fn chain<I>(transitions: I) -> MutableGraph
where
    I: IntoIterator<Item = Transition>,
{
    let graph = MutableGraph::new(StateValue::Entry, StateValue::Exit);
    let mut transitions = transitions.into_iter().peekable();

    if transitions.peek().is_none() {
        graph
            .add_edge(graph.entry(), Transition::Automatic, graph.exit())
            .expect("Entry and exit always belong to the graph");
        return graph;
    }

    let mut from = graph.entry();
    let mut step = 1;
    while let Some(transition) = transitions.next() {
        let to = if transitions.peek().is_some() {
            graph.new_node(StateValue::Step(step))
        } else {
            graph.exit()
        };
        graph
            .add_edge(from, transition, to)
            .expect("Chained nodes always belong to the graph");
        from = to;
        step += 1;
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn empty_chain_connects_entry_to_exit() {
        let graph = Graph::from(chain(Vec::new()));

        let outgoing = graph.outgoing(graph.entry());
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].to, graph.exit());
        assert!(matches!(outgoing[0].transition, Transition::Automatic));
    }

    #[test]
    fn chain_places_transitions_in_order() {
        let graph = Graph::from(chain([
            Transition::Automatic,
            Transition::Impossible,
            Transition::Automatic,
        ]));

        let names: Vec<String> = graph
            .edges()
            .iter()
            .map(|edge| edge.transition.name().to_string())
            .collect();
        assert_eq!(names, vec!["automatic", "impossible", "automatic"]);

        let states = graph.states();
        assert_eq!(
            states,
            vec![
                StateValue::Entry,
                StateValue::Exit,
                StateValue::Step(1),
                StateValue::Step(2)
            ]
        );
    }

    #[test]
    fn chain_ends_at_exit() {
        let graph = Graph::from(chain([Transition::Automatic, Transition::Automatic]));

        let last = graph.edges().last().cloned().unwrap();
        assert_eq!(last.to, graph.exit());
    }
}
