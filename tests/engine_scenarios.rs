//! End-to-end scenarios: programs driving tapes, composites, trace sinks
//! and checkpoints working together.

use std::sync::Arc;
use tapeworks::builder::{chain, AutomatonBuilder};
use tapeworks::checkpoint::Checkpoint;
use tapeworks::core::{Channel, Guard, StateValue};
use tapeworks::engine::{Automaton, Behavior, Composite, Transition, Write, ITERATION_CEILING};
use tapeworks::graph::{FrozenGraph, MutableGraph};
use tapeworks::trace::TraceSink;

fn tape_channel() -> Channel {
    Channel::mandatory("tape").unwrap()
}

fn blank_tape() -> Automaton {
    Automaton::new(MutableGraph::new(StateValue::Entry, StateValue::Exit))
}

fn write(value: &str) -> Transition {
    Transition::from(Write::new(tape_channel(), Transition::Automatic, value).unwrap())
}

/// Succeeds when the bound tape holds the expected value.
struct Reads {
    channels: Vec<Channel>,
    expected: StateValue,
}

impl Reads {
    fn new(expected: &str) -> Self {
        Self {
            channels: vec![tape_channel()],
            expected: StateValue::from(expected),
        }
    }
}

impl Behavior for Reads {
    fn name(&self) -> &str {
        "reads"
    }

    fn channels(&self) -> &[Channel] {
        &self.channels
    }

    fn apply(&self, bound: &[Automaton]) -> bool {
        bound[0].current_state() == self.expected
    }
}

#[test]
fn composite_with_a_blocking_child_fails_as_one_edge() {
    let sink = TraceSink::new();
    let program = MutableGraph::new(StateValue::Entry, StateValue::Exit);
    let composite = Composite::new([
        Transition::Automatic,
        Transition::Automatic,
        Transition::Impossible,
    ])
    .named("blocked");
    program
        .add_edge(program.entry(), Transition::from(composite), program.exit())
        .unwrap();

    let automaton = Automaton::new(program);
    assert_eq!(automaton.channels(), &[Channel::TRACE]);

    assert!(!automaton.advance(&[sink.binding()]).unwrap());
    assert!(automaton.is_at_entry());
    assert!(automaton.history().is_empty());
    assert_eq!(
        sink.messages(),
        vec![
            "automatic: taken".to_string(),
            "automatic: taken".to_string(),
            "impossible: refused".to_string(),
            "blocked: stalled at step-2".to_string(),
        ]
    );
}

#[test]
fn empty_composite_is_an_automatic_edge() {
    let program = chain([Transition::from(Composite::new(Vec::new()))]);
    let automaton = Automaton::new(program);

    assert!(automaton.advance(&[None]).unwrap());
    assert!(automaton.is_at_exit());
}

#[test]
fn program_writes_a_tape_then_reads_it_back() {
    let tape = blank_tape();
    let sink = TraceSink::new();
    let program = Automaton::new(chain([
        write("a"),
        write("b"),
        Transition::custom(Arc::new(Reads::new("b"))),
    ]));

    assert_eq!(program.channels(), &[tape_channel(), Channel::TRACE]);
    let bindings = [Some(tape.clone()), sink.binding()];

    while !program.is_at_exit() {
        assert!(program.advance(&bindings).unwrap());
    }

    assert_eq!(program.history().len(), 3);
    assert_eq!(tape.graph().node_count(), 4);
    let path: Vec<String> = tape
        .graph()
        .states()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(path, vec!["entry", "exit", "a", "b"]);
    assert_eq!(sink.len(), 2);
}

#[test]
fn guards_pick_the_branch_matching_the_tape() {
    let program = MutableGraph::new(StateValue::Entry, StateValue::Exit);
    let left = program.new_node("left");
    let right = program.new_node("right");

    let holds = |expected: &'static str| {
        Guard::new(move |bound: &[Automaton]| {
            bound
                .first()
                .is_some_and(|tape| tape.current_state() == StateValue::from(expected))
        })
    };
    program
        .add_guarded_edge(program.entry(), write("x"), holds("go-left"), left)
        .unwrap();
    program
        .add_guarded_edge(program.entry(), write("y"), holds("go-right"), right)
        .unwrap();

    let tape = blank_tape();
    write("go-right")
        .invoke(&[Some(tape.clone()), Some(Automaton::null())])
        .unwrap();

    let automaton = Automaton::new(program);
    assert!(automaton.advance(&[Some(tape.clone()), None]).unwrap());
    assert_eq!(automaton.current_state(), StateValue::from("right"));
    assert_eq!(tape.current_state(), StateValue::from("y"));
}

#[test]
fn default_ceiling_stops_a_self_growing_sub_graph() {
    let sub_graph = MutableGraph::new(StateValue::Entry, StateValue::Exit);
    sub_graph
        .add_edge(sub_graph.entry(), write("grown"), sub_graph.entry())
        .unwrap();
    let tape = Automaton::new(sub_graph.clone());

    let composite = Composite::from_graph(sub_graph.clone());
    assert_eq!(composite.ceiling(), ITERATION_CEILING);

    let sink = TraceSink::new();
    let ok = Transition::from(composite)
        .invoke(&[Some(tape), sink.binding()])
        .unwrap();

    assert!(!ok);
    assert_eq!(sub_graph.edge_count(), 1 + ITERATION_CEILING);
    assert_eq!(
        sink.messages().last().map(String::as_str),
        Some("composite: gave up after 16384 iterations")
    );
}

#[test]
fn writing_to_a_frozen_tape_leaves_it_unchanged() {
    let frozen = chain([Transition::Automatic]).freeze();
    let tape = Automaton::new(frozen.clone());
    let sink = TraceSink::new();

    assert!(!write("x")
        .invoke(&[Some(tape.clone()), sink.binding()])
        .unwrap());
    assert_eq!(frozen.edge_count(), 1);
    assert_eq!(frozen.node_count(), 2);
    assert!(tape.is_at_entry());
    assert_eq!(sink.len(), 1);
}

#[test]
fn missing_tape_aborts_without_moving() {
    let program = Automaton::new(chain([write("x")]));

    let violation = program.advance(&[None, None]).unwrap_err();
    assert_eq!(violation.absent_channels(), vec!["tape"]);
    assert!(program.is_at_entry());

    let violation = program.advance(&[]).unwrap_err();
    assert!(violation.is_arity_mismatch());
}

#[test]
fn nested_write_channels_surface_on_the_program() {
    let inner = Composite::new([write("x")]);
    let outer = Automaton::new(chain([Transition::from(inner)]));

    let violation = outer.advance(&[None, None]).unwrap_err();
    assert_eq!(violation.absent_channels(), vec!["tape"]);
}

#[test]
fn auto_advance_skips_the_entry_chain() {
    let automaton = AutomatonBuilder::new()
        .graph(chain(vec![Transition::Automatic; 3]).freeze())
        .allow_auto_advance_on_entry(true)
        .build()
        .unwrap();
    assert!(automaton.is_at_exit());
    assert_eq!(automaton.history().len(), 3);

    automaton.reset();
    assert!(automaton.is_at_exit());

    let manual = Automaton::new(chain(vec![Transition::Automatic; 3]).freeze());
    assert!(manual.is_at_entry());
}

#[test]
fn untraceable_sink_records_nothing() {
    let quiet = AutomatonBuilder::new()
        .graph(MutableGraph::new(StateValue::Entry, StateValue::Exit))
        .traceable(false)
        .build()
        .unwrap();

    Transition::Automatic.invoke(&[Some(quiet.clone())]).unwrap();
    assert_eq!(quiet.graph().edge_count(), 0);
}

#[test]
fn checkpoint_resumes_a_program_and_its_tape() {
    let program_graph = chain([write("a"), write("b"), write("c")]).freeze();
    let tape_graph = MutableGraph::new(StateValue::Entry, StateValue::Exit);
    let tape = Automaton::new(tape_graph.clone());
    let program = Automaton::new(program_graph.clone());
    let bindings = [Some(tape.clone()), None];

    assert!(program.advance(&bindings).unwrap());
    let program_json = Checkpoint::capture(&program).to_json().unwrap();
    let tape_bytes = Checkpoint::capture(&tape).to_bytes().unwrap();

    let program = Checkpoint::from_json(&program_json)
        .unwrap()
        .restore(program_graph)
        .unwrap();
    let tape = Checkpoint::from_bytes(&tape_bytes)
        .unwrap()
        .restore(tape_graph)
        .unwrap();
    let bindings = [Some(tape.clone()), None];

    while !program.is_at_exit() {
        assert!(program.advance(&bindings).unwrap());
    }
    assert_eq!(program.history().len(), 3);
    assert_eq!(tape.current_state(), StateValue::from("c"));
    assert_eq!(tape.graph().edge_count(), 3);
}

#[test]
fn null_sink_is_shared_and_never_grows() {
    let first = Automaton::null();
    let second = Automaton::null();
    assert!(first.ptr_eq(&second));
    assert!(first.is_null());
    assert!(!Automaton::new(FrozenGraph::empty()).is_null());

    Transition::Automatic.invoke(&[Some(first)]).unwrap();
    assert_eq!(second.graph().node_count(), 2);
}
