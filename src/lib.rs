//! Tapeworks: a graph-based automaton engine
//!
//! An automaton is a current-node pointer walking a directed graph whose
//! edges carry transitions. Transitions are bound to named channels, each
//! supplied by another automaton, so the same machinery serves as program,
//! data tape, and trace log. Some transitions run whole sub-automata;
//! others append edges to a bound automaton's graph while it runs.
//!
//! # Core Concepts
//!
//! - **Graphs**: mutable while being built or written to, frozen once shared
//! - **Transitions**: automatic, impossible, composite, write, or custom
//! - **Channels**: the named, ordered slots a transition is bound to
//! - **Contracts**: every mandatory channel must be bound before invoking
//! - **Trace sinks**: automata whose graphs record timestamped messages
//!
//! # Example
//!
//! ```rust
//! use tapeworks::core::{Channel, StateValue};
//! use tapeworks::engine::{Automaton, Composite, Transition, Write};
//! use tapeworks::graph::MutableGraph;
//! use tapeworks::trace::TraceSink;
//!
//! let tape_channel = Channel::mandatory("tape").unwrap();
//! let program = Composite::new([
//!     Transition::from(Write::new(tape_channel.clone(), Transition::Automatic, "a").unwrap()),
//!     Transition::from(Write::new(tape_channel, Transition::Automatic, "b").unwrap()),
//! ]);
//!
//! let tape = Automaton::new(MutableGraph::new(StateValue::Entry, StateValue::Exit));
//! let sink = TraceSink::new();
//!
//! let ok = Transition::from(program)
//!     .invoke(&[Some(tape.clone()), sink.binding()])
//!     .unwrap();
//!
//! assert!(ok);
//! assert_eq!(tape.current_state(), StateValue::from("b"));
//! assert_eq!(sink.len(), 2);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod enforcement;
pub mod engine;
pub mod graph;
pub mod trace;

// Re-export commonly used types
pub use builder::{chain, AutomatonBuilder, AutomatonOptions, BuildError};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use core::{Channel, Guard, StateHistory, StateValue};
pub use enforcement::ContractViolation;
pub use engine::{Automaton, Behavior, Binding, Composite, Transition, Write};
pub use graph::{FrozenGraph, Graph, MutableGraph, NodeId};
pub use trace::TraceSink;
