//! The automaton interpreter.
//!
//! # Key Concepts
//!
//! - **Automaton**: a current-node pointer over a shared graph
//! - **Transitions**: behaviors on edges, built-in or custom
//! - **Composite**: a sub-automaton run as one edge
//! - **Write**: grows another automaton's graph while running
//!
//! Everything here is synchronous. `advance` and `invoke` never suspend
//! and never block on I/O; the only lock taken is the per-graph guard
//! around appends and freezes.

mod composite;
mod machine;
mod transition;
mod write;

pub use composite::{Composite, ITERATION_CEILING, NESTING_CEILING};
pub use machine::{Automaton, Binding};
pub use transition::{Behavior, Transition};
pub use write::Write;
