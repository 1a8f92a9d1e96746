//! Value types shared by the graph and the interpreter.
//!
//! - Channels naming the tapes a transition is bound to
//! - State values stored at graph nodes
//! - Guard predicates on edges
//! - History of taken edges

mod channel;
mod guard;
mod history;
mod state;

pub use channel::Channel;
pub use guard::Guard;
pub use history::{StateHistory, StepRecord};
pub use state::{StateValue, TraceRecord};
