//! Edge guards evaluated against the automata bound to a transition.
//!
//! Guards are pure boolean functions. An edge with a guard is only
//! attempted when its guard accepts the bindings the edge's transition
//! would receive.

use crate::engine::Automaton;
use std::fmt;
use std::sync::Arc;

/// Pure predicate that decides whether an edge may be attempted.
///
/// The predicate sees the resolved bindings in the order the edge's
/// transition declares its channels.
///
/// # Example
///
/// ```rust
/// use tapeworks::core::Guard;
/// use tapeworks::engine::Automaton;
///
/// let never = Guard::new(|_bound: &[Automaton]| false);
/// assert!(!never.check(&[]));
///
/// let unbound = Guard::new(|bound: &[Automaton]| bound.is_empty());
/// assert!(unbound.check(&[]));
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<dyn Fn(&[Automaton]) -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&[Automaton]) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Check whether the guard accepts these bindings.
    pub fn check(&self, bound: &[Automaton]) -> bool {
        (self.predicate)(bound)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
