//! Record of the edges an automaton has taken.

use super::state::StateValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single taken edge.
///
/// # Example
///
/// ```rust
/// use tapeworks::core::{StateValue, StepRecord};
/// use chrono::Utc;
///
/// let step = StepRecord {
///     from: StateValue::Entry,
///     to: StateValue::from("reading"),
///     transition: "automatic".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(step.transition, "automatic");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// The state being left
    pub from: StateValue,
    /// The state being entered
    pub to: StateValue,
    /// Name of the transition on the taken edge
    pub transition: String,
    /// When the edge was taken
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of taken edges.
///
/// # Example
///
/// ```rust
/// use tapeworks::core::{StateHistory, StateValue, StepRecord};
/// use chrono::Utc;
///
/// let mut history = StateHistory::new();
/// history.record(StepRecord {
///     from: StateValue::Entry,
///     to: StateValue::from("middle"),
///     transition: "automatic".to_string(),
///     timestamp: Utc::now(),
/// });
/// history.record(StepRecord {
///     from: StateValue::from("middle"),
///     to: StateValue::Exit,
///     transition: "automatic".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.path().len(), 3); // entry -> middle -> exit
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    steps: Vec<StepRecord>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a taken edge.
    pub fn record(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the first step's origin followed by the destination of
    /// every step, in order.
    pub fn path(&self) -> Vec<&StateValue> {
        let mut path = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            path.push(&first.from);
        }
        for step in &self.steps {
            path.push(&step.to);
        }
        path
    }

    /// Elapsed time between the first and last recorded step.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.steps.first(), self.steps.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(from: &str, to: &str) -> StepRecord {
        StepRecord {
            from: StateValue::from(from),
            to: StateValue::from(to),
            transition: "automatic".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn path_returns_state_sequence() {
        let mut history = StateHistory::new();
        history.record(step("a", "b"));
        history.record(step("b", "c"));

        let path = history.path();
        assert_eq!(
            path,
            vec![
                &StateValue::from("a"),
                &StateValue::from("b"),
                &StateValue::from("c")
            ]
        );
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = StateHistory::new();
        history.record(step("a", "b"));

        std::thread::sleep(Duration::from_millis(10));

        history.record(step("b", "c"));

        let duration = history.duration().unwrap();
        assert!(duration >= Duration::from_millis(10));
    }

    #[test]
    fn single_step_has_duration_zero() {
        let mut history = StateHistory::new();
        history.record(step("a", "b"));

        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = StateHistory::new();
        history.record(step("a", "b"));

        let json = serde_json::to_string(&history).unwrap();
        let decoded: StateHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(history, decoded);
    }
}
