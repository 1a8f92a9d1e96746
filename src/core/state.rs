//! Node payloads for automaton graphs.
//!
//! The interpreter never inspects a state value beyond equality. Values
//! exist so callers and trace readers can tell nodes apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, equality-comparable value stored at a graph node.
///
/// # Example
///
/// ```rust
/// use tapeworks::core::StateValue;
///
/// let idle = StateValue::from("idle");
/// assert_eq!(idle, StateValue::Named("idle".to_string()));
/// assert_eq!(idle.to_string(), "idle");
/// assert_eq!(StateValue::Step(3).to_string(), "step-3");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum StateValue {
    /// Conventional payload of an entry node.
    Entry,
    /// Conventional payload of an exit node.
    Exit,
    /// A caller-chosen name.
    Named(String),
    /// A numbered step, used by composite sub-graphs.
    Step(usize),
    /// One line of a trace sink.
    Record(TraceRecord),
}

impl StateValue {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// The trace record carried by this node, if any.
    pub fn as_record(&self) -> Option<&TraceRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl From<&str> for StateValue {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for StateValue {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<TraceRecord> for StateValue {
    fn from(record: TraceRecord) -> Self {
        Self::Record(record)
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("entry"),
            Self::Exit => f.write_str("exit"),
            Self::Named(name) => f.write_str(name),
            Self::Step(index) => write!(f, "step-{}", index),
            Self::Record(record) => fmt::Display::fmt(record, f),
        }
    }
}

/// A timestamped line written to a trace sink.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TraceRecord {
    /// When the message was written
    pub timestamp: DateTime<Utc>,
    /// The message text
    pub message: String,
}

impl TraceRecord {
    /// Stamp a message with the current time.
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.to_rfc3339(), self.message)
    }
}
