//! Binding violations and the error that carries them.

use thiserror::Error;

/// A single way an invocation failed to satisfy its channel list.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BindingViolation {
    #[error("expected {expected} bindings, got {actual}")]
    BindingArityMismatch { expected: usize, actual: usize },

    #[error("channel '{channel}' at position {position} has no automaton bound")]
    BindingAbsent { channel: String, position: usize },
}

/// Every binding violation found for one invocation.
///
/// Precondition failures abort the whole call chain: nested composites
/// and automata propagate this error unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Binding contract violated for '{subject}': {}", describe(.violations))]
pub struct ContractViolation {
    /// Name of the transition or automaton being invoked
    pub subject: String,
    /// All violations, in channel order
    pub violations: Vec<BindingViolation>,
}

impl ContractViolation {
    pub fn is_arity_mismatch(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v, BindingViolation::BindingArityMismatch { .. }))
    }

    /// Identities of the channels left unbound.
    pub fn absent_channels(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter_map(|v| match v {
                BindingViolation::BindingAbsent { channel, .. } => Some(channel.as_str()),
                BindingViolation::BindingArityMismatch { .. } => None,
            })
            .collect()
    }
}

fn describe(violations: &[BindingViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_violation() {
        let violation = ContractViolation {
            subject: "write".to_string(),
            violations: vec![
                BindingViolation::BindingArityMismatch {
                    expected: 2,
                    actual: 3,
                },
                BindingViolation::BindingAbsent {
                    channel: "tape".to_string(),
                    position: 0,
                },
            ],
        };

        assert_eq!(
            violation.to_string(),
            "Binding contract violated for 'write': expected 2 bindings, got 3; \
             channel 'tape' at position 0 has no automaton bound"
        );
        assert!(violation.is_arity_mismatch());
        assert_eq!(violation.absent_channels(), vec!["tape"]);
    }
}
