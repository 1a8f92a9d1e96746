//! Channel-presence contract checked before every transition runs.

use crate::core::Channel;
use crate::engine::{Automaton, Binding};
use crate::enforcement::violations::{BindingViolation, ContractViolation};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::trace;

/// Declared channel list of a transition or automaton.
///
/// An invocation satisfies the contract when it supplies exactly one
/// binding per channel and none of them is absent. All violations are
/// accumulated rather than stopping at the first one.
///
/// # Example
///
/// ```rust
/// use tapeworks::core::{Channel, StateValue};
/// use tapeworks::engine::Automaton;
/// use tapeworks::enforcement::ChannelContract;
/// use tapeworks::graph::FrozenGraph;
///
/// let channels = [Channel::mandatory("a").unwrap(), Channel::mandatory("b").unwrap()];
/// let contract = ChannelContract::new("pair", &channels);
///
/// let a = Automaton::new(FrozenGraph::empty());
/// let b = Automaton::new(FrozenGraph::empty());
///
/// assert!(contract.check(&[Some(a.clone()), Some(b)]).is_ok());
/// assert!(contract.check(&[Some(a.clone())]).is_err());
/// assert!(contract.check(&[Some(a), None]).is_err());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ChannelContract<'a> {
    subject: &'a str,
    channels: &'a [Channel],
}

impl<'a> ChannelContract<'a> {
    pub fn new(subject: &'a str, channels: &'a [Channel]) -> Self {
        Self { subject, channels }
    }

    pub fn channels(&self) -> &'a [Channel] {
        self.channels
    }

    /// Validate the bindings, accumulating ALL violations.
    pub fn enforce(&self, bindings: &[Binding]) -> Validation<(), NonEmptyVec<BindingViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<BindingViolation>>> = Vec::new();

        if bindings.len() != self.channels.len() {
            checks.push(Validation::fail(BindingViolation::BindingArityMismatch {
                expected: self.channels.len(),
                actual: bindings.len(),
            }));
        }

        for (position, (channel, slot)) in self.channels.iter().zip(bindings).enumerate() {
            let check = if slot.is_some() {
                Validation::success(())
            } else {
                Validation::fail(BindingViolation::BindingAbsent {
                    channel: channel.identity().to_string(),
                    position,
                })
            };
            checks.push(check);
        }

        for (position, channel) in self.channels.iter().enumerate().skip(bindings.len()) {
            checks.push(Validation::fail(BindingViolation::BindingAbsent {
                channel: channel.identity().to_string(),
                position,
            }));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Check the bindings and unwrap them, or report every violation.
    pub fn check(&self, bindings: &[Binding]) -> Result<Vec<Automaton>, ContractViolation> {
        trace!(subject = %self.subject, bindings = bindings.len(), "checking channel contract");
        match self.enforce(bindings) {
            Validation::Success(_) => Ok(bindings.iter().flatten().cloned().collect()),
            Validation::Failure(errors) => Err(ContractViolation {
                subject: self.subject.to_string(),
                violations: errors.iter().cloned().collect(),
            }),
        }
    }

    /// Default absent optional slots to the null sink, then check.
    pub fn resolve(&self, bindings: &[Binding]) -> Result<Vec<Automaton>, ContractViolation> {
        let defaulted: Vec<Binding> = bindings
            .iter()
            .enumerate()
            .map(|(position, slot)| match (slot, self.channels.get(position)) {
                (None, Some(channel)) if !channel.is_mandatory() => Some(Automaton::null()),
                _ => slot.clone(),
            })
            .collect();
        self.check(&defaulted)
    }
}
