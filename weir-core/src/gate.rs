// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::Cell;

use tracing::trace;

use crate::forward::{Forward, PushError};
use crate::policy::GatePolicy;
use crate::value::Value;

/// Admission gate in front of a caller-owned batch.
///
/// A `PushGate` combines a [`GatePolicy`] with a [`Forward`] strategy: every pushed value is
/// checked against the policy and, when admitted, handed to the strategy which merges it into
/// the batch. Inadmissible values are discarded silently without raising an error, but every
/// discard is counted and can be queried through [`rejected_count`](PushGate::rejected_count).
///
/// The gate never owns the batch; callers pass it into each push and decide themselves when and
/// how it is drained. It also holds no lock and makes no promise across threads. Pushes from
/// several producers against a shared batch are governed by the batch's own contract.
#[derive(Debug)]
pub struct PushGate<F> {
    policy: GatePolicy,
    forward: F,
    rejected: Cell<u64>,
}

impl<F> PushGate<F> {
    /// Builds a gate with the default (strict) policy.
    pub fn new(forward: F) -> Self {
        Self::with_policy(forward, GatePolicy::default())
    }

    /// Builds a gate with the given policy. The policy is fixed for the lifetime of the gate.
    pub fn with_policy(forward: F, policy: GatePolicy) -> Self {
        Self {
            policy,
            forward,
            rejected: Cell::new(0),
        }
    }

    /// The configured admission policy.
    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Number of values discarded by failed admission checks so far.
    ///
    /// Batch errors surfaced by the strategy do not move this counter; it records expected
    /// filtering outcomes only.
    pub fn rejected_count(&self) -> u64 {
        self.rejected.get()
    }

    /// Acquires a reference to the underlying forward strategy.
    pub fn forward_ref(&self) -> &F {
        &self.forward
    }

    /// Consumes the gate, returning the underlying forward strategy.
    pub fn into_inner(self) -> F {
        self.forward
    }

    /// Checks whether `value` would be admitted, without pushing or counting anything.
    pub fn check<V: Value>(&self, value: &V) -> bool {
        self.policy.admits(value)
    }

    /// Pushes a single value through the admission check and into `batch`.
    ///
    /// Inadmissible values are discarded and counted. Errors come from the forward strategy
    /// only, like a bounded batch running full; they surface verbatim.
    pub fn push<V, B>(&self, value: V, batch: &mut B) -> Result<(), PushError>
    where
        V: Value,
        F: Forward<V, B>,
    {
        if self.policy.admits(&value) {
            return self.forward.forward(value, batch);
        }

        let rejected = self.rejected.get() + 1;
        self.rejected.set(rejected);
        trace!("value failed admission check ({} rejected so far)", rejected);
        Ok(())
    }

    /// Pushes every value in `values`, in input order.
    ///
    /// Admitted values reach the batch in the order they were supplied. The iteration is not
    /// atomic: a strategy error stops it immediately, leaving earlier forwards visible in the
    /// batch.
    pub fn push_all<I, B>(&self, values: I, batch: &mut B) -> Result<(), PushError>
    where
        I: IntoIterator,
        I::Item: Value,
        F: Forward<I::Item, B>,
    {
        for value in values {
            self.push(value, batch)?;
        }
        Ok(())
    }
}
