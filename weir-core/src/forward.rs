// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strategies describing how an admitted value is merged into a caller-owned batch.
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

/// How an admitted value is merged into a batch.
///
/// This is the one operation a gate cannot provide itself: it encodes the caller's merge
/// semantics, like appending to a list or bumping a counter. The gating logic itself is
/// provided by [`PushGate`](crate::PushGate).
pub trait Forward<V, B> {
    /// Merges `value` into `batch`.
    fn forward(&self, value: V, batch: &mut B) -> Result<(), PushError>;
}

/// Errors raised while merging a value into a batch.
///
/// Failed admission checks are not errors. They are expected filtering outcomes, observable
/// through the gate's rejection counter.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PushError {
    /// A bounded batch has no room left for another value. The gate neither retries nor drops
    /// on overflow; that decision belongs to the caller.
    #[error("batch is full (capacity {0})")]
    BatchFull(usize),

    /// Batch-specific failure while merging a value.
    #[error("could not merge value into batch: {0}")]
    Merge(String),
}

/// Appends values to any [`Extend`] collection, preserving push order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Append;

impl<V, B> Forward<V, B> for Append
where
    B: Extend<V>,
{
    fn forward(&self, value: V, batch: &mut B) -> Result<(), PushError> {
        batch.extend([value]);
        Ok(())
    }
}

/// Merges values into an occurrence counter, keyed by the value itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tally;

impl<V> Forward<V, HashMap<V, u64>> for Tally
where
    V: Eq + Hash,
{
    fn forward(&self, value: V, batch: &mut HashMap<V, u64>) -> Result<(), PushError> {
        *batch.entry(value).or_default() += 1;
        Ok(())
    }
}

impl<V> Forward<V, BTreeMap<V, u64>> for Tally
where
    V: Ord,
{
    fn forward(&self, value: V, batch: &mut BTreeMap<V, u64>) -> Result<(), PushError> {
        *batch.entry(value).or_default() += 1;
        Ok(())
    }
}

/// Capacity guard in front of another strategy.
///
/// Refuses to merge once the batch already holds `capacity` values; the batch type reports its
/// fill level through [`Len`]. The error surfaces verbatim to the pusher, nothing is retried
/// or dropped here.
#[derive(Clone, Copy, Debug)]
pub struct Bounded<F> {
    inner: F,
    capacity: usize,
}

impl<F> Bounded<F> {
    pub fn new(inner: F, capacity: usize) -> Self {
        Self { inner, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<V, B, F> Forward<V, B> for Bounded<F>
where
    F: Forward<V, B>,
    B: Len,
{
    fn forward(&self, value: V, batch: &mut B) -> Result<(), PushError> {
        if batch.len() >= self.capacity {
            return Err(PushError::BatchFull(self.capacity));
        }
        self.inner.forward(value, batch)
    }
}

/// Batches which can report how many values they currently hold.
pub trait Len {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Len for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<T> Len for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }
}

impl<K, V> Len for HashMap<K, V> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl<K, V> Len for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

/// Builds a strategy from a closure, for one-off merge semantics which don't warrant a named
/// type.
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn(f)
}

/// Strategy returned by [`from_fn`].
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

impl<V, B, F> Forward<V, B> for FromFn<F>
where
    F: Fn(V, &mut B) -> Result<(), PushError>,
{
    fn forward(&self, value: V, batch: &mut B) -> Result<(), PushError> {
        (self.0)(value, batch)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::{Append, Bounded, Forward, PushError, from_fn};

    #[test]
    fn append_preserves_order() {
        let mut batch: Vec<u32> = Vec::new();

        Append.forward(1, &mut batch).expect("not fail");
        Append.forward(2, &mut batch).expect("not fail");

        assert_eq!(batch, vec![1, 2]);
    }

    #[test]
    fn tally_counts_occurrences() {
        let mut counts: HashMap<&str, u64> = HashMap::new();

        super::Tally.forward("a", &mut counts).expect("not fail");
        super::Tally.forward("a", &mut counts).expect("not fail");
        super::Tally.forward("b", &mut counts).expect("not fail");

        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get("b"), Some(&1));
    }

    #[test]
    fn bounded_refuses_when_full() {
        let bounded = Bounded::new(Append, 1);
        let mut batch: Vec<u32> = Vec::new();

        bounded.forward(1, &mut batch).expect("not fail");
        let result = bounded.forward(2, &mut batch);

        assert_eq!(result, Err(PushError::BatchFull(1)));
        assert_eq!(batch, vec![1]);
    }

    #[test]
    fn closures_can_fail_with_merge_errors() {
        let strategy = from_fn(|value: u32, batch: &mut BTreeMap<u32, u32>| {
            if batch.insert(value, value).is_some() {
                return Err(PushError::Merge(format!("duplicate key {value}")));
            }
            Ok(())
        });

        let mut batch = BTreeMap::new();
        strategy.forward(7, &mut batch).expect("not fail");

        let result = strategy.forward(7, &mut batch);
        assert!(matches!(result, Err(PushError::Merge(_))));
    }
}
