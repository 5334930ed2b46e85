//! Sequences and Steps
//!
//! A [`Sequence`] is the integer array a run sorts. A [`Step`] is one
//! immutable snapshot of the working array, emitted by a step producer after
//! a meaningful mutation.

use std::collections::HashMap;
use std::ops::Deref;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Element type of every sequence the engine sorts
pub type Value = i64;

/// An ordered integer array
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(Vec<Value>);

impl Sequence {
    /// Wrap existing values
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Generate `len` random values in `[min, max]` (inclusive)
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn random<R: Rng + ?Sized>(len: usize, min: Value, max: Value, rng: &mut R) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        Self((0..len).map(|_| rng.gen_range(lo..=hi)).collect())
    }

    /// Number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence has no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the values
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// Consume into the underlying vector
    #[must_use]
    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl Deref for Sequence {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl From<&[Value]> for Sequence {
    fn from(values: &[Value]) -> Self {
        Self(values.to_vec())
    }
}

/// One emitted intermediate array state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Step(Vec<Value>);

impl Step {
    /// Snapshot a working array
    #[must_use]
    pub fn snapshot(values: &[Value]) -> Self {
        Self(values.to_vec())
    }

    /// Borrow the values
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Consume into the underlying vector
    #[must_use]
    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl Deref for Step {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Value>> for Step {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// Whether `values` is in ascending order
#[must_use]
pub fn is_sorted(values: &[Value]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

/// Whether `candidate` holds exactly the same multiset of values as `original`
#[must_use]
pub fn is_permutation_of(candidate: &[Value], original: &[Value]) -> bool {
    if candidate.len() != original.len() {
        return false;
    }

    let mut counts: HashMap<Value, isize> = HashMap::with_capacity(original.len());
    for value in original {
        *counts.entry(*value).or_default() += 1;
    }
    for value in candidate {
        match counts.get_mut(value) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }
    true
}
