//! Algorithm Library - Stepwise Sorting Producers
//!
//! Every algorithm is re-expressed as a lazy, forward-only iterator of
//! [`Step`]s. A producer owns a private copy of its input and an explicit
//! continuation state (indices, a held key, or a worklist for the recursive
//! algorithms), so a step is only computed when the playback loop pulls it.
//!
//! # Granularity
//!
//! | Algorithm | One Step per |
//! |-----------|--------------|
//! | Bubble    | full inner pass (including the final no-swap pass) |
//! | Selection | performed swap |
//! | Insertion | shift, plus placement of the key |
//! | Merge     | base case, placed element, completed merge |
//! | Quick     | returning segment of two or more elements |
//! | Heap      | swap (build, extraction, sift-down) |
//! | Radix     | digit pass |
//! | Shell     | gapped shift, plus placement |
//!
//! Producers are deterministic and never consult a clock or a random source.

mod bubble;
mod heap;
mod insertion;
mod merge;
mod quick;
mod radix;
mod selection;
mod shell;

pub use bubble::BubbleSteps;
pub use heap::HeapSteps;
pub use insertion::InsertionSteps;
pub use merge::MergeSteps;
pub use quick::QuickSteps;
pub use radix::RadixSteps;
pub use selection::SelectionSteps;
pub use shell::ShellSteps;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::UnknownAlgorithm;
use crate::sequence::{Step, Value};

/// The closed set of supported algorithms
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Bubble sort (fallback for unknown selections)
    #[default]
    Bubble,
    /// Selection sort
    Selection,
    /// Insertion sort
    Insertion,
    /// Top-down merge sort
    Merge,
    /// Quick sort, last-element pivot
    Quick,
    /// Heap sort
    Heap,
    /// LSD radix sort
    Radix,
    /// Shell sort, halving gaps
    Shell,
}

impl Algorithm {
    /// Every algorithm, in presentation order
    pub const ALL: [Algorithm; 8] = [
        Self::Bubble,
        Self::Selection,
        Self::Insertion,
        Self::Radix,
        Self::Heap,
        Self::Quick,
        Self::Merge,
        Self::Shell,
    ];

    /// Display name (e.g. `BubbleSort`)
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bubble => "BubbleSort",
            Self::Selection => "SelectionSort",
            Self::Insertion => "InsertionSort",
            Self::Merge => "MergeSort",
            Self::Quick => "QuickSort",
            Self::Heap => "HeapSort",
            Self::Radix => "RadixSort",
            Self::Shell => "ShellSort",
        }
    }

    /// Resolve a user selection, falling back to bubble sort
    ///
    /// An unknown name is not an error: a warning naming the available
    /// algorithms is logged and [`Algorithm::Bubble`] is returned.
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: UnknownAlgorithm| {
            let available: Vec<&str> = Self::ALL.iter().map(|a| a.name()).collect();
            warn!(
                requested = %err.0,
                available = ?available,
                "Algorithm not found, BubbleSort will be used as default"
            );
            Self::Bubble
        })
    }

    /// Begin a stepwise sort over a private copy of `input`
    #[must_use]
    pub fn steps(self, input: &[Value]) -> StepProducer {
        match self {
            Self::Bubble => StepProducer::Bubble(BubbleSteps::new(input)),
            Self::Selection => StepProducer::Selection(SelectionSteps::new(input)),
            Self::Insertion => StepProducer::Insertion(InsertionSteps::new(input)),
            Self::Merge => StepProducer::Merge(MergeSteps::new(input)),
            Self::Quick => StepProducer::Quick(QuickSteps::new(input)),
            Self::Heap => StepProducer::Heap(HeapSteps::new(input)),
            Self::Radix => StepProducer::Radix(RadixSteps::new(input)),
            Self::Shell => StepProducer::Shell(ShellSteps::new(input)),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    /// Accepts `BubbleSort`, `bubble`, `bubble-sort` and `bubble_sort`,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        let key = normalized.strip_suffix("sort").unwrap_or(&normalized);

        match key {
            "bubble" => Ok(Self::Bubble),
            "selection" => Ok(Self::Selection),
            "insertion" => Ok(Self::Insertion),
            "merge" => Ok(Self::Merge),
            "quick" => Ok(Self::Quick),
            "heap" => Ok(Self::Heap),
            "radix" => Ok(Self::Radix),
            "shell" => Ok(Self::Shell),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// A running step producer for one of the [`Algorithm`]s
#[derive(Clone, Debug)]
pub enum StepProducer {
    /// See [`BubbleSteps`]
    Bubble(BubbleSteps),
    /// See [`SelectionSteps`]
    Selection(SelectionSteps),
    /// See [`InsertionSteps`]
    Insertion(InsertionSteps),
    /// See [`MergeSteps`]
    Merge(MergeSteps),
    /// See [`QuickSteps`]
    Quick(QuickSteps),
    /// See [`HeapSteps`]
    Heap(HeapSteps),
    /// See [`RadixSteps`]
    Radix(RadixSteps),
    /// See [`ShellSteps`]
    Shell(ShellSteps),
}

impl StepProducer {
    /// The algorithm driving this producer
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Bubble(_) => Algorithm::Bubble,
            Self::Selection(_) => Algorithm::Selection,
            Self::Insertion(_) => Algorithm::Insertion,
            Self::Merge(_) => Algorithm::Merge,
            Self::Quick(_) => Algorithm::Quick,
            Self::Heap(_) => Algorithm::Heap,
            Self::Radix(_) => Algorithm::Radix,
            Self::Shell(_) => Algorithm::Shell,
        }
    }
}

impl Iterator for StepProducer {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        match self {
            Self::Bubble(p) => p.next(),
            Self::Selection(p) => p.next(),
            Self::Insertion(p) => p.next(),
            Self::Merge(p) => p.next(),
            Self::Quick(p) => p.next(),
            Self::Heap(p) => p.next(),
            Self::Radix(p) => p.next(),
            Self::Shell(p) => p.next(),
        }
    }
}
