//! Heap sort over a binary max-heap

use crate::sequence::{Step, Value};

/// A sift-down in progress
#[derive(Clone, Copy, Debug)]
struct Sift {
    node: usize,
    size: usize,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    /// Heapify nodes from `n / 2 - 1` down to the root
    Build { next: Option<usize> },
    /// Move the root behind the shrinking heap
    Extract { end: usize },
}

/// Stepwise heap sort
///
/// Emits one Step per swap: sift-down swaps in both phases as well as each
/// root/end exchange during extraction.
#[derive(Clone, Debug)]
pub struct HeapSteps {
    values: Vec<Value>,
    phase: Phase,
    sift: Option<Sift>,
}

impl HeapSteps {
    /// Start over a private copy of `input`
    #[must_use]
    pub fn new(input: &[Value]) -> Self {
        Self {
            values: input.to_vec(),
            phase: Phase::Build {
                next: (input.len() / 2).checked_sub(1),
            },
            sift: None,
        }
    }

    fn largest_of(&self, node: usize, size: usize) -> usize {
        let mut largest = node;
        let left = 2 * node + 1;
        let right = 2 * node + 2;

        if left < size && self.values[left] > self.values[largest] {
            largest = left;
        }
        if right < size && self.values[right] > self.values[largest] {
            largest = right;
        }
        largest
    }
}

impl Iterator for HeapSteps {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        loop {
            if let Some(Sift { node, size }) = self.sift.take() {
                let largest = self.largest_of(node, size);
                if largest != node {
                    self.values.swap(node, largest);
                    self.sift = Some(Sift {
                        node: largest,
                        size,
                    });
                    return Some(Step::snapshot(&self.values));
                }
            }

            match self.phase {
                Phase::Build { next: Some(node) } => {
                    self.sift = Some(Sift {
                        node,
                        size: self.values.len(),
                    });
                    self.phase = Phase::Build {
                        next: node.checked_sub(1),
                    };
                }
                Phase::Build { next: None } => {
                    self.phase = Phase::Extract {
                        end: self.values.len().saturating_sub(1),
                    };
                }
                Phase::Extract { end } if end > 0 => {
                    self.values.swap(0, end);
                    self.sift = Some(Sift { node: 0, size: end });
                    self.phase = Phase::Extract { end: end - 1 };
                    return Some(Step::snapshot(&self.values));
                }
                Phase::Extract { .. } => return None,
            }
        }
    }
}
