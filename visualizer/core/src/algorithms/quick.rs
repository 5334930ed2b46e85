//! Quick sort with a last-element pivot

use crate::sequence::{Step, Value};

#[derive(Clone, Copy, Debug)]
enum Frame {
    Partition { lo: usize, hi: usize },
    Emit,
}

/// Stepwise quick sort
///
/// A segment is partitioned around its last element, keeping the relative
/// order of both sides. One Step is emitted when a segment of two or more
/// elements has finished recursing (left sorted, pivot, right sorted).
#[derive(Clone, Debug)]
pub struct QuickSteps {
    values: Vec<Value>,
    stack: Vec<Frame>,
}

impl QuickSteps {
    /// Start over a private copy of `input`
    #[must_use]
    pub fn new(input: &[Value]) -> Self {
        let stack = if input.len() >= 2 {
            vec![Frame::Partition {
                lo: 0,
                hi: input.len(),
            }]
        } else {
            Vec::new()
        };

        Self {
            values: input.to_vec(),
            stack,
        }
    }

    /// Rearrange `lo..hi` into `smaller, pivot, rest`; returns the pivot index
    fn partition(&mut self, lo: usize, hi: usize) -> usize {
        let pivot = self.values[hi - 1];
        let (smaller, rest): (Vec<Value>, Vec<Value>) =
            self.values[lo..hi - 1].iter().copied().partition(|v| *v < pivot);

        let pivot_at = lo + smaller.len();
        let arranged = smaller
            .into_iter()
            .chain(std::iter::once(pivot))
            .chain(rest);
        for (slot, value) in self.values[lo..hi].iter_mut().zip(arranged) {
            *slot = value;
        }
        pivot_at
    }
}

impl Iterator for QuickSteps {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Emit => return Some(Step::snapshot(&self.values)),
                Frame::Partition { lo, hi } => {
                    let pivot_at = self.partition(lo, hi);
                    // Popped in reverse: left side, right side, then the emit
                    self.stack.push(Frame::Emit);
                    if hi - (pivot_at + 1) >= 2 {
                        self.stack.push(Frame::Partition {
                            lo: pivot_at + 1,
                            hi,
                        });
                    }
                    if pivot_at - lo >= 2 {
                        self.stack.push(Frame::Partition { lo, hi: pivot_at });
                    }
                }
            }
        }

        None
    }
}
