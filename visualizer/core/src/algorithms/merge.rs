//! Top-down merge sort driven by an explicit worklist
//!
//! Merged segments are spliced back into the full working array, so every
//! Step has the length of the input.

use crate::sequence::{Step, Value};

/// Progress of one merge of two sorted halves
#[derive(Clone, Debug)]
struct MergeCursor {
    lo: usize,
    left: Vec<Value>,
    right: Vec<Value>,
    merged: Vec<Value>,
    i: usize,
    j: usize,
}

impl MergeCursor {
    fn new(values: &[Value], lo: usize, mid: usize, hi: usize) -> Self {
        Self {
            lo,
            left: values[lo..mid].to_vec(),
            right: values[mid..hi].to_vec(),
            merged: Vec::with_capacity(hi - lo),
            i: 0,
            j: 0,
        }
    }

    /// Place one element. Returns `true` once one side is exhausted.
    fn advance(&mut self) -> bool {
        if self.i < self.left.len() && self.j < self.right.len() {
            if self.left[self.i] < self.right[self.j] {
                self.merged.push(self.left[self.i]);
                self.i += 1;
            } else {
                self.merged.push(self.right[self.j]);
                self.j += 1;
            }
            false
        } else {
            true
        }
    }

    /// Write merged-so-far followed by both untouched remainders
    fn write_into(&self, values: &mut [Value]) {
        let segment = self
            .merged
            .iter()
            .chain(&self.left[self.i..])
            .chain(&self.right[self.j..]);
        for (slot, value) in values[self.lo..].iter_mut().zip(segment) {
            *slot = *value;
        }
    }
}

#[derive(Clone, Debug)]
enum Frame {
    Sort { lo: usize, hi: usize },
    Merge { lo: usize, mid: usize, hi: usize },
    Merging(MergeCursor),
}

/// Stepwise merge sort
///
/// Base cases (length <= 1) emit the array as-is. Each merge emits one Step
/// per placed element plus one for the completed merge.
#[derive(Clone, Debug)]
pub struct MergeSteps {
    values: Vec<Value>,
    stack: Vec<Frame>,
}

impl MergeSteps {
    /// Start over a private copy of `input`
    #[must_use]
    pub fn new(input: &[Value]) -> Self {
        Self {
            values: input.to_vec(),
            stack: vec![Frame::Sort {
                lo: 0,
                hi: input.len(),
            }],
        }
    }
}

impl Iterator for MergeSteps {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Sort { lo, hi } if hi - lo <= 1 => {
                    return Some(Step::snapshot(&self.values));
                }
                Frame::Sort { lo, hi } => {
                    let mid = lo + (hi - lo) / 2;
                    self.stack.push(Frame::Merge { lo, mid, hi });
                    self.stack.push(Frame::Sort { lo: mid, hi });
                    self.stack.push(Frame::Sort { lo, hi: mid });
                }
                Frame::Merge { lo, mid, hi } => {
                    self.stack
                        .push(Frame::Merging(MergeCursor::new(&self.values, lo, mid, hi)));
                }
                Frame::Merging(mut cursor) => {
                    let finished = cursor.advance();
                    cursor.write_into(&mut self.values);
                    if !finished {
                        self.stack.push(Frame::Merging(cursor));
                    }
                    return Some(Step::snapshot(&self.values));
                }
            }
        }

        None
    }
}
