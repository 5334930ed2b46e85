//! Selection sort, one Step per performed swap

use crate::sequence::{Step, Value};

/// Stepwise selection sort
///
/// Iterations whose minimum is already in place produce no Step.
#[derive(Clone, Debug)]
pub struct SelectionSteps {
    values: Vec<Value>,
    next: usize,
}

impl SelectionSteps {
    /// Start over a private copy of `input`
    #[must_use]
    pub fn new(input: &[Value]) -> Self {
        Self {
            values: input.to_vec(),
            next: 0,
        }
    }
}

impl Iterator for SelectionSteps {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let n = self.values.len();

        while self.next + 1 < n {
            let i = self.next;
            self.next += 1;

            let min_index = (i + 1..n).fold(i, |min, j| {
                if self.values[j] < self.values[min] {
                    j
                } else {
                    min
                }
            });

            if min_index != i {
                self.values.swap(i, min_index);
                return Some(Step::snapshot(&self.values));
            }
        }

        None
    }
}
