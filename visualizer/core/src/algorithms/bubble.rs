//! Bubble sort, one Step per full pass

use crate::sequence::{Step, Value};

/// Stepwise bubble sort
///
/// Every pass over the shrinking window is emitted, including the final
/// pass that performs no swap.
#[derive(Clone, Debug)]
pub struct BubbleSteps {
    values: Vec<Value>,
    window: usize,
    done: bool,
}

impl BubbleSteps {
    /// Start over a private copy of `input`
    #[must_use]
    pub fn new(input: &[Value]) -> Self {
        Self {
            values: input.to_vec(),
            window: input.len(),
            done: false,
        }
    }
}

impl Iterator for BubbleSteps {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.done {
            return None;
        }

        let mut swapped = false;
        for i in 1..self.window {
            if self.values[i - 1] > self.values[i] {
                self.values.swap(i - 1, i);
                swapped = true;
            }
        }

        self.window = self.window.saturating_sub(1);
        self.done = !swapped;

        Some(Step::snapshot(&self.values))
    }
}
