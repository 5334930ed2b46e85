//! Shell sort with the halving gap sequence

use crate::sequence::{Step, Value};

#[derive(Clone, Copy, Debug)]
struct Held {
    key: Value,
    hole: usize,
}

/// Stepwise shell sort
///
/// Gaps start at `n / 2` and halve until zero. Each gapped shift emits a
/// Step, as does each final placement.
#[derive(Clone, Debug)]
pub struct ShellSteps {
    values: Vec<Value>,
    gap: usize,
    next: usize,
    held: Option<Held>,
}

impl ShellSteps {
    /// Start over a private copy of `input`
    #[must_use]
    pub fn new(input: &[Value]) -> Self {
        let gap = input.len() / 2;
        Self {
            values: input.to_vec(),
            gap,
            next: gap,
            held: None,
        }
    }

    /// Current gap (zero once finished)
    #[must_use]
    pub fn gap(&self) -> usize {
        self.gap
    }
}

impl Iterator for ShellSteps {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        loop {
            if let Some(Held { key, hole }) = self.held {
                let gap = self.gap;
                if hole >= gap && self.values[hole - gap] > key {
                    self.values[hole] = self.values[hole - gap];
                    self.held = Some(Held {
                        key,
                        hole: hole - gap,
                    });
                } else {
                    self.values[hole] = key;
                    self.held = None;
                }
                return Some(Step::snapshot(&self.values));
            }

            if self.gap == 0 {
                return None;
            }

            if self.next < self.values.len() {
                self.held = Some(Held {
                    key: self.values[self.next],
                    hole: self.next,
                });
                self.next += 1;
                continue;
            }

            self.gap /= 2;
            self.next = self.gap;
        }
    }
}
