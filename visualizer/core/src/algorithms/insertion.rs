//! Insertion sort, one Step per shift plus one per placement

use crate::sequence::{Step, Value};

/// The key currently being inserted and the hole it will fill
#[derive(Clone, Copy, Debug)]
struct Held {
    key: Value,
    hole: usize,
}

/// Stepwise insertion sort
///
/// While a key is held its slot shows the shifted neighbour, so an
/// intermediate Step may contain that neighbour twice.
#[derive(Clone, Debug)]
pub struct InsertionSteps {
    values: Vec<Value>,
    next: usize,
    held: Option<Held>,
}

impl InsertionSteps {
    /// Start over a private copy of `input`
    #[must_use]
    pub fn new(input: &[Value]) -> Self {
        Self {
            values: input.to_vec(),
            next: 1,
            held: None,
        }
    }
}

impl Iterator for InsertionSteps {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        loop {
            if let Some(Held { key, hole }) = self.held {
                if hole > 0 && self.values[hole - 1] > key {
                    self.values[hole] = self.values[hole - 1];
                    self.held = Some(Held {
                        key,
                        hole: hole - 1,
                    });
                } else {
                    self.values[hole] = key;
                    self.held = None;
                }
                return Some(Step::snapshot(&self.values));
            }

            if self.next >= self.values.len() {
                return None;
            }

            self.held = Some(Held {
                key: self.values[self.next],
                hole: self.next,
            });
            self.next += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(input: &[Value]) -> Vec<Vec<Value>> {
        InsertionSteps::new(input).map(Step::into_inner).collect()
    }

    #[test]
    fn test_shift_and_placement_steps() {
        assert_eq!(
            collect(&[3, 1, 2]),
            vec![
                vec![3, 3, 2],
                vec![1, 3, 2],
                vec![1, 3, 3],
                vec![1, 2, 3],
            ]
        );
    }

    #[test]
    fn test_placement_step_even_without_shift() {
        assert_eq!(collect(&[1, 2, 3]), vec![vec![1, 2, 3], vec![1, 2, 3]]);
    }

    #[test]
    fn test_trivial_inputs() {
        assert!(collect(&[]).is_empty());
        assert!(collect(&[4]).is_empty());
    }
}
