//! Least-significant-digit radix sort

use crate::sequence::{Step, Value};

const BASE: u64 = 10;

/// Stepwise LSD radix sort
///
/// The number of passes is the length of the largest value's decimal text.
/// Digits are taken from the absolute value, so negative inputs are not
/// ordered correctly.
#[derive(Clone, Debug)]
pub struct RadixSteps {
    values: Vec<Value>,
    place: u32,
    passes: u32,
}

impl RadixSteps {
    /// Start over a private copy of `input`
    #[must_use]
    pub fn new(input: &[Value]) -> Self {
        let passes = input
            .iter()
            .max()
            .map_or(0, |max| u32::try_from(max.to_string().len()).unwrap_or(u32::MAX));

        Self {
            values: input.to_vec(),
            place: 0,
            passes,
        }
    }

    /// Total number of digit passes this run performs
    #[must_use]
    pub fn passes(&self) -> u32 {
        self.passes
    }
}

/// Decimal digit of `value` at `place` (0 = ones)
fn digit(value: Value, place: u32) -> usize {
    BASE.checked_pow(place).map_or(0, |divisor| {
        // Always < 10
        #[allow(clippy::cast_possible_truncation)]
        let d = (value.unsigned_abs() / divisor % BASE) as usize;
        d
    })
}

impl Iterator for RadixSteps {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.place >= self.passes {
            return None;
        }

        let mut buckets: [Vec<Value>; 10] = Default::default();
        for value in &self.values {
            buckets[digit(*value, self.place)].push(*value);
        }
        self.values = buckets.concat();
        self.place += 1;

        Some(Step::snapshot(&self.values))
    }
}
