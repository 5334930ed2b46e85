//! Error Types
//!
//! Only algorithm invariant violations are surfaced as errors at run time.
//! Configuration mistakes are clamped or fall back, and protocol violations
//! (double start, stray resume) are logged no-ops.

use thiserror::Error;

use crate::algorithms::Algorithm;
use crate::playback::RunId;

/// A selection that names none of the supported algorithms
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Unknown sorting algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

/// Fatal failure of a single run
///
/// These indicate a defect in a step producer, not a recoverable condition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The final state is not an ascending permutation of the input
    #[error("{algorithm} broke its output invariant in run {run}: {reason}")]
    InvariantViolation {
        /// Run that failed
        run: RunId,
        /// Algorithm that produced the bad state
        algorithm: Algorithm,
        /// What was wrong with the final state
        reason: String,
    },

    /// The producer kept emitting steps past the budget for its input size
    #[error("{algorithm} did not terminate within {limit} steps in run {run}")]
    StepLimitExceeded {
        /// Run that failed
        run: RunId,
        /// Algorithm that failed to terminate
        algorithm: Algorithm,
        /// Step budget that was exceeded
        limit: usize,
    },
}

impl PlaybackError {
    /// Run the error belongs to
    #[must_use]
    pub fn run(&self) -> RunId {
        match self {
            Self::InvariantViolation { run, .. } | Self::StepLimitExceeded { run, .. } => *run,
        }
    }
}
