//! Integration Test: Algorithm Purity
//!
//! Step producers are plain iterators. They must not touch the async runtime,
//! the clock, or a random source, so a given input always yields the same
//! steps no matter how the playback loop paces them.

use architectural_enforcement::{core_src, find_patterns};

const FORBIDDEN: &[&str] = &[
    "tokio::",
    "async ",
    ".await",
    "sleep(",
    "std::time",
    "Instant::",
    "rand::",
    "thread_rng",
];

#[test]
fn test_step_producers_are_pure() {
    let algorithms = core_src().join("algorithms");
    assert!(algorithms.exists(), "missing {}", algorithms.display());

    let violations = find_patterns(&algorithms, FORBIDDEN, &[]);

    if !violations.is_empty() {
        eprintln!("\n❌ Step producers must stay pure!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ Pacing belongs in playback.rs, randomness in sequence.rs");

        panic!(
            "\nFound {} impurity violation(s) in step producers.",
            violations.len()
        );
    }
}
