//! Integration Test: Sleep Confinement
//!
//! **Policy**: Only the pacing delay of the playback loop and the quiet
//! period of the debouncer may sleep. Everything else waits on channels,
//! `Notify` or `watch`.
//! **Exceptions**: test code

use architectural_enforcement::{core_src, find_patterns};
use std::path::Path;

const SLEEP_PATTERNS: &[&str] = &["::sleep(", ".sleep(", "sleep_until("];
const ALLOWED: &[&str] = &["playback.rs", "debounce.rs"];

fn report(violations: &[String]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ Sleep calls found outside the pacing layers!\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    eprintln!("\n✅ ACCEPTABLE sleep uses:");
    eprintln!("  - Step pacing in playback.rs");
    eprintln!("  - The quiet period in debounce.rs");
    eprintln!("  - Test code (#[cfg(test)] modules)");

    panic!(
        "\nFound {} sleep violation(s) in production code.",
        violations.len()
    );
}

#[test]
fn test_no_sleep_outside_pacing_layers() {
    report(&find_patterns(&core_src(), SLEEP_PATTERNS, ALLOWED));
}

#[test]
fn test_no_sleep_in_cli() {
    let cli = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../visualizer/cli/src");
    report(&find_patterns(&cli, SLEEP_PATTERNS, &[]));
}

#[test]
fn test_pacing_layers_exist() {
    let src = core_src();
    for name in ALLOWED {
        assert!(src.join(name).exists(), "{name} moved; update ALLOWED");
    }
}
