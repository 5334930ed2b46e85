//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - Step producers stay pure (no clock, no runtime, no randomness)
//! - Only the pacing and debounce layers may sleep
//!
//! The helpers below scan the engine sources; the rules live under `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Root of the engine sources
#[must_use]
pub fn core_src() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../visualizer/core/src")
}

/// Every `.rs` file below `dir`, sorted for stable reports
#[must_use]
pub fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Production lines of a source file as `(line_number, code)`
///
/// Comment text after `//` is dropped, and scanning stops at the first
/// `#[cfg(test)]`, since test modules sit at the end of each file.
#[must_use]
pub fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line);
            (idx + 1, code.to_string())
        })
        .filter(|(_, code)| !code.trim().is_empty())
        .collect()
}

/// Every production line in `dir` containing one of `patterns`
///
/// Returns `path:line - code` entries.
#[must_use]
pub fn find_patterns(dir: &Path, patterns: &[&str], allowed: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in rust_files(dir) {
        let name = file.file_name().and_then(|s| s.to_str()).unwrap_or_default();
        if allowed.contains(&name) {
            continue;
        }
        for (line_number, code) in production_lines(&file) {
            if patterns.iter().any(|p| code.contains(p)) {
                violations.push(format!(
                    "{}:{} - {}",
                    file.display(),
                    line_number,
                    code.trim()
                ));
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_production_lines_skip_comments_and_tests() {
        let path = std::env::temp_dir().join(format!("arch-scan-{}.rs", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "let a = 1; // sleep(here)").unwrap();
        writeln!(file, "// whole comment").unwrap();
        writeln!(file, "#[cfg(test)]").unwrap();
        writeln!(file, "fn sleep() {{}}").unwrap();
        drop(file);

        let lines = production_lines(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(lines, vec![(1, "let a = 1; ".to_string())]);
    }

    #[test]
    fn test_core_sources_are_found() {
        let files = rust_files(&core_src());
        assert!(files.iter().any(|f| f.ends_with("playback.rs")));
    }
}
