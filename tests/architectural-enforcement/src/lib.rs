//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The session engine stays headless (no terminal or clipboard crates)
//! - Shell commands run through `tokio::process`, never blocking the loop
//! - No thread sleeps in production code
//!
//! The helpers here scan source files line by line; test code is skipped.

use std::fs;
use std::path::{Path, PathBuf};

/// A rule broken on one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub file: PathBuf,
    pub line: usize,
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.file.display(), self.line, self.text)
    }
}

/// Workspace root, two levels above this package
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Every `.rs` file below `dir` (relative to the workspace root)
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    if !path.exists() {
        return Vec::new();
    }
    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect()
}

/// Lines of production code in `dir` matching `is_violation`
///
/// Comments and everything after a `#[cfg(test)]` line are ignored.
pub fn scan(dir: &str, is_violation: impl Fn(&str) -> bool) -> Vec<Violation> {
    let mut violations = Vec::new();
    for file in rust_files(dir) {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        for (idx, line) in production_lines(&content) {
            let code = line.split("//").next().unwrap_or(line);
            if is_violation(code) {
                violations.push(Violation {
                    file: file.clone(),
                    line: idx + 1,
                    text: line.trim().to_string(),
                });
            }
        }
    }
    violations
}

/// Numbered lines before the first test module
pub fn production_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim().starts_with("#[cfg(test)]"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_tests() {
        let content = "fn a() {}\n#[cfg(test)]\nmod tests {\n    fn b() {}\n}";
        let lines = production_lines(content);
        assert_eq!(lines, vec![(0, "fn a() {}")]);
    }

    #[test]
    fn test_workspace_root_contains_core() {
        assert!(workspace_root().join("session/core/Cargo.toml").exists());
    }
}
