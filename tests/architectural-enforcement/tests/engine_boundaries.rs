//! Integration Test: Engine Boundaries
//!
//! **Policy**: `session-core` is headless and never blocks its event loop.
//! - No ratatui, crossterm or arboard in the engine
//! - Shell commands through `tokio::process`, not `std::process::Command`
//! - No `std::thread::sleep` in production code of either crate

use architectural_enforcement::{rust_files, scan, Violation};

fn report(title: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n❌ {title}");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!("\nFound {} violation(s): {title}", violations.len());
}

#[test]
fn test_sources_are_scanned() {
    assert!(!rust_files("session/core/src").is_empty());
    assert!(!rust_files("tui/src").is_empty());
}

#[test]
fn test_engine_has_no_terminal_dependencies() {
    let violations = scan("session/core/src", |code| {
        ["ratatui", "crossterm", "arboard"]
            .iter()
            .any(|name| code.contains(name))
    });
    report("Terminal or clipboard crates used in session-core", &violations);
}

#[test]
fn test_no_blocking_process_spawns() {
    let mut violations = scan("session/core/src", |code| {
        code.contains("std::process::Command")
    });
    violations.extend(scan("tui/src", |code| code.contains("std::process::Command")));
    report("Blocking process spawn (use tokio::process)", &violations);
}

#[test]
fn test_no_thread_sleep() {
    let mut violations = scan("session/core/src", |code| code.contains("thread::sleep"));
    violations.extend(scan("tui/src", |code| code.contains("thread::sleep")));
    report("std::thread::sleep in production code", &violations);
}
