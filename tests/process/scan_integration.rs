//! Integration tests for scan orchestration (Unix only).

#![cfg(all(test, unix))]

use std::sync::atomic::AtomicBool;

use sqlmapctl::command::Environment;
use sqlmapctl::config::Settings;
use sqlmapctl::process::Stream;
use sqlmapctl::registry::OptionName;
use sqlmapctl::scan::{LogLine, ScanOutcome, run_scan};
use sqlmapctl::state::OptionMap;

/// What: Settings with short timings.
fn settings() -> Settings {
    Settings {
        stop_grace_ms: 300,
        poll_interval_ms: 10,
        elevation_settle_ms: 100,
        ..Settings::default()
    }
}

#[test]
/// What: The tool receives the built arguments, and its output reaches the sink cleaned.
///
/// Inputs:
/// - Fake tool `sh -c 'printf ...' sqlmap` echoing its arguments with colour codes.
///
/// Output:
/// - `Completed` with success; the echoed arguments include the forced flags and the
///   raw data value.
fn integration_scan_passes_raw_arguments() {
    let env = Environment::with_program([
        "sh",
        "-c",
        r#"for a in "$@"; do printf '\033[1m%s\033[0m\n' "$a"; done"#,
        "sqlmap",
    ]);
    let options = OptionMap::new()
        .with(OptionName::Url, "http://h/?id=1")
        .with(OptionName::Data, "a=1 b='2'");
    let mut lines: Vec<LogLine> = Vec::new();
    let cancel = AtomicBool::new(false);
    let outcome = run_scan(&env, &settings(), &options, None, |l| lines.push(l), &cancel);
    assert!(outcome.is_success(), "{outcome:?}");
    let stdout: Vec<&str> = lines
        .iter()
        .filter(|l| l.stream == Stream::Stdout)
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(
        stdout,
        ["--batch", "--disable-coloring", "-u", "http://h/?id=1", "--data", "a=1 b='2'"]
    );
}

#[test]
fn integration_scan_refuses_invalid_options() {
    let env = Environment::with_program(["true"]);
    let options = OptionMap::new()
        .with(OptionName::Url, "http://h/?id=1")
        .with(OptionName::Risk, 9);
    let cancel = AtomicBool::new(false);
    let outcome = run_scan(&env, &settings(), &options, None, |_| {}, &cancel);
    let ScanOutcome::Refused(report) = outcome else {
        panic!("expected refusal");
    };
    assert!(report.errors().iter().any(|i| i.concerns(OptionName::Risk)));
}
