//! Integration tests for option-map validation.
//!
//! Tests cover:
//! - Missing target
//! - Numeric bounds on `level`
//! - Conflicting shell options
//! - Suggested command for valid maps

#![cfg(test)]

use sqlmapctl::command::Environment;
use sqlmapctl::registry::OptionName;
use sqlmapctl::state::OptionMap;
use sqlmapctl::validate::{IssueLevel, Validator};

const URL: &str = "http://example.com/a.php?id=1";

#[test]
/// What: An empty map is invalid because it has no target.
///
/// Inputs:
/// - Empty option map.
///
/// Output:
/// - Invalid report whose errors include the missing-target error.
fn integration_empty_map_needs_target() {
    let report = Validator::default().validate_options(&OptionMap::new());
    assert!(!report.is_valid());
    assert!(
        report
            .errors()
            .iter()
            .any(|i| i.message.contains("No target specification"))
    );
}

#[test]
/// What: `level` above five is an error about `level`; three is fine.
///
/// Inputs:
/// - `{level: 6}` and `{level: 3}`, each without a target.
///
/// Output:
/// - Only the first report has an error concerning `level`.
fn integration_level_bounds() {
    let v = Validator::default();
    let high = v.validate_options(&OptionMap::new().with(OptionName::Level, 6));
    assert!(high.errors().iter().any(|i| i.concerns(OptionName::Level)));
    let ok = v.validate_options(&OptionMap::new().with(OptionName::Level, 3));
    assert!(!ok.errors().iter().any(|i| i.concerns(OptionName::Level)));
}

#[test]
/// What: The minimal run validates and suggests the built command.
///
/// Inputs:
/// - `url` and `batch = true`.
///
/// Output:
/// - No errors; suggested command is the unquoted built line.
fn integration_minimal_run_is_valid() {
    let map = OptionMap::new()
        .with(OptionName::Url, URL)
        .with(OptionName::Batch, true);
    let report = Validator::new(&Environment::with_program(["sqlmap"])).validate_options(&map);
    assert!(report.is_valid(), "{}", report.render());
    assert_eq!(
        report.suggested_command.as_deref(),
        Some("sqlmap -u http://example.com/a.php?id=1 --batch")
    );
}

#[test]
/// What: Two shell options together only warn.
///
/// Inputs:
/// - Target plus `sql_shell` and `os_shell`; then the same without target.
///
/// Output:
/// - First report valid with a conflict warning naming both flags; second invalid
///   for the target reason only.
fn integration_shell_conflict_is_warning() {
    let v = Validator::default();
    let with_target = OptionMap::new()
        .with(OptionName::Url, URL)
        .with(OptionName::SqlShell, true)
        .with(OptionName::OsShell, true);
    let report = v.validate_options(&with_target);
    assert!(report.is_valid(), "{}", report.render());
    let conflict = report
        .warnings()
        .into_iter()
        .find(|i| i.message.starts_with("Mutually exclusive"))
        .expect("conflict warning");
    assert!(conflict.message.contains("--sql-shell"));
    assert!(conflict.message.contains("--os-shell"));

    let mut without_target = with_target;
    without_target.remove(OptionName::Url);
    let report = v.validate_options(&without_target);
    assert!(!report.is_valid());
    assert_eq!(report.errors().len(), 1);
    assert!(report.errors()[0].message.contains("No target"));
}

#[test]
/// What: Invalid technique letters are named exactly.
///
/// Inputs:
/// - Explicit technique `BXZ`.
///
/// Output:
/// - Error listing `X, Z`.
fn integration_technique_letters_checked() {
    let map = OptionMap::new()
        .with(OptionName::Url, URL)
        .with(OptionName::Technique, "BXZ");
    let report = Validator::default().validate_options(&map);
    let errors = report.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Invalid technique characters: X, Z");
    assert!(report.suggested_command.is_none());
}

#[test]
/// What: Risky options warn but never block.
fn integration_risky_option_warns() {
    let map = OptionMap::new()
        .with(OptionName::Url, URL)
        .with(OptionName::OsCmd, "id");
    let report = Validator::default().validate_options(&map);
    assert!(report.is_valid());
    assert!(report.issues.iter().any(|i| {
        i.level == IssueLevel::Warning && i.message.starts_with("HIGH RISK") && i.concerns(OptionName::OsCmd)
    }));
}
