//! Integration tests for raw command-line validation.

#![cfg(test)]

use sqlmapctl::command::Environment;
use sqlmapctl::validate::{IssueLevel, Validator};

#[test]
/// What: Unbalanced quoting stops analysis with one parse error.
///
/// Inputs:
/// - Command with an unterminated single quote.
///
/// Output:
/// - Exactly one error and no suggested command.
fn integration_unbalanced_quotes() {
    let report = Validator::default().validate_command("sqlmap -u 'http://h/?id=1");
    assert!(!report.is_valid());
    assert_eq!(report.errors().len(), 1);
    assert!(report.errors()[0].message.starts_with("Failed to parse command"));
    assert!(report.suggested_command.is_none());
}

#[test]
/// What: Checks keep running after an early error.
///
/// Inputs:
/// - No target, an unknown flag, an out-of-range level and an unmet dependency.
///
/// Output:
/// - One error per problem, all in the same report.
fn integration_errors_accumulate() {
    let report =
        Validator::default().validate_command("sqlmap --frobnicate --level 9 --second-url http://x/");
    let messages: Vec<&str> = report.errors().iter().map(|i| i.message.as_str()).collect();
    assert!(messages.iter().any(|m| m.contains("No target")));
    assert!(messages.iter().any(|m| m.contains("'--frobnicate'")));
    assert!(messages.iter().any(|m| m.contains("exceeds maximum 5")));
    assert!(messages.iter().any(|m| m.starts_with("Flag '--second-url' requires one of")));
}

#[test]
/// What: A missing input file warns; an existing one does not.
///
/// Inputs:
/// - `-r` pointing at a missing path, then at a temporary file.
fn integration_request_file_existence() {
    let v = Validator::default();
    let missing = v.validate_command("sqlmap -r /nonexistent/request.txt --batch");
    assert!(missing.is_valid());
    assert!(missing.warnings().iter().any(|i| i.message.starts_with("File not found")));

    let file = tempfile::NamedTempFile::new().expect("tempfile");
    let cmd = format!("sqlmap -r {} --batch", file.path().display());
    let present = v.validate_command(&cmd);
    assert!(!present.warnings().iter().any(|i| i.message.starts_with("File not found")));
}

#[test]
/// What: Messy technique letters produce a normalised suggestion.
///
/// Inputs:
/// - `--technique tbb` with an unknown flag.
///
/// Output:
/// - Suggested command drops the unknown flag and uses `BT`.
fn integration_suggests_normalised_command() {
    let report = Validator::default().validate_command("sqlmap -u http://h/?id=1 --technique tbb --bogus");
    assert_eq!(
        report.suggested_command.as_deref(),
        Some("sqlmap -u http://h/?id=1 --technique BT")
    );
}

#[test]
/// What: A script invocation is recognised as the program prefix.
///
/// Inputs:
/// - `python3 /opt/sqlmap/sqlmap.py` prefix and a plain `echo` command.
///
/// Output:
/// - No prefix warning for the first; a warning for the second.
fn integration_program_prefix_warning() {
    let v = Validator::new(&Environment::with_program(["python3", "/opt/sqlmap/sqlmap.py"]));
    let ok = v.validate_command("python3 /opt/sqlmap/sqlmap.py -u http://h/?id=1 --batch");
    assert!(!ok.issues.iter().any(|i| i.message.starts_with("Command should start")));
    let odd = v.validate_command("echo -u http://h/?id=1");
    assert!(odd.issues.iter().any(|i| {
        i.level == IssueLevel::Warning && i.message.starts_with("Command should start")
    }));
}

#[test]
fn integration_empty_command() {
    let report = Validator::default().validate_command("   ");
    assert_eq!(report.errors().len(), 1);
    assert_eq!(report.errors()[0].message, "Empty command");
}
