//! Integration tests for the command builder.
//!
//! Tests cover:
//! - Deterministic output for identical input
//! - Technique letters in canonical order, emitted once
//! - The minimal valid run scenario
//! - Forced flags overriding caller values

#![cfg(test)]

use sqlmapctl::command::{CommandBuilder, Environment};
use sqlmapctl::registry::OptionName;
use sqlmapctl::state::OptionMap;

/// What: Fake environment invoking the tool as `sqlmap`.
fn env() -> Environment {
    Environment::with_program(["sqlmap"])
}

#[test]
/// What: Building the same map twice yields identical vectors.
///
/// Inputs:
/// - Map mixing target, booleans, quoted values and technique bits.
///
/// Output:
/// - Byte-identical display and process tokens for both force settings.
fn integration_build_is_deterministic() {
    let map = OptionMap::new()
        .with(OptionName::Url, "http://example.com/a.php?id=1")
        .with(OptionName::Data, "user=admin&pass=x y")
        .with(OptionName::UnionBased, true)
        .with(OptionName::Threads, 4)
        .with(OptionName::RandomAgent, true)
        .with(OptionName::ErrorBased, true);
    let env = env();
    let builder = CommandBuilder::new(&env);
    for force in [true, false] {
        let a = builder.build(&map, force);
        let b = builder.build(&map, force);
        assert_eq!(a.to_vec(), b.to_vec());
        assert_eq!(a.process_args(), b.process_args());
    }
}

#[test]
/// What: Boolean and time bits always produce `BT`, whatever the insertion order.
///
/// Inputs:
/// - The two bits inserted in both orders.
///
/// Output:
/// - Exactly one `--technique` followed by `BT`.
fn integration_technique_letters_canonical() {
    let env = env();
    let builder = CommandBuilder::new(&env);
    let forward = OptionMap::new()
        .with(OptionName::BooleanBlind, true)
        .with(OptionName::TimeBased, true);
    let reverse = OptionMap::new()
        .with(OptionName::TimeBased, true)
        .with(OptionName::BooleanBlind, true);
    for map in [forward, reverse] {
        let args = builder.build(&map, false);
        assert_eq!(args.count("--technique"), 1);
        assert_eq!(args.value_after("--technique"), Some("BT"));
    }
}

#[test]
/// What: Technique bits win over an explicit raw technique value.
///
/// Inputs:
/// - Explicit `technique = "EU"` plus the stacked-queries bit.
///
/// Output:
/// - One `--technique` token carrying `S`.
fn integration_no_double_technique() {
    let env = env();
    let map = OptionMap::new()
        .with(OptionName::Technique, "EU")
        .with(OptionName::StackedQueries, true);
    let args = CommandBuilder::new(&env).build(&map, false);
    assert_eq!(args.count("--technique"), 1);
    assert_eq!(args.value_after("--technique"), Some("S"));
}

#[test]
/// What: The minimal valid run builds the expected vector.
///
/// Inputs:
/// - `url` and `batch = true`, no forced flags.
///
/// Output:
/// - Program, unquoted `-u` value and `--batch`, nothing else.
fn integration_minimal_run_vector() {
    let env = env();
    let map = OptionMap::new()
        .with(OptionName::Url, "http://example.com/a.php?id=1")
        .with(OptionName::Batch, true);
    let args = CommandBuilder::new(&env).build(&map, false);
    assert_eq!(
        args.to_vec(),
        ["sqlmap", "-u", "http://example.com/a.php?id=1", "--batch"]
    );
}

#[test]
/// What: Forced flags appear once and override an explicit false.
///
/// Inputs:
/// - `batch = false` and `disable_coloring = true` with forcing on.
///
/// Output:
/// - `--batch` and `--disable-coloring` exactly once each, right after the program.
fn integration_forced_flags_override_caller() {
    let env = env();
    let map = OptionMap::new()
        .with(OptionName::Batch, false)
        .with(OptionName::Url, "http://h/?id=1")
        .with(OptionName::DisableColoring, true);
    let args = CommandBuilder::new(&env).build(&map, true);
    let tokens = args.to_vec();
    assert_eq!(&tokens[..3], ["sqlmap", "--batch", "--disable-coloring"]);
    assert_eq!(args.count("--batch"), 1);
    assert_eq!(args.count("--disable-coloring"), 1);
}

#[test]
fn integration_script_prefix_precedes_flags() {
    let env = Environment::with_program(["python3", "/opt/sqlmap/sqlmap.py"]);
    let map = OptionMap::new().with(OptionName::Url, "http://h/?id=1");
    let args = CommandBuilder::new(&env).build(&map, false);
    assert_eq!(
        args.process_args(),
        ["python3", "/opt/sqlmap/sqlmap.py", "-u", "http://h/?id=1"]
    );
}
