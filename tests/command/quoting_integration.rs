//! Integration tests for shell-safe quoting of built commands.

#![cfg(test)]

use sqlmapctl::command::{CommandBuilder, Environment, quote_arg};
use sqlmapctl::registry::OptionName;
use sqlmapctl::state::OptionMap;

#[test]
/// What: A value with a space and a single quote survives a shell round trip.
///
/// Inputs:
/// - `data` value `name=O'Brien & co`.
///
/// Output:
/// - The joined command line re-tokenises to the original value; the process receives
///   it unquoted.
fn integration_quoted_value_round_trips() {
    let env = Environment::with_program(["sqlmap"]);
    let value = "name=O'Brien & co";
    let map = OptionMap::new()
        .with(OptionName::Url, "http://h/?id=1")
        .with(OptionName::Data, value);
    let args = CommandBuilder::new(&env).build(&map, false);
    let line = args.to_command_line();
    let tokens = shlex::split(&line).expect("balanced quoting");
    let pos = tokens.iter().position(|t| t == "--data").expect("--data emitted");
    assert_eq!(tokens[pos + 1], value);
    assert!(args.process_args().contains(&value.to_string()));
}

#[test]
/// What: Hostile values stay single tokens.
///
/// Inputs:
/// - Values containing `;`, `$(...)`, backticks and newlines.
///
/// Output:
/// - Each quotes to one token that splits back to itself.
fn integration_quote_arg_neutralises_metacharacters() {
    for value in ["a; rm -rf /", "$(id)", "`id`", "line1\nline2", "", "'"] {
        let quoted = quote_arg(value);
        let back = shlex::split(&quoted).expect("balanced");
        assert_eq!(back, [value], "{quoted}");
    }
}
