//! Shared utilities for argument processing.

use super::error::ArgsError;
use crate::state::OptionValue;

/// What: Determine the log level from command-line arguments.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides the `--log-level` argument. `RUST_LOG` still wins over both
///   when the subscriber is built.
pub fn determine_log_level(args: &crate::args::Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}

/// What: Split a `KEY=VALUE` assignment.
///
/// Inputs:
/// - `raw`: Argument as given to `--set`.
///
/// Output:
/// - Trimmed key and the loosely typed value (`url=` yields an unset value).
///
/// # Errors
///
/// - `ArgsError::Assignment` when there is no `=` or the key is empty.
pub fn parse_assignment(raw: &str) -> Result<(&str, OptionValue), ArgsError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(ArgsError::Assignment(raw.to_string()));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(ArgsError::Assignment(raw.to_string()));
    }
    Ok((key, OptionValue::parse_loose(value)))
}
