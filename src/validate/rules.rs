//! Static rule tables used by the validator.
//!
//! Kept separate from the interactive exclusion groups: these describe what the
//! external tool accepts on a command line, not what the editor allows at once.

use crate::registry::{self, OptionKind, OptionName, TARGET_OPTIONS};

/// Presence-only flags the tool accepts that the option registry does not model.
pub const EXTRA_BOOLEAN_FLAGS: &[&str] = &[
    "--hex",
    "--parse-errors",
    "--repair",
    "--skip-urlencode",
    "--predict-output",
    "--check-internet",
    "--eta",
    "--shell",
    "--update",
    "--disable-hashing",
    "--no-logging",
    "--no-truncate",
    "--ignore-proxy",
    "--ignore-redirects",
    "--ignore-timeouts",
    "--drop-set-cookie",
];

/// Valued flags the tool accepts that the option registry does not model.
pub const EXTRA_VALUE_FLAGS: &[&str] = &[
    "--cookie-del",
    "--abort-code",
    "--ignore-code",
    "--retry-on",
    "--randomize",
    "--safe-post",
    "--safe-req",
    "--csrf-method",
    "--csrf-data",
    "--eval",
    "--param-exclude",
    "--param-filter",
    "--union-values",
    "-X",
    "--binary-fields",
    "--csv-del",
    "--dump-file",
    "--preprocess",
    "--postprocess",
    "--save",
    "--scope",
    "--test-filter",
    "--test-skip",
    "--time-limit",
    "--table-prefix",
    "--results-file",
    "--har",
];

/// Flags that should not be combined.
pub const CONFLICT_SETS: &[&[&str]] = &[
    &["--os-shell", "--sql-shell", "--os-cmd"],
    &["--dump", "--dump-all", "--sql-query"],
    &["--tor", "--proxy"],
    &["--batch", "--wizard"],
    &["--mobile", "--random-agent", "--user-agent"],
];

/// `flag` requires at least one of the listed flags.
pub const DEPENDENCIES: &[(&str, &[&str])] = &[
    ("--proxy-freq", &["--proxy-file"]),
    ("--safe-freq", &["--safe-url", "--safe-post", "--safe-req"]),
    ("--dbms-cred", &["--dbms"]),
    ("--second-req", &["-r"]),
    ("--second-url", &["-r"]),
    ("--csrf-token", &["-u"]),
    ("--data", &["-u"]),
    ("--cookie", &["-u"]),
    ("--reg-key", &["--reg-read", "--reg-add", "--reg-del"]),
    ("--file-dest", &["--file-write"]),
    ("--pivot-column", &["--dump"]),
    ("--where", &["--dump"]),
    ("--start", &["--dump"]),
    ("--stop", &["--dump"]),
    ("--first", &["--dump"]),
    ("--last", &["--dump"]),
];

/// Operationally dangerous flags and what they do.
pub const RISKY_FLAGS: &[(&str, &str)] = &[
    ("--os-cmd", "Executes OS commands on target server"),
    ("--os-shell", "Provides interactive OS shell access"),
    ("--os-pwn", "Attempts to get Meterpreter/VNC access"),
    ("--os-smbrelay", "One-click shell/Meterpreter access"),
    ("--os-bof", "Buffer overflow exploitation"),
    ("--priv-esc", "Privilege escalation attempts"),
    ("--file-write", "Writes files to target system"),
    ("--file-read", "Reads files from target system"),
    ("--reg-add", "Modifies Windows registry"),
    ("--reg-del", "Deletes Windows registry entries"),
    ("--sql-shell", "Provides interactive SQL shell"),
];

/// How a canonical flag behaves on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagShape {
    /// Presence only.
    Boolean,
    /// Takes one value.
    Valued,
    /// Not known to the tool.
    Unknown,
}

/// What: Classify a flag.
///
/// Inputs:
/// - `flag`: Flag in any spelling.
///
/// Output:
/// - Shape from the registry, else from the extra tables, else `Unknown`.
#[must_use]
pub fn shape_of(flag: &str) -> FlagShape {
    let canonical = registry::canonical_flag(flag);
    if let Some(name) = registry::option_for_flag(canonical) {
        return match name.kind() {
            OptionKind::Boolean => FlagShape::Boolean,
            _ => FlagShape::Valued,
        };
    }
    if EXTRA_BOOLEAN_FLAGS.contains(&canonical) {
        FlagShape::Boolean
    } else if EXTRA_VALUE_FLAGS.contains(&canonical) {
        FlagShape::Valued
    } else {
        FlagShape::Unknown
    }
}

/// Whether `flag` designates a scan target.
#[must_use]
pub fn is_target_flag(flag: &str) -> bool {
    registry::option_for_flag(flag).is_some_and(|n| TARGET_OPTIONS.contains(&n))
}

/// Target flags in short form, for remediation hints.
#[must_use]
pub fn target_flag_list() -> String {
    TARGET_OPTIONS
        .iter()
        .map(|n| n.flag())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Registered option owning `flag`, if any.
#[must_use]
pub fn option_of(flag: &str) -> Option<OptionName> {
    registry::option_for_flag(flag)
}
