//! Parameter registry: the curated table of options the external tool accepts.
//!
//! Every logical option name maps to exactly one [`OptionDescriptor`]. Lookups by
//! [`OptionName`] index a static slice; lookups by key or flag go through maps built
//! once on first use.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

mod table;

pub use table::{
    AUTH_TYPES, DUMP_FORMATS, FLAG_ALIASES, HTTP_METHODS, OptionName, REG_TYPES,
    TARGET_OPTIONS, TECHNIQUE_LETTERS, TOR_TYPES, UNQUOTED_OPTIONS,
};

/// How an option contributes to the argument vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Presence-only flag.
    Boolean,
    /// Flag followed by one argument.
    Valued,
    /// Contributes one letter to the composite `--technique` value.
    TechniqueBit(char),
    /// Front-end state that never reaches the command line.
    Bookkeeping,
}

/// Constraint on the value an option may carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueDomain {
    /// Any non-empty text.
    Free,
    /// Target URL (`http://` or `https://`).
    Url,
    /// Whole number in `min..=max` (`max` absent means unbounded).
    Integer {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: Option<i64>,
    },
    /// Decimal number in `min..=max`.
    Decimal {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: Option<f64>,
    },
    /// One of a fixed set of values, compared case-insensitively.
    Choice {
        /// Accepted values.
        values: &'static [&'static str],
        /// When `false`, a mismatch is advisory only.
        strict: bool,
    },
    /// Letters drawn from [`TECHNIQUE_LETTERS`].
    TechniqueLetters,
    /// Path to a file on the local filesystem.
    ExistingFile,
    /// Path to a directory on the local filesystem.
    ExistingDirectory,
}

/// One registry row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionDescriptor {
    /// Logical option name.
    pub name: OptionName,
    /// Stable string key used by profile documents and `--set`.
    pub key: &'static str,
    /// Command-line flag of the external tool.
    pub flag: &'static str,
    /// How the option is emitted.
    pub kind: OptionKind,
    /// Accepted value domain.
    pub domain: ValueDomain,
}

/// Error returned when a string key names no registered option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption(pub String);

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown option '{}'", self.0)
    }
}

impl std::error::Error for UnknownOption {}

impl OptionName {
    /// Registry row for this option.
    #[must_use]
    pub fn descriptor(self) -> &'static OptionDescriptor {
        &table::DESCRIPTORS[self as usize]
    }

    /// Stable string key (e.g. `"url"`).
    #[must_use]
    pub fn key(self) -> &'static str {
        self.descriptor().key
    }

    /// External tool flag (e.g. `"-u"`).
    #[must_use]
    pub fn flag(self) -> &'static str {
        self.descriptor().flag
    }

    /// Emission kind.
    #[must_use]
    pub fn kind(self) -> OptionKind {
        self.descriptor().kind
    }

    /// Whether this option designates a scan target.
    #[must_use]
    pub fn is_target(self) -> bool {
        TARGET_OPTIONS.contains(&self)
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for OptionName {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        by_key()
            .get(s.trim())
            .copied()
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

impl serde::Serialize for OptionName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

fn by_key() -> &'static HashMap<&'static str, OptionName> {
    static BY_KEY: OnceLock<HashMap<&'static str, OptionName>> = OnceLock::new();
    BY_KEY.get_or_init(|| {
        OptionName::ALL
            .iter()
            .map(|name| (name.key(), *name))
            .collect()
    })
}

/// Flag → option for the options that own their flag (boolean and valued kinds).
fn by_flag() -> &'static HashMap<&'static str, OptionName> {
    static BY_FLAG: OnceLock<HashMap<&'static str, OptionName>> = OnceLock::new();
    BY_FLAG.get_or_init(|| {
        let mut map = HashMap::new();
        for name in OptionName::ALL {
            if matches!(name.kind(), OptionKind::Boolean | OptionKind::Valued) {
                map.entry(name.flag()).or_insert(*name);
            }
        }
        map
    })
}

/// What: Look up the descriptor for a string option key.
///
/// Inputs:
/// - `name`: Option key such as `"threads"`.
///
/// Output:
/// - The registry row, or `UnknownOption` when the key is not registered.
///
/// # Errors
///
/// - Returns `UnknownOption` for keys that are not part of the registry.
pub fn describe(name: &str) -> Result<&'static OptionDescriptor, UnknownOption> {
    name.parse::<OptionName>().map(OptionName::descriptor)
}

/// Flag string for an option key, `None` when the key is unknown.
#[must_use]
pub fn flag_for(name: &str) -> Option<&'static str> {
    describe(name).ok().map(|d| d.flag)
}

/// Whether `flag` is the spelling some boolean/valued registry row owns.
#[must_use]
pub fn is_registry_flag(flag: &str) -> bool {
    by_flag().contains_key(flag)
}

/// The other spelling of `flag` in [`FLAG_ALIASES`], if any.
fn alias_partner(flag: &str) -> Option<&'static str> {
    FLAG_ALIASES.iter().find_map(|(short, long)| {
        if *short == flag {
            Some(*long)
        } else if *long == flag {
            Some(*short)
        } else {
            None
        }
    })
}

/// What: Map a short or long flag to its canonical registry spelling.
///
/// Inputs:
/// - `flag`: Flag as written on a command line (`--url`, `-u`, `--threads`).
///
/// Output:
/// - The spelling the registry uses for the same option. Aliased flags outside the
///   registry resolve to their short form; unknown flags are returned unchanged.
#[must_use]
pub fn canonical_flag(flag: &str) -> &str {
    if is_registry_flag(flag) {
        return flag;
    }
    match alias_partner(flag) {
        Some(other) if is_registry_flag(other) => other,
        Some(other) if other.len() < flag.len() => other,
        _ => flag,
    }
}

/// All spellings (short and long) of `flag`, canonical spelling first.
#[must_use]
pub fn flag_spellings(flag: &str) -> Vec<&str> {
    let canonical = canonical_flag(flag);
    let mut out = vec![canonical];
    if let Some(other) = alias_partner(canonical) {
        out.push(other);
    }
    out
}

/// What: Resolve a command-line flag (either spelling) to the option that owns it.
///
/// Inputs:
/// - `flag`: Flag string such as `--level` or `--url`.
///
/// Output:
/// - Owning option for boolean/valued flags; `None` for unknown flags and for the shared
///   technique flag when only bit options could claim it.
#[must_use]
pub fn option_for_flag(flag: &str) -> Option<OptionName> {
    by_flag().get(canonical_flag(flag)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Every row sits at the index of its own variant.
    ///
    /// Details:
    /// - Guards the macro-generated table against reordering.
    fn registry_rows_match_variant_order() {
        for (idx, name) in OptionName::ALL.iter().enumerate() {
            assert_eq!(*name as usize, idx);
            assert_eq!(name.descriptor().name, *name);
        }
    }

    #[test]
    fn registry_keys_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for name in OptionName::ALL {
            assert!(seen.insert(name.key()), "duplicate key {}", name.key());
        }
    }

    #[test]
    /// What: Independent valued options never share a flag.
    ///
    /// Details:
    /// - Technique bits and bookkeeping rows are the intentional exceptions.
    fn registry_valued_flags_do_not_collide() {
        let mut owners: HashMap<&str, OptionName> = HashMap::new();
        for name in OptionName::ALL {
            if !matches!(name.kind(), OptionKind::Boolean | OptionKind::Valued) {
                continue;
            }
            if let Some(prev) = owners.insert(name.flag(), *name) {
                panic!("{prev} and {name} both use {}", name.flag());
            }
        }
    }

    #[test]
    fn registry_describe_and_flag_for() {
        let d = describe("threads").expect("threads registered");
        assert_eq!(d.flag, "--threads");
        assert_eq!(d.kind, OptionKind::Valued);
        assert_eq!(flag_for("url"), Some("-u"));
        assert_eq!(flag_for("boolean_blind"), Some("--technique"));
        assert!(describe("no_such_option").is_err());
        assert_eq!(flag_for("_metadata"), None);
    }

    #[test]
    fn registry_flag_aliases_resolve_both_ways() {
        assert_eq!(canonical_flag("--url"), "-u");
        assert_eq!(canonical_flag("-u"), "-u");
        assert_eq!(canonical_flag("--level"), "--level");
        assert_eq!(option_for_flag("--url"), Some(OptionName::Url));
        assert_eq!(option_for_flag("--technique"), Some(OptionName::Technique));
        assert_eq!(option_for_flag("--batch"), Some(OptionName::Batch));
        assert_eq!(option_for_flag("--bogus"), None);
        assert_eq!(flag_spellings("-D"), vec!["-D", "--db"]);
        assert_eq!(canonical_flag("-A"), "--user-agent");
        assert_eq!(option_for_flag("-A"), Some(OptionName::UserAgent));
        assert_eq!(canonical_flag("--exclude"), "-X");
        assert_eq!(flag_spellings("--optimize"), vec!["-o", "--optimize"]);
    }
}
