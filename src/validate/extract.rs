//! Flag/value extraction from a tokenised command line or an option map.

use super::report::ValidationIssue;
use super::rules::{FlagShape, shape_of};
use crate::command::FORCED_FLAGS;
use crate::command::builder::{technique_letters, wants_auto_batch};
use crate::registry::{OptionKind, OptionName};
use crate::state::{OptionMap, OptionValue};

/// Value attached to an extracted flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// Flag present on its own.
    Present,
    /// Flag with a value.
    Value(String),
    /// Valued flag whose value is missing.
    Missing,
}

impl FlagValue {
    /// The attached value, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            Self::Present | Self::Missing => None,
        }
    }
}

/// Flags in first-seen order; a repeated flag keeps its position and takes the new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFlags {
    entries: Vec<(String, FlagValue)>,
}

impl ParsedFlags {
    /// Record `flag`.
    pub fn set(&mut self, flag: &str, value: FlagValue) {
        if let Some(slot) = self.entries.iter_mut().find(|(f, _)| f == flag) {
            slot.1 = value;
        } else {
            self.entries.push((flag.to_string(), value));
        }
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries.iter().map(|(f, v)| (f.as_str(), v))
    }

    /// Whether `flag` was written exactly like this.
    #[must_use]
    pub fn has(&self, flag: &str) -> bool {
        self.entries.iter().any(|(f, _)| f == flag)
    }

    /// Whether any spelling of `flag` is present.
    #[must_use]
    pub fn has_any_spelling(&self, flag: &str) -> bool {
        crate::registry::flag_spellings(flag)
            .into_iter()
            .any(|s| self.has(s))
    }

    /// Value of the first present spelling of `flag`.
    #[must_use]
    pub fn value_of(&self, flag: &str) -> Option<&FlagValue> {
        crate::registry::flag_spellings(flag)
            .into_iter()
            .find_map(|s| self.entries.iter().find(|(f, _)| f == s).map(|(_, v)| v))
    }

    /// Whether no flags were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What: Walk command-line tokens (program prefix already removed) and collect flags.
///
/// Inputs:
/// - `tokens`: Shell-split tokens.
/// - `issues`: Sink for extraction findings.
///
/// Output:
/// - Extracted flags.
///
/// Details:
/// - `-uVALUE` (single dash, more than two characters, no `=`) is a short flag with an
///   inline value; `--flag=value` splits at the first `=`.
/// - Valued flags consume the next token unless it starts with `-`, which records an
///   error and leaves the value missing.
/// - Unknown flags are recorded as present for the existence check.
/// - Stray non-flag tokens are warnings.
pub fn from_tokens(tokens: &[String], issues: &mut Vec<ValidationIssue>) -> ParsedFlags {
    let mut flags = ParsedFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if !token.starts_with('-') {
            issues.push(
                ValidationIssue::warning(format!("Unexpected token '{token}' - not a flag or value"))
                    .suggest("Check command syntax"),
            );
        } else if !token.starts_with("--") && token.chars().count() > 2 && !token.contains('=') {
            let split = token
                .char_indices()
                .nth(2)
                .map_or(token.len(), |(idx, _)| idx);
            let (flag, value) = token.split_at(split);
            flags.set(flag, FlagValue::Value(value.to_string()));
        } else if let Some((flag, value)) = token.split_once('=') {
            flags.set(flag, FlagValue::Value(value.to_string()));
        } else {
            match shape_of(token) {
                FlagShape::Boolean | FlagShape::Unknown => flags.set(token, FlagValue::Present),
                FlagShape::Valued => match tokens.get(i + 1) {
                    Some(next) if !next.starts_with('-') => {
                        flags.set(token, FlagValue::Value(next.clone()));
                        i += 1;
                    }
                    _ => {
                        issues.push(
                            ValidationIssue::error(format!(
                                "Flag '{token}' requires a value but none provided"
                            ))
                            .on_flag(token),
                        );
                        flags.set(token, FlagValue::Missing);
                    }
                },
            }
        }
        i += 1;
    }
    flags
}

/// What: Derive the flags an option map stands for, without tokenising.
///
/// Inputs:
/// - `options`: Option map.
/// - `force_required_flags`: Count the forced flags as present.
///
/// Output:
/// - Flags in map order. Inactive entries and bookkeeping keys are left out; active
///   technique bits collapse into one `--technique` value that wins over an explicit one;
///   an active `auto_batch` contributes `--batch`. A boolean on a valued option is a
///   flag without a value.
#[must_use]
pub fn from_options(options: &OptionMap, force_required_flags: bool) -> ParsedFlags {
    let mut flags = ParsedFlags::default();
    let letters = technique_letters(options);
    if force_required_flags {
        for flag in FORCED_FLAGS {
            flags.set(flag, FlagValue::Present);
        }
    } else if wants_auto_batch(options) {
        flags.set(OptionName::Batch.flag(), FlagValue::Present);
    }
    for (name, value) in options.iter() {
        if !value.is_active() {
            continue;
        }
        match name.kind() {
            OptionKind::Boolean => flags.set(name.flag(), FlagValue::Present),
            OptionKind::Valued => {
                if name == OptionName::Technique && letters.is_some() {
                    continue;
                }
                if matches!(value, OptionValue::Bool(_)) {
                    flags.set(name.flag(), FlagValue::Present);
                    continue;
                }
                let text = value.to_arg_string();
                flags.set(name.flag(), FlagValue::Value(text.trim().to_string()));
            }
            OptionKind::TechniqueBit(_) => {
                if let Some(l) = &letters {
                    flags.set(name.flag(), FlagValue::Value(l.clone()));
                }
            }
            OptionKind::Bookkeeping => {}
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::report::IssueLevel;

    fn toks(s: &str) -> Vec<String> {
        shlex::split(s).expect("balanced")
    }

    #[test]
    /// What: All value spellings are recognised.
    ///
    /// Inputs:
    /// - Inline short value, `--flag=value`, separate value and a boolean.
    ///
    /// Output:
    /// - Four entries with the right values and no issues.
    fn extract_value_spellings() {
        let mut issues = Vec::new();
        let flags = from_tokens(
            &toks("-uhttp://a/?id=1 --level=3 --threads 4 --batch"),
            &mut issues,
        );
        assert!(issues.is_empty());
        assert_eq!(flags.value_of("-u"), Some(&FlagValue::Value("http://a/?id=1".into())));
        assert_eq!(flags.value_of("--level"), Some(&FlagValue::Value("3".into())));
        assert_eq!(flags.value_of("--threads"), Some(&FlagValue::Value("4".into())));
        assert_eq!(flags.value_of("--batch"), Some(&FlagValue::Present));
        assert!(flags.has_any_spelling("--url"));
    }

    #[test]
    fn extract_missing_value_and_stray_token() {
        let mut issues = Vec::new();
        let flags = from_tokens(&toks("--data --batch stray"), &mut issues);
        assert_eq!(flags.value_of("--data"), Some(&FlagValue::Missing));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].level, IssueLevel::Error);
        assert!(issues[0].message.contains("requires a value"));
        assert_eq!(issues[1].level, IssueLevel::Warning);
        assert!(issues[1].message.contains("'stray'"));
    }

    #[test]
    /// What: Option maps translate into the flags the builder would emit.
    ///
    /// Inputs:
    /// - Technique bits plus a conflicting explicit technique, an empty value, `auto_batch`.
    fn extract_from_options_mirrors_builder() {
        let map = OptionMap::new()
            .with(OptionName::Technique, "Q")
            .with(OptionName::TimeBased, true)
            .with(OptionName::BooleanBlind, true)
            .with(OptionName::Data, "")
            .with(OptionName::AutoBatch, true);
        let flags = from_options(&map, false);
        assert_eq!(flags.value_of("--technique"), Some(&FlagValue::Value("BT".into())));
        assert!(!flags.has("--data"));
        assert!(flags.has("--batch"));
    }

    #[test]
    /// What: Booleans on valued options count as missing values; forcing adds the forced flags.
    ///
    /// Inputs:
    /// - `url` and `data` set to `true`, once with forcing on.
    ///
    /// Output:
    /// - Both flags present without a value; `--batch` and `--disable-coloring` only when forced.
    fn extract_from_options_bool_on_valued_and_forced_flags() {
        let map = OptionMap::new()
            .with(OptionName::Url, true)
            .with(OptionName::Data, true);
        let plain = from_options(&map, false);
        assert_eq!(plain.value_of("-u"), Some(&FlagValue::Present));
        assert_eq!(plain.value_of("--data"), Some(&FlagValue::Present));
        assert!(!plain.has("--batch"));
        let forced = from_options(&map, true);
        assert!(forced.has("--batch"));
        assert!(forced.has("--disable-coloring"));
    }
}
