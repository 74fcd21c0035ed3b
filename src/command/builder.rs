//! Option map → argument vector.

use std::collections::HashSet;

use super::environment::Environment;
use super::vector::ArgumentVector;
use crate::registry::{OptionKind, OptionName, TECHNIQUE_LETTERS, UNQUOTED_OPTIONS};
use crate::state::{OptionMap, OptionValue};

/// Flags injected when required flags are forced: non-interactive, no ANSI colour.
pub const FORCED_FLAGS: [&str; 2] = ["--batch", "--disable-coloring"];

/// Flag carrying the composite technique letters.
const TECHNIQUE_FLAG: &str = "--technique";

/// Builds argument vectors for one environment.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    env: &'a Environment,
}

impl<'a> CommandBuilder<'a> {
    /// Builder bound to `env`'s invocation prefix.
    #[must_use]
    pub const fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// What: Build the argument vector for `options`.
    ///
    /// Inputs:
    /// - `options`: Insertion-ordered option map.
    /// - `force_required_flags`: Inject `--batch` and `--disable-coloring` up front.
    ///
    /// Output:
    /// - Program prefix, forced flags, the merged `--technique` flag, then every other
    ///   active option in map order. No flag appears twice.
    ///
    /// Details:
    /// - Technique-bit options merge into one `--technique` value in `BEUSTQ` order and
    ///   take precedence over an explicit `technique` entry.
    /// - Valued options are trimmed and skipped when empty or boolean; URL/connection options are
    ///   emitted verbatim, everything else is shell-quoted in the display form.
    /// - Without forcing, an active `auto_batch` entry still injects `--batch` unless
    ///   `batch` is explicitly false.
    /// - Bookkeeping entries never reach the vector.
    #[must_use]
    pub fn build(&self, options: &OptionMap, force_required_flags: bool) -> ArgumentVector {
        let mut argv = ArgumentVector::default();
        for token in self.env.program() {
            argv.push_quoted(token);
        }
        let mut emitted: HashSet<&'static str> = HashSet::new();

        if force_required_flags {
            for flag in FORCED_FLAGS {
                argv.push_verbatim(flag);
                emitted.insert(flag);
            }
        } else if wants_auto_batch(options) {
            argv.push_verbatim(FORCED_FLAGS[0]);
            emitted.insert(FORCED_FLAGS[0]);
        }

        if let Some(letters) = technique_letters(options) {
            argv.push_verbatim(TECHNIQUE_FLAG);
            argv.push_verbatim(&letters);
            emitted.insert(TECHNIQUE_FLAG);
        }

        for (name, value) in options.iter() {
            let flag = name.flag();
            if emitted.contains(flag) {
                continue;
            }
            match name.kind() {
                OptionKind::Boolean => {
                    if value.is_active() {
                        argv.push_verbatim(flag);
                        emitted.insert(flag);
                    }
                }
                OptionKind::Valued => {
                    if !value.is_active() || matches!(value, OptionValue::Bool(_)) {
                        continue;
                    }
                    let text = value.to_arg_string();
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    argv.push_verbatim(flag);
                    if UNQUOTED_OPTIONS.contains(&name) {
                        argv.push_verbatim(text);
                    } else {
                        argv.push_quoted(text);
                    }
                    emitted.insert(flag);
                }
                OptionKind::TechniqueBit(_) | OptionKind::Bookkeeping => {}
            }
        }

        tracing::debug!(
            tokens = argv.len(),
            forced = force_required_flags,
            "[Builder] built argument vector"
        );
        argv
    }
}

/// What: Merge active technique-bit options into one letter string.
///
/// Inputs:
/// - `options`: Option map.
///
/// Output:
/// - Letters in canonical `BEUSTQ` order, or `None` when no bit is active.
#[must_use]
pub fn technique_letters(options: &OptionMap) -> Option<String> {
    let active: HashSet<char> = options
        .iter()
        .filter(|(_, v)| v.is_active())
        .filter_map(|(name, _)| match name.kind() {
            OptionKind::TechniqueBit(c) => Some(c),
            _ => None,
        })
        .collect();
    let letters: String = TECHNIQUE_LETTERS
        .chars()
        .filter(|c| active.contains(c))
        .collect();
    (!letters.is_empty()).then_some(letters)
}

/// Active `auto_batch` and `batch` not explicitly switched off.
pub(crate) fn wants_auto_batch(options: &OptionMap) -> bool {
    options.is_active(OptionName::AutoBatch)
        && options.get(OptionName::Batch) != Some(&OptionValue::Bool(false))
}
