//! Shell quoting for the display form of argument vectors.

use std::borrow::Cow;

/// Safely single-quote an arbitrary string for POSIX shells.
///
/// Inputs: `s` string to quote.
///
/// Output: New string wrapped in single quotes, with inner quotes escaped via the
/// `'"'"'` pattern.
#[must_use]
pub fn shell_single_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push_str("'\"'\"'");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

/// What: Quote one argument for display in a joined command line.
///
/// Inputs:
/// - `s`: Raw argument.
///
/// Output:
/// - `s` unchanged when it needs no quoting, otherwise a shell-safe single token.
///
/// Details:
/// - Uses `shlex` quoting; strings `shlex` refuses (interior NUL) fall back to
///   single-quote wrapping.
#[must_use]
pub fn quote_arg(s: &str) -> String {
    shlex::try_quote(s).map_or_else(|_| shell_single_quote(s), Cow::into_owned)
}
