//! Argument vector: raw process tokens paired with their shell-quoted display form.

use std::fmt;

use serde::Serialize;

use super::quote::quote_arg;

/// One argument: the display form (possibly shell-quoted) and the literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    display: String,
    raw: String,
}

/// Ordered argument list for one invocation of the external tool.
///
/// Built fresh from an option map on every call and never edited afterwards;
/// wrapping it for elevation yields a new vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentVector {
    tokens: Vec<Token>,
}

impl ArgumentVector {
    /// Append a token shown quoted when it needs to be.
    pub(super) fn push_quoted(&mut self, raw: &str) {
        self.tokens.push(Token {
            display: quote_arg(raw),
            raw: raw.to_string(),
        });
    }

    /// Append a token shown exactly as given.
    pub(super) fn push_verbatim(&mut self, raw: &str) {
        self.tokens.push(Token {
            display: raw.to_string(),
            raw: raw.to_string(),
        });
    }

    /// Display tokens in order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.display.as_str())
    }

    /// Display tokens as an owned list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.tokens().map(str::to_string).collect()
    }

    /// Literal argument values handed to the operating system, program first.
    #[must_use]
    pub fn process_args(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.raw.clone()).collect()
    }

    /// Joined display form suitable for previews and copy-paste into a shell.
    #[must_use]
    pub fn to_command_line(&self) -> String {
        self.tokens().collect::<Vec<_>>().join(" ")
    }

    /// Whether some token displays exactly as `token`.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens().any(|t| t == token)
    }

    /// How many tokens display exactly as `token`.
    #[must_use]
    pub fn count(&self, token: &str) -> usize {
        self.tokens().filter(|t| *t == token).count()
    }

    /// Display token following the first occurrence of `flag`.
    #[must_use]
    pub fn value_after(&self, flag: &str) -> Option<&str> {
        let idx = self.tokens.iter().position(|t| t.display == flag)?;
        self.tokens.get(idx + 1).map(|t| t.display.as_str())
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// What: Wrap this invocation in a privilege-elevation prefix.
    ///
    /// Inputs:
    /// - `prefix`: Wrapper tokens, e.g. `["sudo", "-S"]`.
    ///
    /// Output:
    /// - A new vector `prefix ++ self`.
    #[must_use]
    pub fn elevated(&self, prefix: &[String]) -> Self {
        let mut out = Self::default();
        for token in prefix {
            out.push_quoted(token);
        }
        out.tokens.extend(self.tokens.iter().cloned());
        out
    }
}

impl fmt::Display for ArgumentVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_line())
    }
}

impl Serialize for ArgumentVector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.tokens())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_keeps_display_and_raw_forms_apart() {
        let mut v = ArgumentVector::default();
        v.push_quoted("sqlmap");
        v.push_verbatim("-u");
        v.push_verbatim("http://x/?a=1&b=2");
        v.push_verbatim("--data");
        v.push_quoted("a=1 b=2");
        let line = v.to_command_line();
        assert!(line.starts_with("sqlmap -u http://x/?a=1&b=2 --data "));
        assert_eq!(
            shlex::split(&line).and_then(|t| t.last().cloned()).as_deref(),
            Some("a=1 b=2")
        );
        assert_eq!(v.process_args()[4], "a=1 b=2");
        assert_eq!(v.value_after("-u"), Some("http://x/?a=1&b=2"));
        assert_eq!(v.count("--data"), 1);
    }

    #[test]
    fn vector_elevation_prefixes_without_mutating() {
        let mut v = ArgumentVector::default();
        v.push_quoted("sqlmap");
        let wrapped = v.elevated(&["sudo".to_string(), "-S".to_string()]);
        assert_eq!(wrapped.to_vec(), vec!["sudo", "-S", "sqlmap"]);
        assert_eq!(v.len(), 1);
    }
}
