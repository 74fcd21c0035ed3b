//! Leveled validation issues and the report that aggregates them.

use std::fmt::Write as _;

use serde::Serialize;

use crate::registry::OptionName;

/// Severity of one finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    /// Blocks execution.
    Error,
    /// Surfaced, never blocking.
    Warning,
    /// Best-practice nudge.
    Info,
}

/// One finding. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Severity.
    pub level: IssueLevel,
    /// Option the finding is about, when it maps to a registered option.
    pub subject: Option<OptionName>,
    /// Human-readable message.
    pub message: String,
    /// Remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Flag as written by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

impl ValidationIssue {
    /// New issue without subject, suggestion or flag.
    #[must_use]
    pub fn new(level: IssueLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            subject: None,
            message: message.into(),
            suggestion: None,
            flag: None,
        }
    }

    /// Error-level issue.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(IssueLevel::Error, message)
    }

    /// Warning-level issue.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(IssueLevel::Warning, message)
    }

    /// Info-level issue.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(IssueLevel::Info, message)
    }

    /// Attach a remediation hint.
    #[must_use]
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach the flag and, when the registry knows it, the subject option.
    #[must_use]
    pub fn on_flag(mut self, flag: &str) -> Self {
        self.subject = crate::registry::option_for_flag(flag);
        self.flag = Some(flag.to_string());
        self
    }

    /// Whether this issue concerns `name`, by subject or by flag spelling.
    #[must_use]
    pub fn concerns(&self, name: OptionName) -> bool {
        self.subject == Some(name)
            || self
                .flag
                .as_deref()
                .is_some_and(|f| crate::registry::canonical_flag(f) == name.flag())
    }
}

/// Ordered findings plus an optional corrected command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Findings in the order checks produced them.
    pub issues: Vec<ValidationIssue>,
    /// Corrected or built command line, when one is available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_command: Option<String>,
    /// Same as [`is_valid`](Self::is_valid), materialised for serialisation.
    valid: bool,
}

impl ValidationReport {
    /// What: Assemble a report.
    ///
    /// Inputs:
    /// - `issues`: Findings in check order.
    /// - `suggested_command`: Optional corrected command line.
    #[must_use]
    pub fn new(issues: Vec<ValidationIssue>, suggested_command: Option<String>) -> Self {
        let valid = !issues.iter().any(|i| i.level == IssueLevel::Error);
        Self {
            issues,
            suggested_command,
            valid,
        }
    }

    /// Valid iff there is no error-level issue.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    fn at(&self, level: IssueLevel) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.level == level)
    }

    /// Error-level issues.
    #[must_use]
    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.at(IssueLevel::Error).collect()
    }

    /// Warning-level issues.
    #[must_use]
    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.at(IssueLevel::Warning).collect()
    }

    /// Info-level issues.
    #[must_use]
    pub fn infos(&self) -> Vec<&ValidationIssue> {
        self.at(IssueLevel::Info).collect()
    }

    /// What: Render the sectioned plain-text report.
    ///
    /// Output:
    /// - Verdict line, then `ERRORS`, `WARNINGS`, `SUGGESTIONS` and `SUGGESTED COMMAND`
    ///   sections, each only when non-empty.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(if self.valid {
            "Command is valid."
        } else {
            "Command has errors and cannot be executed."
        });
        for (title, level, show_flag) in [
            ("ERRORS", IssueLevel::Error, true),
            ("WARNINGS", IssueLevel::Warning, true),
            ("SUGGESTIONS", IssueLevel::Info, false),
        ] {
            let mut items = self.at(level).peekable();
            if items.peek().is_none() {
                continue;
            }
            let _ = write!(out, "\n\n{title}:");
            for issue in items {
                let _ = write!(out, "\n  - {}", issue.message);
                if show_flag && let Some(flag) = &issue.flag {
                    let _ = write!(out, " ({flag})");
                }
                if let Some(hint) = &issue.suggestion {
                    let _ = write!(out, "\n    hint: {hint}");
                }
            }
        }
        if let Some(cmd) = &self.suggested_command {
            let _ = write!(out, "\n\nSUGGESTED COMMAND:\n{cmd}");
        }
        out
    }
}
