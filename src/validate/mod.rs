//! Validator: checks a raw command line or an option map against the rule tables.
//!
//! Both entry points share the same checks and never fail; internal panics become a
//! single error-level issue.

pub mod extract;
pub mod report;
pub mod rules;

use std::collections::BTreeSet;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use crate::command::{CommandBuilder, Environment};
use crate::registry::{self, TECHNIQUE_LETTERS, ValueDomain};
use crate::state::OptionMap;

pub use extract::{FlagValue, ParsedFlags};
pub use report::{IssueLevel, ValidationIssue, ValidationReport};
use rules::{CONFLICT_SETS, DEPENDENCIES, FlagShape, RISKY_FLAGS};

/// Threshold above which a thread count without `--delay` earns a nudge.
const BUSY_THREADS: i64 = 5;

/// Validates commands for one environment.
#[derive(Debug, Clone)]
pub struct Validator {
    env: Environment,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&Environment::with_program(["sqlmap"]))
    }
}

impl Validator {
    /// Validator that recognises `env`'s invocation prefix and builds suggestions with it.
    #[must_use]
    pub fn new(env: &Environment) -> Self {
        Self { env: env.clone() }
    }

    /// What: Validate a full command line.
    ///
    /// Inputs:
    /// - `raw`: Command line as typed, program invocation included.
    ///
    /// Output:
    /// - Report; a suggested command is attached when normalisation changes the input.
    #[must_use]
    pub fn validate_command(&self, raw: &str) -> ValidationReport {
        guarded(|| self.command_report(raw))
    }

    /// What: Validate an option map.
    ///
    /// Inputs:
    /// - `options`: Option map as collected by the front-end.
    ///
    /// Output:
    /// - Report; when valid, the suggested command is the built command line.
    #[must_use]
    pub fn validate_options(&self, options: &OptionMap) -> ValidationReport {
        self.validate_build(options, false)
    }

    /// What: Validate an option map as it will be built.
    ///
    /// Inputs:
    /// - `options`: Option map as collected by the front-end.
    /// - `force_required_flags`: Whether the builder injects `--batch` and `--disable-coloring`.
    ///
    /// Output:
    /// - Report; forced flags count as present and appear in the suggested command.
    #[must_use]
    pub fn validate_build(&self, options: &OptionMap, force_required_flags: bool) -> ValidationReport {
        guarded(|| {
            let flags = extract::from_options(options, force_required_flags);
            let mut issues = Vec::new();
            check_flags(&flags, &mut issues);
            let valid = !issues.iter().any(|i| i.level == IssueLevel::Error);
            let suggested = valid.then(|| {
                CommandBuilder::new(&self.env)
                    .build(options, force_required_flags)
                    .to_command_line()
            });
            finish(issues, suggested)
        })
    }

    fn command_report(&self, raw: &str) -> ValidationReport {
        let trimmed = raw.trim();
        let mut issues = Vec::new();
        if trimmed.is_empty() {
            issues.push(ValidationIssue::error("Empty command").suggest("Start with: sqlmap -u <URL>"));
            return finish(issues, None);
        }
        let Some(tokens) = shlex::split(trimmed) else {
            issues.push(
                ValidationIssue::error("Failed to parse command: unbalanced quoting")
                    .suggest("Check for unmatched quotes or invalid shell syntax"),
            );
            return finish(issues, None);
        };
        let words: Vec<&str> = tokens.iter().map(String::as_str).collect();
        let prefix = self.env.prefix_len(&words);
        if prefix == 0 {
            issues.push(
                ValidationIssue::warning("Command should start with 'sqlmap' or 'python sqlmap.py'")
                    .suggest("Start with: sqlmap -u <URL>"),
            );
        }
        let body = tokens.get(prefix..).unwrap_or_default();
        let flags = extract::from_tokens(body, &mut issues);
        check_flags(&flags, &mut issues);
        let normalised = normalise(&tokens[..prefix.min(tokens.len())], &flags);
        let suggested = (normalised != trimmed).then_some(normalised);
        finish(issues, suggested)
    }
}

/// Run `f`, turning a panic into a one-issue report.
fn guarded(f: impl FnOnce() -> ValidationReport) -> ValidationReport {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown failure".to_string());
        tracing::error!(detail = %detail, "[Validator] internal failure during validation");
        ValidationReport::new(
            vec![ValidationIssue::error(format!("Validation error: {detail}"))],
            None,
        )
    })
}

fn finish(issues: Vec<ValidationIssue>, suggested: Option<String>) -> ValidationReport {
    let report = ValidationReport::new(issues, suggested);
    tracing::debug!(
        valid = report.is_valid(),
        errors = report.errors().len(),
        warnings = report.warnings().len(),
        infos = report.infos().len(),
        "[Validator] validation finished"
    );
    report
}

/// Every flag-level check, in order, without short-circuiting.
fn check_flags(flags: &ParsedFlags, issues: &mut Vec<ValidationIssue>) {
    check_targets(flags, issues);
    check_existence(flags, issues);
    check_values(flags, issues);
    check_conflicts(flags, issues);
    check_dependencies(flags, issues);
    check_risks(flags, issues);
    check_practices(flags, issues);
}

fn check_targets(flags: &ParsedFlags, issues: &mut Vec<ValidationIssue>) {
    let found: Vec<&str> = flags
        .iter()
        .map(|(f, _)| f)
        .filter(|f| rules::is_target_flag(f))
        .collect();
    match found.len() {
        0 => issues.push(
            ValidationIssue::error("No target specification found").suggest(format!(
                "Add at least one target flag: {}",
                rules::target_flag_list()
            )),
        ),
        1 => {}
        _ => issues.push(
            ValidationIssue::warning(format!(
                "Multiple target specifications found: {}",
                found.join(", ")
            ))
            .suggest("Use only one target specification method"),
        ),
    }
}

fn check_existence(flags: &ParsedFlags, issues: &mut Vec<ValidationIssue>) {
    for (flag, _) in flags.iter() {
        if rules::shape_of(flag) == FlagShape::Unknown {
            issues.push(
                ValidationIssue::error(format!("Unknown or unsupported flag: '{flag}'"))
                    .on_flag(flag)
                    .suggest("Check SQLmap help (sqlmap -hh) for valid flags"),
            );
        }
    }
}

fn check_values(flags: &ParsedFlags, issues: &mut Vec<ValidationIssue>) {
    for (flag, value) in flags.iter() {
        match (rules::shape_of(flag), value) {
            (FlagShape::Boolean, FlagValue::Value(_)) => issues.push(
                ValidationIssue::warning(format!("Boolean flag '{flag}' should not have a value"))
                    .on_flag(flag),
            ),
            (FlagShape::Valued, FlagValue::Present) => issues.push(
                ValidationIssue::error(format!("Flag '{flag}' requires a value")).on_flag(flag),
            ),
            (FlagShape::Valued, FlagValue::Value(v)) if v.trim().is_empty() => issues.push(
                ValidationIssue::error(format!("Flag '{flag}' requires a value")).on_flag(flag),
            ),
            (FlagShape::Valued, FlagValue::Value(v)) => check_domain(flag, v.trim(), issues),
            _ => {}
        }
    }
}

/// Domain check for one valued flag, driven by the registry row that owns it.
fn check_domain(flag: &str, value: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(name) = rules::option_of(flag) else {
        return;
    };
    match name.descriptor().domain {
        ValueDomain::Free => {}
        ValueDomain::Url => {
            let lower = value.to_ascii_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                issues.push(
                    ValidationIssue::warning(format!("Invalid URL format: '{value}'"))
                        .on_flag(flag)
                        .suggest("URL should start with http:// or https://"),
                );
            }
        }
        ValueDomain::Integer { min, max } => match value.parse::<i64>() {
            Ok(n) => range_issue(flag, n, min, max, issues),
            Err(_) => issues.push(not_numeric(flag, value)),
        },
        ValueDomain::Decimal { min, max } => match value.parse::<f64>() {
            Ok(n) if n.is_finite() => {
                if n < min {
                    issues.push(
                        ValidationIssue::error(format!(
                            "Flag '{flag}' value {n} is below minimum {min}"
                        ))
                        .on_flag(flag),
                    );
                } else if let Some(max) = max
                    && n > max
                {
                    issues.push(
                        ValidationIssue::error(format!(
                            "Flag '{flag}' value {n} exceeds maximum {max}"
                        ))
                        .on_flag(flag),
                    );
                }
            }
            _ => issues.push(not_numeric(flag, value)),
        },
        ValueDomain::Choice { values, strict } => {
            if values.iter().any(|v| v.eq_ignore_ascii_case(value)) {
                return;
            }
            let issue = if strict {
                ValidationIssue::error(format!("Invalid value for '{flag}': '{value}'"))
                    .suggest(format!("Valid values: {}", values.join(", ")))
            } else {
                ValidationIssue::warning(format!("Uncommon value for '{flag}': '{value}'"))
                    .suggest(format!("Common values: {}", values.join(", ")))
            };
            issues.push(issue.on_flag(flag));
        }
        ValueDomain::TechniqueLetters => {
            let invalid: BTreeSet<char> = value
                .to_ascii_uppercase()
                .chars()
                .filter(|c| !TECHNIQUE_LETTERS.contains(*c))
                .collect();
            if !invalid.is_empty() {
                let listed: Vec<String> = invalid.iter().map(char::to_string).collect();
                issues.push(
                    ValidationIssue::error(format!(
                        "Invalid technique characters: {}",
                        listed.join(", ")
                    ))
                    .on_flag(flag)
                    .suggest(
                        "Valid techniques: B(Boolean), E(Error), U(Union), S(Stacked), T(Time), Q(Query)",
                    ),
                );
            }
        }
        ValueDomain::ExistingFile => {
            if !Path::new(value).is_file() {
                issues.push(
                    ValidationIssue::warning(format!("File not found: '{value}'"))
                        .on_flag(flag)
                        .suggest("Ensure the file path is correct and accessible"),
                );
            }
        }
        ValueDomain::ExistingDirectory => {
            if !Path::new(value).is_dir() {
                issues.push(
                    ValidationIssue::warning(format!("Directory not found: '{value}'"))
                        .on_flag(flag)
                        .suggest("Ensure the directory path is correct and accessible"),
                );
            }
        }
    }
}

fn range_issue(flag: &str, n: i64, min: i64, max: Option<i64>, issues: &mut Vec<ValidationIssue>) {
    if n < min {
        issues.push(
            ValidationIssue::error(format!("Flag '{flag}' value {n} is below minimum {min}"))
                .on_flag(flag),
        );
    } else if let Some(max) = max
        && n > max
    {
        issues.push(
            ValidationIssue::error(format!("Flag '{flag}' value {n} exceeds maximum {max}"))
                .on_flag(flag),
        );
    }
}

fn not_numeric(flag: &str, value: &str) -> ValidationIssue {
    ValidationIssue::error(format!("Flag '{flag}' requires a numeric value, got '{value}'"))
        .on_flag(flag)
}

fn check_conflicts(flags: &ParsedFlags, issues: &mut Vec<ValidationIssue>) {
    for set in CONFLICT_SETS {
        let found: Vec<&str> = set
            .iter()
            .copied()
            .filter(|f| flags.has_any_spelling(f))
            .collect();
        if found.len() > 1 {
            issues.push(
                ValidationIssue::warning(format!(
                    "Mutually exclusive flags found: {}",
                    found.join(", ")
                ))
                .suggest("Use only one of these flags at a time"),
            );
        }
    }
}

fn check_dependencies(flags: &ParsedFlags, issues: &mut Vec<ValidationIssue>) {
    for (flag, alternatives) in DEPENDENCIES {
        if !flags.has_any_spelling(flag) {
            continue;
        }
        if alternatives.iter().any(|alt| flags.has_any_spelling(alt)) {
            continue;
        }
        let missing: Vec<&str> = alternatives
            .iter()
            .flat_map(|alt| registry::flag_spellings(alt))
            .collect();
        issues.push(
            ValidationIssue::error(format!(
                "Flag '{flag}' requires one of: {}",
                missing.join(", ")
            ))
            .on_flag(flag),
        );
    }
}

fn check_risks(flags: &ParsedFlags, issues: &mut Vec<ValidationIssue>) {
    for (flag, description) in RISKY_FLAGS {
        if flags.has_any_spelling(flag) {
            issues.push(
                ValidationIssue::warning(format!("HIGH RISK: {description}"))
                    .on_flag(flag)
                    .suggest("Ensure you have proper authorization before using this flag"),
            );
        }
    }
}

fn check_practices(flags: &ParsedFlags, issues: &mut Vec<ValidationIssue>) {
    let has = |f: &str| flags.has_any_spelling(f);
    if !has("--batch") && ["--dump", "--dump-all", "--sql-shell"].into_iter().any(|f| has(f)) {
        issues.push(
            ValidationIssue::info("Consider adding --batch for non-interactive execution")
                .suggest("Add --batch to avoid prompts during automated scans"),
        );
    }
    if has("-u") && !has("--random-agent") && !has("--user-agent") && !has("--mobile") {
        issues.push(
            ValidationIssue::info("Consider using --random-agent to evade WAF detection")
                .suggest("Add --random-agent for better evasion"),
        );
    }
    if !has("--level") {
        issues.push(
            ValidationIssue::info(
                "Default level is 1. Consider increasing --level for more thorough testing",
            )
            .suggest("Use --level 3-5 for comprehensive scans"),
        );
    }
    if has("-u") && !has("--threads") {
        issues.push(
            ValidationIssue::info("Consider using --threads to speed up testing")
                .suggest("Add --threads 5-10 for faster scans (be careful with server load)"),
        );
    }
    let threads = flags
        .value_of("--threads")
        .and_then(FlagValue::text)
        .and_then(|v| v.trim().parse::<i64>().ok());
    if threads.is_some_and(|t| t > BUSY_THREADS) && !has("--delay") {
        issues.push(
            ValidationIssue::info("High thread count without --delay may overload the target")
                .suggest("Add --delay to space out requests"),
        );
    }
}

/// What: Rebuild a command line from extracted flags.
///
/// Inputs:
/// - `prefix`: Program invocation tokens kept as written.
/// - `flags`: Extracted flags.
///
/// Output:
/// - Joined command with unknown flags and missing values dropped; technique letters
///   upper-cased, de-duplicated, filtered and put in `BEUSTQ` order.
fn normalise(prefix: &[String], flags: &ParsedFlags) -> String {
    let mut out: Vec<String> = prefix.iter().map(|t| crate::command::quote_arg(t)).collect();
    for (flag, value) in flags.iter() {
        let shape = rules::shape_of(flag);
        match (shape, value) {
            (FlagShape::Unknown, _) | (FlagShape::Valued, FlagValue::Missing | FlagValue::Present) => {}
            (FlagShape::Boolean, _) => out.push(flag.to_string()),
            (FlagShape::Valued, FlagValue::Value(v)) => {
                let is_technique = rules::option_of(flag)
                    .is_some_and(|n| n.descriptor().domain == ValueDomain::TechniqueLetters);
                let v = if is_technique {
                    let upper = v.to_ascii_uppercase();
                    TECHNIQUE_LETTERS.chars().filter(|c| upper.contains(*c)).collect()
                } else {
                    v.clone()
                };
                if v.is_empty() {
                    continue;
                }
                out.push(flag.to_string());
                let verbatim = rules::option_of(flag)
                    .is_some_and(|n| registry::UNQUOTED_OPTIONS.contains(&n));
                out.push(if verbatim { v } else { crate::command::quote_arg(&v) });
            }
        }
    }
    out.join(" ")
}
