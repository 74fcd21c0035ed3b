//! Output for the early-exit actions. Each handler returns the text to print.

use std::fmt::Write as _;
use std::path::Path;

use serde_json::json;

use super::error::ArgsError;
use crate::command::{CommandBuilder, Environment};
use crate::config::{Settings, settings_path};
use crate::state::{OptionMap, ProfileDocument};
use crate::validate::{ValidationReport, Validator};

const fn yes_no(found: bool) -> &'static str {
    if found { "found" } else { "not found" }
}

/// What: Describe how the external tool was discovered.
///
/// Inputs:
/// - `env`: Discovery result.
/// - `settings`: Loaded settings (for the elevation wrapper name and forced flags).
/// - `config`: Settings file given on the command line, if any.
/// - `json`: Emit JSON instead of text.
///
/// # Errors
///
/// - `ArgsError::Json` when serialisation fails.
pub fn doctor(
    env: &Environment,
    settings: &Settings,
    config: Option<&Path>,
    json: bool,
) -> Result<String, ArgsError> {
    let config = settings_path(config);
    if json {
        let value = json!({
            "environment": env,
            "elevation_program": settings.elevation_program,
            "force_required_flags": settings.force_required_flags,
            "settings_path": config.display().to_string(),
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "sqlmap:     {} ({})",
        env.program().join(" "),
        yes_no(env.sqlmap_available())
    );
    let _ = writeln!(out, "python:     {}", env.python().unwrap_or("-"));
    let _ = writeln!(
        out,
        "elevation:  {} ({})",
        settings.elevation_program,
        yes_no(env.elevation_available())
    );
    let _ = write!(out, "settings:   {}", config.display());
    Ok(out)
}

fn report_output(report: &ValidationReport, json: bool) -> Result<(String, bool), ArgsError> {
    let text = if json {
        serde_json::to_string_pretty(report)?
    } else {
        report.render()
    };
    Ok((text, report.is_valid()))
}

/// What: Validate a raw command line.
///
/// Output:
/// - Rendered report and whether the command is valid.
///
/// # Errors
///
/// - `ArgsError::Json` when serialisation fails.
pub fn check(validator: &Validator, raw: &str, json: bool) -> Result<(String, bool), ArgsError> {
    report_output(&validator.validate_command(raw), json)
}

/// What: Validate collected options as they would be built.
///
/// Inputs:
/// - `force`: Whether the forced flags will be injected.
///
/// Output:
/// - Rendered report and whether the options are valid.
///
/// # Errors
///
/// - `ArgsError::Json` when serialisation fails.
pub fn validate(
    validator: &Validator,
    options: &OptionMap,
    force: bool,
    json: bool,
) -> Result<(String, bool), ArgsError> {
    report_output(&validator.validate_build(options, force), json)
}

/// What: Show the command that would run.
///
/// Output:
/// - Shell-safe command line, or a JSON array of display tokens.
///
/// # Errors
///
/// - `ArgsError::Json` when serialisation fails.
pub fn preview(
    env: &Environment,
    options: &OptionMap,
    force: bool,
    json: bool,
) -> Result<String, ArgsError> {
    let args = CommandBuilder::new(env).build(options, force);
    if json {
        Ok(serde_json::to_string(&args)?)
    } else {
        Ok(args.to_command_line())
    }
}

/// What: Write `options` as a profile document.
///
/// Inputs:
/// - `path`: Destination file; overwritten.
/// - `options`: Collected options.
///
/// Output:
/// - Confirmation line.
///
/// # Errors
///
/// - `ArgsError::Json` when serialisation fails, `ArgsError::Write` when writing fails.
pub fn save_profile(path: &Path, options: &OptionMap) -> Result<String, ArgsError> {
    let doc = ProfileDocument::from_options(options);
    let text = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, text).map_err(|source| ArgsError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), entries = options.len(), "[Args] profile saved");
    Ok(format!("Saved {} options to {}", options.len(), path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OptionName;

    fn env() -> Environment {
        Environment::with_program(["sqlmap"])
    }

    #[test]
    /// What: Preview prints a re-tokenisable line or a JSON token array.
    ///
    /// Inputs:
    /// - URL plus a data value containing a space, forced flags on.
    fn handlers_preview_text_and_json() {
        let map = OptionMap::new()
            .with(OptionName::Url, "http://a/?id=1")
            .with(OptionName::Data, "a=1 b");
        let line = preview(&env(), &map, true, false).expect("preview");
        let tokens = shlex::split(&line).expect("balanced");
        assert_eq!(tokens.first().map(String::as_str), Some("sqlmap"));
        assert!(tokens.contains(&"a=1 b".to_string()));
        let json = preview(&env(), &map, true, true).expect("preview");
        let parsed: Vec<String> = serde_json::from_str(&json).expect("json array");
        assert_eq!(parsed[1], "--batch");
    }

    #[test]
    fn handlers_check_reports_validity() {
        let v = Validator::new(&env());
        let (text, ok) = check(&v, "sqlmap --level 9", false).expect("check");
        assert!(!ok);
        assert!(text.starts_with("Command has errors"));
        let (json, ok) = check(&v, "sqlmap -u http://a/?id=1 --batch", true).expect("check");
        assert!(ok);
        assert!(json.contains("\"valid\": true"));
    }

    #[test]
    /// What: Saved profiles load back to the same options.
    ///
    /// Inputs:
    /// - Map with text, integer and boolean values.
    ///
    /// Output:
    /// - Parsed document holds the same map and version metadata.
    fn handlers_save_profile_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("saved.json");
        let map = OptionMap::new()
            .with(OptionName::Url, "http://a/")
            .with(OptionName::Level, 3)
            .with(OptionName::Batch, true);
        let msg = save_profile(&path, &map).expect("save");
        assert!(msg.starts_with("Saved 3 options"));
        let text = std::fs::read_to_string(&path).expect("read");
        let doc = ProfileDocument::parse(&text).expect("parse");
        assert_eq!(doc.options, map);
        assert_eq!(
            doc.metadata.and_then(|m| m.version).as_deref(),
            Some(crate::state::profile::PROFILE_VERSION)
        );
    }

    #[test]
    fn handlers_save_profile_reports_write_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("saved.json");
        let map = OptionMap::new().with(OptionName::Url, "http://a/");
        let err = save_profile(&path, &map).expect_err("parent directory is missing");
        assert!(matches!(err, ArgsError::Write { .. }));
        assert!(err.to_string().starts_with("cannot write "), "{err}");
    }

    #[test]
    fn handlers_doctor_lists_discovery() {
        let text = doctor(&env(), &Settings::default(), Some(Path::new("/tmp/s.toml")), false).expect("doctor");
        assert!(text.starts_with("sqlmap:     sqlmap (found)"));
        assert!(text.contains("elevation:  sudo"));
        assert!(text.ends_with("settings:   /tmp/s.toml"));
        let json = doctor(&env(), &Settings::default(), Some(Path::new("/tmp/s.toml")), true).expect("doctor");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["environment"]["program"][0], "sqlmap");
    }
}
