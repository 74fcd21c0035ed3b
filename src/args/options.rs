//! Collect an option map from a profile file and `--set` assignments.

use std::path::Path;

use super::error::ArgsError;
use super::utils::parse_assignment;
use crate::logic::ExclusionEngine;
use crate::registry::OptionName;
use crate::state::{OptionMap, ProfileDocument};

/// What: Build the option map for this invocation.
///
/// Inputs:
/// - `profile`: Optional profile document path.
/// - `sets`: `KEY=VALUE` assignments, applied in order after the profile.
///
/// Output:
/// - Merged option map.
///
/// # Errors
///
/// - `ArgsError::Io`/`ArgsError::Profile` for unreadable or malformed profiles.
/// - `ArgsError::Assignment`/`ArgsError::Option` for bad assignments.
///
/// Details:
/// - Unknown profile keys are dropped with a warning on stderr; unknown `--set` keys are
///   errors because the user typed them just now.
pub fn collect(profile: Option<&Path>, sets: &[String]) -> Result<OptionMap, ArgsError> {
    let mut options = match profile {
        Some(path) => load_profile(path)?,
        None => OptionMap::new(),
    };
    for raw in sets {
        let (key, value) = parse_assignment(raw)?;
        options.insert_key(key, value)?;
    }
    tracing::debug!(entries = options.len(), "[Args] options collected");
    Ok(options)
}

fn load_profile(path: &Path) -> Result<OptionMap, ArgsError> {
    let text = std::fs::read_to_string(path).map_err(|source| ArgsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = ProfileDocument::parse(&text).map_err(|source| ArgsError::Profile {
        path: path.to_path_buf(),
        source,
    })?;
    for key in &doc.dropped {
        eprintln!("warning: ignoring unknown profile key '{key}'");
    }
    tracing::info!(
        path = %path.display(),
        entries = doc.options.len(),
        version = ?doc.metadata.as_ref().and_then(|m| m.version.as_deref()),
        "[Args] profile loaded"
    );
    Ok(doc.options)
}

/// What: Replay the map through the exclusion engine and describe what it disables.
///
/// Inputs:
/// - `options`: Collected option map.
///
/// Output:
/// - One line per active option that a later alternative disabled, in map order.
#[must_use]
pub fn exclusion_notes(options: &OptionMap) -> Vec<String> {
    let mut engine = ExclusionEngine::default();
    for (name, value) in options.iter() {
        engine.update(name, value.clone());
    }
    options
        .iter()
        .filter(|(_, value)| value.is_active())
        .filter_map(|(name, _)| note_for(&engine, name))
        .collect()
}

fn note_for(engine: &ExclusionEngine, name: OptionName) -> Option<String> {
    engine
        .reason(name)
        .map(|reason| format!("'{}' ({}) {}", name.key(), name.flag(), reason.to_lowercase()))
}
