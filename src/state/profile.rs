//! Boundary for profile documents produced by the front-end.
//!
//! A profile document maps tab names to flat option maps and carries a reserved
//! `_metadata` entry. Keys the registry does not know are dropped here, with a
//! warning, so they never reach the core map type.

use std::fmt;

use serde_json::{Map, Value, json};

use super::options::{OptionMap, OptionValue};
use crate::registry::OptionName;

/// Reserved top-level key holding creation time and version.
pub const METADATA_KEY: &str = "_metadata";

/// Version tag written into new documents.
pub const PROFILE_VERSION: &str = "1.0";

/// Tab name used when rendering a flat map back into a document.
const DEFAULT_TAB: &str = "options";

/// Failure to read a profile document.
#[derive(Debug)]
pub enum ProfileError {
    /// The text is not valid JSON.
    Json(serde_json::Error),
    /// The top level is not an object.
    NotAnObject,
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "invalid profile JSON: {e}"),
            Self::NotAnObject => f.write_str("profile document must be a JSON object"),
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::NotAnObject => None,
        }
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Metadata block of a profile document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileMetadata {
    /// Creation timestamp as written by the producer.
    pub created: Option<String>,
    /// Version tag.
    pub version: Option<String>,
}

/// A parsed profile document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDocument {
    /// Merged options of every tab, in document order.
    pub options: OptionMap,
    /// Metadata, when present.
    pub metadata: Option<ProfileMetadata>,
    /// Keys that were dropped (`tab.key`), for the caller to surface.
    pub dropped: Vec<String>,
}

impl ProfileDocument {
    /// What: Parse a profile document and drop what the registry does not know.
    ///
    /// Inputs:
    /// - `text`: JSON text of the document.
    ///
    /// Output:
    /// - Merged option map plus metadata and the list of dropped keys.
    ///
    /// # Errors
    ///
    /// - `ProfileError::Json` for malformed JSON, `ProfileError::NotAnObject` when the
    ///   top level is not an object.
    ///
    /// Details:
    /// - Tabs are merged in document order; a key repeated in a later tab wins.
    /// - A top-level scalar entry is treated as a tab-less option.
    /// - Nested arrays/objects inside a tab are dropped.
    pub fn parse(text: &str) -> Result<Self, ProfileError> {
        let root: Value = serde_json::from_str(text)?;
        let Value::Object(root) = root else {
            return Err(ProfileError::NotAnObject);
        };
        let mut doc = Self::default();
        for (tab, body) in &root {
            if tab == METADATA_KEY {
                doc.metadata = Some(parse_metadata(body));
                continue;
            }
            match body {
                Value::Object(fields) => {
                    for (key, value) in fields {
                        doc.absorb(&format!("{tab}.{key}"), key, value);
                    }
                }
                other => doc.absorb(tab, tab, other),
            }
        }
        if !doc.dropped.is_empty() {
            tracing::warn!(
                dropped = doc.dropped.len(),
                keys = %doc.dropped.join(", "),
                "[Profile] dropped unknown profile keys"
            );
        }
        Ok(doc)
    }

    /// Record one key/value pair, or remember it as dropped.
    fn absorb(&mut self, path: &str, key: &str, value: &Value) {
        let Ok(name) = key.parse::<OptionName>() else {
            self.dropped.push(path.to_string());
            return;
        };
        match OptionValue::from_json(value) {
            Some(v) => {
                self.options.insert(name, v);
            }
            None => self.dropped.push(path.to_string()),
        }
    }

    /// What: Render an option map as a single-tab document with fresh metadata.
    ///
    /// Inputs:
    /// - `options`: Map to render.
    ///
    /// Output:
    /// - JSON value `{ "options": {...}, "_metadata": { "created", "version" } }`.
    #[must_use]
    pub fn from_options(options: &OptionMap) -> Value {
        let mut tab = Map::new();
        for (name, value) in options.iter() {
            tab.insert(name.key().to_string(), option_to_json(value));
        }
        json!({
            DEFAULT_TAB: Value::Object(tab),
            METADATA_KEY: {
                "created": chrono::Local::now().to_rfc3339(),
                "version": PROFILE_VERSION,
            }
        })
    }
}

fn parse_metadata(body: &Value) -> ProfileMetadata {
    let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
    ProfileMetadata {
        created: text("created").or_else(|| text("created_at")),
        version: text("version"),
    }
}

fn option_to_json(value: &OptionValue) -> Value {
    match value {
        OptionValue::Unset => Value::Null,
        OptionValue::Bool(b) => Value::Bool(*b),
        OptionValue::Integer(i) => json!(i),
        OptionValue::Float(f) => json!(f),
        OptionValue::Text(s) => Value::String(s.clone()),
    }
}
