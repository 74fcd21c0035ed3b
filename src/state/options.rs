//! Runtime option values and the insertion-ordered option map.

use std::fmt;

use serde::Serialize;

use crate::registry::{OptionName, UnknownOption};

/// A value held by one option. Owned by the caller; never persisted by the core.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Nothing set.
    #[default]
    Unset,
    /// Checkbox-style value.
    Bool(bool),
    /// Whole number.
    Integer(i64),
    /// Decimal number.
    Float(f64),
    /// Free text.
    Text(String),
}

impl OptionValue {
    /// What: Activity predicate shared by the exclusion engine and dependency checks.
    ///
    /// Output:
    /// - `false` for `Unset`, `Bool(false)` and blank text; `true` otherwise (numbers,
    ///   including zero, count as active).
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Unset => false,
            Self::Bool(b) => *b,
            Self::Text(s) => !s.trim().is_empty(),
            Self::Integer(_) | Self::Float(_) => true,
        }
    }

    /// String form used as a command-line argument (untrimmed).
    #[must_use]
    pub fn to_arg_string(&self) -> String {
        match self {
            Self::Unset => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// What: Parse loosely-typed text (e.g. from `--set key=value`) into a value.
    ///
    /// Inputs:
    /// - `raw`: Text as typed by a user.
    ///
    /// Output:
    /// - `Bool` for true/false/yes/no/on/off, `Integer`/`Float` for numbers, `Unset` for
    ///   empty input, `Text` for everything else.
    #[must_use]
    pub fn parse_loose(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Unset;
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => return Self::Bool(true),
            "false" | "no" | "off" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Self::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>()
            && f.is_finite()
        {
            return Self::Float(f);
        }
        Self::Text(raw.to_string())
    }

    /// Convert a JSON value from a profile document. Arrays and objects are rejected.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;
        match value {
            Value::Null => Some(Self::Unset),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_arg_string())
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Flat option map keyed by registered option names.
///
/// Iteration follows first-insertion order; re-inserting a key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionMap {
    /// Entries in insertion order.
    entries: Vec<(OptionName, OptionValue)>,
}

impl OptionMap {
    /// Empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace, returning the previous value.
    pub fn insert(&mut self, name: OptionName, value: impl Into<OptionValue>) -> Option<OptionValue> {
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((name, value));
        None
    }

    /// What: Insert using a string key.
    ///
    /// # Errors
    ///
    /// - Returns `UnknownOption` when `key` is not registered; the map is left untouched.
    pub fn insert_key(
        &mut self,
        key: &str,
        value: impl Into<OptionValue>,
    ) -> Result<Option<OptionValue>, UnknownOption> {
        let name: OptionName = key.parse()?;
        Ok(self.insert(name, value))
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: OptionName, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Value for `name`, if present.
    #[must_use]
    pub fn get(&self, name: OptionName) -> Option<&OptionValue> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Whether `name` is present with an active value.
    #[must_use]
    pub fn is_active(&self, name: OptionName) -> bool {
        self.get(name).is_some_and(OptionValue::is_active)
    }

    /// Remove `name`, returning its value.
    pub fn remove(&mut self, name: OptionName) -> Option<OptionValue> {
        let idx = self.entries.iter().position(|(n, _)| *n == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionName, &OptionValue)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `other` on top of `self` (later values win, new keys are appended).
    pub fn merge(&mut self, other: &Self) {
        for (name, value) in other.iter() {
            self.insert(name, value.clone());
        }
    }
}

impl<V: Into<OptionValue>> FromIterator<(OptionName, V)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (OptionName, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}
