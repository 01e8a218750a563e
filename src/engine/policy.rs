//! Do-not-merge policy set.
//!
//! Entries are either a bare field name (incoming value overrides) or a
//! policy mapping of field name to marker. The `"this_file"` marker lets the
//! incoming fragment win; any other non-empty marker protects the value
//! already in the accumulator.

use super::ConfigMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker value in a policy entry that prefers the incoming fragment.
pub const THIS_FILE: &str = "this_file";

/// One element of a do-not-merge set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DontMergeEntry {
    /// Overwrite rather than deep-merge this key.
    Field(String),
    /// Field name to marker.
    Policy(ConfigMap),
}

impl DontMergeEntry {
    /// Parse one directive element, rejecting anything that is neither a
    /// string nor a mapping.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(DontMergeEntry::Field(name)),
            Value::Object(map) => Some(DontMergeEntry::Policy(map)),
            _ => None,
        }
    }

    fn rule_for(&self, key: &str) -> Option<MergeRule> {
        match self {
            DontMergeEntry::Field(name) if name == key => Some(MergeRule::Override),
            DontMergeEntry::Field(_) => None,
            DontMergeEntry::Policy(map) => match map.get(key) {
                Some(marker) if is_non_empty(marker) => {
                    if marker.as_str() == Some(THIS_FILE) {
                        Some(MergeRule::PreferIncoming)
                    } else {
                        Some(MergeRule::KeepExisting)
                    }
                }
                _ => None,
            },
        }
    }
}

impl From<&str> for DontMergeEntry {
    fn from(name: &str) -> Self {
        DontMergeEntry::Field(name.to_string())
    }
}

/// How a protected key is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// Bare-field entry: incoming value replaces the accumulator's.
    Override,
    /// Policy entry marked `this_file`: incoming value wins verbatim.
    PreferIncoming,
    /// Policy entry with any other marker: accumulator's value is kept.
    KeepExisting,
}

/// Only non-empty strings, sequences and mappings count as set.
fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Ordered do-not-merge set.
///
/// A set is never mutated once built. Per-fragment additions produce a new
/// snapshot via [`DontMergeSet::extended`], leaving the defaults untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DontMergeSet {
    entries: Vec<DontMergeEntry>,
}

impl DontMergeSet {
    pub fn new(entries: Vec<DontMergeEntry>) -> Self {
        Self { entries }
    }

    /// Bare-field set built from names.
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|name| DontMergeEntry::Field(name.into()))
                .collect(),
        )
    }

    /// This set followed by `additions`.
    pub fn extended(&self, additions: &[DontMergeEntry]) -> Self {
        let mut entries = self.entries.clone();
        entries.extend_from_slice(additions);
        Self { entries }
    }

    /// Rule of the first entry matching `key`, if any.
    pub fn rule_for(&self, key: &str) -> Option<MergeRule> {
        self.entries.iter().find_map(|entry| entry.rule_for(key))
    }

    pub fn entries(&self) -> &[DontMergeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
