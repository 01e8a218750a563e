//! Field-path deletion against the accumulator.

use super::ConfigMap;
use serde_json::Value;
use std::fmt;

/// A path to a field, relative to some mapping.
///
/// Parsed from dotted strings with optional bracket segments
/// (`a.b[0].c`, `a['x.y']`) or from a list of segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Parse a dotted path.
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        // False right after a bracket segment, so `a[0].b` yields no empty segment.
        let mut pending = true;
        let mut chars = path.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if pending {
                        segments.push(std::mem::take(&mut current));
                    }
                    pending = true;
                }
                '[' => {
                    if pending && !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                    let quote = chars.next_if(|&q| q == '\'' || q == '"');
                    let mut inner = String::new();
                    while let Some(c) = chars.next() {
                        match quote {
                            Some(q) if c == q && chars.peek() == Some(&']') => {
                                chars.next();
                                break;
                            }
                            None if c == ']' => break,
                            _ => inner.push(c),
                        }
                    }
                    segments.push(inner);
                    pending = false;
                }
                c => {
                    current.push(c);
                    pending = true;
                }
            }
        }
        if pending {
            segments.push(current);
        }

        Self { segments }
    }

    /// Build from a directive element: a dotted string or a list of segments.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(path) => Some(Self::parse(path)),
            Value::Array(items) => items
                .iter()
                .map(segment_from_value)
                .collect::<Option<Vec<_>>>()
                .map(Self::new),
            Value::Number(n) => Some(Self::new(vec![n.to_string()])),
            _ => None,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

fn segment_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Remove each of `paths` from the mapping found at `scope` within `acc`.
///
/// Missing scopes and missing paths are ignored, so applying the same
/// deletions twice leaves the same result as applying them once. Returns the
/// number of fields actually removed.
pub fn apply_deletions(acc: &mut ConfigMap, scope: &[String], paths: &[FieldPath]) -> usize {
    let Some(target) = scope_mut(acc, scope) else {
        return 0;
    };
    paths
        .iter()
        .filter(|path| remove_path(target, path.segments()))
        .count()
}

fn scope_mut<'a>(acc: &'a mut ConfigMap, scope: &[String]) -> Option<&'a mut ConfigMap> {
    let mut current = acc;
    for key in scope {
        current = current.get_mut(key)?.as_object_mut()?;
    }
    Some(current)
}

fn remove_path(map: &mut ConfigMap, segments: &[String]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };
    if rest.is_empty() {
        return map.shift_remove(first).is_some();
    }
    map.get_mut(first)
        .is_some_and(|child| remove_from_value(child, rest))
}

fn remove_from_value(value: &mut Value, segments: &[String]) -> bool {
    match value {
        Value::Object(map) => remove_path(map, segments),
        Value::Array(items) => {
            let Some((first, rest)) = segments.split_first() else {
                return false;
            };
            let Ok(index) = first.parse::<usize>() else {
                return false;
            };
            if index >= items.len() {
                false
            } else if rest.is_empty() {
                items.remove(index);
                true
            } else {
                remove_from_value(&mut items[index], rest)
            }
        }
        _ => false,
    }
}
