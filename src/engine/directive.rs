//! Extraction of embedded `_dontMerge` / `_delete` directives.
//!
//! A directive may sit in any mapping of a fragment, not only at its root.
//! The search is depth first and pre-order: a mapping is checked before its
//! children, and children are visited in key order. Sequences are not
//! searched. The first occurrence of each reserved key is honored; later
//! occurrences are stripped and reported so a reserved key never reaches the
//! accumulator.

use super::ConfigMap;
use super::delete::FieldPath;
use super::fragment::value_kind;
use super::policy::DontMergeEntry;
use crate::logging::DiagnosticSink;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Names of the reserved directive keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectiveKeys {
    pub dont_merge: String,
    pub delete: String,
}

impl Default for DirectiveKeys {
    fn default() -> Self {
        Self {
            dont_merge: "_dontMerge".to_string(),
            delete: "_delete".to_string(),
        }
    }
}

/// Delete directive with the key path of the mapping that carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDirective {
    /// Key path from the fragment root to the directive-bearing mapping.
    pub scope: Vec<String>,
    pub paths: Vec<FieldPath>,
}

/// Everything extracted from one fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directives {
    /// Entries to add to the do-not-merge set while this fragment merges.
    pub dont_merge: Vec<DontMergeEntry>,
    pub delete: Option<DeleteDirective>,
}

impl Directives {
    pub fn is_empty(&self) -> bool {
        self.dont_merge.is_empty() && self.delete.is_none()
    }
}

/// Strip the reserved keys from `fragment` and return what they carried.
pub fn extract(fragment: &mut ConfigMap, keys: &DirectiveKeys, sink: &dyn DiagnosticSink) -> Directives {
    let mut directives = Directives::default();

    if let Some((scope, value)) = take_first(fragment, &keys.dont_merge, sink) {
        sink.debug(&format!(
            "Found '{}' under '{}'",
            keys.dont_merge,
            display_scope(&scope)
        ));
        directives.dont_merge = dont_merge_entries(value, &keys.dont_merge, sink);
    }

    if let Some((scope, value)) = take_first(fragment, &keys.delete, sink) {
        sink.debug(&format!("Found '{}' under '{}'", keys.delete, display_scope(&scope)));
        directives.delete = Some(DeleteDirective {
            paths: delete_paths(value, &keys.delete, sink),
            scope,
        });
    }

    directives
}

/// Remove every occurrence of `key`, returning the first one with its scope.
fn take_first(
    fragment: &mut ConfigMap,
    key: &str,
    sink: &dyn DiagnosticSink,
) -> Option<(Vec<String>, Value)> {
    let mut found = Vec::new();
    let mut scope = Vec::new();
    take_all(fragment, key, &mut scope, &mut found);

    let mut found = found.into_iter();
    let first = found.next();
    for (extra_scope, _) in found {
        sink.warning(&format!(
            "Ignoring additional '{}' under '{}'; only the first occurrence applies",
            key,
            display_scope(&extra_scope)
        ));
    }
    first
}

fn take_all(
    map: &mut ConfigMap,
    key: &str,
    scope: &mut Vec<String>,
    found: &mut Vec<(Vec<String>, Value)>,
) {
    if let Some(value) = map.shift_remove(key) {
        found.push((scope.clone(), value));
    }
    for (child_key, child) in map.iter_mut() {
        if let Value::Object(child_map) = child {
            scope.push(child_key.clone());
            take_all(child_map, key, scope, found);
            scope.pop();
        }
    }
}

fn dont_merge_entries(value: Value, key: &str, sink: &dyn DiagnosticSink) -> Vec<DontMergeEntry> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };
    items
        .into_iter()
        .filter_map(|item| {
            let kind = value_kind(&item);
            let entry = DontMergeEntry::from_value(item);
            if entry.is_none() {
                sink.warning(&format!("Ignoring '{}' entry of type {}", key, kind));
            }
            entry
        })
        .collect()
}

fn delete_paths(value: Value, key: &str, sink: &dyn DiagnosticSink) -> Vec<FieldPath> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };
    items
        .iter()
        .filter_map(|item| {
            let path = FieldPath::from_value(item);
            if path.is_none() {
                sink.warning(&format!(
                    "Ignoring '{}' entry of type {}",
                    key,
                    value_kind(item)
                ));
            }
            path
        })
        .collect()
}

fn display_scope(scope: &[String]) -> String {
    if scope.is_empty() {
        "<root>".to_string()
    } else {
        scope.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{DiagnosticLevel, Logger};
    use serde_json::json;

    fn map(value: Value) -> ConfigMap {
        value.as_object().unwrap().clone()
    }

    fn run(fragment: &mut ConfigMap) -> Directives {
        extract(fragment, &DirectiveKeys::default(), &Logger::new())
    }

    #[test]
    fn test_no_directives_leaves_fragment_unchanged() {
        let original = map(json!({"form": {"fields": [1, 2]}}));
        let mut fragment = original.clone();
        let directives = run(&mut fragment);
        assert!(directives.is_empty());
        assert_eq!(fragment, original);
    }

    #[test]
    fn test_root_level_directives() {
        let mut fragment = map(json!({
            "_dontMerge": ["tags"],
            "_delete": ["auth.local"],
            "tags": ["c"]
        }));
        let directives = run(&mut fragment);

        assert_eq!(directives.dont_merge, vec![DontMergeEntry::from("tags")]);
        let delete = directives.delete.unwrap();
        assert!(delete.scope.is_empty());
        assert_eq!(delete.paths, vec![FieldPath::parse("auth.local")]);
        assert_eq!(Value::Object(fragment), json!({"tags": ["c"]}));
    }

    #[test]
    fn test_nested_directive_records_scope() {
        let mut fragment = map(json!({
            "a": {"_delete": ["b"], "d": 4},
            "a2": {"x": 1}
        }));
        let directives = run(&mut fragment);

        let delete = directives.delete.unwrap();
        assert_eq!(delete.scope, vec!["a".to_string()]);
        assert_eq!(delete.paths, vec![FieldPath::parse("b")]);
        assert_eq!(Value::Object(fragment), json!({"a": {"d": 4}, "a2": {"x": 1}}));
    }

    #[test]
    fn test_deeply_nested_dont_merge() {
        let mut fragment = map(json!({
            "forms": {"default-1.0-draft": {"_dontMerge": ["fields", {"menu": "this_file"}], "fields": []}}
        }));
        let directives = run(&mut fragment);

        assert_eq!(directives.dont_merge.len(), 2);
        assert_eq!(directives.dont_merge[0], DontMergeEntry::from("fields"));
        assert!(matches!(directives.dont_merge[1], DontMergeEntry::Policy(_)));
        assert_eq!(
            Value::Object(fragment),
            json!({"forms": {"default-1.0-draft": {"fields": []}}})
        );
    }

    #[test]
    fn test_first_occurrence_wins_and_rest_are_stripped() {
        let mut fragment = map(json!({
            "first": {"_delete": ["x"]},
            "second": {"inner": {"_delete": ["y"]}}
        }));
        let logger = Logger::new().capturing();
        let directives = extract(&mut fragment, &DirectiveKeys::default(), &logger);

        let delete = directives.delete.unwrap();
        assert_eq!(delete.scope, vec!["first".to_string()]);
        assert_eq!(
            Value::Object(fragment),
            json!({"first": {}, "second": {"inner": {}}})
        );
        assert!(logger
            .captured()
            .iter()
            .any(|d| d.level == DiagnosticLevel::Warning && d.message.contains("second.inner")));
    }

    #[test]
    fn test_parent_is_checked_before_children() {
        let mut fragment = map(json!({
            "child": {"_dontMerge": ["inner"]},
            "_dontMerge": ["outer"]
        }));
        let directives = run(&mut fragment);
        assert_eq!(directives.dont_merge, vec![DontMergeEntry::from("outer")]);
    }

    #[test]
    fn test_sequences_are_not_searched() {
        let original = map(json!({"list": [{"_delete": ["x"]}]}));
        let mut fragment = original.clone();
        let directives = run(&mut fragment);
        assert!(directives.delete.is_none());
        assert_eq!(fragment, original);
    }

    #[test]
    fn test_single_values_and_bad_entries() {
        let mut fragment = map(json!({"_dontMerge": "tags", "_delete": ["ok", 7, true]}));
        let logger = Logger::new().capturing();
        let directives = extract(&mut fragment, &DirectiveKeys::default(), &logger);

        assert_eq!(directives.dont_merge, vec![DontMergeEntry::from("tags")]);
        let paths = directives.delete.unwrap().paths;
        assert_eq!(paths, vec![FieldPath::parse("ok"), FieldPath::parse("7")]);
        assert_eq!(
            logger
                .captured()
                .iter()
                .filter(|d| d.level == DiagnosticLevel::Warning)
                .count(),
            1
        );
    }

    #[test]
    fn test_custom_directive_keys() {
        let keys = DirectiveKeys {
            dont_merge: "$replace".to_string(),
            delete: "$remove".to_string(),
        };
        let mut fragment = map(json!({"$replace": ["a"], "$remove": ["b"], "_delete": ["kept"]}));
        let directives = extract(&mut fragment, &keys, &Logger::new());

        assert_eq!(directives.dont_merge, vec![DontMergeEntry::from("a")]);
        assert_eq!(directives.delete.unwrap().paths, vec![FieldPath::parse("b")]);
        assert_eq!(Value::Object(fragment), json!({"_delete": ["kept"]}));
    }
}
