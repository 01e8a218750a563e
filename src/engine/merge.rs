//! Policy-aware deep merge.
//!
//! Mappings merge key by key, sequences concatenate, and everything else is
//! replaced by the incoming value. Before that, every key at every depth is
//! checked against the do-not-merge set, which can force an override or
//! protect the accumulator's existing value.

use super::ConfigMap;
use super::policy::{DontMergeSet, MergeRule};
use serde_json::Value;

/// Deep merge `fragment` into `acc` in place.
///
/// # Example
/// ```
/// use serde_json::json;
/// use hook_config_merge::engine::{DontMergeSet, merge_into};
///
/// let mut acc = json!({"tags": ["a", "b"], "form": {"fields": [1]}});
/// let fragment = json!({"tags": ["c"], "form": {"fields": [2]}});
/// merge_into(
///     acc.as_object_mut().unwrap(),
///     fragment.as_object().unwrap().clone(),
///     &DontMergeSet::fields(["fields"]),
/// );
/// assert_eq!(acc, json!({"tags": ["a", "b", "c"], "form": {"fields": [2]}}));
/// ```
pub fn merge_into(acc: &mut ConfigMap, fragment: ConfigMap, policy: &DontMergeSet) {
    for (key, incoming) in fragment {
        match policy.rule_for(&key) {
            Some(MergeRule::Override) | Some(MergeRule::PreferIncoming) => {
                acc.insert(key, incoming);
            }
            Some(MergeRule::KeepExisting) => {
                if !acc.contains_key(&key) {
                    acc.insert(key, incoming);
                }
            }
            None => match acc.get_mut(&key) {
                Some(existing) => merge_value(existing, incoming, policy),
                None => {
                    acc.insert(key, incoming);
                }
            },
        }
    }
}

fn merge_value(existing: &mut Value, incoming: Value, policy: &DontMergeSet) {
    match (existing, incoming) {
        (Value::Object(existing_map), Value::Object(incoming_map)) => {
            merge_into(existing_map, incoming_map, policy);
        }
        (Value::Array(existing_items), Value::Array(incoming_items)) => {
            existing_items.extend(incoming_items);
        }
        (existing, incoming) => *existing = incoming,
    }
}
