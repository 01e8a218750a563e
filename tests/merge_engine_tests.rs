//! Integration tests for the merge-many engine.
//!
//! Exercises HookMerger end to end against real directory trees:
//! - fold order across roots and within a root
//! - fragment-scoped do-not-merge directives
//! - delete-before-merge and idempotent deletion
//! - missing root tolerance

use hook_config_merge::brand::resolve_brand;
use hook_config_merge::engine::{
    ConfigMap, DontMergeEntry, DontMergeSet, FileFragmentLoader, HookMerger, MergeOptions,
};
use hook_config_merge::hook::locate_hook;
use hook_config_merge::logging::{DiagnosticLevel, Logger};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to write a fragment file, creating parent dirs.
fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn map(value: Value) -> ConfigMap {
    value.as_object().unwrap().clone()
}

fn options(dont_merge: &[&str]) -> MergeOptions {
    MergeOptions {
        dont_merge: DontMergeSet::fields(dont_merge.iter().copied()),
        ..MergeOptions::default()
    }
}

/// Run merge_many with the file loader and return the accumulator.
fn merge(acc: Value, roots: &[PathBuf], options: MergeOptions) -> Value {
    let loader = FileFragmentLoader::new();
    let logger = Logger::new();
    let merger = HookMerger::new(&loader, &logger).with_options(options);
    let mut acc = map(acc);
    merger.merge_many(&mut acc, roots).unwrap();
    Value::Object(acc)
}

#[test]
fn test_override_vs_concat() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("config");
    write(&root, "tags.yaml", "tags: [c]\n");

    let concat = merge(json!({"tags": ["a", "b"]}), &[root.clone()], options(&[]));
    assert_eq!(concat, json!({"tags": ["a", "b", "c"]}));

    let overridden = merge(json!({"tags": ["a", "b"]}), &[root], options(&["tags"]));
    assert_eq!(overridden, json!({"tags": ["c"]}));
}

#[test]
fn test_fragment_scoped_policy() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("config");
    // a.yaml sorts before b.yaml
    write(&root, "a.yaml", "_dontMerge: [x]\nx: [2]\n");
    write(&root, "b.yaml", "x: [3]\n");

    let result = merge(json!({"x": [1]}), &[root], options(&[]));
    assert_eq!(result, json!({"x": [2, 3]}));
}

#[test]
fn test_defaults_survive_fragment_directives() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("config");
    write(&root, "1.yaml", "_dontMerge: [tags]\nfields: [b]\ntags: [t2]\n");
    write(&root, "2.yaml", "fields: [c]\ntags: [t3]\n");

    let result = merge(
        json!({"fields": ["a"], "tags": ["t1"]}),
        &[root],
        options(&["fields"]),
    );
    assert_eq!(result, json!({"fields": ["c"], "tags": ["t2", "t3"]}));
}

#[test]
fn test_delete_before_merge() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("config");
    write(
        &root,
        "fragment.yaml",
        "a:\n  _delete: [b]\na2:\n  z: 1\n",
    );

    let result = merge(json!({"a": {"b": 1, "c": 2}}), &[root], options(&[]));
    assert_eq!(result, json!({"a": {"c": 2}, "a2": {"z": 1}}));
    assert!(!serde_json::to_string(&result).unwrap().contains("_delete"));
}

#[test]
fn test_idempotent_deletion_across_fragments() {
    let temp = TempDir::new().unwrap();
    let once = temp.path().join("once");
    let twice = temp.path().join("twice");
    write(&once, "a.yaml", "auth:\n  _delete: [local]\n");
    write(&twice, "a.yaml", "auth:\n  _delete: [local]\n");
    write(&twice, "b.yaml", "auth:\n  _delete: [local]\n");

    let acc = json!({"auth": {"local": {"enabled": true}, "aaf": {}}});
    assert_eq!(
        merge(acc.clone(), &[once], options(&[])),
        merge(acc, &[twice], options(&[]))
    );
}

#[test]
fn test_deterministic_fold_order() {
    let temp = TempDir::new().unwrap();
    let form_config = temp.path().join("form-config");
    let config = temp.path().join("config");
    write(&form_config, "b/nested.yaml", "order: [form-b]\nlast: form-b\n");
    write(&form_config, "a.json", r#"{"order": ["form-a"], "last": "form-a"}"#);
    write(&config, "z.yml", "order: [config-z]\nlast: config-z\n");

    let roots = vec![form_config, config];
    let first = merge(json!({}), &roots, options(&[]));
    let second = merge(json!({}), &roots, options(&[]));

    assert_eq!(
        first,
        json!({"order": ["form-a", "form-b", "config-z"], "last": "config-z"})
    );
    assert_eq!(first, second);
}

#[test]
fn test_missing_root_tolerance() {
    let temp = TempDir::new().unwrap();
    let present = temp.path().join("config");
    write(&present, "a.yaml", "a: 1\n");
    let missing = temp.path().join("form-config");

    let with_missing = merge(json!({"b": 2}), &[missing.clone(), present.clone()], options(&[]));
    let without = merge(json!({"b": 2}), &[present.clone()], options(&[]));
    assert_eq!(with_missing, without);

    let loader = FileFragmentLoader::new();
    let logger = Logger::new().capturing();
    let merger = HookMerger::new(&loader, &logger);
    let report = merger
        .merge_many(&mut ConfigMap::new(), &[missing.clone(), present])
        .unwrap();
    assert_eq!(report.skipped_roots, vec![missing]);
    assert!(logger
        .captured()
        .iter()
        .all(|d| d.level < DiagnosticLevel::Warning));
}

#[test]
fn test_visited_files_are_absolute_and_ordered() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first");
    let second = temp.path().join("second");
    write(&first, "b.yaml", "");
    write(&first, "a/inner.yaml", "");
    write(&second, "c.yaml", "");
    write(&second, "README.md", "# docs");

    let loader = FileFragmentLoader::new();
    let logger = Logger::new();
    let merger = HookMerger::new(&loader, &logger);
    let report = merger
        .merge_many(&mut ConfigMap::new(), &[&first, &second])
        .unwrap();

    let expected: Vec<PathBuf> = vec![
        first.join("a/inner.yaml"),
        first.join("b.yaml"),
        second.join("README.md"),
        second.join("c.yaml"),
    ];
    assert_eq!(report.visited_files, expected);
    assert!(report.visited_files.iter().all(|p| p.is_absolute()));
    assert_eq!(report.merged_files.len(), 3);
}

#[test]
fn test_policy_entries_protect_earlier_layers() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("config");
    write(&root, "auth.yaml", "auth:\n  defaultBrand: hook\nmenu: [hook-menu]\n");

    let loader = FileFragmentLoader::new();
    let logger = Logger::new();
    let merger = HookMerger::new(&loader, &logger).with_options(MergeOptions {
        dont_merge: DontMergeSet::new(vec![
            DontMergeEntry::from_value(json!({"auth": "app"})).unwrap(),
            DontMergeEntry::from_value(json!({"menu": "this_file"})).unwrap(),
        ]),
        ..MergeOptions::default()
    });

    let mut acc = map(json!({"auth": {"defaultBrand": "default"}, "menu": ["app-menu"]}));
    merger.merge_many(&mut acc, &[root]).unwrap();
    assert_eq!(
        Value::Object(acc),
        json!({"auth": {"defaultBrand": "default"}, "menu": ["hook-menu"]})
    );
}

#[test]
fn test_hook_merge_then_brand_lookup() {
    let temp = TempDir::new().unwrap();
    let app = temp.path().join("portal");
    let hook_root = app.join("node_modules/acme-hook");
    write(&hook_root, "config/branding.yaml", "branding:\n  acme:\n    logo: acme.png\n");
    write(&hook_root, "form-config/forms.yaml", "forms:\n  default:\n    fields: [title]\n");

    let location = locate_hook(&app, "acme-hook", "node_modules");
    let loader = FileFragmentLoader::new();
    let logger = Logger::new().with_name("acme-hook");
    let merger = HookMerger::new(&loader, &logger).with_options(options(&["fields"]));

    let mut acc = map(json!({
        "branding": {"default": {"logo": "default.png"}},
        "forms": {"default": {"fields": ["legacy"]}}
    }));
    let report = merger
        .merge_hook(&mut acc, &location, &["form-config", "config"])
        .unwrap();

    assert_eq!(report.merged_files.len(), 2);
    assert!(report.merged_files[0].ends_with("form-config/forms.yaml"));
    assert_eq!(acc["forms"]["default"]["fields"], json!(["title"]));
    assert_eq!(
        resolve_brand("acme", "branding", &acc, "default"),
        Some(&json!({"logo": "acme.png"}))
    );
    assert_eq!(
        resolve_brand("other", "branding", &acc, "default"),
        Some(&json!({"logo": "default.png"}))
    );
}
