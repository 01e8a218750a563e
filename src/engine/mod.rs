//! Directive-driven hierarchical config merge engine.
//!
//! Fragments are collected from one or more root directories and folded into
//! a caller-owned accumulator:
//! 1. **Walk** - each root is enumerated depth first in name order
//! 2. **Load** - a [`FragmentLoader`] turns each file into a mapping
//! 3. **Extract** - reserved `_dontMerge` / `_delete` keys are stripped
//! 4. **Delete** - the fragment's delete paths are removed from the accumulator
//! 5. **Merge** - the fragment is deep-merged under defaults plus its own
//!    do-not-merge additions
//!
//! ## Merge Strategy
//! - Mappings: merged key by key, recursively
//! - Sequences: concatenated (incoming elements appended)
//! - Everything else: replaced by the incoming value
//! - Keys in the do-not-merge set: replaced, or kept, per entry

mod delete;
mod directive;
mod fragment;
mod merge;
mod orchestrator;
mod policy;
mod walker;

pub use delete::{FieldPath, apply_deletions};
pub use directive::{DeleteDirective, DirectiveKeys, Directives, extract};
pub use fragment::{FileFragmentLoader, FragmentFormat, FragmentLoader, value_kind};
pub use merge::merge_into;
pub use orchestrator::{FailedRoot, HookMerger, LoadErrorPolicy, MergeOptions, MergeReport};
pub use policy::{DontMergeEntry, DontMergeSet, MergeRule, THIS_FILE};
pub use walker::walk;

/// A configuration mapping: the root type of fragments and the accumulator.
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;
