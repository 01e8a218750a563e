//! Merge-many orchestration across root directories.

use super::ConfigMap;
use super::delete::apply_deletions;
use super::directive::{DirectiveKeys, extract};
use super::fragment::FragmentLoader;
use super::merge::merge_into;
use super::policy::DontMergeSet;
use super::walker::walk;
use crate::error::{MergeError, MergeResult};
use crate::logging::DiagnosticSink;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What to do when a fragment fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadErrorPolicy {
    /// Stop the whole merge-many call with the load error.
    #[default]
    Abort,
    /// Abandon the rest of the failing root and continue with the next one.
    SkipRoot,
}

impl std::str::FromStr for LoadErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "abort" => Ok(LoadErrorPolicy::Abort),
            "skip_root" | "skip" => Ok(LoadErrorPolicy::SkipRoot),
            other => Err(format!("unknown load error policy: {}", other)),
        }
    }
}

/// Caller-supplied merge behavior.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Default do-not-merge set, restored for every fragment.
    pub dont_merge: DontMergeSet,
    pub directive_keys: DirectiveKeys,
    pub on_load_error: LoadErrorPolicy,
}

/// A root abandoned under [`LoadErrorPolicy::SkipRoot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRoot {
    pub root: PathBuf,
    pub file: PathBuf,
    pub error: String,
}

/// Outcome of a merge-many call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Every file enumerated, in fold order.
    pub visited_files: Vec<PathBuf>,
    /// Files that were loaded and merged.
    pub merged_files: Vec<PathBuf>,
    /// Roots that did not exist.
    pub skipped_roots: Vec<PathBuf>,
    pub failed_roots: Vec<FailedRoot>,
}

impl MergeReport {
    /// Append a later call's report to this one.
    pub fn absorb(&mut self, later: MergeReport) {
        self.visited_files.extend(later.visited_files);
        self.merged_files.extend(later.merged_files);
        self.skipped_roots.extend(later.skipped_roots);
        self.failed_roots.extend(later.failed_roots);
    }
}

/// Folds fragment trees into a host accumulator.
pub struct HookMerger<'a> {
    loader: &'a dyn FragmentLoader,
    sink: &'a dyn DiagnosticSink,
    options: MergeOptions,
}

impl<'a> HookMerger<'a> {
    pub fn new(loader: &'a dyn FragmentLoader, sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            loader,
            sink,
            options: MergeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge every fragment under `roots` into `acc`.
    ///
    /// Roots are folded in order, files within a root in walker order. Missing
    /// roots are skipped. A load failure aborts or skips the root according to
    /// [`MergeOptions::on_load_error`]; fragments merged before the failure
    /// remain in `acc`.
    pub fn merge_many<P: AsRef<Path>>(&self, acc: &mut ConfigMap, roots: &[P]) -> MergeResult<MergeReport> {
        let mut report = MergeReport::default();

        for root in roots {
            let root = root.as_ref();
            self.sink.info(&format!("Looking at: {}", root.display()));

            if !root.exists() {
                self.sink
                    .info(&format!("Skipping, directory not found: {}", root.display()));
                report.skipped_roots.push(root.to_path_buf());
                continue;
            }

            let files = walk(root, self.sink);
            self.sink
                .debug(&format!("Processing {} file(s) under {}", files.len(), root.display()));

            for file in files {
                report.visited_files.push(file.clone());

                if !self.loader.accepts(&file) {
                    self.sink.debug(&format!("Skipping unsupported file: {}", file.display()));
                    continue;
                }

                let fragment = match self.loader.load(&file) {
                    Ok(fragment) => fragment,
                    Err(source) => match self.options.on_load_error {
                        LoadErrorPolicy::Abort => {
                            self.sink.error(&source.to_string());
                            return Err(MergeError::Load {
                                root: root.to_path_buf(),
                                source,
                            });
                        }
                        LoadErrorPolicy::SkipRoot => {
                            self.sink.error(&format!(
                                "{}; skipping the rest of {}",
                                source,
                                root.display()
                            ));
                            report.failed_roots.push(FailedRoot {
                                root: root.to_path_buf(),
                                file: file.clone(),
                                error: source.to_string(),
                            });
                            break;
                        }
                    },
                };

                self.merge_fragment(acc, fragment);
                report.merged_files.push(file);
            }
        }

        self.sink.info(&format!(
            "Merging configuration...complete ({} of {} file(s) merged)",
            report.merged_files.len(),
            report.visited_files.len()
        ));
        Ok(report)
    }

    /// Run one loaded fragment through extract, delete and merge.
    ///
    /// The do-not-merge set used here is a fresh snapshot of the defaults plus
    /// this fragment's own additions; nothing carries over to the next call.
    pub fn merge_fragment(&self, acc: &mut ConfigMap, mut fragment: ConfigMap) {
        let directives = extract(&mut fragment, &self.options.directive_keys, self.sink);

        if let Some(ref delete) = directives.delete {
            let removed = apply_deletions(acc, &delete.scope, &delete.paths);
            self.sink.debug(&format!(
                "Deleted {} of {} field(s) before merge",
                removed,
                delete.paths.len()
            ));
        }

        let effective = self.options.dont_merge.extended(&directives.dont_merge);
        merge_into(acc, fragment, &effective);
    }
}
