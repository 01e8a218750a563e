//! Locating an installed hook package and merging its configuration dirs.

use crate::engine::{ConfigMap, HookMerger, MergeReport};
use crate::error::MergeResult;
use std::path::{Path, PathBuf};

/// Where a hook's files live relative to the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookLocation {
    pub hook_name: String,
    /// Root directory of the hook package.
    pub hook_root: PathBuf,
    /// Host application root.
    pub app_path: PathBuf,
}

impl HookLocation {
    /// `<hook_root>/<dir>` for each config dir name, in order.
    pub fn config_roots<S: AsRef<str>>(&self, config_dirs: &[S]) -> Vec<PathBuf> {
        config_dirs
            .iter()
            .map(|dir| self.hook_root.join(dir.as_ref()))
            .collect()
    }
}

/// Resolve the hook root for `hook_name` installed under `app_path`.
///
/// The hook normally lives at `<app_path>/<modules_dir>/<hook_name>`. When
/// that directory is missing and `app_path` itself ends with `hook_name`,
/// the host was started from inside the hook package (e.g. the hook's own
/// test run): the hook root is `app_path` and the application root is what
/// precedes `<modules_dir>/<hook_name>`.
pub fn locate_hook(app_path: &Path, hook_name: &str, modules_dir: &str) -> HookLocation {
    let installed = app_path.join(modules_dir).join(hook_name);

    if !installed.exists() && app_path.ends_with(hook_name) {
        let suffix = Path::new(modules_dir).join(hook_name);
        let host_root = if app_path.ends_with(&suffix) {
            app_path
                .ancestors()
                .nth(suffix.components().count())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| app_path.to_path_buf())
        } else {
            app_path.to_path_buf()
        };
        return HookLocation {
            hook_name: hook_name.to_string(),
            hook_root: app_path.to_path_buf(),
            app_path: host_root,
        };
    }

    HookLocation {
        hook_name: hook_name.to_string(),
        hook_root: installed,
        app_path: app_path.to_path_buf(),
    }
}

impl HookMerger<'_> {
    /// Merge `<hook_root>/<dir>` for each of `config_dirs` into `acc`.
    pub fn merge_hook<S: AsRef<str>>(
        &self,
        acc: &mut ConfigMap,
        location: &HookLocation,
        config_dirs: &[S],
    ) -> MergeResult<MergeReport> {
        tracing::debug!(
            hook = %location.hook_name,
            hook_root = %location.hook_root.display(),
            "Merging hook configuration"
        );
        self.merge_many(acc, &location.config_roots(config_dirs))
    }
}
