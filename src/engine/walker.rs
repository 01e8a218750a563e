//! Deterministic recursive file enumeration.

use crate::logging::DiagnosticSink;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Enumerate regular files under `root`, depth first, entries sorted by name.
///
/// A missing root yields no files. When a directory cannot be read, that
/// directory contributes nothing and the failure goes to `sink`; sibling
/// directories are still walked. Symbolic links are resolved to whatever they
/// point at.
pub fn walk(root: &Path, sink: &dyn DiagnosticSink) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    let root = match std::path::absolute(root) {
        Ok(path) => path,
        Err(e) => {
            sink.error(&format!("Error walking directory: {}: {}", root.display(), e));
            return Vec::new();
        }
    };

    if root.is_file() {
        return vec![root];
    }

    let mut files = Vec::new();
    walk_dir(&root, &mut files, sink);
    files
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, sink: &dyn DiagnosticSink) {
    match read_sorted(dir) {
        Ok(entries) => {
            for (path, is_dir) in entries {
                if is_dir {
                    walk_dir(&path, files, sink);
                } else {
                    files.push(path);
                }
            }
        }
        Err(e) => {
            sink.error(&format!("Error walking directory: {}: {}", dir.display(), e));
        }
    }
}

/// Directory entries sorted by file name, each flagged as directory or not.
///
/// Any failure, including a dangling link inside `dir`, fails the whole
/// directory.
fn read_sorted(dir: &Path) -> io::Result<Vec<(PathBuf, bool)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = fs::metadata(&path)?;
        entries.push((entry.file_name(), path, metadata.is_dir()));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries
        .into_iter()
        .map(|(_, path, is_dir)| (path, is_dir))
        .collect())
}
