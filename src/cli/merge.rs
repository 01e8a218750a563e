//! Merge subcommand
//!
//! Folds a hook's configuration directories, and/or explicit root
//! directories, into an optional base configuration and prints the result.

use super::parse_format;
use crate::config::Settings;
use crate::engine::{
    ConfigMap, DontMergeSet, FileFragmentLoader, FragmentLoader, HookMerger, LoadErrorPolicy,
    MergeReport,
};
use crate::error::{LoadError, MergeError};
use crate::format::OutputFormat;
use crate::hook::locate_hook;
use crate::logging::{Diagnostic, DiagnosticLevel, LogLevelFilter, Logger};
use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for the merge subcommand
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .multiple(true)
        .args(["hook", "roots"])
))]
pub struct MergeArgs {
    /// Hook package name, resolved under <APP_PATH>/<modules_dir>/
    #[arg(long, value_name = "NAME")]
    pub hook: Option<String>,

    /// Host application root
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub app_path: PathBuf,

    /// Root directory to merge (repeatable, merged after the hook's dirs)
    #[arg(long = "root", value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Config dir names under the hook root (overrides settings)
    #[arg(long = "config-dir", value_name = "NAME", value_delimiter = ',')]
    pub config_dirs: Vec<String>,

    /// Default do-not-merge field (repeatable, replaces the configured defaults)
    #[arg(long = "dont-merge", value_name = "FIELD")]
    pub dont_merge: Vec<String>,

    /// Initial configuration to merge into (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    pub base: Option<PathBuf>,

    /// What to do when a fragment fails to load: abort or skip-root
    #[arg(long, value_name = "POLICY")]
    pub on_load_error: Option<LoadErrorPolicy>,

    /// Output format: json (default) or yaml
    #[arg(short, long, default_value = "json", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Wrap the output with the visited files and diagnostics
    #[arg(long)]
    pub with_report: bool,
}

#[derive(Serialize)]
struct MergeOutput<'a> {
    config: &'a ConfigMap,
    report: &'a MergeReport,
    diagnostics: Vec<Diagnostic>,
}

/// Load the base configuration the fragments are merged into.
fn load_base(loader: &FileFragmentLoader, path: &Path) -> Result<ConfigMap> {
    match loader.load(path) {
        Ok(map) => Ok(map),
        Err(LoadError::NotAMapping { found, .. }) => Err(MergeError::InvalidInput(format!(
            "base config {} must be a mapping, found {}",
            path.display(),
            found
        ))
        .into()),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("failed to load base config {}", path.display()))),
    }
}

/// Run the merge command.
pub fn run_merge(settings: &Settings, args: &MergeArgs) -> Result<()> {
    let loader = FileFragmentLoader::new();

    let mut options = settings.merge_options();
    if !args.dont_merge.is_empty() {
        options.dont_merge = DontMergeSet::fields(args.dont_merge.iter().cloned());
    }
    if let Some(policy) = args.on_load_error {
        options.on_load_error = policy;
    }

    let mut acc = match args.base {
        Some(ref base) => load_base(&loader, base)?,
        None => ConfigMap::new(),
    };

    let mut logger = Logger::new().with_name(args.hook.as_deref().unwrap_or("merge"));
    if args.with_report {
        // Reported diagnostics leave out per-file debug chatter.
        logger = logger
            .with_level_filter(Arc::new(LogLevelFilter::new(DiagnosticLevel::Info)))
            .capturing();
    }
    let merger = HookMerger::new(&loader, &logger).with_options(options);

    let mut report = MergeReport::default();
    if let Some(ref hook) = args.hook {
        let location = locate_hook(&args.app_path, hook, &settings.hooks.modules_dir);
        let config_dirs = if args.config_dirs.is_empty() {
            &settings.merge.config_dirs
        } else {
            &args.config_dirs
        };
        report.absorb(merger.merge_hook(&mut acc, &location, config_dirs)?);
    }
    if !args.roots.is_empty() {
        report.absorb(merger.merge_many(&mut acc, &args.roots)?);
    }

    let rendered = if args.with_report {
        args.format.render(&MergeOutput {
            config: &acc,
            report: &report,
            diagnostics: logger.captured(),
        })?
    } else {
        args.format.render(&acc)?
    };

    match args.output {
        Some(ref path) => std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", rendered.trim_end()),
    }
    Ok(())
}
