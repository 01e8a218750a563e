//! CLI command definitions for hook-config-merge
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod brand;
pub mod merge;
pub mod walk;

use crate::format::OutputFormat;
use brand::BrandArgs;
use clap::{Parser, Subcommand};
use merge::MergeArgs;
use walk::WalkArgs;

/// Merge hook configuration fragments into a host configuration tree
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a settings file (replaces project and user settings)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub settings: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge a hook's configuration directories (or explicit roots) into a base config
    Merge(MergeArgs),

    /// Look up a brand-specific block with default-brand fallback
    Brand(BrandArgs),

    /// List fragment files in the order they would be merged
    Walk(WalkArgs),
}

/// clap value parser for `--format`.
pub fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(s).ok_or_else(|| format!("unknown format '{}' (expected json or yaml)", s))
}
