//! Walk subcommand
//!
//! Prints the files under each root in fold order, without loading them.

use crate::engine::walk;
use crate::logging::{DiagnosticSink, Logger};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the walk subcommand
#[derive(Args, Debug)]
pub struct WalkArgs {
    /// Root directories, in merge order
    #[arg(value_name = "DIR", required = true)]
    pub roots: Vec<PathBuf>,
}

/// Files under `roots`, in the order they would be merged.
pub fn collect(args: &WalkArgs, sink: &dyn DiagnosticSink) -> Vec<PathBuf> {
    args.roots
        .iter()
        .flat_map(|root| {
            if !root.exists() {
                sink.info(&format!("Skipping, directory not found: {}", root.display()));
            }
            walk(root, sink)
        })
        .collect()
}

/// Run the walk command.
pub fn run_walk(args: &WalkArgs) -> Result<()> {
    let logger = Logger::new().with_name("walk");
    for file in collect(args, &logger) {
        println!("{}", file.display());
    }
    Ok(())
}
