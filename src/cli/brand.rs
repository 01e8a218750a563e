//! Brand subcommand
//!
//! Resolves `<block>.<brand>` from a configuration file, falling back to the
//! default brand.

use super::parse_format;
use crate::brand::{configured_default_brand, resolve_brand};
use crate::config::Settings;
use crate::engine::{FileFragmentLoader, FragmentLoader};
use crate::format::OutputFormat;
use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

/// Arguments for the brand subcommand
#[derive(Args, Debug)]
pub struct BrandArgs {
    /// Configuration file to search (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Top-level block holding per-brand entries
    #[arg(long, value_name = "NAME")]
    pub block: String,

    /// Brand to look up
    #[arg(long, value_name = "NAME")]
    pub brand: String,

    /// Fallback brand (default: auth.defaultBrand from the file, then settings)
    #[arg(long, value_name = "NAME")]
    pub default_brand: Option<String>,

    /// Output format: json (default) or yaml
    #[arg(short, long, default_value = "json", value_parser = parse_format)]
    pub format: OutputFormat,
}

/// Resolve the brand entry without printing it.
pub fn lookup(settings: &Settings, args: &BrandArgs) -> Result<Option<Value>> {
    let config = FileFragmentLoader::new()
        .load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let default_brand = args
        .default_brand
        .as_deref()
        .or_else(|| configured_default_brand(&config))
        .unwrap_or(&settings.brand.default_brand);

    Ok(resolve_brand(&args.brand, &args.block, &config, default_brand).cloned())
}

/// Run the brand command.
pub fn run_brand(settings: &Settings, args: &BrandArgs) -> Result<()> {
    match lookup(settings, args)? {
        Some(value) => {
            println!("{}", args.format.render(&value)?.trim_end());
            Ok(())
        }
        None => bail!(
            "no '{}' entry for brand '{}' or its default",
            args.block,
            args.brand
        ),
    }
}
