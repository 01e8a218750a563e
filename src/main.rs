//! Hook Config Merge CLI
//!
//! Merges hook configuration fragments into a base configuration and prints
//! the result.

use anyhow::Result;
use clap::Parser;
use hook_config_merge::cli::brand::run_brand;
use hook_config_merge::cli::merge::run_merge;
use hook_config_merge::cli::walk::run_walk;
use hook_config_merge::cli::{Cli, Command};
use hook_config_merge::config::{EnvOverrides, SettingsLoader, SettingsPaths};
use hook_config_merge::error::ErrorReport;
use std::fs::OpenOptions;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    init_logging(&cli)?;

    let loader = match cli.settings {
        Some(ref settings_path) => SettingsLoader::load_with(
            SettingsPaths::discover().with_explicit_file(settings_path),
            EnvOverrides::from_env(),
        )?,
        None => SettingsLoader::load()?,
    };
    for (tier, path) in loader.sources() {
        debug!(tier = %tier, path = %path.display(), "Using settings");
    }
    let settings = loader.into_settings();

    match cli.command {
        Command::Merge(ref args) => run_merge(&settings, args),
        Command::Brand(ref args) => run_brand(&settings, args),
        Command::Walk(ref args) => run_walk(args),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        let report = ErrorReport::from(err);
        match serde_json::to_string(&report) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", report.message),
        }
        std::process::exit(1);
    }
}
