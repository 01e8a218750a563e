//! Settings loader with tier-based merging.
//!
//! Loads settings from multiple tiers and merges them field-by-field with the
//! crate's own merge engine. List-valued settings are replaced by higher
//! tiers rather than concatenated.

use super::types::Settings;
use crate::engine::{ConfigMap, DontMergeSet, FileFragmentLoader, FragmentFormat, merge_into};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Settings file name looked up in each tier directory.
pub const SETTINGS_FILE: &str = "config.yaml";

/// Settings tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SettingsTier {
    /// Built-in defaults (lowest priority)
    Defaults = 0,
    /// Project-level settings (./.hook-config-merge/)
    Project = 1,
    /// User-level settings (~/.hook-config-merge/)
    User = 2,
    /// Environment variables (highest priority)
    Environment = 3,
}

impl std::fmt::Display for SettingsTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsTier::Defaults => write!(f, "defaults"),
            SettingsTier::Project => write!(f, "project"),
            SettingsTier::User => write!(f, "user"),
            SettingsTier::Environment => write!(f, "environment"),
        }
    }
}

/// Directories for each settings tier.
#[derive(Debug, Clone)]
pub struct SettingsPaths {
    pub project_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
    /// Explicit settings file that replaces the file tiers.
    pub explicit_file: Option<PathBuf>,
}

impl Default for SettingsPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl SettingsPaths {
    /// Discover settings paths from environment and defaults.
    pub fn discover() -> Self {
        // User dir: HOOK_CONFIG_MERGE_USER_DIR or ~/.hook-config-merge
        let user_dir = std::env::var("HOOK_CONFIG_MERGE_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".hook-config-merge")));

        // Project dir: HOOK_CONFIG_MERGE_PROJECT_DIR or $CWD/.hook-config-merge
        let project_dir = std::env::var("HOOK_CONFIG_MERGE_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from(".hook-config-merge")));

        let explicit_file = std::env::var("HOOK_CONFIG_MERGE_CONFIG_PATH")
            .ok()
            .map(PathBuf::from);

        Self {
            project_dir,
            user_dir,
            explicit_file,
        }
    }

    /// Create paths with explicit directories and no explicit file.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
            explicit_file: None,
        }
    }

    pub fn with_explicit_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(file.into());
        self
    }
}

/// Environment overrides applied on top of the file tiers.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub config_dirs: Option<String>,
    pub default_brand: Option<String>,
    pub on_load_error: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            config_dirs: std::env::var("HOOK_CONFIG_MERGE_CONFIG_DIRS").ok(),
            default_brand: std::env::var("HOOK_CONFIG_MERGE_DEFAULT_BRAND").ok(),
            on_load_error: std::env::var("HOOK_CONFIG_MERGE_ON_LOAD_ERROR").ok(),
        }
    }

    fn apply(&self, settings: &mut Settings) -> Result<()> {
        if let Some(ref dirs) = self.config_dirs {
            settings.merge.config_dirs = dirs
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(ref brand) = self.default_brand {
            settings.brand.default_brand = brand.clone();
        }

        if let Some(ref policy) = self.on_load_error {
            settings.merge.on_load_error = policy
                .parse()
                .map_err(anyhow::Error::msg)
                .context("HOOK_CONFIG_MERGE_ON_LOAD_ERROR")?;
        }

        Ok(())
    }
}

/// Settings loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    pub paths: SettingsPaths,
    settings: Settings,
    /// Settings files that contributed, lowest tier first.
    sources: Vec<(SettingsTier, PathBuf)>,
}

impl SettingsLoader {
    /// Load settings from all tiers using the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(SettingsPaths::discover(), EnvOverrides::from_env())
    }

    /// Load settings with explicit paths and environment overrides.
    pub fn load_with(paths: SettingsPaths, env: EnvOverrides) -> Result<Self> {
        let mut sources = Vec::new();
        let mut layers: Vec<ConfigMap> = Vec::new();

        // Tier 1: Defaults
        if let Value::Object(defaults) = serde_json::to_value(Settings::default())? {
            layers.push(defaults);
        }

        if let Some(ref explicit) = paths.explicit_file {
            // An explicit file replaces the project and user tiers and must exist.
            let layer = read_layer(explicit)
                .with_context(|| format!("failed to load settings from {}", explicit.display()))?;
            layers.push(layer);
            sources.push((SettingsTier::Project, explicit.clone()));
        } else {
            // Tier 2: Project, Tier 3: User
            for (tier, dir) in [
                (SettingsTier::Project, paths.project_dir.as_ref()),
                (SettingsTier::User, paths.user_dir.as_ref()),
            ] {
                let Some(dir) = dir else { continue };
                let file = dir.join(SETTINGS_FILE);
                if !file.exists() {
                    continue;
                }
                match read_layer(&file) {
                    Ok(layer) => {
                        debug!(tier = %tier, path = %file.display(), "Loaded settings");
                        layers.push(layer);
                        sources.push((tier, file));
                    }
                    Err(e) => {
                        warn!(tier = %tier, path = %file.display(), "Ignoring unreadable settings: {:#}", e);
                    }
                }
            }
        }

        // Lists replace rather than concatenate across tiers.
        let policy = DontMergeSet::fields(["config_dirs", "dont_merge"]);
        let mut merged = ConfigMap::new();
        for layer in layers {
            merge_into(&mut merged, layer, &policy);
        }
        let mut settings: Settings = serde_json::from_value(Value::Object(merged))
            .context("invalid settings")?;

        // Tier 4: Environment variable overrides
        env.apply(&mut settings)?;

        Ok(Self {
            paths,
            settings,
            sources,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    /// Settings files that were merged, lowest tier first.
    pub fn sources(&self) -> &[(SettingsTier, PathBuf)] {
        &self.sources
    }
}

fn read_layer(path: &Path) -> Result<ConfigMap> {
    let content = std::fs::read_to_string(path)?;
    let mut layer = FileFragmentLoader::new().parse(path, &content, FragmentFormat::Yaml)?;
    drop_nulls(&mut layer);
    Ok(layer)
}

/// Remove null values at every depth. A blank key means "not specified" and
/// leaves the lower tier's value in place.
fn drop_nulls(map: &mut ConfigMap) {
    map.retain(|_, value| {
        if let Value::Object(child) = value {
            drop_nulls(child);
        }
        !value.is_null()
    });
}
