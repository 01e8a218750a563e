//! Settings types.

use crate::engine::{DirectiveKeys, DontMergeEntry, DontMergeSet, LoadErrorPolicy, MergeOptions};
use serde::{Deserialize, Serialize};

/// Settings for the merge tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub merge: MergeSettings,

    #[serde(default)]
    pub hooks: HookSettings,

    #[serde(default)]
    pub brand: BrandSettings,
}

impl Settings {
    /// Engine options derived from the merge settings.
    pub fn merge_options(&self) -> MergeOptions {
        self.merge.to_options()
    }
}

/// How fragments are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeSettings {
    /// Directory names under a hook root that hold fragments, in fold order.
    #[serde(default = "default_config_dirs")]
    pub config_dirs: Vec<String>,

    /// Default do-not-merge entries, restored before every fragment.
    #[serde(default = "default_dont_merge")]
    pub dont_merge: Vec<DontMergeEntry>,

    /// Reserved directive key names.
    #[serde(default)]
    pub directive_keys: DirectiveKeys,

    /// Behavior when a fragment fails to load.
    #[serde(default)]
    pub on_load_error: LoadErrorPolicy,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            config_dirs: default_config_dirs(),
            dont_merge: default_dont_merge(),
            directive_keys: DirectiveKeys::default(),
            on_load_error: LoadErrorPolicy::default(),
        }
    }
}

impl MergeSettings {
    pub fn to_options(&self) -> MergeOptions {
        MergeOptions {
            dont_merge: DontMergeSet::new(self.dont_merge.clone()),
            directive_keys: self.directive_keys.clone(),
            on_load_error: self.on_load_error,
        }
    }
}

fn default_config_dirs() -> Vec<String> {
    vec!["form-config".to_string(), "config".to_string()]
}

fn default_dont_merge() -> Vec<DontMergeEntry> {
    vec![DontMergeEntry::from("fields")]
}

/// Where hook packages are installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSettings {
    /// Directory under the application root holding installed packages.
    #[serde(default = "default_modules_dir")]
    pub modules_dir: String,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            modules_dir: default_modules_dir(),
        }
    }
}

fn default_modules_dir() -> String {
    "node_modules".to_string()
}

/// Brand lookup defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandSettings {
    /// Brand used when the requested one has no entry.
    #[serde(default = "default_brand")]
    pub default_brand: String,
}

impl Default for BrandSettings {
    fn default() -> Self {
        Self {
            default_brand: default_brand(),
        }
    }
}

fn default_brand() -> String {
    "default".to_string()
}
