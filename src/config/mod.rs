//! Settings for the merge tool itself.
//!
//! Consolidates settings from four tiers with field-by-field YAML merging:
//! 1. **Defaults** - built in
//! 2. **Project** - `$CWD/.hook-config-merge/config.yaml`
//! 3. **User** - `~/.hook-config-merge/config.yaml`
//! 4. **Environment** - variables listed below
//!
//! ## Environment Variables
//! - `HOOK_CONFIG_MERGE_CONFIG_PATH` - Explicit settings file (replaces project and user tiers)
//! - `HOOK_CONFIG_MERGE_PROJECT_DIR` - Project settings dir
//! - `HOOK_CONFIG_MERGE_USER_DIR` - User settings dir
//! - `HOOK_CONFIG_MERGE_CONFIG_DIRS` - Comma-separated config dir names
//! - `HOOK_CONFIG_MERGE_DEFAULT_BRAND` - Fallback brand name
//! - `HOOK_CONFIG_MERGE_ON_LOAD_ERROR` - `abort` or `skip_root`

mod loader;
mod types;

pub use loader::{EnvOverrides, SETTINGS_FILE, SettingsLoader, SettingsPaths, SettingsTier};
pub use types::*;
