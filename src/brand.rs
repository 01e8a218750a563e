//! Brand-specific configuration lookup with default-brand fallback.

use crate::engine::ConfigMap;
use serde_json::Value;

/// Look up `config[config_block][brand]`, falling back to `default_brand`.
///
/// There is no further fallback: if neither entry exists (or the block itself
/// is missing) the result is `None`.
pub fn resolve_brand<'a>(
    brand: &str,
    config_block: &str,
    config: &'a ConfigMap,
    default_brand: &str,
) -> Option<&'a Value> {
    let block = config.get(config_block)?;
    block.get(brand).or_else(|| block.get(default_brand))
}

/// Default brand name configured in the host tree at `auth.defaultBrand`.
pub fn configured_default_brand(config: &ConfigMap) -> Option<&str> {
    config.get("auth")?.get("defaultBrand")?.as_str()
}
