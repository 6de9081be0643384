//! Deep merge of TOML values with per-field source tracking.
//!
//! The merge operates on raw [`toml::Value`] trees rather than deserialized
//! structs, so a key missing from a layer never overrides the layer below.

use std::collections::HashMap;
use std::fmt;

/// Which configuration layer a value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Compiled-in defaults (`defaults.toml`).
    Defaults,
    /// User-level configuration (`~/.sxt/config.toml`).
    User,
    /// File passed explicitly (`--config`).
    Explicit,
    /// Environment variable fallback.
    Environment,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::User => write!(f, "user (~/.sxt/config.toml)"),
            Self::Explicit => write!(f, "explicit (--config)"),
            Self::Environment => write!(f, "environment variable"),
        }
    }
}

/// Tracks which layer set each field's value, keyed by dotted path.
pub type FieldSources = HashMap<String, ConfigLayer>;

/// Whether a file layer (not defaults) set `path`.
#[must_use]
pub fn set_by_file(sources: &FieldSources, path: &str) -> bool {
    matches!(
        sources.get(path),
        Some(ConfigLayer::User | ConfigLayer::Explicit)
    )
}

/// Deep-merge `overlay` into `base`, recording which layer set each leaf.
///
/// Tables merge per key. Scalars and arrays replace the base value.
pub fn deep_merge_tracking(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    layer: &ConfigLayer,
    sources: &mut FieldSources,
) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let path = join_path(prefix, key);
                if let Some(base_val) = base_table.get_mut(key) {
                    deep_merge_tracking(base_val, overlay_val, &path, layer, sources);
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                    record_leaves(overlay_val, &path, layer, sources);
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
            sources.insert(prefix.to_owned(), layer.clone());
        },
    }
}

/// Record every leaf under `val` as coming from `layer`.
pub fn record_leaves(val: &toml::Value, prefix: &str, layer: &ConfigLayer, sources: &mut FieldSources) {
    if let toml::Value::Table(table) = val {
        for (key, child) in table {
            record_leaves(child, &join_path(prefix, key), layer, sources);
        }
    } else if !prefix.is_empty() {
        sources.insert(prefix.to_owned(), layer.clone());
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_overlay_replaces_scalars_and_keeps_siblings() {
        let mut base = parse("[api]\nbase_url = \"a\"\nscheme = \"ed25519\"");
        let overlay = parse("[api]\nbase_url = \"b\"");
        let mut sources = FieldSources::new();

        deep_merge_tracking(&mut base, &overlay, "", &ConfigLayer::User, &mut sources);

        assert_eq!(base["api"]["base_url"].as_str(), Some("b"));
        assert_eq!(base["api"]["scheme"].as_str(), Some("ed25519"));
        assert_eq!(sources.get("api.base_url"), Some(&ConfigLayer::User));
        assert!(!sources.contains_key("api.scheme"));
    }

    #[test]
    fn test_new_tables_are_recorded() {
        let mut base = parse("[api]\nbase_url = \"a\"");
        let overlay = parse("[identity]\nuser_id = \"alice\"");
        let mut sources = FieldSources::new();

        deep_merge_tracking(&mut base, &overlay, "", &ConfigLayer::Explicit, &mut sources);

        assert_eq!(base["identity"]["user_id"].as_str(), Some("alice"));
        assert!(set_by_file(&sources, "identity.user_id"));
    }

    #[test]
    fn test_arrays_replace() {
        let mut base = parse("[logging]\ndirectives = [\"a=debug\"]");
        let overlay = parse("[logging]\ndirectives = [\"b=trace\"]");
        let mut sources = FieldSources::new();

        deep_merge_tracking(&mut base, &overlay, "", &ConfigLayer::User, &mut sources);

        let directives = base["logging"]["directives"].as_array().unwrap();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].as_str(), Some("b=trace"));
    }

    #[test]
    fn test_defaults_do_not_count_as_file() {
        let mut sources = FieldSources::new();
        record_leaves(&parse("[http]\ntimeout_secs = 30"), "", &ConfigLayer::Defaults, &mut sources);
        assert!(!set_by_file(&sources, "http.timeout_secs"));
    }
}
