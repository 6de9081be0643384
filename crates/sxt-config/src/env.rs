//! Environment variable fallbacks.
//!
//! Env vars are fallback, not override: they only fill fields that no
//! config file set. Empty values count as unset.

use std::collections::HashMap;
use std::hash::BuildHasher;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources, set_by_file};

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// `SXT_*` names first, then the SDK's legacy names for the same fields.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "SXT_API_URL",
        field_path: "api.base_url",
    },
    EnvMapping {
        var_name: "SXT_SCHEME",
        field_path: "api.scheme",
    },
    EnvMapping {
        var_name: "SXT_USER_ID",
        field_path: "identity.user_id",
    },
    EnvMapping {
        var_name: "SXT_JOIN_CODE",
        field_path: "identity.join_code",
    },
    EnvMapping {
        var_name: "SXT_SESSION_BACKEND",
        field_path: "session.backend",
    },
    EnvMapping {
        var_name: "SXT_SESSION_DIR",
        field_path: "session.directory",
    },
    EnvMapping {
        var_name: "SXT_KEY_POLICY",
        field_path: "session.key_policy",
    },
    EnvMapping {
        var_name: "SXT_HTTP_TIMEOUT_SECS",
        field_path: "http.timeout_secs",
    },
    EnvMapping {
        var_name: "SXT_LOG_LEVEL",
        field_path: "logging.level",
    },
    EnvMapping {
        var_name: "SXT_LOG_FORMAT",
        field_path: "logging.format",
    },
    // Legacy SDK names.
    EnvMapping {
        var_name: "BASEURL_DISCOVERY",
        field_path: "api.base_url",
    },
    EnvMapping {
        var_name: "USERID",
        field_path: "identity.user_id",
    },
    EnvMapping {
        var_name: "JOINCODE",
        field_path: "identity.join_code",
    },
    EnvMapping {
        var_name: "SCHEME",
        field_path: "api.scheme",
    },
];

/// Apply environment variable fallbacks to fields no config file set.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        if set_by_file(sources, mapping.field_path)
            || sources.get(mapping.field_path) == Some(&ConfigLayer::Environment)
        {
            continue;
        }

        let Some(val) = env_vars.get(mapping.var_name).filter(|v| !v.trim().is_empty()) else {
            continue;
        };

        debug!(
            var = mapping.var_name,
            field = mapping.field_path,
            "applying env var fallback"
        );
        set_field(merged, mapping.field_path, coerce_to_toml_value(mapping.field_path, val));
        sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
        count = count.saturating_add(1);
    }

    count
}

/// Set a dotted field in the TOML tree, creating intermediate tables.
fn set_field(root: &mut toml::Value, path: &str, value: toml::Value) {
    let mut current = root;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        if segments.peek().is_none() {
            table.insert(segment.to_owned(), value);
            return;
        }
        current = table
            .entry(segment)
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }
}

/// Coerce a string env var value to the TOML type of its field.
fn coerce_to_toml_value(path: &str, val: &str) -> toml::Value {
    if path == "http.timeout_secs"
        && let Ok(i) = val.trim().parse::<i64>()
    {
        return toml::Value::Integer(i);
    }

    toml::Value::String(val.trim().to_owned())
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}
