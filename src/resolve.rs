//! Settings resolution: merge every settings layer and produce [`Settings`].
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Serialize the compiled defaults as the bottom layer
//! 2. Validate each file (if strict mode)
//! 3. Parse and deep-merge settings files (later overrides earlier)
//! 4. Deep-merge env vars on top
//! 5. Deep-merge CLI overrides on top (highest priority)
//! 6. Deserialize the merged value into `Settings`
//!
//! Arrays replace rather than merge here: a file that lists `layout.defaults`
//! means exactly that list.

use std::path::PathBuf;

use serde_json::Value;

use crate::env;
use crate::error::ProfileGenError;
use crate::merge::{ArrayMerge, deep_merge};
use crate::overrides;
use crate::settings::Settings;
use crate::validate;

/// All pre-loaded data needed to resolve settings. No I/O happens here.
pub struct ResolveInput {
    /// File contents in precedence order: first = lowest priority, last = highest.
    pub files: Vec<(PathBuf, String)>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix (e.g. `"PROFILEGEN"`). `None` means env disabled.
    pub env_prefix: Option<String>,
    /// CLI overrides as `(dotted_key, value)` pairs.
    pub cli_overrides: Vec<(String, Value)>,
    /// Whether to reject unknown keys in settings files.
    pub strict: bool,
}

/// Resolve settings from pre-loaded inputs.
pub fn resolve(input: ResolveInput) -> Result<Settings, ProfileGenError> {
    let mut merged = to_layer(&Settings::default())?;

    for (path, content) in &input.files {
        if input.strict {
            validate::validate_unknown_keys(content, path)?;
        }
        let table: toml::Table =
            toml::from_str(content).map_err(|e| ProfileGenError::SettingsParse {
                path: path.clone(),
                source: e,
            })?;
        let layer = to_layer(&table)?;
        merged = deep_merge(merged, layer, ArrayMerge::Replace);
    }

    if let Some(prefix) = &input.env_prefix {
        let env_layer = env::env_to_layer(prefix, input.env_vars);
        merged = deep_merge(merged, env_layer, ArrayMerge::Replace);
    }

    if !input.cli_overrides.is_empty() {
        let cli_layer = overrides::overrides_to_layer(&input.cli_overrides);
        merged = deep_merge(merged, cli_layer, ArrayMerge::Replace);
    }

    serde_json::from_value(merged).map_err(|e| ProfileGenError::InvalidValue {
        key: "<merged>".into(),
        reason: e.to_string(),
    })
}

fn to_layer<T: serde::Serialize>(source: &T) -> Result<Value, ProfileGenError> {
    serde_json::to_value(source).map_err(|e| ProfileGenError::InvalidValue {
        key: "<layer>".into(),
        reason: e.to_string(),
    })
}
