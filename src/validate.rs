//! Strict-mode validation: detect unknown keys in settings files.
//!
//! Uses `serde_ignored` to deserialize into [`Settings`] and capture any keys
//! that the struct doesn't consume. Reports each unknown key with its file
//! path and best-effort line number.

use std::path::Path;

use crate::error::ProfileGenError;
use crate::settings::Settings;

/// Validate that a TOML settings file contains no unknown keys.
pub fn validate_unknown_keys(content: &str, path: &Path) -> Result<(), ProfileGenError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let _settings: Settings = serde_ignored::deserialize(deserializer, |ignored_path| {
        unknown_keys.push(ignored_path.to_string());
    })
    .map_err(|e| ProfileGenError::SettingsParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    if unknown_keys.is_empty() {
        return Ok(());
    }

    let errors: Vec<ProfileGenError> = unknown_keys
        .into_iter()
        .map(|key| {
            let line = key_line(content, &key);
            ProfileGenError::UnknownKey {
                key,
                path: path.to_path_buf(),
                line,
            }
        })
        .collect();

    Err(ProfileGenError::UnknownKeys(errors))
}

/// 1-indexed line on which `dotted_key` (e.g. `layout.nozzles`) is assigned,
/// or 0 if it can't be found.
///
/// Each `key = value` line is expanded to its full dotted path using the
/// most recent `[table]` header and compared against `dotted_key`.
fn key_line(content: &str, dotted_key: &str) -> usize {
    let normalize = |key: &str| key.split('.').map(str::trim).collect::<Vec<_>>().join(".");

    let mut table = String::new();
    for (number, line) in (1..).zip(content.lines()) {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            table = normalize(header);
            continue;
        }
        let Some((key, _)) = line.split_once('=') else {
            continue;
        };
        let key = normalize(key);
        let full = if table.is_empty() {
            key
        } else {
            format!("{table}.{key}")
        };
        if full == dotted_key {
            return number;
        }
    }
    0
}
