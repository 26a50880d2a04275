//! Writes composed profiles to disk as XML.

use std::path::Path;

use serde_json::Value;

use crate::error::ProfileGenError;
use crate::xml;

/// Render a composed profile to XML text.
///
/// Fails with [`ProfileGenError::RootCount`] unless the profile has exactly one
/// root element. Reserved keys (`_declaration`, `_doctype`, ...) don't count.
pub fn render(profile: &Value) -> Result<String, ProfileGenError> {
    let roots = profile
        .as_object()
        .map(|map| map.keys().filter(|k| !k.starts_with('_')).count())
        .unwrap_or(0);
    if roots != 1 {
        return Err(ProfileGenError::RootCount(roots));
    }
    Ok(xml::render(profile))
}

/// Render `profile` and write it to `path`.
pub fn emit(path: &Path, profile: &Value) -> Result<(), ProfileGenError> {
    let text = render(profile)?;
    std::fs::write(path, text).map_err(|e| ProfileGenError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "wrote profile");
    Ok(())
}
