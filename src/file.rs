//! Settings file discovery and loading.
//!
//! Each [`SearchPath`] resolves to one directory. Directories are listed in
//! **priority-ascending** order and each is checked for `profilegen.toml`.
//! Every file found is returned, in order, so the resolve step can layer them
//! with later files overriding earlier ones.
//!
//! Missing files are silently skipped. Only actual I/O errors (permissions,
//! etc.) are propagated.

use std::path::PathBuf;

use crate::error::ProfileGenError;
use crate::settings::{APP_NAME, SETTINGS_FILE};
use crate::types::SearchPath;

impl SearchPath {
    /// The directory this search path stands for, if it can be determined
    /// (there may be no home directory, or no readable cwd).
    pub fn dir(&self) -> Option<PathBuf> {
        match self {
            SearchPath::Platform => directories::ProjectDirs::from("", "", APP_NAME)
                .map(|dirs| dirs.config_dir().to_path_buf()),
            SearchPath::Cwd => std::env::current_dir().ok(),
            SearchPath::Path(p) => Some(p.clone()),
        }
    }
}

/// Read `profilegen.toml` from every search path that has one, lowest
/// priority first.
pub fn load_settings_files(
    search_paths: &[SearchPath],
) -> Result<Vec<(PathBuf, String)>, ProfileGenError> {
    let mut found = Vec::new();
    for path in search_paths.iter().filter_map(SearchPath::dir) {
        let path = path.join(SETTINGS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "loaded settings file");
                found.push((path, content));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(ProfileGenError::IoError { path, source }),
        }
    }
    Ok(found)
}
