use serde_json::Value;

use crate::error::ProfileGenError;
use crate::file;
use crate::resolve::{self, ResolveInput};
use crate::settings::{ENV_PREFIX, Settings};
use crate::types::SearchPath;

/// Builder for discovering and layering [`Settings`].
///
/// Layers, lowest priority first: compiled defaults, `profilegen.toml` in each
/// of the [`search_paths()`](Self::search_paths), `PROFILEGEN__*` environment
/// variables, then [`cli_override()`](Self::cli_override) values.
pub struct SettingsBuilder {
    search_paths: Vec<SearchPath>,
    env_enabled: bool,
    strict: bool,
    cli_overrides: Vec<(String, Value)>,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            search_paths: vec![SearchPath::Platform, SearchPath::Cwd],
            env_enabled: true,
            strict: true,
            cli_overrides: Vec::new(),
        }
    }

    /// Replace the default search paths (`[Platform, Cwd]`), listed lowest
    /// priority first.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Append a search path. It outranks every path already listed.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths.push(path);
        self
    }

    /// Ignore `PROFILEGEN__*` environment variables.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Reject unknown keys in settings files (default: `true`).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Override a dotted settings key. `None` is skipped, so optional clap
    /// arguments can be passed straight through.
    pub fn cli_override<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.cli_overrides.push((key.to_string(), v.into()));
        }
        self
    }

    /// Load and resolve settings through all layers.
    pub fn load(self) -> Result<Settings, ProfileGenError> {
        let files = file::load_settings_files(&self.search_paths)?;
        let env_vars = if self.env_enabled {
            std::env::vars().collect()
        } else {
            Vec::new()
        };

        resolve::resolve(ResolveInput {
            files,
            env_vars,
            env_prefix: self.env_enabled.then(|| ENV_PREFIX.to_string()),
            cli_overrides: self.cli_overrides,
            strict: self.strict,
        })
    }
}
