use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileGenError {
    #[error("Fragment root {path} does not exist")]
    MissingRoot { path: PathBuf },

    #[error("Fragment directory {path} for '{pattern}' does not exist")]
    MissingCategory { pattern: String, path: PathBuf },

    #[error("Fragment {path} matched outside of root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Invalid fragment pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Failed to enumerate fragments matching '{pattern}': {source}")]
    Discovery {
        pattern: String,
        source: glob::GlobError,
    },

    #[error("Fragment not found: {path}")]
    FragmentNotFound { path: PathBuf },

    #[error("Failed to read fragment {path}: {source}")]
    FragmentRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse fragment {path}: {source}")]
    FragmentParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Fragment {path} is not an object at the top level")]
    NotAnObject { path: PathBuf },

    #[error("Failed to parse XML {path}: {reason}")]
    XmlParse { path: PathBuf, reason: String },

    #[error("Composed profile must have exactly one root element, found {0}")]
    RootCount(usize),

    #[error("Failed to write {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in settings file")]
    UnknownKeys(Vec<ProfileGenError>),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ProfileGenError {
    /// True for the errors raised while locating fragments on disk.
    pub fn is_discovery(&self) -> bool {
        matches!(
            self,
            ProfileGenError::MissingRoot { .. }
                | ProfileGenError::MissingCategory { .. }
                | ProfileGenError::OutsideRoot { .. }
                | ProfileGenError::InvalidPattern { .. }
                | ProfileGenError::Discovery { .. }
        )
    }

    /// True for the errors raised while reading or parsing a single fragment.
    pub fn is_fragment_load(&self) -> bool {
        matches!(
            self,
            ProfileGenError::FragmentNotFound { .. }
                | ProfileGenError::FragmentRead { .. }
                | ProfileGenError::FragmentParse { .. }
                | ProfileGenError::NotAnObject { .. }
                | ProfileGenError::XmlParse { .. }
        )
    }
}
