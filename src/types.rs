use std::path::PathBuf;

/// Where to search for settings files.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}

/// A generation request, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateAction {
    /// List the machines found in the fragment tree.
    Machines,
    /// Show the manifest for a machine without writing anything.
    Manifest { machine: String },
    /// Compose and emit a single named profile.
    Compose {
        name: String,
        fragments: Vec<String>,
        extra: Vec<String>,
    },
    /// Run the batch for one machine.
    Generate {
        machine: String,
        extra: Vec<String>,
        suffix: String,
    },
    /// Run the batch for every discovered machine.
    GenerateAll { extra: Vec<String>, suffix: String },
}
