//! Tool settings: where fragments live, where profiles go, and how the
//! fragment tree is laid out.
//!
//! Every field has a compiled default, so a settings file only needs the keys
//! it changes. See [`SettingsBuilder`](crate::SettingsBuilder) for how layers
//! are discovered and merged.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the platform config directory (`~/.config/profilegen` on Linux).
pub const APP_NAME: &str = "profilegen";

/// Settings file looked up in every search path.
pub const SETTINGS_FILE: &str = "profilegen.toml";

/// Environment variables named `PROFILEGEN__<KEY>` override settings.
pub const ENV_PREFIX: &str = "PROFILEGEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the fragment tree and the base config.
    pub fragment_root: PathBuf,

    /// Flat directory profiles are written to.
    pub output_dir: PathBuf,

    /// Base XML config, relative to `fragment_root`.
    pub base_config: PathBuf,

    /// Extension given to emitted profiles.
    pub file_extension: String,

    pub layout: Layout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fragment_root: PathBuf::from("configs"),
            output_dir: PathBuf::from("output"),
            base_config: PathBuf::from("base-config.xml"),
            file_extension: "xml".into(),
            layout: Layout::default(),
        }
    }
}

/// Glob patterns, relative to the fragment root, for each category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub machines: String,
    pub extruders: String,
    pub qualities: String,
    pub materials: String,

    /// Fragments merged beneath every profile, in merge order. Discovery
    /// results for the varying categories never include these.
    pub defaults: Vec<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            machines: "machine/*.json".into(),
            extruders: "extruder/*.json".into(),
            qualities: "quality/*.json".into(),
            materials: "material/*.json".into(),
            defaults: vec![
                "extruder/default-extruder.json".into(),
                "quality/default-quality.json".into(),
                "infill/default-infill.json".into(),
                "raft/default-raft.json".into(),
                "supports/default-supports.json".into(),
                "temp/default-temperature.json".into(),
            ],
        }
    }
}
