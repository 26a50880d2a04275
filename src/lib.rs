//! Compose 3D-printer slicer profiles from layered configuration fragments.
//!
//! A fragment tree holds one small JSON file per setting group (a nozzle, a
//! print quality, a material, ...) plus a base XML profile. For every machine,
//! profilegen walks the extruder × quality × material cross-product, deep-merges
//! the matching fragments over the base, and writes one named XML profile per
//! combination.
//!
//! ```ignore
//! let settings = SettingsBuilder::new().load()?;
//! let written = ProfileGenerator::new(&settings).generate_profiles("machineA", &[], "")?;
//! ```
//!
//! That call discovers the nozzles, qualities and materials under
//! `configs/`, composes `machineA-<nozzle>-<quality>-<material>` for each
//! combination, and writes them to `output/`.
//!
//! # Fragment tree
//!
//! ```text
//! configs/
//!   base-config.xml
//!   machine/<id>.json
//!   extruder/default-extruder.json  extruder/<nozzle>.json ...
//!   quality/default-quality.json    quality/<quality>.json ...
//!   material/<material>.json ...
//!   infill/default-infill.json
//!   raft/default-raft.json
//!   supports/default-supports.json
//!   temp/default-temperature.json
//! ```
//!
//! Fragments use the compact XML convention (see the [`xml`] module):
//! element names are keys, attributes sit under `_attributes`, text under
//! `_text`. A fragment only contains the keys it changes.
//!
//! # Layer precedence
//!
//! ```text
//! base-config.xml
//!        ↑ overridden by
//! Default fragments     extruder, quality, infill, raft, supports, temperature
//!        ↑ overridden by
//! Profile name          {"profile": {"_attributes": {"name": ...}}}
//!        ↑ overridden by
//! Selected fragments    machine, extruder, quality, material
//!        ↑ overridden by
//! Extra fragments       caller-supplied, e.g. "supports on" variants
//! ```
//!
//! Objects merge recursively and the later scalar wins. Arrays merge by
//! position: index 0 with index 0, and so on, with any surplus appended. That
//! pairing ignores names, so after merging the composer rebuilds the
//! `temperatureController` list as exactly `[Primary Extruder, Heated Bed]`,
//! folding every same-named entry together. See [`merge`] and
//! [`compose::fold_temperature_controllers`].
//!
//! # Profile names
//!
//! A manifest entry's fragment paths are joined with `/` and the category
//! directories and `.json` extension are stripped:
//! `machine/mk3` + `extruder/nozzle-4.json` + `quality/fine.json` +
//! `material/pla.json` gives `mk3-nozzle-4-fine-pla`. A batch can append a
//! suffix (`-supports`) to every name.
//!
//! # Settings
//!
//! Where fragments live and where profiles go come from [`Settings`], layered
//! like this:
//!
//! ```text
//! Compiled defaults     Settings::default()
//!        ↑ overridden by
//! Settings files        profilegen.toml in the search paths, later paths win
//!        ↑ overridden by
//! Environment vars      PROFILEGEN__OUTPUT_DIR, PROFILEGEN__LAYOUT__MATERIALS
//!        ↑ overridden by
//! Overrides             .cli_override("output_dir", ...)
//! ```
//!
//! Strict mode (on by default) rejects unknown keys in settings files with the
//! file path and line number.
//!
//! # Error handling
//!
//! All fallible operations return [`ProfileGenError`]. Nothing is retried and
//! the first failure aborts a batch. Fix the cause and re-run the batch; every
//! profile is rewritten from scratch.

pub mod compose;
pub mod error;
pub mod merge;
pub mod settings;
pub mod types;
pub mod xml;

mod builder;
mod catalog;
#[cfg(feature = "cli")]
mod cli;
mod emit;
mod env;
mod file;
mod generator;
mod manifest;
mod overrides;
mod resolve;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::SettingsBuilder;
pub use catalog::{Category, FragmentCatalog};
#[cfg(feature = "cli")]
pub use cli::{BatchArgs, Cli, Command};
pub use compose::Composer;
pub use emit::{emit, render};
pub use error::ProfileGenError;
pub use generator::{GenerateResult, ProfileGenerator};
pub use manifest::{ManifestEntry, build_manifest, profile_name};
pub use settings::{Layout, Settings};
pub use types::{GenerateAction, SearchPath};
