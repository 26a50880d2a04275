//! Batch driver: manifest → compose → emit, strictly in manifest order.
//!
//! The first failure aborts the batch. Files already written stay on disk;
//! re-run the whole batch after fixing the cause.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::catalog::FragmentCatalog;
use crate::compose::Composer;
use crate::emit;
use crate::error::ProfileGenError;
use crate::manifest::{self, ManifestEntry};
use crate::settings::Settings;
use crate::types::GenerateAction;

/// Result of a generation request. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateResult {
    /// Discovered machine identifiers.
    Machines(Vec<String>),
    /// A manifest, not written.
    Manifest(Vec<ManifestEntry>),
    /// Paths of the profiles written, in order.
    Written(Vec<PathBuf>),
}

impl fmt::Display for GenerateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = match self {
            GenerateResult::Machines(machines) => machines.clone(),
            GenerateResult::Manifest(entries) => entries.iter().map(|e| e.to_string()).collect(),
            GenerateResult::Written(paths) => paths
                .iter()
                .map(|p| format!("Wrote {}", p.display()))
                .collect(),
        };
        write!(f, "{}", lines.join("\n"))
    }
}

pub struct ProfileGenerator {
    catalog: FragmentCatalog,
    output_dir: PathBuf,
    file_extension: String,
}

impl ProfileGenerator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            catalog: FragmentCatalog::from_settings(settings),
            output_dir: settings.output_dir.clone(),
            file_extension: settings.file_extension.clone(),
        }
    }

    pub fn catalog(&self) -> &FragmentCatalog {
        &self.catalog
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where a profile named `name` is written.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.{}", self.file_extension))
    }

    pub fn manifest(&self, machine_id: &str) -> Result<Vec<ManifestEntry>, ProfileGenError> {
        manifest::build_manifest(&self.catalog, machine_id)
    }

    /// Compose one profile from `fragment_paths` then `extra_paths` and write it.
    pub fn generate_profile(
        &self,
        name: &str,
        fragment_paths: &[String],
        extra_paths: &[String],
    ) -> Result<PathBuf, ProfileGenError> {
        let profile = Composer::new(&self.catalog).compose(name, fragment_paths, extra_paths)?;
        self.ensure_output_dir()?;
        let path = self.output_path(name);
        emit::emit(&path, &profile)?;
        tracing::info!(profile = name, path = %path.display(), "generated profile");
        Ok(path)
    }

    /// Generate every manifest entry for `machine_id`. Each profile is named
    /// `<entry name><name_suffix>` and gets `extra_paths` merged last.
    pub fn generate_profiles(
        &self,
        machine_id: &str,
        extra_paths: &[String],
        name_suffix: &str,
    ) -> Result<Vec<PathBuf>, ProfileGenError> {
        let manifest = self.manifest(machine_id)?;
        tracing::info!(
            machine = machine_id,
            profiles = manifest.len(),
            "generating profiles"
        );

        let mut written = Vec::with_capacity(manifest.len());
        for entry in &manifest {
            let name = format!("{}{name_suffix}", entry.profile_name);
            written.push(self.generate_profile(&name, &entry.paths, extra_paths)?);
        }
        Ok(written)
    }

    /// Run [`generate_profiles`](Self::generate_profiles) for every machine
    /// the catalog finds, in discovery order.
    pub fn generate_all(
        &self,
        extra_paths: &[String],
        name_suffix: &str,
    ) -> Result<Vec<PathBuf>, ProfileGenError> {
        let mut written = Vec::new();
        for machine in self.catalog.machines()? {
            written.extend(self.generate_profiles(&machine, extra_paths, name_suffix)?);
        }
        Ok(written)
    }

    /// Carry out a [`GenerateAction`].
    pub fn handle(&self, action: &GenerateAction) -> Result<GenerateResult, ProfileGenError> {
        match action {
            GenerateAction::Machines => Ok(GenerateResult::Machines(self.catalog.machines()?)),
            GenerateAction::Manifest { machine } => {
                Ok(GenerateResult::Manifest(self.manifest(machine)?))
            }
            GenerateAction::Compose {
                name,
                fragments,
                extra,
            } => Ok(GenerateResult::Written(vec![
                self.generate_profile(name, fragments, extra)?,
            ])),
            GenerateAction::Generate {
                machine,
                extra,
                suffix,
            } => Ok(GenerateResult::Written(
                self.generate_profiles(machine, extra, suffix)?,
            )),
            GenerateAction::GenerateAll { extra, suffix } => {
                Ok(GenerateResult::Written(self.generate_all(extra, suffix)?))
            }
        }
    }

    fn ensure_output_dir(&self) -> Result<(), ProfileGenError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| ProfileGenError::IoError {
            path: self.output_dir.clone(),
            source: e,
        })
    }
}
