//! The manifest: every extruder × quality × material combination for one
//! machine, each with a deterministic profile name.

use std::fmt;

use crate::catalog::{Category, FragmentCatalog};
use crate::error::ProfileGenError;

/// One profile to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub profile_name: String,
    /// `[machine/<id>, extruder, quality, material]`, in merge order.
    pub paths: Vec<String>,
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.profile_name, self.paths.join(", "))
    }
}

/// Build the manifest for `machine_id`.
///
/// Iteration is extruder (outer), quality, material (inner), each in
/// discovery order. An empty category yields an empty manifest.
pub fn build_manifest(
    catalog: &FragmentCatalog,
    machine_id: &str,
) -> Result<Vec<ManifestEntry>, ProfileGenError> {
    let extruders = catalog.category(Category::Extruder)?;
    let qualities = catalog.category(Category::Quality)?;
    let materials = catalog.category(Category::Material)?;

    let machine = format!("machine/{machine_id}");
    let mut manifest = Vec::with_capacity(extruders.len() * qualities.len() * materials.len());
    for extruder in &extruders {
        for quality in &qualities {
            for material in &materials {
                let paths = vec![
                    machine.clone(),
                    extruder.clone(),
                    quality.clone(),
                    material.clone(),
                ];
                manifest.push(ManifestEntry {
                    profile_name: profile_name(&paths),
                    paths,
                });
            }
        }
    }

    tracing::debug!(machine = machine_id, entries = manifest.len(), "built manifest");
    Ok(manifest)
}

/// Derive a profile name from a fragment path list.
///
/// `["machine/m", "extruder/n4.json", "quality/ok.json", "material/pla.json"]`
/// becomes `"m-n4-ok-pla"`.
pub fn profile_name(paths: &[String]) -> String {
    paths
        .join("/")
        .replace("machine/", "")
        .replace("/extruder/", "-")
        .replace("/quality/", "-")
        .replace("/material/", "-")
        .replace(".json", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::FragmentTree;
    use std::collections::HashSet;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn name_strips_category_directories_and_extension() {
        let name = profile_name(&paths(&[
            "machine/machineA",
            "extruder/nozzle-4.json",
            "quality/ok-quality.json",
            "material/pla.json",
        ]));
        assert_eq!(name, "machineA-nozzle-4-ok-quality-pla");
    }

    #[test]
    fn one_extruder_two_qualities_one_material() {
        let tree = FragmentTree::standard();
        let manifest = build_manifest(&tree.catalog(), "machineA").unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest[0].profile_name, "machineA-nozzle4-fine-pla");
        assert_eq!(manifest[1].profile_name, "machineA-nozzle4-ok-pla");
        assert_eq!(
            manifest[1].paths,
            paths(&[
                "machine/machineA",
                "extruder/nozzle4.json",
                "quality/ok.json",
                "material/pla.json"
            ])
        );
    }

    #[test]
    fn count_is_the_cross_product_and_names_are_distinct() {
        let tree = FragmentTree::standard();
        for nozzle in ["nozzle2", "nozzle6", "nozzle8"] {
            tree.write(&format!("extruder/{nozzle}.json"), "{}");
        }
        for material in ["abs", "petg"] {
            tree.write(&format!("material/{material}.json"), "{}");
        }

        let manifest = build_manifest(&tree.catalog(), "machineA").unwrap();
        assert_eq!(manifest.len(), 4 * 2 * 3);

        let names: HashSet<&str> = manifest.iter().map(|e| e.profile_name.as_str()).collect();
        assert_eq!(names.len(), manifest.len());
    }

    #[test]
    fn material_varies_fastest() {
        let tree = FragmentTree::standard();
        tree.write("material/abs.json", "{}");
        let manifest = build_manifest(&tree.catalog(), "machineA").unwrap();
        let names: Vec<&str> = manifest.iter().map(|e| e.profile_name.as_str()).collect();
        assert_eq!(
            names,
            [
                "machineA-nozzle4-fine-abs",
                "machineA-nozzle4-fine-pla",
                "machineA-nozzle4-ok-abs",
                "machineA-nozzle4-ok-pla",
            ]
        );
    }

    #[test]
    fn empty_category_gives_empty_manifest() {
        let tree = FragmentTree::standard();
        tree.remove("material/pla.json");
        let manifest = build_manifest(&tree.catalog(), "machineA").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn absent_category_dir_fails_manifest() {
        let tree = FragmentTree::standard();
        tree.remove_dir("material");
        let err = build_manifest(&tree.catalog(), "machineA").unwrap_err();
        assert!(matches!(err, ProfileGenError::MissingCategory { .. }));
    }

    #[test]
    fn entry_display_lists_paths() {
        let entry = ManifestEntry {
            profile_name: "m-n-q-p".into(),
            paths: paths(&["machine/m", "extruder/n.json"]),
        };
        assert_eq!(entry.to_string(), "m-n-q-p: machine/m, extruder/n.json");
    }
}
