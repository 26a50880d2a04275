//! Profile composition.
//!
//! Layers, lowest priority first:
//!
//! ```text
//! base-config.xml
//!        ↑ default fragments (extruder, quality, infill, raft, supports, temperature)
//!        ↑ {"profile": {"_attributes": {"name": <name>}}}
//!        ↑ selected fragments, in manifest order
//!        ↑ extra fragments, in caller order
//! ```
//!
//! All layers merge with [`ArrayMerge::Positional`], then the temperature
//! controller list is folded back into one entry per controller name.

use serde_json::{Map, Value, json};

use crate::catalog::FragmentCatalog;
use crate::error::ProfileGenError;
use crate::merge::{ArrayMerge, merge_into};
use crate::xml::ATTRIBUTES_KEY;

pub const ROOT_ELEMENT: &str = "profile";
pub const TEMPERATURE_CONTROLLER: &str = "temperatureController";
pub const PRIMARY_EXTRUDER: &str = "Primary Extruder";
pub const HEATED_BED: &str = "Heated Bed";

/// Controller names kept after folding, in output order.
pub const CONTROLLER_NAMES: [&str; 2] = [PRIMARY_EXTRUDER, HEATED_BED];

pub struct Composer<'a> {
    catalog: &'a FragmentCatalog,
}

impl<'a> Composer<'a> {
    pub fn new(catalog: &'a FragmentCatalog) -> Self {
        Self { catalog }
    }

    /// The base config with every default fragment merged on top.
    ///
    /// Recomputed on each call; the files are re-read every time.
    pub fn load_defaults(&self) -> Result<Value, ProfileGenError> {
        let mut profile = self.catalog.load_base_config()?;
        for path in self.catalog.defaults() {
            let fragment = self.catalog.load_fragment(path)?;
            tracing::debug!(fragment = %path, "merging default fragment");
            merge_into(&mut profile, fragment, ArrayMerge::Positional);
        }
        Ok(profile)
    }

    /// Compose a named profile from `fragment_paths` then `extra_paths`.
    pub fn compose(
        &self,
        name: &str,
        fragment_paths: &[String],
        extra_paths: &[String],
    ) -> Result<Value, ProfileGenError> {
        let mut profile = self.load_defaults()?;
        merge_into(&mut profile, name_layer(name), ArrayMerge::Positional);

        for path in fragment_paths.iter().chain(extra_paths) {
            let fragment = self.catalog.load_fragment(path)?;
            tracing::debug!(profile = name, fragment = %path, "merging fragment");
            merge_into(&mut profile, fragment, ArrayMerge::Positional);
        }

        fold_temperature_controllers(&mut profile);
        Ok(profile)
    }
}

fn name_layer(name: &str) -> Value {
    json!({ ROOT_ELEMENT: { ATTRIBUTES_KEY: { "name": name } } })
}

/// Collapse the temperature controller list to exactly one entry per
/// controller name, `[Primary Extruder, Heated Bed]`.
///
/// Entries sharing a name fold left to right, later fields overriding
/// earlier ones. A name with no entries at all becomes an empty object.
/// Does nothing if the profile has no root element object.
pub fn fold_temperature_controllers(profile: &mut Value) {
    let Some(root) = profile.get_mut(ROOT_ELEMENT).and_then(Value::as_object_mut) else {
        return;
    };

    let entries = match root.get_mut(TEMPERATURE_CONTROLLER).map(Value::take) {
        Some(Value::Array(entries)) => entries,
        Some(Value::Null) | None => Vec::new(),
        Some(single) => vec![single],
    };

    let folded: Vec<Value> = CONTROLLER_NAMES
        .iter()
        .map(|&target| {
            let mut merged = Value::Object(Map::new());
            let mut found = false;
            for entry in entries.iter().filter(|e| controller_name(e) == Some(target)) {
                merge_into(&mut merged, entry.clone(), ArrayMerge::Positional);
                found = true;
            }
            if !found {
                tracing::warn!(
                    controller = target,
                    "no temperature settings found, emitting an empty controller"
                );
            }
            merged
        })
        .collect();

    root.insert(TEMPERATURE_CONTROLLER.into(), Value::Array(folded));
}

fn controller_name(entry: &Value) -> Option<&str> {
    entry.get(ATTRIBUTES_KEY)?.get("name")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::FragmentTree;
    use crate::merge::deep_merge;

    fn controllers(profile: &Value) -> &Vec<Value> {
        profile[ROOT_ELEMENT][TEMPERATURE_CONTROLLER].as_array().unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn same_named_entries_fold_later_wins() {
        let merged = deep_merge(
            json!({"profile": {"temperatureController": [
                {"_attributes": {"name": "Primary Extruder"}, "setting": 200}
            ]}}),
            json!({"profile": {"temperatureController": [
                {"_attributes": {"name": "Primary Extruder"}, "setting": 210}
            ]}}),
            ArrayMerge::Positional,
        );
        let mut profile = merged;
        fold_temperature_controllers(&mut profile);

        let list = controllers(&profile);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["_attributes"]["name"], PRIMARY_EXTRUDER);
        assert_eq!(list[0]["setting"], 210);
    }

    #[test]
    fn duplicates_beyond_positional_overlap_fold_together() {
        let mut profile = json!({"profile": {"temperatureController": [
            {"_attributes": {"name": "Heated Bed"}, "a": "1", "b": "1"},
            {"_attributes": {"name": "Primary Extruder"}, "a": "2"},
            {"_attributes": {"name": "Heated Bed"}, "b": "3"}
        ]}});
        fold_temperature_controllers(&mut profile);

        let list = controllers(&profile);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["_attributes"]["name"], PRIMARY_EXTRUDER);
        assert_eq!(list[1]["_attributes"]["name"], HEATED_BED);
        assert_eq!(list[1]["a"], "1");
        assert_eq!(list[1]["b"], "3");
    }

    #[test]
    fn single_object_controller_is_folded() {
        let mut profile = json!({"profile": {"temperatureController":
            {"_attributes": {"name": "Heated Bed"}, "t": "60"}
        }});
        fold_temperature_controllers(&mut profile);
        let list = controllers(&profile);
        assert_eq!(list[0], json!({}));
        assert_eq!(list[1]["t"], "60");
    }

    #[test]
    fn missing_controllers_become_empty_entries() {
        let mut profile = json!({"profile": {"layerHeight": "0.2"}});
        fold_temperature_controllers(&mut profile);
        assert_eq!(controllers(&profile), &vec![json!({}), json!({})]);
    }

    #[test]
    fn defaults_layer_base_and_default_fragments() {
        let tree = FragmentTree::standard();
        let catalog = tree.catalog();
        let defaults = Composer::new(&catalog).load_defaults().unwrap();

        assert_eq!(defaults["profile"]["_attributes"]["name"], "Base");
        assert_eq!(defaults["profile"]["layerHeight"]["_text"], "0.25");
        assert_eq!(defaults["profile"]["infillPercentage"]["_text"], "15");
        assert_eq!(defaults["profile"]["extruder"]["width"]["_text"], "0.48");
        assert_eq!(defaults["profile"]["useRaft"]["_text"], "0");
    }

    #[test]
    fn missing_default_fragment_fails() {
        let tree = FragmentTree::standard();
        tree.remove("raft/default-raft.json");
        let catalog = tree.catalog();
        let err = Composer::new(&catalog).load_defaults().unwrap_err();
        assert!(matches!(err, ProfileGenError::FragmentNotFound { .. }));
    }

    #[test]
    fn compose_applies_name_then_fragments_in_order() {
        let tree = FragmentTree::standard();
        let catalog = tree.catalog();
        let profile = Composer::new(&catalog)
            .compose(
                "machineA-nozzle4-fine-pla",
                &strings(&[
                    "machine/machineA",
                    "extruder/nozzle4.json",
                    "quality/fine.json",
                    "material/pla.json",
                ]),
                &[],
            )
            .unwrap();

        let root = &profile["profile"];
        assert_eq!(root["_attributes"]["name"], "machineA-nozzle4-fine-pla");
        assert_eq!(root["_attributes"]["version"], "2024-01-01");
        assert_eq!(root["layerHeight"]["_text"], "0.1");
        assert_eq!(root["extruder"]["width"]["_text"], "0.45");
        assert_eq!(root["bedSize"]["_text"], "200");

        let list = controllers(&profile);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["_attributes"]["name"], PRIMARY_EXTRUDER);
        assert_eq!(list[0]["setpoint"]["_attributes"]["temperature"], "210");
        assert_eq!(list[0]["stabilizeAtStartup"]["_text"], "1");
        assert_eq!(list[1]["_attributes"]["name"], HEATED_BED);
        assert_eq!(list[1]["setpoint"]["_attributes"]["temperature"], "60");
    }

    #[test]
    fn single_controller_fragment_keeps_other_controllers() {
        let tree = FragmentTree::standard();
        tree.write(
            "material/pla.json",
            r#"{"profile": {"temperatureController":
                {"_attributes": {"name": "Primary Extruder"},
                 "setpoint": {"_attributes": {"layer": "1", "temperature": "215"}}}
            }}"#,
        );
        let catalog = tree.catalog();
        let profile = Composer::new(&catalog)
            .compose("p", &strings(&["material/pla.json"]), &[])
            .unwrap();

        let list = controllers(&profile);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["setpoint"]["_attributes"]["temperature"], "215");
        assert_eq!(list[0]["temperatureNumber"]["_text"], "0");
        assert_eq!(list[1]["_attributes"]["name"], HEATED_BED);
        assert_eq!(list[1]["setpoint"]["_attributes"]["temperature"], "60");
        assert_eq!(list[1]["stabilizeAtStartup"]["_text"], "1");
    }

    #[test]
    fn extra_fragments_override_selected_ones() {
        let tree = FragmentTree::standard();
        tree.write(
            "overrides/tall.json",
            r#"{"profile": {"layerHeight": {"_text": "0.35"}}}"#,
        );
        let catalog = tree.catalog();
        let profile = Composer::new(&catalog)
            .compose(
                "p",
                &strings(&["quality/fine.json"]),
                &strings(&["overrides/tall.json"]),
            )
            .unwrap();
        assert_eq!(profile["profile"]["layerHeight"]["_text"], "0.35");
    }

    #[test]
    fn empty_extras_match_omitted_extras() {
        let tree = FragmentTree::standard();
        let catalog = tree.catalog();
        let composer = Composer::new(&catalog);
        let selected = strings(&["machine/machineA", "quality/ok.json"]);

        let with_empty = composer.compose("p", &selected, &[]).unwrap();
        let chained = composer.compose("p", &[], &selected).unwrap();
        assert_eq!(with_empty, chained);
    }

    #[test]
    fn missing_selected_fragment_fails() {
        let tree = FragmentTree::standard();
        let catalog = tree.catalog();
        let err = Composer::new(&catalog)
            .compose("p", &strings(&["machine/unknown"]), &[])
            .unwrap_err();
        assert!(err.is_fragment_load());
    }
}
