#[cfg(test)]
pub mod test {
    use std::fs;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    use crate::catalog::FragmentCatalog;
    use crate::settings::Settings;

    pub const BASE_CONFIG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!-- base profile shared by every machine -->
<profile name="Base" version="2024-01-01">
    <layerHeight>0.2</layerHeight>
    <infillPercentage>20</infillPercentage>
    <extruder name="Primary Extruder">
        <toolheadNumber>0</toolheadNumber>
        <diameter>0.4</diameter>
    </extruder>
    <temperatureController name="Primary Extruder">
        <temperatureNumber>0</temperatureNumber>
        <setpoint layer="1" temperature="200"/>
    </temperatureController>
    <temperatureController name="Heated Bed">
        <temperatureNumber>1</temperatureNumber>
        <setpoint layer="1" temperature="60"/>
    </temperatureController>
</profile>
"#;

    /// A fragment tree on disk:
    ///
    /// ```text
    /// base-config.xml
    /// machine/machineA.json
    /// extruder/{default-extruder,nozzle4}.json
    /// quality/{default-quality,fine,ok}.json
    /// material/pla.json
    /// infill/default-infill.json  raft/default-raft.json
    /// supports/default-supports.json  temp/default-temperature.json
    /// ```
    ///
    /// The output directory sits next to the fragment root, not inside it.
    pub struct FragmentTree {
        dir: TempDir,
    }

    impl FragmentTree {
        pub fn empty() -> Self {
            let tree = Self {
                dir: TempDir::new().unwrap(),
            };
            fs::create_dir_all(tree.root()).unwrap();
            tree
        }

        pub fn standard() -> Self {
            let tree = Self::empty();
            tree.write("base-config.xml", BASE_CONFIG);
            tree.write(
                "machine/machineA.json",
                r#"{"profile": {"bedSize": {"_text": "200"}, "machineTypeOverride": {"_text": "0"}}}"#,
            );
            tree.write(
                "extruder/default-extruder.json",
                r#"{"profile": {"extruder": {"width": {"_text": "0.48"}}}}"#,
            );
            tree.write(
                "extruder/nozzle4.json",
                r#"{"profile": {"extruder": {"diameter": {"_text": "0.4"}, "width": {"_text": "0.45"}}}}"#,
            );
            tree.write(
                "quality/default-quality.json",
                r#"{"profile": {"layerHeight": {"_text": "0.25"}}}"#,
            );
            tree.write(
                "quality/fine.json",
                r#"{"profile": {"layerHeight": {"_text": "0.1"}}}"#,
            );
            tree.write(
                "quality/ok.json",
                r#"{"profile": {"layerHeight": {"_text": "0.3"}}}"#,
            );
            tree.write(
                "material/pla.json",
                r#"{"profile": {"temperatureController": [
                    {"_attributes": {"name": "Primary Extruder"},
                     "setpoint": {"_attributes": {"layer": "1", "temperature": "210"}}}
                ]}}"#,
            );
            tree.write(
                "infill/default-infill.json",
                r#"{"profile": {"infillPercentage": {"_text": "15"}}}"#,
            );
            tree.write(
                "raft/default-raft.json",
                r#"{"profile": {"useRaft": {"_text": "0"}}}"#,
            );
            tree.write(
                "supports/default-supports.json",
                r#"{"profile": {"generateSupport": {"_text": "0"}}}"#,
            );
            tree.write(
                "temp/default-temperature.json",
                r#"{"profile": {"temperatureController": [
                    {"_attributes": {"name": "Primary Extruder"}, "stabilizeAtStartup": {"_text": "1"}},
                    {"_attributes": {"name": "Heated Bed"}, "stabilizeAtStartup": {"_text": "1"}}
                ]}}"#,
            );
            tree
        }

        pub fn root(&self) -> PathBuf {
            self.dir.path().join("configs")
        }

        pub fn output_dir(&self) -> PathBuf {
            self.dir.path().join("output")
        }

        /// Write a file under the fragment root, creating directories.
        pub fn write(&self, relative: &str, content: &str) {
            let path = self.root().join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }

        pub fn remove(&self, relative: &str) {
            fs::remove_file(self.root().join(relative)).unwrap();
        }

        pub fn remove_dir(&self, relative: &str) {
            fs::remove_dir_all(self.root().join(relative)).unwrap();
        }

        pub fn settings(&self) -> Settings {
            Settings {
                fragment_root: self.root(),
                output_dir: self.output_dir(),
                ..Settings::default()
            }
        }

        pub fn catalog(&self) -> FragmentCatalog {
            FragmentCatalog::from_settings(&self.settings())
        }

        pub fn read_output(&self, file_name: &str) -> String {
            fs::read_to_string(self.output_dir().join(file_name)).unwrap()
        }

        pub fn output_files(&self) -> Vec<String> {
            let dir: &Path = &self.output_dir();
            if !dir.exists() {
                return Vec::new();
            }
            let mut names: Vec<String> = fs::read_dir(dir)
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }
    }

    #[test]
    fn standard_tree_has_base_config() {
        let tree = FragmentTree::standard();
        assert!(tree.root().join("base-config.xml").is_file());
        assert!(tree.output_files().is_empty());
    }
}
