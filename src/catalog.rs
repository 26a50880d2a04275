//! Fragment discovery and loading.
//!
//! A [`FragmentCatalog`] is rooted at the fragment directory and carries the
//! [`Layout`] that says which glob finds which category. Discovery returns
//! paths relative to the root, in the order the glob walk yields them, and
//! drops anything listed as a default fragment so the defaults never appear
//! as a varying choice.
//!
//! Loading resolves a relative path against the root. A path without an
//! extension that doesn't exist is retried with `.json` appended, so a
//! manifest can name `machine/<id>` directly.

use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::error::ProfileGenError;
use crate::settings::{Layout, Settings};
use crate::xml;

/// The varying categories a manifest draws from, plus machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Machine,
    Extruder,
    Quality,
    Material,
}

#[derive(Debug, Clone)]
pub struct FragmentCatalog {
    root: PathBuf,
    base_config: PathBuf,
    layout: Layout,
}

impl FragmentCatalog {
    pub fn new(root: impl Into<PathBuf>, base_config: impl Into<PathBuf>, layout: Layout) -> Self {
        Self {
            root: root.into(),
            base_config: base_config.into(),
            layout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.fragment_root.clone(),
            settings.base_config.clone(),
            settings.layout.clone(),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn pattern(&self, category: Category) -> &str {
        match category {
            Category::Machine => &self.layout.machines,
            Category::Extruder => &self.layout.extruders,
            Category::Quality => &self.layout.qualities,
            Category::Material => &self.layout.materials,
        }
    }

    /// Discover the fragments of one category.
    pub fn category(&self, category: Category) -> Result<Vec<String>, ProfileGenError> {
        self.discover(self.pattern(category))
    }

    /// Resolve `pattern` under the fragment root and return matching paths,
    /// relative to the root, minus the default fragments.
    ///
    /// The literal directory part of `pattern` must exist. An existing but
    /// empty directory yields no fragments.
    pub fn discover(&self, pattern: &str) -> Result<Vec<String>, ProfileGenError> {
        if !self.root.is_dir() {
            return Err(ProfileGenError::MissingRoot {
                path: self.root.clone(),
            });
        }

        let literal_dir = self.root.join(literal_prefix(pattern));
        if !literal_dir.is_dir() {
            return Err(ProfileGenError::MissingCategory {
                pattern: pattern.to_string(),
                path: literal_dir,
            });
        }

        // glob drops `.` components from what it yields, so match against a
        // root without them.
        let root = without_cur_dir(&self.root);
        let full = if root.as_os_str().is_empty() {
            pattern.to_string()
        } else {
            format!(
                "{}/{pattern}",
                glob::Pattern::escape(&root.to_string_lossy())
            )
        };
        let entries = glob::glob(&full).map_err(|source| ProfileGenError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut found = Vec::new();
        for entry in entries {
            let path = entry.map_err(|source| ProfileGenError::Discovery {
                pattern: pattern.to_string(),
                source,
            })?;
            if !path.is_file() {
                continue;
            }
            let relative = match path.strip_prefix(&root) {
                Ok(relative) => to_slash(relative),
                Err(_) => {
                    return Err(ProfileGenError::OutsideRoot {
                        path,
                        root: self.root.clone(),
                    });
                }
            };
            if self.layout.defaults.contains(&relative) {
                continue;
            }
            tracing::debug!(pattern, fragment = %relative, "discovered fragment");
            found.push(relative);
        }
        Ok(found)
    }

    /// Machine identifiers: discovered machine fragments with their
    /// directory and `.json` extension removed.
    pub fn machines(&self) -> Result<Vec<String>, ProfileGenError> {
        Ok(self
            .category(Category::Machine)?
            .iter()
            .map(|path| {
                let stem = path.rsplit('/').next().unwrap_or(path);
                stem.strip_suffix(".json").unwrap_or(stem).to_string()
            })
            .collect())
    }

    /// Default fragment paths, in merge order.
    pub fn defaults(&self) -> &[String] {
        &self.layout.defaults
    }

    /// Resolve a relative fragment path to an existing file.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, ProfileGenError> {
        let direct = self.root.join(relative);
        if direct.is_file() {
            return Ok(direct);
        }
        if direct.extension().is_none() {
            let with_ext = self.root.join(format!("{relative}.json"));
            if with_ext.is_file() {
                return Ok(with_ext);
            }
        }
        Err(ProfileGenError::FragmentNotFound { path: direct })
    }

    /// Load one JSON fragment. The top level must be an object.
    pub fn load_fragment(&self, relative: &str) -> Result<Value, ProfileGenError> {
        let path = self.resolve(relative)?;
        let content = std::fs::read_to_string(&path).map_err(|source| {
            ProfileGenError::FragmentRead {
                path: path.clone(),
                source,
            }
        })?;
        let value: Value =
            serde_json::from_str(&content).map_err(|source| ProfileGenError::FragmentParse {
                path: path.clone(),
                source,
            })?;
        if !value.is_object() {
            return Err(ProfileGenError::NotAnObject { path });
        }
        Ok(value)
    }

    /// Load the base XML config in its compact structured form.
    pub fn load_base_config(&self) -> Result<Value, ProfileGenError> {
        let path = self.root.join(&self.base_config);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProfileGenError::FragmentNotFound { path });
            }
            Err(source) => return Err(ProfileGenError::FragmentRead { path, source }),
        };
        xml::parse(&content).map_err(|reason| ProfileGenError::XmlParse { path, reason })
    }
}

/// The leading components of `pattern` that contain no glob metacharacters,
/// i.e. the directory every match must live under.
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut components: Vec<&str> = pattern
        .split('/')
        .take_while(|c| !c.contains(['*', '?', '[', ']']))
        .collect();
    // a fully literal pattern names a file, not a directory
    if components.len() == pattern.split('/').count() {
        components.pop();
    }
    components.iter().collect()
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Join path components with `/` regardless of platform, so profile names
/// derived from these paths are stable.
fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
