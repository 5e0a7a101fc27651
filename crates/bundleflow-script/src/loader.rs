//! RON manifest loader

use crate::error::{Error, Result};
use crate::schema::{BundleDef, SceneDef};
use bundleflow_core::{SceneBundle, SceneId};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Loaded scene and bundle definitions, in manifest order
#[derive(Debug, Default)]
pub struct Manifest {
    /// Scene definitions by ID
    pub scenes: IndexMap<SceneId, SceneDef>,
    /// Bundle definitions by name
    pub bundles: IndexMap<String, BundleDef>,
}

impl Manifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a scene definition
    pub fn get_scene(&self, id: &SceneId) -> Option<&SceneDef> {
        self.scenes.get(id)
    }

    /// Get a bundle definition
    pub fn get_bundle(&self, name: &str) -> Option<&BundleDef> {
        self.bundles.get(name)
    }

    /// Build the immutable bundle for a definition
    pub fn bundle(&self, name: &str) -> Option<SceneBundle> {
        self.bundles.get(name).and_then(|def| def.to_bundle().ok())
    }

    /// Scenes marked as open at startup
    pub fn initially_open(&self) -> impl Iterator<Item = &SceneDef> {
        self.scenes.values().filter(|def| def.open)
    }
}

/// One manifest file; both sections are optional
#[derive(Deserialize)]
struct ManifestFile {
    #[serde(default)]
    scenes: Vec<SceneDef>,
    #[serde(default)]
    bundles: Vec<BundleDef>,
}

/// Loader for RON manifests
///
/// Files can be loaded in any order; bundle references are checked against
/// the scene catalog in [`Loader::finish`].
///
/// # Example
///
/// ```
/// use bundleflow_script::Loader;
///
/// let mut loader = Loader::new();
/// loader
///     .load_str(
///         r#"(
///             scenes: [(id: "menu", open: true), (id: "level")],
///             bundles: [(name: "game", scenes: ["level"])],
///         )"#,
///     )
///     .unwrap();
///
/// let manifest = loader.finish().unwrap();
/// assert_eq!(manifest.bundle("game").unwrap().len(), 1);
/// assert_eq!(manifest.initially_open().count(), 1);
/// ```
pub struct Loader {
    manifest: Manifest,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            manifest: Manifest::new(),
        }
    }

    /// Load definitions from a RON string
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        let file: ManifestFile = ron::from_str(content)?;

        for scene in file.scenes {
            let id = scene.id.clone();
            if self.manifest.scenes.contains_key(&id) {
                return Err(Error::DuplicateDefinition(id.to_string()));
            }
            self.manifest.scenes.insert(id, scene);
        }

        for bundle in file.bundles {
            if self.manifest.bundles.contains_key(&bundle.name) {
                return Err(Error::DuplicateDefinition(bundle.name));
            }
            bundle.to_bundle()?;
            self.manifest.bundles.insert(bundle.name.clone(), bundle);
        }
        Ok(())
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!("loading manifest {}", path.display());
        let content = fs::read_to_string(path)?;
        self.load_str(&content)
    }

    /// Load all RON files from a directory
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        // Sorted so duplicate errors do not depend on directory order
        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for file_path in entries {
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                // Recursively load subdirectories
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Validate bundle references and return the manifest
    pub fn finish(self) -> Result<Manifest> {
        for bundle in self.manifest.bundles.values() {
            if let Some(missing) = bundle
                .scenes
                .iter()
                .find(|scene| !self.manifest.scenes.contains_key(*scene))
            {
                return Err(Error::UnknownScene {
                    bundle: bundle.name.clone(),
                    scene: missing.to_string(),
                });
            }
        }
        Ok(self.manifest)
    }

    /// Get the current definitions (for inspection during loading)
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
