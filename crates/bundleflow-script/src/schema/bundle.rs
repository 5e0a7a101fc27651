//! Bundle definition schema

use bundleflow_core::{LoadParams, SceneBundle, SceneId};
use serde::{Deserialize, Serialize};

/// Definition of a scene bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDef {
    /// Unique bundle name
    pub name: String,
    /// Scenes in load order
    pub scenes: Vec<SceneId>,
    /// Parameters used when the bundle is loaded
    #[serde(default)]
    pub params: LoadParams,
    /// Make the first loaded scene active
    #[serde(default)]
    pub activate_first: bool,
}

impl BundleDef {
    /// Create a bundle definition with default load parameters
    pub fn new<I, S>(name: impl Into<String>, scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SceneId>,
    {
        Self {
            name: name.into(),
            scenes: scenes.into_iter().map(Into::into).collect(),
            params: LoadParams::default(),
            activate_first: false,
        }
    }

    /// Build the immutable bundle, rejecting an empty scene list
    pub fn to_bundle(&self) -> bundleflow_core::Result<SceneBundle> {
        SceneBundle::try_new(self.name.clone(), self.scenes.iter().cloned())
    }
}
