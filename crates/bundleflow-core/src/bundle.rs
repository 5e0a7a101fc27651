//! Scene bundles - ordered groups of scenes processed as one operation

use crate::error::{Error, Result};
use crate::SceneId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered, immutable group of scenes
///
/// A bundle is the unit a [`LoadBundleOperation`](crate::LoadBundleOperation)
/// or [`UnloadBundleOperation`](crate::UnloadBundleOperation) walks through,
/// one scene at a time, in the order given here. Nothing hands out mutable
/// access to the scene list, so an operation can rely on it staying the same
/// for its whole lifetime.
///
/// # Example
///
/// ```
/// use bundleflow_core::{SceneBundle, SceneId};
///
/// let bundle = SceneBundle::new("forest", ["terrain", "props", "lighting"]);
/// assert_eq!(bundle.len(), 3);
/// assert_eq!(bundle.scene(1), Some(&SceneId::new("props")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneBundle {
    name: String,
    scenes: Vec<SceneId>,
}

impl SceneBundle {
    /// Create a bundle from any list of scenes
    ///
    /// An empty list is allowed here; operations started from it complete
    /// immediately. Use [`SceneBundle::try_new`] to reject it instead.
    pub fn new<I, S>(name: impl Into<String>, scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SceneId>,
    {
        Self {
            name: name.into(),
            scenes: scenes.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a bundle, rejecting an empty scene list
    pub fn try_new<I, S>(name: impl Into<String>, scenes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<SceneId>,
    {
        let bundle = Self::new(name, scenes);
        if bundle.is_empty() {
            return Err(Error::EmptyBundle(bundle.name));
        }
        Ok(bundle)
    }

    /// Bundle name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scenes in processing order
    pub fn scenes(&self) -> &[SceneId] {
        &self.scenes
    }

    /// Scene at `index`, if any
    pub fn scene(&self, index: usize) -> Option<&SceneId> {
        self.scenes.get(index)
    }

    /// Number of scenes
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Check if the bundle holds no scenes
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Check if a scene is part of this bundle
    pub fn contains(&self, scene: &SceneId) -> bool {
        self.scenes.contains(scene)
    }
}

impl fmt::Display for SceneBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bundle:{} ({} scenes)", self.name, self.scenes.len())
    }
}
