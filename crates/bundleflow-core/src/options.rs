//! Options forwarded to the host when a scene transition starts

use serde::{Deserialize, Serialize};

/// Progress at which a load is "ready but not yet switched in"
///
/// A load held back by its activation flag parks at this value until the
/// flag is raised.
pub const ACTIVATION_THRESHOLD: f32 = 0.9;

/// How a loaded scene joins the set of open scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LoadMode {
    /// Close every other open scene once this one is loaded
    Single,
    /// Open alongside the scenes already loaded
    #[default]
    Additive,
}

/// Whether a loaded scene gets its own physics scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LocalPhysicsMode {
    /// Share the default physics scene
    #[default]
    None,
    /// Create a local 2D physics scene
    Physics2D,
    /// Create a local 3D physics scene
    Physics3D,
}

/// Parameters for starting a scene load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoadParams {
    /// Load mode
    #[serde(default)]
    pub mode: LoadMode,
    /// Local physics mode
    #[serde(default)]
    pub physics: LocalPhysicsMode,
}

impl LoadParams {
    /// Additive load without a local physics scene
    pub fn additive() -> Self {
        Self::default()
    }

    /// Single-mode load without a local physics scene
    pub fn single() -> Self {
        Self {
            mode: LoadMode::Single,
            ..Self::default()
        }
    }

    /// Set the local physics mode
    pub fn with_physics(mut self, physics: LocalPhysicsMode) -> Self {
        self.physics = physics;
        self
    }
}

/// Options for starting a scene unload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnloadOptions {
    /// Unload the scene only
    #[default]
    None,
    /// Also release objects that were created inside the scene
    UnloadAllEmbeddedSceneObjects,
}
