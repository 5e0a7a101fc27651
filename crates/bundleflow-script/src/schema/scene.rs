//! Scene definition schema

use bundleflow_core::SceneId;
use serde::{Deserialize, Serialize};

/// Definition of a scene known to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDef {
    /// Unique identifier for this scene
    pub id: SceneId,
    /// Ticks to load (host default when absent)
    #[serde(default)]
    pub load_ticks: Option<u32>,
    /// Ticks to unload (host default when absent)
    #[serde(default)]
    pub unload_ticks: Option<u32>,
    /// Whether the scene is open when the host starts
    #[serde(default)]
    pub open: bool,
}

impl SceneDef {
    /// Create a scene definition with default costs, initially closed
    pub fn new(id: impl Into<SceneId>) -> Self {
        Self {
            id: id.into(),
            load_ticks: None,
            unload_ticks: None,
            open: false,
        }
    }
}
