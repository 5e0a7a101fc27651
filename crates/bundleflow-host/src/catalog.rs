//! Scene catalog - the scenes a host knows how to load

use bundleflow_core::SceneId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How many ticks a scene takes to transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCost {
    /// Ticks to reach the activation point when loading
    pub load_ticks: u32,
    /// Ticks to unload
    pub unload_ticks: u32,
}

impl SceneCost {
    /// Create a cost, clamping both values to at least one tick
    pub fn new(load_ticks: u32, unload_ticks: u32) -> Self {
        Self {
            load_ticks: load_ticks.max(1),
            unload_ticks: unload_ticks.max(1),
        }
    }
}

/// Known scenes with their transition costs, in registration order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneCatalog {
    scenes: IndexMap<SceneId, SceneCost>,
}

impl SceneCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene, replacing any previous cost
    pub fn insert(&mut self, scene: impl Into<SceneId>, cost: SceneCost) {
        self.scenes.insert(scene.into(), cost);
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_scene(mut self, scene: impl Into<SceneId>, cost: SceneCost) -> Self {
        self.insert(scene, cost);
        self
    }

    /// Cost of a registered scene
    pub fn cost(&self, scene: &SceneId) -> Option<SceneCost> {
        self.scenes.get(scene).copied()
    }

    /// Check if a scene is registered
    pub fn contains(&self, scene: &SceneId) -> bool {
        self.scenes.contains_key(scene)
    }

    /// Number of registered scenes
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Check if no scenes are registered
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Registered scenes in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&SceneId, &SceneCost)> {
        self.scenes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_and_cost() {
        let catalog = SceneCatalog::new()
            .with_scene("menu", SceneCost::new(1, 1))
            .with_scene("forest", SceneCost::new(6, 3));

        let ids: Vec<_> = catalog.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["menu", "forest"]);
        assert_eq!(catalog.cost(&"forest".into()), Some(SceneCost::new(6, 3)));
        assert_eq!(catalog.cost(&"cave".into()), None);
    }

    #[test]
    fn test_cost_clamped() {
        let cost = SceneCost::new(0, 0);
        assert_eq!(cost.load_ticks, 1);
        assert_eq!(cost.unload_ticks, 1);
    }
}
