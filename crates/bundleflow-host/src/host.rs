//! SimHost - in-memory, tick-driven scene host
//!
//! SimHost plays the part of an engine's scene manager and scheduler:
//! - owns the set of open scenes and the active-scene slot
//! - starts single-scene transitions, or refuses them
//! - advances pending transitions once per [`SimHost::tick`]
//!
//! Bundle operations only reach it through the `bundleflow_core` host traits.
//!
//! ## Scheduling
//!
//! Each tick advances at most [`HostConfig::operations_per_tick`] pending
//! transitions, highest priority first, ties in start order. A load parked
//! at the activation point keeps its slot until activation is allowed.

use crate::catalog::{SceneCatalog, SceneCost};
use crate::config::HostConfig;
use crate::error::{Error, Result};
use crate::operation::{OperationId, SimOperation, Transition};
use bundleflow_core::{
    EnvironmentMutator, EnvironmentQuery, LoadMode, LoadParams, ResourceHost, SceneId,
    SubOperation, UnloadOptions,
};
use log::{debug, trace, warn};
use std::cmp::Reverse;

/// A transition that completed during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    /// Host-assigned operation id
    pub id: OperationId,
    /// Scene that changed state
    pub scene: SceneId,
    /// Whether it was loaded or unloaded
    pub transition: Transition,
}

/// Result of a host tick
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    /// The tick that was executed
    pub tick: u64,
    /// Transitions that completed this tick, in the order they were advanced
    pub completed: Vec<Completed>,
}

/// In-memory scene host
///
/// # Example
///
/// ```
/// use bundleflow_core::{BundleOperation, LoadRequest, SceneBundle};
/// use bundleflow_host::{SceneCatalog, SceneCost, SimHost};
///
/// let catalog = SceneCatalog::new()
///     .with_scene("menu", SceneCost::new(1, 1))
///     .with_scene("level", SceneCost::new(2, 1));
/// let mut host = SimHost::with_catalog(catalog);
/// host.open_scene("menu").unwrap();
///
/// let mut op = LoadRequest::new(SceneBundle::new("game", ["level"])).start(&mut host);
/// host.tick();
/// host.tick();
/// assert!(op.poll(&mut host));
/// assert!(host.is_open(&"level".into()));
/// ```
#[derive(Debug)]
pub struct SimHost {
    config: HostConfig,
    catalog: SceneCatalog,
    /// Open scenes in the order they were opened
    open: Vec<SceneId>,
    active: Option<SceneId>,
    /// Pending transitions in start order
    pending: Vec<SimOperation>,
    tick: u64,
    next_id: u64,
}

impl SimHost {
    /// Create a host with an empty catalog
    pub fn new() -> Self {
        Self::with_config(HostConfig::default(), SceneCatalog::new())
    }

    /// Create a host that knows these scenes
    pub fn with_catalog(catalog: SceneCatalog) -> Self {
        Self::with_config(HostConfig::default(), catalog)
    }

    /// Create a host with a specific configuration
    pub fn with_config(config: HostConfig, catalog: SceneCatalog) -> Self {
        Self {
            config,
            catalog,
            open: Vec::new(),
            active: None,
            pending: Vec::new(),
            tick: 0,
            next_id: 0,
        }
    }

    /// Register a scene using the configured default costs
    pub fn register_scene(&mut self, scene: impl Into<SceneId>) {
        let cost = SceneCost::new(
            self.config.default_load_ticks(),
            self.config.default_unload_ticks(),
        );
        self.catalog.insert(scene, cost);
    }

    /// Open a scene immediately, without a transition
    ///
    /// The first scene opened this way becomes active.
    pub fn open_scene(&mut self, scene: impl Into<SceneId>) -> Result<()> {
        let scene = scene.into();
        if !self.catalog.contains(&scene) {
            return Err(Error::UnknownScene(scene));
        }
        if !self.open.contains(&scene) {
            debug!("opened {} directly", scene);
            self.open.push(scene.clone());
        }
        if self.active.is_none() {
            self.active = Some(scene);
        }
        Ok(())
    }

    /// Get the host configuration
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Get a mutable reference to the host configuration
    pub fn config_mut(&mut self) -> &mut HostConfig {
        &mut self.config
    }

    /// Get the scene catalog
    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    /// Check if a scene is open
    pub fn is_open(&self, scene: &SceneId) -> bool {
        self.open.contains(scene)
    }

    /// Open scenes in the order they were opened
    pub fn open_scenes(&self) -> &[SceneId] {
        &self.open
    }

    /// Number of ticks executed
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Transitions not yet completed, in start order
    pub fn pending_operations(&self) -> &[SimOperation] {
        &self.pending
    }

    /// Open scenes that no pending unload will close
    fn open_after_pending_unloads(&self) -> usize {
        let unloading = self
            .pending
            .iter()
            .filter(|op| !op.transition().is_load())
            .count();
        self.open.len().saturating_sub(unloading)
    }

    fn is_transitioning(&self, scene: &SceneId) -> bool {
        self.pending.iter().any(|op| op.scene() == *scene)
    }

    fn begin(&mut self, scene: &SceneId, transition: Transition, cost: u32) -> SimOperation {
        let id = OperationId(self.next_id);
        self.next_id += 1;
        let op = SimOperation::new(id, scene.clone(), transition, cost);
        trace!("{} started: {:?} {}", id, transition, scene);
        self.pending.push(op.clone());
        op
    }

    /// Advance pending transitions by one tick
    pub fn tick(&mut self) -> TickResult {
        self.tick += 1;

        // Stable sort keeps start order among equal priorities
        let mut order: Vec<SimOperation> = self.pending.clone();
        order.sort_by_key(|op| Reverse(op.priority()));

        let mut completed = Vec::new();
        for op in order.iter().take(self.config.operations_per_tick()) {
            if op.advance() {
                completed.push(Completed {
                    id: op.id(),
                    scene: op.scene(),
                    transition: op.transition(),
                });
            }
        }

        for done in &completed {
            self.pending.retain(|op| op.id() != done.id);
            self.apply(&done.scene, done.transition);
        }

        trace!(
            "tick {}: {} completed, {} pending",
            self.tick,
            completed.len(),
            self.pending.len()
        );
        TickResult {
            tick: self.tick,
            completed,
        }
    }

    fn apply(&mut self, scene: &SceneId, transition: Transition) {
        match transition {
            Transition::Load(params) => {
                if params.mode == LoadMode::Single {
                    debug!("{} loaded in single mode, closing {} scenes", scene, self.open.len());
                    self.open.clear();
                    self.active = Some(scene.clone());
                }
                self.open.push(scene.clone());
                if self.active.is_none() {
                    self.active = Some(scene.clone());
                }
                debug!("{} loaded", scene);
            }
            Transition::Unload(_) => {
                self.open.retain(|s| s != scene);
                if self.active.as_ref() == Some(scene) {
                    self.active = self.open.first().cloned();
                }
                debug!("{} unloaded", scene);
            }
        }
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentQuery for SimHost {
    fn open_scene_count(&self) -> usize {
        self.open.len()
    }

    fn active_scene(&self) -> Option<SceneId> {
        self.active.clone()
    }
}

impl EnvironmentMutator for SimHost {
    fn set_active_scene(&mut self, scene: &SceneId) -> bool {
        if !self.open.contains(scene) {
            return false;
        }
        self.active = Some(scene.clone());
        true
    }
}

impl ResourceHost for SimHost {
    type Operation = SimOperation;

    fn start_load(&mut self, scene: &SceneId, params: &LoadParams) -> Option<SimOperation> {
        let Some(cost) = self.catalog.cost(scene) else {
            warn!("cannot load {}: not in catalog", scene);
            return None;
        };
        if self.is_open(scene) || self.is_transitioning(scene) {
            return None;
        }
        Some(self.begin(scene, Transition::Load(*params), cost.load_ticks))
    }

    fn start_unload(&mut self, scene: &SceneId, options: UnloadOptions) -> Option<SimOperation> {
        if !self.is_open(scene) || self.is_transitioning(scene) {
            return None;
        }
        if self.open_after_pending_unloads() <= 1 {
            warn!("cannot unload {}: it is the last open scene", scene);
            return None;
        }
        let cost = self
            .catalog
            .cost(scene)
            .map_or(self.config.default_unload_ticks(), |c| c.unload_ticks);
        Some(self.begin(scene, Transition::Unload(options), cost))
    }
}
