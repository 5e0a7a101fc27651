//! Host traits - the boundary between bundle operations and the scene system
//!
//! Bundle operations never talk to a scheduler directly. They only see:
//! - [`ResourceHost`]: starts single-scene transitions, or refuses them
//! - [`SubOperation`]: the handle for one in-flight transition
//! - [`EnvironmentQuery`] / [`EnvironmentMutator`]: the ambient scene state
//!   (open-scene count and the active-scene slot)
//!
//! This keeps the sequencing logic testable without a real engine.

use crate::{LoadParams, SceneId, UnloadOptions};

/// Handle for one scene transition owned by the host scheduler
///
/// The host advances the transition between polls; the bundle operation
/// only reads progress and completion and forwards scheduling hints.
pub trait SubOperation {
    /// Fractional progress in `[0, 1]`
    fn progress(&self) -> f32;

    /// Whether the host has finished this transition
    ///
    /// Must flip to `true` exactly once and never revert.
    fn is_done(&self) -> bool;

    /// Current scheduling priority (higher runs sooner)
    fn priority(&self) -> i32;

    /// Set the scheduling priority
    fn set_priority(&mut self, priority: i32);

    /// Whether the host may switch a loaded scene live as soon as it is ready
    fn allow_activation(&self) -> bool;

    /// Gate activation of a load. Unloads ignore this.
    fn set_allow_activation(&mut self, allow: bool);
}

/// Read access to ambient scene state
pub trait EnvironmentQuery {
    /// Number of scenes currently open across the whole host
    fn open_scene_count(&self) -> usize;

    /// The scene currently marked active, if any
    fn active_scene(&self) -> Option<SceneId>;
}

/// Write access to ambient scene state
pub trait EnvironmentMutator {
    /// Mark an open scene as the active one
    ///
    /// Returns false if the host rejects the change (e.g. the scene is not open).
    fn set_active_scene(&mut self, scene: &SceneId) -> bool;
}

/// A host able to start single-scene transitions
///
/// `None` is the refusal signal: the scene is already in the requested state,
/// or the host cannot transition it at all. The two are not distinguished.
pub trait ResourceHost: EnvironmentQuery + EnvironmentMutator {
    /// Handle type for in-flight transitions
    type Operation: SubOperation;

    /// Start loading a scene
    fn start_load(&mut self, scene: &SceneId, params: &LoadParams) -> Option<Self::Operation>;

    /// Start unloading a scene
    fn start_unload(&mut self, scene: &SceneId, options: UnloadOptions)
        -> Option<Self::Operation>;
}
