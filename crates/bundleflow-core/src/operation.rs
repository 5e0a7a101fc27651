//! Shared sequencing machine for bundle operations
//!
//! A bundle operation walks its bundle one scene at a time:
//!
//! ```text
//! Idle(index=0) ──start──▶ InFlight(index=i, current=op) ──poll: op done──▶ InFlight(i+1) … ──▶ Done
//!        │                          ▲                                            │
//!        └──refused: skip, i+1──────┘◀──────────refused: skip, i+1───────────────┘
//! ```
//!
//! [`Sequence`] holds the state both directions share (index, current
//! sub-operation, priority, callbacks, completion). The load and unload
//! operations decide how to start the next scene and when to stop.
//!
//! The host never calls back into an operation. The driver calls
//! [`BundleOperation::poll`] once per scheduler tick, and `poll` runs the
//! advance step synchronously when the current sub-operation has finished.

use crate::{ResourceHost, SceneBundle, SceneId, SubOperation};
use log::debug;
use std::fmt;

/// Largest progress value reported before an operation is done
///
/// A finished-but-not-yet-polled sub-operation would otherwise let the last
/// scene push progress to 1.0 while `is_done` is still false.
const PROGRESS_CEILING: f32 = 1.0 - f32::EPSILON / 2.0;

/// Callback invoked once per scene that actually transitioned
pub type SceneCallback = Box<dyn FnMut(&SceneId)>;

/// Callback invoked once when the whole operation completes
pub type CompletedCallback = Box<dyn FnOnce(&SceneBundle)>;

/// Common interface of load and unload bundle operations
///
/// # Example
///
/// ```
/// use bundleflow_core::{BundleOperation, LoadBundleOperation};
/// # use bundleflow_core::{EnvironmentMutator, EnvironmentQuery, LoadParams, ResourceHost,
/// #     SceneId, SubOperation, UnloadOptions};
/// # struct NoHost;
/// # struct NoOp;
/// # impl SubOperation for NoOp {
/// #     fn progress(&self) -> f32 { 0.0 }
/// #     fn is_done(&self) -> bool { false }
/// #     fn priority(&self) -> i32 { 0 }
/// #     fn set_priority(&mut self, _: i32) {}
/// #     fn allow_activation(&self) -> bool { true }
/// #     fn set_allow_activation(&mut self, _: bool) {}
/// # }
/// # impl EnvironmentQuery for NoHost {
/// #     fn open_scene_count(&self) -> usize { 1 }
/// #     fn active_scene(&self) -> Option<SceneId> { None }
/// # }
/// # impl EnvironmentMutator for NoHost {
/// #     fn set_active_scene(&mut self, _: &SceneId) -> bool { false }
/// # }
/// # impl ResourceHost for NoHost {
/// #     type Operation = NoOp;
/// #     fn start_load(&mut self, _: &SceneId, _: &LoadParams) -> Option<NoOp> { None }
/// #     fn start_unload(&mut self, _: &SceneId, _: UnloadOptions) -> Option<NoOp> { None }
/// # }
///
/// // The "nothing to do" sentinel is done from the start
/// let mut op = LoadBundleOperation::<NoHost>::finished();
/// assert!(op.is_done());
/// assert_eq!(op.progress(), 1.0);
/// assert!(op.poll(&mut NoHost));
/// ```
pub trait BundleOperation<H: ResourceHost> {
    /// Observe the current sub-operation and advance if it has finished
    ///
    /// Call once per scheduler tick. Returns `is_done()` after advancing.
    fn poll(&mut self, host: &mut H) -> bool;

    /// Whether the operation has completed. Never reverts.
    fn is_done(&self) -> bool;

    /// Aggregated progress in `[0, 1]`, exactly 1.0 only when done
    fn progress(&self) -> f32;

    /// Stored scheduling priority
    fn priority(&self) -> i32;

    /// Set the priority, forwarding it to the in-flight sub-operation
    fn set_priority(&mut self, priority: i32);

    /// Position of the scene currently being processed
    fn index(&self) -> usize;

    /// The bundle being processed (`None` for the finished sentinel)
    fn bundle(&self) -> Option<&SceneBundle>;

    /// Number of scenes that actually transitioned so far
    fn scenes_processed(&self) -> usize;
}

/// Per-item and completion callbacks owned by one operation
#[derive(Default)]
pub(crate) struct Callbacks {
    pub(crate) on_scene: Option<SceneCallback>,
    pub(crate) on_completed: Option<CompletedCallback>,
}

/// State shared by load and unload operations
pub(crate) struct Sequence<Op> {
    bundle: Option<SceneBundle>,
    index: usize,
    current: Option<Op>,
    done: bool,
    priority: i32,
    processed: usize,
    callbacks: Callbacks,
}

impl<Op: SubOperation> Sequence<Op> {
    pub(crate) fn new(bundle: SceneBundle, priority: i32, callbacks: Callbacks) -> Self {
        Self {
            bundle: Some(bundle),
            index: 0,
            current: None,
            done: false,
            priority,
            processed: 0,
            callbacks,
        }
    }

    /// Sentinel with no bundle, done at construction
    pub(crate) fn finished() -> Self {
        Self {
            bundle: None,
            index: 0,
            current: None,
            done: true,
            priority: 0,
            processed: 0,
            callbacks: Callbacks::default(),
        }
    }

    pub(crate) fn bundle(&self) -> Option<&SceneBundle> {
        self.bundle.as_ref()
    }

    pub(crate) fn name(&self) -> &str {
        self.bundle.as_ref().map_or("<none>", |b| b.name())
    }

    pub(crate) fn len(&self) -> usize {
        self.bundle.as_ref().map_or(0, SceneBundle::len)
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) fn priority(&self) -> i32 {
        self.priority
    }

    pub(crate) fn processed(&self) -> usize {
        self.processed
    }

    pub(crate) fn current(&self) -> Option<&Op> {
        self.current.as_ref()
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut Op> {
        self.current.as_mut()
    }

    /// The scene at `index`, or `None` once the bundle is exhausted
    pub(crate) fn pending_scene(&self) -> Option<SceneId> {
        if self.done {
            return None;
        }
        self.bundle.as_ref()?.scene(self.index).cloned()
    }

    pub(crate) fn progress(&self) -> f32 {
        if self.done {
            return 1.0;
        }
        let len = self.len();
        if len == 0 {
            return 0.0;
        }
        let sub = self.current.as_ref().map_or(0.0, |op| {
            let p = op.progress();
            if p.is_nan() {
                0.0
            } else {
                p.clamp(0.0, 1.0)
            }
        });
        ((self.index as f32 + sub) / len as f32).min(PROGRESS_CEILING)
    }

    pub(crate) fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
        if let Some(op) = self.current.as_mut() {
            op.set_priority(priority);
        }
    }

    /// Make a freshly started sub-operation current
    pub(crate) fn adopt(&mut self, mut op: Op) {
        op.set_priority(self.priority);
        debug!(
            "{}: started scene {}/{} (priority {})",
            self.name(),
            self.index + 1,
            self.len(),
            self.priority
        );
        self.current = Some(op);
    }

    /// Move past a scene whose transition was refused
    pub(crate) fn skip(&mut self) {
        if let Some(scene) = self.pending_scene() {
            debug!("{}: skipped {}", self.name(), scene);
        }
        self.index += 1;
    }

    /// Take the current sub-operation if the host has finished it
    ///
    /// Returns the scene it was transitioning.
    pub(crate) fn take_finished(&mut self) -> Option<SceneId> {
        if !self.current.as_ref().is_some_and(|op| op.is_done()) {
            return None;
        }
        self.current = None;
        self.pending_scene()
    }

    /// Report a transitioned scene and move to the next index
    pub(crate) fn complete_scene(&mut self, scene: &SceneId) {
        debug!("{}: finished {}", self.name(), scene);
        self.processed += 1;
        self.index += 1;
        if let Some(callback) = self.callbacks.on_scene.as_mut() {
            callback(scene);
        }
    }

    /// Mark the sequence done and fire the completion callback
    pub(crate) fn finish(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        self.current = None;
        debug!(
            "{}: done, {} of {} scenes transitioned",
            self.name(),
            self.processed,
            self.len()
        );
        if let (Some(callback), Some(bundle)) =
            (self.callbacks.on_completed.take(), self.bundle.as_ref())
        {
            callback(bundle);
        }
    }
}

impl<Op> fmt::Debug for Sequence<Op> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("bundle", &self.bundle.as_ref().map(SceneBundle::name))
            .field("index", &self.index)
            .field("in_flight", &self.current.is_some())
            .field("done", &self.done)
            .field("priority", &self.priority)
            .field("processed", &self.processed)
            .finish()
    }
}
