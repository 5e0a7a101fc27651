//! Unloading a bundle, one scene after another
//!
//! A scene is skipped when the host refuses to unload it (already closed).
//! On top of that, the operation never unloads the last scene open in the
//! whole host: before every attempt, including the first, it checks the
//! global open-scene count, and once only one scene remains it stops and
//! completes without looking at the rest of the bundle.

use crate::operation::{Callbacks, Sequence};
use crate::{BundleOperation, ResourceHost, SceneBundle, SceneId, UnloadOptions};
use log::info;
use std::fmt;

/// Everything needed to start an [`UnloadBundleOperation`]
pub struct UnloadRequest {
    bundle: SceneBundle,
    options: UnloadOptions,
    priority: i32,
    callbacks: Callbacks,
}

impl UnloadRequest {
    /// Create a request with default options
    pub fn new(bundle: SceneBundle) -> Self {
        Self {
            bundle,
            options: UnloadOptions::default(),
            priority: 0,
            callbacks: Callbacks::default(),
        }
    }

    /// Options forwarded to every scene unload
    pub fn with_options(mut self, options: UnloadOptions) -> Self {
        self.options = options;
        self
    }

    /// Initial scheduling priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Called once for every scene that actually unloaded, in bundle order
    pub fn on_scene_unloaded(mut self, callback: impl FnMut(&SceneId) + 'static) -> Self {
        self.callbacks.on_scene = Some(Box::new(callback));
        self
    }

    /// Called once when the operation is done, including an early stop
    pub fn on_completed(mut self, callback: impl FnOnce(&SceneBundle) + 'static) -> Self {
        self.callbacks.on_completed = Some(Box::new(callback));
        self
    }

    /// Start unloading on `host`
    pub fn start<H: ResourceHost>(self, host: &mut H) -> UnloadBundleOperation<H> {
        let mut op = UnloadBundleOperation {
            seq: Sequence::new(self.bundle, self.priority, self.callbacks),
            options: self.options,
            stopped_early: false,
        };
        op.start_next(host);
        op
    }
}

impl fmt::Debug for UnloadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnloadRequest")
            .field("bundle", &self.bundle.name())
            .field("options", &self.options)
            .field("priority", &self.priority)
            .finish()
    }
}

/// A bundle unload in progress
pub struct UnloadBundleOperation<H: ResourceHost> {
    seq: Sequence<H::Operation>,
    options: UnloadOptions,
    stopped_early: bool,
}

impl<H: ResourceHost> UnloadBundleOperation<H> {
    /// An operation with no bundle, already done
    pub fn finished() -> Self {
        Self {
            seq: Sequence::finished(),
            options: UnloadOptions::default(),
            stopped_early: false,
        }
    }

    /// Options used for each scene unload
    pub fn options(&self) -> UnloadOptions {
        self.options
    }

    /// Whether the last-open-scene guard ended the operation
    ///
    /// The scenes from [`index`](BundleOperation::index) onwards were never
    /// attempted.
    pub fn stopped_early(&self) -> bool {
        self.stopped_early
    }

    fn start_next(&mut self, host: &mut H) {
        while let Some(scene) = self.seq.pending_scene() {
            if host.open_scene_count() <= 1 {
                info!(
                    "{}: keeping {} open, it is the last open scene",
                    self.seq.name(),
                    scene
                );
                self.stopped_early = true;
                break;
            }
            if let Some(op) = host.start_unload(&scene, self.options) {
                self.seq.adopt(op);
                return;
            }
            self.seq.skip();
        }
        self.seq.finish();
    }
}

impl<H: ResourceHost> BundleOperation<H> for UnloadBundleOperation<H> {
    fn poll(&mut self, host: &mut H) -> bool {
        if let Some(scene) = self.seq.take_finished() {
            self.seq.complete_scene(&scene);
            self.start_next(host);
        }
        self.seq.is_done()
    }

    fn is_done(&self) -> bool {
        self.seq.is_done()
    }

    fn progress(&self) -> f32 {
        self.seq.progress()
    }

    fn priority(&self) -> i32 {
        self.seq.priority()
    }

    fn set_priority(&mut self, priority: i32) {
        self.seq.set_priority(priority);
    }

    fn index(&self) -> usize {
        self.seq.index()
    }

    fn bundle(&self) -> Option<&SceneBundle> {
        self.seq.bundle()
    }

    fn scenes_processed(&self) -> usize {
        self.seq.processed()
    }
}

impl<H: ResourceHost> fmt::Debug for UnloadBundleOperation<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnloadBundleOperation")
            .field("seq", &self.seq)
            .field("options", &self.options)
            .field("stopped_early", &self.stopped_early)
            .finish()
    }
}
