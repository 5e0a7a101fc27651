//! Loading a bundle, one scene after another
//!
//! Scenes the host refuses to load (already open, or not loadable at all)
//! are skipped without a callback. Two load-only behaviors sit on top of the
//! shared sequence:
//!
//! - **Activation deferral**: while the first scene is in flight, the caller
//!   can hold it "ready but inactive" at [`ACTIVATION_THRESHOLD`] through
//!   [`LoadBundleOperation::set_allow_first_activation`].
//! - **First-scene activation**: with [`LoadRequest::with_activate_first`],
//!   the first scene that actually loads becomes the active scene before its
//!   per-scene callback runs.

use crate::operation::{Callbacks, Sequence};
use crate::{
    BundleOperation, LoadParams, ResourceHost, SceneBundle, SceneId, SubOperation,
    ACTIVATION_THRESHOLD,
};
use log::warn;
use std::fmt;

/// Everything needed to start a [`LoadBundleOperation`]
///
/// Callbacks must be attached here: the first scenes may already be skipped,
/// or the whole bundle completed, while the operation is being started.
///
/// # Example
///
/// ```ignore
/// let op = LoadRequest::new(bundle)
///     .with_params(LoadParams::additive())
///     .with_activate_first(true)
///     .on_scene_loaded(|scene| println!("loaded {}", scene))
///     .on_completed(|bundle| println!("{} ready", bundle.name()))
///     .start(&mut host);
/// ```
pub struct LoadRequest {
    bundle: SceneBundle,
    params: LoadParams,
    activate_first: bool,
    allow_first_activation: bool,
    priority: i32,
    callbacks: Callbacks,
}

impl LoadRequest {
    /// Create a request with default parameters
    pub fn new(bundle: SceneBundle) -> Self {
        Self {
            bundle,
            params: LoadParams::default(),
            activate_first: false,
            allow_first_activation: true,
            priority: 0,
            callbacks: Callbacks::default(),
        }
    }

    /// Parameters forwarded to every scene load
    pub fn with_params(mut self, params: LoadParams) -> Self {
        self.params = params;
        self
    }

    /// Make the first loaded scene the active one
    pub fn with_activate_first(mut self, activate_first: bool) -> Self {
        self.activate_first = activate_first;
        self
    }

    /// Initial activation flag for the first scene (default `true`)
    pub fn with_allow_first_activation(mut self, allow: bool) -> Self {
        self.allow_first_activation = allow;
        self
    }

    /// Initial scheduling priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Called once for every scene that actually loaded, in bundle order
    pub fn on_scene_loaded(mut self, callback: impl FnMut(&SceneId) + 'static) -> Self {
        self.callbacks.on_scene = Some(Box::new(callback));
        self
    }

    /// Called once when the whole bundle is done
    pub fn on_completed(mut self, callback: impl FnOnce(&SceneBundle) + 'static) -> Self {
        self.callbacks.on_completed = Some(Box::new(callback));
        self
    }

    /// Start loading on `host`
    ///
    /// Leading scenes that are already loaded are skipped right away; if
    /// every scene is, the returned operation is already done.
    pub fn start<H: ResourceHost>(self, host: &mut H) -> LoadBundleOperation<H> {
        let mut op = LoadBundleOperation {
            seq: Sequence::new(self.bundle, self.priority, self.callbacks),
            params: self.params,
            activate_pending: self.activate_first,
            allow_first_activation: self.allow_first_activation,
        };
        op.start_next(host);
        op
    }
}

impl fmt::Debug for LoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadRequest")
            .field("bundle", &self.bundle.name())
            .field("params", &self.params)
            .field("activate_first", &self.activate_first)
            .field("allow_first_activation", &self.allow_first_activation)
            .field("priority", &self.priority)
            .finish()
    }
}

/// A bundle load in progress
pub struct LoadBundleOperation<H: ResourceHost> {
    seq: Sequence<H::Operation>,
    params: LoadParams,
    /// Set until the first loaded scene has been made active
    activate_pending: bool,
    allow_first_activation: bool,
}

impl<H: ResourceHost> LoadBundleOperation<H> {
    /// An operation with no bundle, already done
    pub fn finished() -> Self {
        Self {
            seq: Sequence::finished(),
            params: LoadParams::default(),
            activate_pending: false,
            allow_first_activation: true,
        }
    }

    /// Parameters used for each scene load
    pub fn params(&self) -> &LoadParams {
        &self.params
    }

    /// Current activation override for the first scene
    pub fn allow_first_activation(&self) -> bool {
        self.allow_first_activation
    }

    /// Hold or release activation of the first scene
    ///
    /// Forwarded to the in-flight sub-operation only while the first scene
    /// (`index == 0`) is loading; later scenes always activate.
    pub fn set_allow_first_activation(&mut self, allow: bool) {
        self.allow_first_activation = allow;
        if self.seq.index() == 0 {
            if let Some(op) = self.seq.current_mut() {
                op.set_allow_activation(allow);
            }
        }
    }

    /// Whether the first scene is loaded up to the activation point
    pub fn first_scene_ready(&self) -> bool {
        self.seq.index() == 0
            && self
                .seq
                .current()
                .is_some_and(|op| op.progress() >= ACTIVATION_THRESHOLD)
    }

    /// Skip refused scenes until one starts loading or the bundle runs out
    fn start_next(&mut self, host: &mut H) {
        while let Some(scene) = self.seq.pending_scene() {
            if let Some(mut op) = host.start_load(&scene, &self.params) {
                op.set_allow_activation(self.seq.index() > 0 || self.allow_first_activation);
                self.seq.adopt(op);
                return;
            }
            self.seq.skip();
        }
        self.seq.finish();
    }
}

impl<H: ResourceHost> BundleOperation<H> for LoadBundleOperation<H> {
    fn poll(&mut self, host: &mut H) -> bool {
        if let Some(scene) = self.seq.take_finished() {
            // Listeners of the scene callback must see the new active scene
            if self.activate_pending {
                self.activate_pending = false;
                if !host.set_active_scene(&scene) {
                    warn!("{}: host refused to activate {}", self.seq.name(), scene);
                }
            }
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

impl<H: ResourceHost> fmt::Debug for LoadBundleOperation<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadBundleOperation")
            .field("seq", &self.seq)
            .field("params", &self.params)
            .field("activate_pending", &self.activate_pending)
            .field("allow_first_activation", &self.allow_first_activation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedHost;
    use crate::EnvironmentQuery;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Record scene callbacks and completions into a shared log
    fn recording(bundle: SceneBundle, log: &Rc<RefCell<Vec<String>>>) -> LoadRequest {
        let scenes = log.clone();
        let done = log.clone();
        LoadRequest::new(bundle)
            .on_scene_loaded(move |scene| scenes.borrow_mut().push(format!("scene:{}", scene)))
            .on_completed(move |bundle| done.borrow_mut().push(format!("done:{}", bundle.name())))
    }

    #[test]
    fn test_loads_in_order() {
        let mut host = ScriptedHost::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut op = recording(SceneBundle::new("abc", ["a", "b", "c"]), &log).start(&mut host);

        let mut progress = vec![op.progress()];
        for _ in 0..3 {
            assert!(!op.is_done());
            host.finish_latest();
            op.poll(&mut host);
            progress.push(op.progress());
        }

        assert!(op.is_done());
        assert_eq!(
            *log.borrow(),
            vec!["scene:a", "scene:b", "scene:c", "done:abc"]
        );
        assert_eq!(progress[0], 0.0);
        assert!((progress[1] - 1.0 / 3.0).abs() < 1e-6);
        assert!((progress[2] - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(progress[3], 1.0);
        assert!(progress.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_skips_already_loaded() {
        let mut host = ScriptedHost::with_open(&["a"]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut op = recording(SceneBundle::new("ab", ["a", "b"]), &log).start(&mut host);

        assert_eq!(op.index(), 1);
        assert_eq!(op.progress(), 0.5);
        host.latest().set_progress(0.5);
        assert_eq!(op.progress(), 0.75);

        host.finish_latest();
        assert!(op.poll(&mut host));
        assert_eq!(*log.borrow(), vec!["scene:b", "done:ab"]);
        assert_eq!(host.started_scenes(), vec!["b"]);
        assert_eq!(op.scenes_processed(), 1);
    }

    #[test]
    fn test_all_loaded_completes_synchronously() {
        let mut host = ScriptedHost::with_open(&["a", "b"]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let op = recording(SceneBundle::new("ab", ["a", "b"]), &log).start(&mut host);

        assert!(op.is_done());
        assert_eq!(op.progress(), 1.0);
        assert_eq!(*log.borrow(), vec!["done:ab"]);
        assert!(host.started().is_empty());
    }

    #[test]
    fn test_empty_bundle_completes_once() {
        let mut host = ScriptedHost::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut op =
            recording(SceneBundle::new("none", Vec::<SceneId>::new()), &log).start(&mut host);

        assert!(op.is_done());
        assert!(op.poll(&mut host));
        assert!(op.poll(&mut host));
        assert_eq!(*log.borrow(), vec!["done:none"]);
    }

    #[test]
    fn test_unloadable_scene_is_skipped() {
        let mut host = ScriptedHost::new();
        host.break_scene("b");
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut op = recording(SceneBundle::new("abc", ["a", "b", "c"]), &log).start(&mut host);

        host.finish_latest();
        op.poll(&mut host);
        assert_eq!(op.index(), 2);
        host.finish_latest();
        op.poll(&mut host);

        assert!(op.is_done());
        assert_eq!(*log.borrow(), vec!["scene:a", "scene:c", "done:abc"]);
    }

    #[test]
    fn test_poll_before_completion_is_noop() {
        let mut host = ScriptedHost::new();
        let mut op = LoadRequest::new(SceneBundle::new("ab", ["a", "b"])).start(&mut host);

        host.latest().set_progress(0.4);
        assert!(!op.poll(&mut host));
        assert!(!op.poll(&mut host));
        assert_eq!(op.index(), 0);
        assert_eq!(host.started().len(), 1);
    }

    #[test]
    fn test_priority_forwarding() {
        let mut host = ScriptedHost::new();
        let mut op = LoadRequest::new(SceneBundle::new("five", ["a", "b", "c", "d", "e"]))
            .with_priority(1)
            .start(&mut host);
        assert_eq!(host.latest().priority(), 1);

        for _ in 0..2 {
            host.finish_latest();
            op.poll(&mut host);
        }
        assert_eq!(op.index(), 2);

        op.set_priority(9);
        assert_eq!(op.priority(), 9);
        assert_eq!(host.latest().priority(), 9);

        host.finish_latest();
        op.poll(&mut host);
        assert_eq!(op.index(), 3);
        assert_eq!(host.latest().scene(), SceneId::new("d"));
        assert_eq!(host.latest().priority(), 9);
    }

    #[test]
    fn test_activate_first_before_scene_callback() {
        let mut host = ScriptedHost::new();
        let events = host.events.clone();
        let scenes = events.clone();
        let mut op = LoadRequest::new(SceneBundle::new("ab", ["a", "b"]))
            .with_activate_first(true)
            .on_scene_loaded(move |scene| scenes.borrow_mut().push(format!("scene:{}", scene)))
            .start(&mut host);

        while !op.is_done() {
            host.finish_latest();
            op.poll(&mut host);
        }

        assert_eq!(*events.borrow(), vec!["active:a", "scene:a", "scene:b"]);
        assert_eq!(host.active_scene(), Some(SceneId::new("a")));
    }

    #[test]
    fn test_activate_first_uses_first_started_scene() {
        let mut host = ScriptedHost::with_open(&["a"]);
        let mut op = LoadRequest::new(SceneBundle::new("abc", ["a", "b", "c"]))
            .with_activate_first(true)
            .start(&mut host);

        while !op.is_done() {
            host.finish_latest();
            op.poll(&mut host);
        }
        assert_eq!(host.active_scene(), Some(SceneId::new("b")));
    }

    #[test]
    fn test_without_activate_first_leaves_active_scene() {
        let mut host = ScriptedHost::new();
        let mut op = LoadRequest::new(SceneBundle::new("a", ["a"])).start(&mut host);
        host.finish_latest();
        op.poll(&mut host);
        assert!(op.is_done());
        assert_eq!(host.active_scene(), None);
    }

    #[test]
    fn test_activation_deferral() {
        let mut host = ScriptedHost::new();
        let mut op = LoadRequest::new(SceneBundle::new("ab", ["a", "b"]))
            .with_allow_first_activation(false)
            .start(&mut host);

        let first = host.latest();
        assert!(!first.allow_activation());
        assert!(!op.first_scene_ready());

        first.set_progress(ACTIVATION_THRESHOLD);
        assert!(op.first_scene_ready());

        op.set_allow_first_activation(true);
        assert!(first.allow_activation());

        host.finish_latest();
        op.poll(&mut host);
        assert_eq!(op.index(), 1);
        assert!(!op.first_scene_ready());

        // Only the first scene is gated
        op.set_allow_first_activation(false);
        assert!(host.latest().allow_activation());
    }

    #[test]
    fn test_deferral_dropped_when_first_scene_skipped() {
        let mut host = ScriptedHost::with_open(&["a"]);
        let mut op = LoadRequest::new(SceneBundle::new("ab", ["a", "b"]))
            .with_allow_first_activation(false)
            .start(&mut host);

        assert_eq!(op.index(), 1);
        assert!(host.latest().allow_activation());

        host.latest().set_progress(ACTIVATION_THRESHOLD);
        assert!(!op.first_scene_ready());

        op.set_allow_first_activation(false);
        assert!(host.latest().allow_activation());
    }

    #[test]
    fn test_later_scenes_always_allow_activation() {
        let mut host = ScriptedHost::new();
        let mut op = LoadRequest::new(SceneBundle::new("ab", ["a", "b"]))
            .with_allow_first_activation(false)
            .start(&mut host);

        op.set_allow_first_activation(true);
        host.finish_latest();
        op.poll(&mut host);
        assert!(host.latest().allow_activation());
    }

    #[test]
    fn test_finished_sentinel() {
        let mut host = ScriptedHost::new();
        let mut op = LoadBundleOperation::<ScriptedHost>::finished();
        assert!(op.is_done());
        assert_eq!(op.progress(), 1.0);
        assert!(op.bundle().is_none());
        assert!(op.poll(&mut host));
        assert!(host.started().is_empty());
    }
}
