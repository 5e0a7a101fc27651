//! Scripted host for unit tests
//!
//! Sub-operations only move when a test moves them, so each scenario can
//! step through exact progress values and completion points.

use crate::{
    EnvironmentMutator, EnvironmentQuery, LoadParams, ResourceHost, SceneId, SubOperation,
    UnloadOptions,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Load,
    Unload,
}

#[derive(Debug)]
struct OpState {
    scene: SceneId,
    kind: Kind,
    progress: f32,
    done: bool,
    priority: i32,
    allow_activation: bool,
}

/// Shared handle; clones observe the same state
#[derive(Debug, Clone)]
pub(crate) struct ScriptedOp(Rc<RefCell<OpState>>);

impl ScriptedOp {
    fn new(scene: &str, kind: Kind) -> Self {
        Self(Rc::new(RefCell::new(OpState {
            scene: SceneId::new(scene),
            kind,
            progress: 0.0,
            done: false,
            priority: 0,
            allow_activation: true,
        })))
    }

    pub(crate) fn load(scene: &str) -> Self {
        Self::new(scene, Kind::Load)
    }

    pub(crate) fn scene(&self) -> SceneId {
        self.0.borrow().scene.clone()
    }

    pub(crate) fn kind(&self) -> Kind {
        self.0.borrow().kind
    }

    pub(crate) fn set_progress(&self, progress: f32) {
        self.0.borrow_mut().progress = progress;
    }

    pub(crate) fn finish(&self) {
        let mut state = self.0.borrow_mut();
        state.progress = 1.0;
        state.done = true;
    }
}

impl SubOperation for ScriptedOp {
    fn progress(&self) -> f32 {
        self.0.borrow().progress
    }

    fn is_done(&self) -> bool {
        self.0.borrow().done
    }

    fn priority(&self) -> i32 {
        self.0.borrow().priority
    }

    fn set_priority(&mut self, priority: i32) {
        self.0.borrow_mut().priority = priority;
    }

    fn allow_activation(&self) -> bool {
        self.0.borrow().allow_activation
    }

    fn set_allow_activation(&mut self, allow: bool) {
        self.0.borrow_mut().allow_activation = allow;
    }
}

/// Host whose sub-operations are moved by hand
#[derive(Debug, Default)]
pub(crate) struct ScriptedHost {
    open: Vec<SceneId>,
    active: Option<SceneId>,
    broken: HashSet<SceneId>,
    started: Vec<ScriptedOp>,
    /// Shared event log: host writes `active:<scene>`, tests may add their own
    pub(crate) events: Rc<RefCell<Vec<String>>>,
}

impl ScriptedHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Host with these scenes already open
    pub(crate) fn with_open(scenes: &[&str]) -> Self {
        let mut host = Self::new();
        host.open = scenes.iter().map(|s| SceneId::new(*s)).collect();
        host
    }

    /// Make every transition of `scene` refused
    pub(crate) fn break_scene(&mut self, scene: &str) {
        self.broken.insert(SceneId::new(scene));
    }

    pub(crate) fn is_open(&self, scene: &str) -> bool {
        self.open.iter().any(|s| s.as_str() == scene)
    }

    /// Every sub-operation handed out, in start order
    pub(crate) fn started(&self) -> &[ScriptedOp] {
        &self.started
    }

    pub(crate) fn started_scenes(&self) -> Vec<String> {
        self.started.iter().map(|op| op.scene().0).collect()
    }

    /// The most recently started sub-operation
    pub(crate) fn latest(&self) -> ScriptedOp {
        self.started.last().cloned().expect("no sub-operation started")
    }

    /// Finish the latest sub-operation and apply its effect
    pub(crate) fn finish_latest(&mut self) {
        let op = self.latest();
        op.finish();
        let scene = op.scene();
        match op.kind() {
            Kind::Load => self.open.push(scene),
            Kind::Unload => self.open.retain(|s| *s != scene),
        }
    }
}

impl EnvironmentQuery for ScriptedHost {
    fn open_scene_count(&self) -> usize {
        self.open.len()
    }

    fn active_scene(&self) -> Option<SceneId> {
        self.active.clone()
    }
}

impl EnvironmentMutator for ScriptedHost {
    fn set_active_scene(&mut self, scene: &SceneId) -> bool {
        if !self.open.contains(scene) {
            return false;
        }
        self.events.borrow_mut().push(format!("active:{}", scene));
        self.active = Some(scene.clone());
        true
    }
}

impl ResourceHost for ScriptedHost {
    type Operation = ScriptedOp;

    fn start_load(&mut self, scene: &SceneId, _params: &LoadParams) -> Option<ScriptedOp> {
        if self.broken.contains(scene) || self.open.contains(scene) {
            return None;
        }
        let op = ScriptedOp::new(scene.as_str(), Kind::Load);
        self.started.push(op.clone());
        Some(op)
    }

    fn start_unload(&mut self, scene: &SceneId, _options: UnloadOptions) -> Option<ScriptedOp> {
        if self.broken.contains(scene) || !self.open.contains(scene) {
            return None;
        }
        let op = ScriptedOp::new(scene.as_str(), Kind::Unload);
        self.started.push(op.clone());
        Some(op)
    }
}
