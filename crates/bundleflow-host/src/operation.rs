//! SimOperation - shared handle for one scene transition
//!
//! The host keeps one clone of each handle in its pending queue and gives
//! the other to the caller. Both observe the same state; everything runs on
//! one thread, inside the host's tick.

use bundleflow_core::{LoadParams, SceneId, SubOperation, UnloadOptions, ACTIVATION_THRESHOLD};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Unique identifier for a transition started by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(pub u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op:{}", self.0)
    }
}

/// What a transition does to its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Load with these parameters
    Load(LoadParams),
    /// Unload with these options
    Unload(UnloadOptions),
}

impl Transition {
    /// Check if this is a load
    pub fn is_load(&self) -> bool {
        matches!(self, Transition::Load(_))
    }
}

#[derive(Debug)]
struct State {
    id: OperationId,
    scene: SceneId,
    transition: Transition,
    cost: u32,
    elapsed: u32,
    progress: f32,
    done: bool,
    priority: i32,
    allow_activation: bool,
}

/// Handle for one scene transition on a [`SimHost`](crate::SimHost)
#[derive(Clone)]
pub struct SimOperation {
    state: Rc<RefCell<State>>,
}

impl SimOperation {
    pub(crate) fn new(id: OperationId, scene: SceneId, transition: Transition, cost: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                id,
                scene,
                transition,
                cost: cost.max(1),
                elapsed: 0,
                progress: 0.0,
                done: false,
                priority: 0,
                allow_activation: true,
            })),
        }
    }

    /// Identifier assigned by the host
    pub fn id(&self) -> OperationId {
        self.state.borrow().id
    }

    /// Scene being transitioned
    pub fn scene(&self) -> SceneId {
        self.state.borrow().scene.clone()
    }

    /// Load or unload
    pub fn transition(&self) -> Transition {
        self.state.borrow().transition
    }

    /// Whether a load is parked at the activation point
    pub fn is_held(&self) -> bool {
        let state = self.state.borrow();
        state.transition.is_load()
            && !state.done
            && !state.allow_activation
            && state.elapsed >= state.cost
    }

    /// Run one tick of work. Returns true when the transition completes.
    pub(crate) fn advance(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.done {
            return false;
        }
        if state.elapsed < state.cost {
            state.elapsed += 1;
        }
        let fraction = state.elapsed as f32 / state.cost as f32;
        let finished = match state.transition {
            // Loading fills [0, threshold]; the switch-in needs activation
            Transition::Load(_) => {
                state.progress = ACTIVATION_THRESHOLD * fraction;
                state.elapsed >= state.cost && state.allow_activation
            }
            Transition::Unload(_) => {
                state.progress = fraction;
                state.elapsed >= state.cost
            }
        };
        if finished {
            state.progress = 1.0;
            state.done = true;
        }
        finished
    }
}

impl SubOperation for SimOperation {
    fn progress(&self) -> f32 {
        self.state.borrow().progress
    }

    fn is_done(&self) -> bool {
        self.state.borrow().done
    }

    fn priority(&self) -> i32 {
        self.state.borrow().priority
    }

    fn set_priority(&mut self, priority: i32) {
        self.state.borrow_mut().priority = priority;
    }

    fn allow_activation(&self) -> bool {
        self.state.borrow().allow_activation
    }

    fn set_allow_activation(&mut self, allow: bool) {
        self.state.borrow_mut().allow_activation = allow;
    }
}

impl fmt::Debug for SimOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SimOperation")
            .field("id", &state.id)
            .field("scene", &state.scene)
            .field("transition", &state.transition)
            .field("progress", &state.progress)
            .field("done", &state.done)
            .field("priority", &state.priority)
            .finish()
    }
}
