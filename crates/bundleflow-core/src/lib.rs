//! Bundleflow Core - Sequential load/unload of scene bundles
//!
//! A bundle is an ordered list of scenes. Loading or unloading it runs one
//! host transition at a time, in bundle order, behind a single composite
//! handle with aggregated progress, a forwarded priority, per-scene and
//! completion callbacks, and (for loads) activation deferral.
//!
//! ## Architecture
//!
//! ```text
//! LoadRequest / UnloadRequest ──start(host)──▶ Load/UnloadBundleOperation
//!                                                   │
//!                                                   ├── Sequence (index, current, priority, callbacks)
//!                                                   │
//!                                                   └── ResourceHost (trait) ← the only view of the host
//!                                                        ├── start_load / start_unload → SubOperation | refused
//!                                                        └── EnvironmentQuery / EnvironmentMutator
//! ```
//!
//! ## Driving an operation
//!
//! Everything is single-threaded and poll-driven. Once per scheduler tick the
//! driver calls [`BundleOperation::poll`]; when the current sub-operation has
//! finished, `poll` fires the scene callback, skips scenes that are already in
//! the target state, and starts the next transition or completes.
//!
//! Refused transitions are never errors. A scene that is already loaded (or
//! cannot be loaded) is skipped without a callback.

mod bundle;
mod error;
mod host;
mod identity;
mod load;
pub mod operation;
mod options;
mod unload;
mod wait;

#[cfg(test)]
mod testing;

pub use bundle::SceneBundle;
pub use error::{Error, Result};
pub use host::{EnvironmentMutator, EnvironmentQuery, ResourceHost, SubOperation};
pub use identity::SceneId;
pub use load::{LoadBundleOperation, LoadRequest};
pub use operation::{BundleOperation, CompletedCallback, SceneCallback};
pub use options::{LoadMode, LoadParams, LocalPhysicsMode, UnloadOptions, ACTIVATION_THRESHOLD};
pub use unload::{UnloadBundleOperation, UnloadRequest};
pub use wait::WaitUntil;
