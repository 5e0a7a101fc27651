//! Bundleflow Host - In-memory scene host for bundle operations
//!
//! This crate provides an executable stand-in for an engine's scene manager,
//! so bundle operations can be driven end-to-end without a real engine.
//!
//! ## Architecture
//!
//! ```text
//! SimHost (owns open scenes + active slot)
//!  │
//!  ├── SceneCatalog ← known scenes and their tick costs
//!  │
//!  ├── pending: SimOperation[] ← shared handles, advanced by tick()
//!  │
//!  └── implements bundleflow_core::ResourceHost
//!        └── Load/UnloadBundleOperation poll it once per tick
//! ```
//!
//! ## Key Components
//!
//! - [`SimHost`]: scene state, transition scheduler, drive loops
//! - [`SimOperation`]: handle for one scene transition
//! - [`SceneCatalog`]: scenes the host can load, with their costs
//! - [`HostConfig`]: scheduler throughput and default costs

mod catalog;
mod config;
mod drive;
mod error;
mod host;
mod operation;

pub use catalog::{SceneCatalog, SceneCost};
pub use config::HostConfig;
pub use error::{Error, Result};
pub use host::{Completed, SimHost, TickResult};
pub use operation::{OperationId, SimOperation, Transition};
