//! Bundleflow Script - RON manifests for scene catalogs and bundles
//!
//! Loads host content from RON files:
//! - Scene definitions with tick costs and initial open state
//! - Bundle definitions with load parameters

mod error;
mod loader;
pub mod schema;

pub use error::{Error, Result};
pub use loader::{Loader, Manifest};
pub use schema::{BundleDef, SceneDef};
