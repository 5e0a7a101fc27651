//! Schema definitions for RON manifests

pub mod bundle;
pub mod scene;

pub use bundle::BundleDef;
pub use scene::SceneDef;
