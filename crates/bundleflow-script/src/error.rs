//! Error types for bundleflow-script

use thiserror::Error;

/// Manifest loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Duplicate definition: {0}")]
    DuplicateDefinition(String),

    #[error("Bundle {bundle:?} references unknown scene {scene:?}")]
    UnknownScene { bundle: String, scene: String },

    #[error("Invalid bundle: {0}")]
    Bundle(#[from] bundleflow_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
