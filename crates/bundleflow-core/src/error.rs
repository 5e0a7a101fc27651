//! Error types for bundleflow-core
//!
//! The controller itself never fails: a refused transition is skipped and
//! the unload guard stops silently. These errors only cover building the
//! inputs an operation is started from.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid scene id: {0:?}")]
    InvalidSceneId(String),

    #[error("Bundle {0:?} has no scenes")]
    EmptyBundle(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
