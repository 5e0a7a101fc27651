//! Error types for bundleflow-host

use bundleflow_core::SceneId;
use thiserror::Error;

/// Result type for bundleflow-host operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bundleflow-host
#[derive(Debug, Error)]
pub enum Error {
    /// Scene not registered in the catalog
    #[error("scene {0} is not in the catalog")]
    UnknownScene(SceneId),

    /// An operation did not finish within its tick budget
    ///
    /// Usually a load whose activation is held back and never released.
    #[error("operation still pending after {ticks} ticks")]
    Stalled {
        /// Ticks spent before giving up
        ticks: u64,
    },

    /// Core error
    #[error("core error: {0}")]
    Core(#[from] bundleflow_core::Error),
}
