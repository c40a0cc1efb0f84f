//! Error types for world streaming.

use thiserror::Error;
use voxcraft_core::CoreError;

/// Errors raised while setting up streaming.
#[derive(Error, Debug)]
pub enum WorldError {
    /// Configuration rejected by validation
    #[error(transparent)]
    Config(#[from] CoreError),

    /// Worker pool could not be created
    #[error("Failed to build chunk worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, WorldError>;
