//! Error types shared across the workspace.

use thiserror::Error;

/// Core error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Chunk coordinate cannot be packed into a 32-bit key
    #[error("chunk coordinate ({x}, {y}) is outside the packable range [-32768, 32767]")]
    CoordOutOfRange { x: i32, y: i32 },

    /// Configuration value rejected by validation
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, CoreError>;
