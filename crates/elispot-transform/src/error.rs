//! Error types for elispot-transform

use thiserror::Error;

/// Errors that can occur during rescaling
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] elispot_core::Error),

    /// Unsupported pixel depth for this operation
    #[error("unsupported depth: {0} bpp (expected 8 or 32)")]
    UnsupportedDepth(u32),

    /// Invalid target size
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
