//! Error types for the content kernel.

use cord_content_core::{CoreError, VerificationError};
use thiserror::Error;

/// Errors that can occur during kernel operations.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Malformed content, identifier or key failure.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Evidence handed to `issue` does not verify.
    #[error("evidence {index} does not verify ({} errors)", errors.len())]
    InvalidEvidence {
        index: usize,
        errors: Vec<VerificationError>,
    },
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
