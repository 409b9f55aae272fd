//! Error types for batch certification.

use thiserror::Error;

/// Errors from Merkle tree construction and anchoring.
#[derive(Debug, Error)]
pub enum CertifyError {
    /// A batch must contain at least one receipt.
    #[error("cannot build a Merkle tree from an empty leaf set")]
    EmptyLeafSet,

    /// The requested leaf is not part of this batch.
    #[error("leaf not in batch: {0}")]
    LeafNotFound(String),

    /// The anchor service rejected or failed the submission.
    #[error("anchor submission failed: {0}")]
    Anchor(String),
}

/// Result type for certification operations.
pub type Result<T> = std::result::Result<T, CertifyError>;
