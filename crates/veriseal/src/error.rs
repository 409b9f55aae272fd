//! Error types for the Veriseal facade.

use thiserror::Error;

use veriseal_core::CoreError;
use veriseal_certify::CertifyError;
use veriseal_seal::SealError;

/// Errors that can occur during facade operations.
///
/// Per-receipt verification outcomes are never errors; they are reported
/// through [`crate::trust::TrustReport`]. This enum covers collaborator
/// failures and structurally invalid inputs only.
#[derive(Debug, Error)]
pub enum VerisealError {
    /// Core payload error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Confidentiality layer error.
    #[error("seal error: {0}")]
    Seal(#[from] SealError),

    /// Certification error.
    #[error("certification error: {0}")]
    Certify(#[from] CertifyError),

    /// The payload store failed.
    #[error("payload store error: {0}")]
    Store(String),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, VerisealError>;
