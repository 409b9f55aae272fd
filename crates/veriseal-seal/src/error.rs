//! Error types for the confidentiality layer.
//!
//! The three failure modes of opening a bound blob are deliberately
//! distinguishable: wrong key and tampered ciphertext surface as
//! `AuthenticationFailure`, a well-formed blob whose plaintext disagrees
//! with the signed commitment surfaces as `HashMismatch`.

use thiserror::Error;

/// Errors from viewing keys and authenticated envelopes.
#[derive(Debug, Error)]
pub enum SealError {
    /// Key material is not a valid encoded 256-bit viewing key.
    #[error("invalid viewing key: {0}")]
    InvalidKey(String),

    /// AEAD tag verification failed: wrong key or tampered ciphertext.
    #[error("authentication failure: wrong key or tampered ciphertext")]
    AuthenticationFailure,

    /// Blob is structurally broken (too short, bad base64, not UTF-8).
    #[error("malformed blob: {0}")]
    MalformedBlob(String),

    /// Decryption succeeded but the plaintext disagrees with the signed
    /// hash commitment. Indicates blob substitution.
    #[error("hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
}

/// Result type for seal operations.
pub type Result<T> = std::result::Result<T, SealError>;
