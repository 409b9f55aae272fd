//! Error types for Veriseal Core.

use thiserror::Error;

/// Core errors that can occur during payload operations.
///
/// Note that an invalid signature is *not* in this taxonomy: signature
/// verification returns `false` because a bad signature is an expected
/// outcome, not an exceptional one.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("unsupported schema version: {0}")]
    UnsupportedVersion(u8),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}
