//! Binding encrypted blobs to the signed hash commitments.
//!
//! The signature covers `sha256(plaintext)`, never the blob. Checking
//! `sha256(open(blob, key)) == hashes.X_sha256` is what lets the signature
//! transitively authenticate plaintext it never directly saw. A blob that
//! decrypts cleanly but fails this check has been substituted.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use veriseal_core::{EncryptedFields, ReceiptPayload, Sha256Hash};

use crate::envelope::{open, seal};
use crate::error::{Result, SealError};
use crate::key::ViewingKey;

/// Encrypt raw input and output text into the wire-shaped addendum.
///
/// The caller must pass the same strings whose hashes went into the signed
/// payload, or the binding invariant will not hold for readers.
pub fn seal_fields(input: &str, output: &str, key: &ViewingKey) -> EncryptedFields {
    EncryptedFields {
        encrypted_input: BASE64.encode(seal(input.as_bytes(), key)),
        encrypted_output: BASE64.encode(seal(output.as_bytes(), key)),
    }
}

/// Open one base64 blob and verify it against a signed hash commitment.
///
/// Failure modes, in order of detection:
/// - [`SealError::MalformedBlob`]: bad base64, short blob, or non-UTF-8
///   plaintext
/// - [`SealError::AuthenticationFailure`]: wrong key or tampered ciphertext
/// - [`SealError::HashMismatch`]: decrypts fine, but the content is not
///   what was signed
pub fn open_bound(blob_b64: &str, key: &ViewingKey, expected: &Sha256Hash) -> Result<String> {
    let blob = BASE64
        .decode(blob_b64)
        .map_err(|e| SealError::MalformedBlob(format!("bad base64: {e}")))?;

    let plaintext = open(&blob, key)?;

    let actual = Sha256Hash::hash(&plaintext);
    if actual != *expected {
        return Err(SealError::HashMismatch {
            expected: expected.to_hex(),
            actual: actual.to_hex(),
        });
    }

    String::from_utf8(plaintext).map_err(|_| SealError::MalformedBlob("plaintext not UTF-8".into()))
}

/// Open both fields of a receipt's encrypted addendum against its signed
/// payload. Returns `(input, output)`.
pub fn open_receipt_fields(
    fields: &EncryptedFields,
    key: &ViewingKey,
    payload: &ReceiptPayload,
) -> Result<(String, String)> {
    let input = open_bound(&fields.encrypted_input, key, &payload.hashes.input_sha256)?;
    let output = open_bound(&fields.encrypted_output, key, &payload.hashes.output_sha256)?;
    Ok((input, output))
}
