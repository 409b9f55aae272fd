//! AES-256-GCM authenticated envelopes.
//!
//! Blob layout: 96-bit IV ‖ ciphertext ‖ 16-byte tag. The IV is random per
//! encryption; the tag authenticates the whole ciphertext, so any tamper or
//! wrong key surfaces as [`SealError::AuthenticationFailure`].

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use crate::error::{Result, SealError};
use crate::key::ViewingKey;

/// IV length in bytes (96 bits, the GCM standard nonce size).
pub const IV_LEN: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt plaintext under a viewing key.
///
/// Returns the raw blob `IV ‖ ciphertext ‖ tag`.
pub fn seal(plaintext: &[u8], key: &ViewingKey) -> Vec<u8> {
    // new_from_slice only fails on wrong key length; ViewingKey is always
    // 32 bytes.
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .expect("viewing key is exactly 256 bits");

    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    let nonce = Nonce::from_slice(&iv);

    // Encryption in GCM is infallible for any plaintext length we accept.
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .expect("AES-256-GCM encryption cannot fail");

    let mut blob = Vec::with_capacity(IV_LEN + ciphertext.len());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);
    blob
}

/// Decrypt and authenticate a raw blob.
///
/// A failed tag check means wrong key or tampered ciphertext; the caller
/// cannot distinguish the two, by design of the AEAD.
pub fn open(blob: &[u8], key: &ViewingKey) -> Result<Vec<u8>> {
    if blob.len() < IV_LEN + TAG_LEN {
        return Err(SealError::MalformedBlob(format!(
            "blob too short: {} bytes",
            blob.len()
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .expect("viewing key is exactly 256 bits");

    let (iv, ciphertext) = blob.split_at(IV_LEN);
    let nonce = Nonce::from_slice(iv);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| SealError::AuthenticationFailure)
}
