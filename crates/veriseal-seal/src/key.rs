//! Viewing keys: 256-bit symmetric secrets held only by authorized readers.
//!
//! A viewing key travels in a URL fragment and is never sent to any server.
//! The persistence layer stores only the key's SHA-256 fingerprint, which
//! lets a holder pre-check a key before attempting decryption.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use std::fmt;

use veriseal_core::Sha256Hash;

use crate::error::SealError;

/// A 256-bit symmetric viewing key.
#[derive(Clone, PartialEq, Eq)]
pub struct ViewingKey([u8; 32]);

impl ViewingKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encode as URL-fragment-safe base64 (no padding).
    ///
    /// This string form is the identity of the key: the fingerprint is
    /// computed over it, not over the raw bytes.
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Decode from the URL-safe string form.
    pub fn decode(s: &str) -> Result<Self, SealError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|e| SealError::InvalidKey(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| SealError::InvalidKey(format!("expected 32 bytes, got {}", v.len())))?;
        Ok(Self(arr))
    }

    /// SHA-256 over the encoded key string.
    ///
    /// The only representation of the key a server ever sees.
    pub fn fingerprint(&self) -> Sha256Hash {
        Sha256Hash::hash_str(&self.encode())
    }
}

impl fmt::Debug for ViewingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material.
        write!(f, "ViewingKey(fp={})", &self.fingerprint().to_hex()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let key = ViewingKey::generate();
        let encoded = key.encode();
        let decoded = ViewingKey::decode(&encoded).unwrap();
        assert_eq!(key, decoded);
    }

    #[test]
    fn test_encoding_is_fragment_safe() {
        // URL fragments must not need escaping: no '+', '/', '=' ever.
        for _ in 0..32 {
            let encoded = ViewingKey::generate().encode();
            assert!(encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(matches!(
            ViewingKey::decode("not/valid+base64url="),
            Err(SealError::InvalidKey(_))
        ));
        // Valid base64url, wrong length
        assert!(matches!(
            ViewingKey::decode("aGVsbG8"),
            Err(SealError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_fingerprint_is_over_string_form() {
        let key = ViewingKey::from_bytes([0x5a; 32]);
        assert_eq!(
            key.fingerprint(),
            Sha256Hash::hash_str(&key.encode())
        );
    }

    #[test]
    fn test_fingerprint_deterministic_and_distinct() {
        let k1 = ViewingKey::from_bytes([0x01; 32]);
        let k2 = ViewingKey::from_bytes([0x02; 32]);
        assert_eq!(k1.fingerprint(), k1.fingerprint());
        assert_ne!(k1.fingerprint(), k2.fingerprint());
    }

    #[test]
    fn test_debug_hides_key_material() {
        let key = ViewingKey::from_bytes([0x5a; 32]);
        let debug = format!("{:?}", key);
        assert!(!debug.contains(&key.encode()));
    }
}
