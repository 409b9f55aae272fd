//! Receipt fingerprints: the Merkle leaves.
//!
//! A fingerprint is derived only from `(receipt_id, input_sha256,
//! output_sha256)`, never from raw content, using Blake3, the chain-native
//! hash. Third-party verifiers re-derive fingerprints with the same
//! primitive when checking inclusion proofs offline.

use serde::{Deserialize, Serialize};
use std::fmt;

use veriseal_core::{ReceiptId, ReceiptPayload, Sha256Hash};

/// A 32-byte Blake3 fingerprint of one receipt.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Derive the fingerprint: `blake3(receipt_id ‖ ":" ‖ input_hex ‖ ":" ‖ output_hex)`.
    pub fn of(receipt_id: &ReceiptId, input: &Sha256Hash, output: &Sha256Hash) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(receipt_id.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(input.to_hex().as_bytes());
        hasher.update(b":");
        hasher.update(output.to_hex().as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Fingerprint a signed payload.
    pub fn of_payload(payload: &ReceiptPayload) -> Self {
        Self::of(
            &payload.receipt_id,
            &payload.hashes.input_sha256,
            &payload.hashes.output_sha256,
        )
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let id = ReceiptId::new("rcpt-1");
        let input = Sha256Hash::hash(b"in");
        let output = Sha256Hash::hash(b"out");

        assert_eq!(
            Fingerprint::of(&id, &input, &output),
            Fingerprint::of(&id, &input, &output)
        );
    }

    #[test]
    fn test_fingerprint_sensitive_to_each_component() {
        let id = ReceiptId::new("rcpt-1");
        let input = Sha256Hash::hash(b"in");
        let output = Sha256Hash::hash(b"out");
        let base = Fingerprint::of(&id, &input, &output);

        assert_ne!(base, Fingerprint::of(&ReceiptId::new("rcpt-2"), &input, &output));
        assert_ne!(base, Fingerprint::of(&id, &Sha256Hash::hash(b"IN"), &output));
        assert_ne!(base, Fingerprint::of(&id, &input, &Sha256Hash::hash(b"OUT")));
    }

    #[test]
    fn test_fingerprint_never_sees_raw_content() {
        // Same content hashes mean same fingerprint, regardless of what
        // raw text produced them.
        let id = ReceiptId::new("rcpt-1");
        let h = Sha256Hash::hash(b"whatever");
        assert_eq!(Fingerprint::of(&id, &h, &h), Fingerprint::of(&id, &h, &h));
    }

    #[test]
    fn test_hex_roundtrip() {
        let fp = Fingerprint::from_bytes([0xab; 32]);
        assert_eq!(Fingerprint::from_hex(&fp.to_hex()).unwrap(), fp);
    }
}
