//! Signature verification over canonical payload bytes.
//!
//! Verification proves self-consistency only: the payload was signed by the
//! private key matching the public key carried in the signature block.
//! Binding that key to a claimed agent identity is a separate check against
//! the key registry, performed by the facade.
//!
//! Expected negative outcomes return `false`; nothing in this module
//! panics. Malformed base64, malformed keys, wrong algorithm tags, and
//! unsupported versions all verify as `false`.

use crate::canonical::canonical_payload_bytes;
use crate::crypto::{SignatureBlock, SIGNATURE_ALGORITHM};
use crate::error::CoreError;
use crate::payload::ReceiptPayload;

/// Structured pre-check of a signature block.
///
/// Used by callers that want the reason; the boolean verifiers map all of
/// these to `false`.
pub fn check_signature_block(block: &SignatureBlock) -> Result<(), CoreError> {
    if block.algorithm != SIGNATURE_ALGORITHM {
        return Err(CoreError::UnsupportedAlgorithm(block.algorithm.clone()));
    }
    if block.decode_public_key().is_none() {
        return Err(CoreError::InvalidKey("malformed public key hex".into()));
    }
    if block.decode_signature().is_none() {
        return Err(CoreError::MalformedPayload("malformed signature base64".into()));
    }
    Ok(())
}

/// Verify a signature over exact canonical bytes.
///
/// This is the replay path: the bytes must be the literal bytes that were
/// signed, typically fetched from the payload store. Rebuilding a payload
/// from normalized storage and re-encoding it is not equivalent and is
/// deliberately unsupported.
pub fn verify_bytes(canonical_bytes: &[u8], block: &SignatureBlock) -> bool {
    if check_signature_block(block).is_err() {
        return false;
    }
    // Both unwraps guarded by the check above.
    let public_key = match block.decode_public_key() {
        Some(pk) => pk,
        None => return false,
    };
    let signature = match block.decode_signature() {
        Some(sig) => sig,
        None => return false,
    };
    public_key.verify(canonical_bytes, &signature)
}

/// Verify a signature over a live payload by re-canonicalizing it.
///
/// The payload must carry exactly the signed field set; this runs the same
/// canonicalizer as the signing path. Unsupported schema versions verify
/// as `false`.
pub fn verify_payload(payload: &ReceiptPayload, block: &SignatureBlock) -> bool {
    if payload.check_version().is_err() {
        return false;
    }
    let bytes = canonical_payload_bytes(payload);
    verify_bytes(&bytes, block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use crate::payload::{SCHEMA_VERSION, Visibility};
    use crate::signer::{ActionDraft, ReceiptSigner, SessionContext};
    use crate::types::{AgentId, OwnerId, ReceiptId, SessionId};

    fn signed_sample() -> (ReceiptPayload, SignatureBlock) {
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x42; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));
        let draft = ActionDraft {
            receipt_id: ReceiptId::new("rcpt-0001"),
            agent_id: AgentId::new("agent-7"),
            owner_id: OwnerId::new("owner-42"),
            timestamp: 1736870400000,
            action: crate::payload::ActionDescriptor {
                kind: crate::payload::ActionKind::Inference,
                name: "summarize".into(),
                duration_ms: 100,
            },
            model: crate::payload::ModelDescriptor {
                provider: "acme".into(),
                name: "acme-large".into(),
                tokens_in: 1,
                tokens_out: 2,
            },
            cost: crate::payload::CostDescriptor {
                amount_usd_micros: 10,
                was_routed: false,
            },
            input: "in".into(),
            output: "out".into(),
            task_id: None,
            visibility: Visibility::Private,
        };
        let receipt = signer.sign_action(&session, &draft);
        (receipt.payload, receipt.signature)
    }

    #[test]
    fn test_verify_round_trip() {
        let (payload, block) = signed_sample();
        assert!(verify_payload(&payload, &block));
    }

    #[test]
    fn test_unsupported_algorithm_rejected() {
        let (payload, mut block) = signed_sample();
        block.algorithm = "secp256k1".into();
        assert!(!verify_payload(&payload, &block));
        assert!(matches!(
            check_signature_block(&block),
            Err(CoreError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let (mut payload, block) = signed_sample();
        payload.schema_version = SCHEMA_VERSION + 1;
        assert!(!verify_payload(&payload, &block));
    }

    #[test]
    fn test_malformed_base64_is_false_not_panic() {
        let (payload, mut block) = signed_sample();
        block.signature = "@@not-base64@@".into();
        assert!(!verify_payload(&payload, &block));

        let (payload, mut block) = signed_sample();
        block.public_key = "zzzz".into();
        assert!(!verify_payload(&payload, &block));
    }

    #[test]
    fn test_field_drift_breaks_verification() {
        // Substituting a display name for the original identifier is field
        // drift; verification must fail.
        let (mut payload, block) = signed_sample();
        payload.owner_id = OwnerId::new("Owner Forty-Two");
        assert!(!verify_payload(&payload, &block));
    }

    #[test]
    fn test_any_bit_flip_breaks_verification() {
        let (payload, block) = signed_sample();
        let bytes = crate::canonical::canonical_payload_bytes(&payload);

        // Flip one byte at several positions across the message.
        for pos in [0, bytes.len() / 3, bytes.len() / 2, bytes.len() - 1] {
            let mut tampered = bytes.clone();
            tampered[pos] ^= 0x01;
            assert!(
                !verify_bytes(&tampered, &block),
                "flip at {pos} should fail verification"
            );
        }
        assert!(verify_bytes(&bytes, &block));
    }

    #[test]
    fn test_wrong_key_fails() {
        let (payload, _) = signed_sample();
        let other = ReceiptSigner::new(Keypair::from_seed(&[0x43; 32]));
        // Sign with a different key but claim the same payload.
        let block = other.sign_payload(&payload);
        assert!(verify_payload(&payload, &block));

        // Now swap in the wrong public key.
        let mut forged = block.clone();
        forged.public_key = Keypair::from_seed(&[0x44; 32]).public_key().to_hex();
        assert!(!verify_payload(&payload, &forged));
    }
}
