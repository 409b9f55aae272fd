//! Golden test vectors for deterministic verification.
//!
//! These vectors ensure that canonical encoding produces identical results
//! across all implementations.

use veriseal_core::{
    canonical_payload_bytes, ActionDescriptor, ActionDraft, ActionKind, AgentId, CostDescriptor,
    Keypair, ModelDescriptor, OwnerId, ReceiptId, ReceiptPayload, ReceiptSigner, SessionContext,
    SessionId, TaskId, Visibility,
};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Seed for deterministic key generation.
    pub seed: [u8; 32],
    pub receipt_id: &'static str,
    pub agent_id: &'static str,
    pub owner_id: &'static str,
    pub session_id: &'static str,
    pub sequence: u64,
    pub timestamp: i64,
    pub kind: ActionKind,
    pub action_name: &'static str,
    pub input: &'static str,
    pub output: &'static str,
    pub task_id: Option<&'static str>,
    pub visibility: Visibility,
    /// Expected canonical payload bytes (hex).
    pub expected_canonical_hex: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "Inference with plain text content",
            seed: [0x42; 32],
            receipt_id: "rcpt-0001",
            agent_id: "agent-7",
            owner_id: "owner-42",
            session_id: "sess-1",
            sequence: 0,
            timestamp: 1736870400000, // 2026-01-14T12:00:00Z
            kind: ActionKind::Inference,
            action_name: "summarize",
            input: "hello",
            output: "world",
            task_id: None,
            visibility: Visibility::Private,
            expected_canonical_hex: "ab00010169726370742d3030303102676167656e742d3703686f776e65722d3432041b00000194658b100005a30001016973756d6d6172697a6502186406a4006461636d65016a61636d652d6c617267650210030807a2001903e801f408a20058202cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824015820486ea46224d1bb4fb680f34f7c9ad96a8f24ec88be73ea8e5a6c65260e9cb8a709a300f60166736573732d3102000a01",
        },
        GoldenVector {
            name: "Tool call inside a task",
            seed: [0x42; 32],
            receipt_id: "rcpt-0002",
            agent_id: "agent-7",
            owner_id: "owner-42",
            session_id: "sess-1",
            sequence: 1,
            timestamp: 1736870401000,
            kind: ActionKind::ToolCall,
            action_name: "web-search",
            input: "query",
            output: "results",
            task_id: Some("task-9"),
            visibility: Visibility::Team,
            expected_canonical_hex: "ab00010169726370742d3030303202676167656e742d3703686f776e65722d3432041b00000194658b13e805a30002016a7765622d73656172636802186406a4006461636d65016a61636d652d6c617267650210030807a2001903e801f408a2005820a8b771920b8319e47251d1360f5e880bc18e8d329b0f0d003ea3c7e615558947015820c099142bc3186ded72786ba27e9ea6d2da240fb9fd3fe79b479ecf8e734b285009a300667461736b2d390166736573732d3102010a02",
        },
        GoldenVector {
            name: "Empty content at epoch",
            seed: [0x00; 32],
            receipt_id: "rcpt-0000",
            agent_id: "a",
            owner_id: "o",
            session_id: "s",
            sequence: 0,
            timestamp: 0,
            kind: ActionKind::Retrieval,
            action_name: "noop",
            input: "",
            output: "",
            task_id: None,
            visibility: Visibility::Public,
            expected_canonical_hex: "ab00010169726370742d3030303002616103616f040005a3000301646e6f6f7002186406a4006461636d65016a61636d652d6c617267650210030807a2001903e801f408a2005820e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855015820e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b85509a300f601617302000a03",
        },
        GoldenVector {
            name: "Unicode content survives hashing",
            seed: [0x07; 32],
            receipt_id: "rcpt-0003",
            agent_id: "agent-7",
            owner_id: "owner-42",
            session_id: "sess-2",
            sequence: 5,
            timestamp: 1736870402000,
            kind: ActionKind::CodeExec,
            action_name: "run",
            input: "print('\u{1F980}')",
            output: "r\u{e9}sum\u{e9}",
            task_id: Some("task-9"),
            visibility: Visibility::Private,
            expected_canonical_hex: "ab00010169726370742d3030303302676167656e742d3703686f776e65722d3432041b00000194658b17d005a30004016372756e02186406a4006461636d65016a61636d652d6c617267650210030807a2001903e801f408a20058206ecdfd2767f7f874b40fa904246d1ce975170c4357b490cd23835b1872b4969a015820e9f7b5b696661e938834cbc285688cfa43371150ee5261b47b7d60f6ed73a6f509a300667461736b2d390166736573732d3202050a01",
        },
    ]
}

/// Build the payload described by a golden vector.
pub fn payload_from_vector(vector: &GoldenVector) -> ReceiptPayload {
    let signer = ReceiptSigner::new(Keypair::from_seed(&vector.seed));
    let session = SessionContext::resume(SessionId::new(vector.session_id), vector.sequence);
    signer.build_payload(&session, &draft_from_vector(vector))
}

/// Sign the receipt described by a golden vector.
pub fn receipt_from_vector(vector: &GoldenVector) -> veriseal_core::SignedReceipt {
    let signer = ReceiptSigner::new(Keypair::from_seed(&vector.seed));
    let session = SessionContext::resume(SessionId::new(vector.session_id), vector.sequence);
    signer.sign_action(&session, &draft_from_vector(vector))
}

fn draft_from_vector(vector: &GoldenVector) -> ActionDraft {
    ActionDraft {
        receipt_id: ReceiptId::new(vector.receipt_id),
        agent_id: AgentId::new(vector.agent_id),
        owner_id: OwnerId::new(vector.owner_id),
        timestamp: vector.timestamp,
        action: ActionDescriptor {
            kind: vector.kind,
            name: vector.action_name.into(),
            duration_ms: 100,
        },
        model: ModelDescriptor {
            provider: "acme".into(),
            name: "acme-large".into(),
            tokens_in: 16,
            tokens_out: 8,
        },
        cost: CostDescriptor {
            amount_usd_micros: 1_000,
            was_routed: false,
        },
        input: vector.input.into(),
        output: vector.output.into(),
        task_id: vector.task_id.map(TaskId::new),
        visibility: vector.visibility,
    }
}

/// Verify all golden vectors against their committed canonical bytes.
///
/// Call this to verify your implementation matches the reference. Returns
/// `(name, matches, canonical_hex)` per vector. The comparison is strict:
/// any drift in the encoder, the field set, or the content hashing shows
/// up as a mismatch here.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let payload = payload_from_vector(v);
            let hex = hex::encode(canonical_payload_bytes(&payload));
            let matches = hex == v.expected_canonical_hex;
            (v.name.to_string(), matches, hex)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriseal_core::{decode_payload, verify_bytes, verify_payload};

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            let b1 = canonical_payload_bytes(&payload_from_vector(&vector));
            let b2 = canonical_payload_bytes(&payload_from_vector(&vector));
            assert_eq!(b1, b2, "vector '{}' not deterministic", vector.name);
        }
    }

    #[test]
    fn test_vectors_round_trip_through_decode() {
        for vector in all_vectors() {
            let payload = payload_from_vector(&vector);
            let bytes = canonical_payload_bytes(&payload);
            let decoded = decode_payload(&bytes).unwrap();
            assert_eq!(decoded, payload, "vector '{}' drifted", vector.name);
        }
    }

    #[test]
    fn test_vector_signatures_verify_on_both_paths() {
        for vector in all_vectors() {
            let receipt = receipt_from_vector(&vector);
            let bytes = canonical_payload_bytes(&receipt.payload);
            assert!(
                verify_payload(&receipt.payload, &receipt.signature),
                "vector '{}' failed live path",
                vector.name
            );
            assert!(
                verify_bytes(&bytes, &receipt.signature),
                "vector '{}' failed replay path",
                vector.name
            );
        }
    }

    #[test]
    fn test_all_vectors_report_matching() {
        for (name, matches, _) in verify_all_vectors() {
            assert!(matches, "vector '{name}' mismatch");
        }
    }
}
