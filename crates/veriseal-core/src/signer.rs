//! Receipt signing and the per-session sequence counter.
//!
//! The sequence counter is the only mutable state in the whole protocol.
//! It is owned by an explicit [`SessionContext`] handed in by the caller;
//! there is no module-level singleton. The counter is atomic so a signer
//! may be shared across threads within one session.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::canonical::canonical_payload_bytes;
use crate::crypto::{Keypair, Sha256Hash, SignatureBlock};
use crate::payload::{
    ActionDescriptor, ContentHashes, CostDescriptor, ModelDescriptor, ReceiptContext,
    ReceiptPayload, SignedReceipt, Visibility, SCHEMA_VERSION,
};
use crate::types::{AgentId, OwnerId, ReceiptId, SessionId, TaskId};

/// Owned sequence state for one signing session.
///
/// Sequence numbers start at 0 and increment by exactly 1 per receipt.
/// Starting a new session means constructing a new context.
#[derive(Debug)]
pub struct SessionContext {
    session_id: SessionId,
    next_seq: AtomicU64,
}

impl SessionContext {
    /// Start a new session. The first receipt gets sequence 0.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            next_seq: AtomicU64::new(0),
        }
    }

    /// Resume a session at a known next sequence number.
    pub fn resume(session_id: SessionId, next_seq: u64) -> Self {
        Self {
            session_id,
            next_seq: AtomicU64::new(next_seq),
        }
    }

    /// The session identifier.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// The sequence number the next receipt will get.
    pub fn next_sequence(&self) -> u64 {
        self.next_seq.load(Ordering::SeqCst)
    }

    /// Claim the next sequence number, advancing the counter.
    fn claim_sequence(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst)
    }
}

/// Everything the caller supplies to sign one action.
///
/// Raw input and output text are hashed here and never persisted in the
/// signed structure.
#[derive(Debug, Clone)]
pub struct ActionDraft {
    pub receipt_id: ReceiptId,
    pub agent_id: AgentId,
    pub owner_id: OwnerId,
    /// Signer-claimed Unix milliseconds.
    pub timestamp: i64,
    pub action: ActionDescriptor,
    pub model: ModelDescriptor,
    pub cost: CostDescriptor,
    pub input: String,
    pub output: String,
    pub task_id: Option<TaskId>,
    pub visibility: Visibility,
}

/// Signs receipt payloads with an Ed25519 keypair.
pub struct ReceiptSigner {
    keypair: Keypair,
}

impl ReceiptSigner {
    /// Create a signer from a keypair.
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// The signer's public key.
    pub fn public_key(&self) -> crate::crypto::Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// Build the payload for a draft without signing it.
    ///
    /// Claims the session's next sequence number as a side effect.
    pub fn build_payload(&self, session: &SessionContext, draft: &ActionDraft) -> ReceiptPayload {
        ReceiptPayload {
            schema_version: SCHEMA_VERSION,
            receipt_id: draft.receipt_id.clone(),
            agent_id: draft.agent_id.clone(),
            owner_id: draft.owner_id.clone(),
            timestamp: draft.timestamp,
            action: draft.action.clone(),
            model: draft.model.clone(),
            cost: draft.cost.clone(),
            hashes: ContentHashes {
                input_sha256: Sha256Hash::hash_str(&draft.input),
                output_sha256: Sha256Hash::hash_str(&draft.output),
            },
            context: ReceiptContext {
                task_id: draft.task_id.clone(),
                session_id: session.session_id().clone(),
                sequence: session.claim_sequence(),
            },
            visibility: draft.visibility,
        }
    }

    /// Sign an action draft, producing the wire-shaped receipt.
    pub fn sign_action(&self, session: &SessionContext, draft: &ActionDraft) -> SignedReceipt {
        let payload = self.build_payload(session, draft);
        let signature = self.sign_payload(&payload);
        SignedReceipt {
            payload,
            signature,
            encrypted: None,
        }
    }

    /// Sign an already-assembled payload.
    pub fn sign_payload(&self, payload: &ReceiptPayload) -> SignatureBlock {
        let bytes = canonical_payload_bytes(payload);
        let signature = self.keypair.sign(&bytes);
        SignatureBlock::new(&self.keypair.public_key(), &signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ActionKind;
    use crate::verify::verify_payload;

    fn draft(n: u32) -> ActionDraft {
        ActionDraft {
            receipt_id: ReceiptId::new(format!("rcpt-{n:04}")),
            agent_id: AgentId::new("agent-7"),
            owner_id: OwnerId::new("owner-42"),
            timestamp: 1736870400000 + i64::from(n),
            action: ActionDescriptor {
                kind: ActionKind::Inference,
                name: "summarize".into(),
                duration_ms: 500,
            },
            model: ModelDescriptor {
                provider: "acme".into(),
                name: "acme-large".into(),
                tokens_in: 10,
                tokens_out: 20,
            },
            cost: CostDescriptor {
                amount_usd_micros: 100,
                was_routed: false,
            },
            input: format!("input {n}"),
            output: format!("output {n}"),
            task_id: Some(TaskId::new("task-9")),
            visibility: Visibility::Private,
        }
    }

    #[test]
    fn test_sign_produces_verifiable_receipt() {
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x42; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));

        let receipt = signer.sign_action(&session, &draft(0));
        assert!(verify_payload(&receipt.payload, &receipt.signature));
    }

    #[test]
    fn test_sequence_starts_at_zero_and_increments() {
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x42; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));

        for expected in 0..4 {
            let receipt = signer.sign_action(&session, &draft(expected as u32));
            assert_eq!(receipt.payload.context.sequence, expected);
        }
        assert_eq!(session.next_sequence(), 4);
    }

    #[test]
    fn test_new_session_resets_counter() {
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x42; 32]));

        let first = SessionContext::new(SessionId::new("sess-1"));
        signer.sign_action(&first, &draft(0));
        signer.sign_action(&first, &draft(1));

        let second = SessionContext::new(SessionId::new("sess-2"));
        let receipt = signer.sign_action(&second, &draft(2));
        assert_eq!(receipt.payload.context.sequence, 0);
        assert_eq!(receipt.payload.context.session_id.as_str(), "sess-2");
    }

    #[test]
    fn test_raw_content_never_in_payload() {
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x42; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));
        let d = draft(0);

        let receipt = signer.sign_action(&session, &d);
        assert_eq!(
            receipt.payload.hashes.input_sha256,
            Sha256Hash::hash_str(&d.input)
        );
        // The canonical bytes commit to hashes, not text.
        let bytes = canonical_payload_bytes(&receipt.payload);
        let needle = d.input.as_bytes();
        assert!(!bytes.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn test_empty_and_unicode_inputs_sign_fine() {
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x42; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));

        let mut d = draft(0);
        d.input = String::new();
        d.output = "\u{1F980} r\u{e9}sum\u{e9}".into();

        let receipt = signer.sign_action(&session, &d);
        assert!(verify_payload(&receipt.payload, &receipt.signature));
    }

    #[test]
    fn test_shared_session_counter_is_exclusive() {
        use std::sync::Arc;

        let session = Arc::new(SessionContext::new(SessionId::new("sess-1")));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let s = Arc::clone(&session);
            handles.push(std::thread::spawn(move || {
                (0..100).map(|_| s.claim_sequence()).collect::<Vec<_>>()
            }));
        }

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        let expected: Vec<u64> = (0..800).collect();
        assert_eq!(all, expected);
    }
}
