//! Layered trust evaluation.
//!
//! A receipt earns trust in three independent layers:
//!
//! 1. **Signature**: the payload verifies against the carried public key,
//!    over stored canonical bytes when available.
//! 2. **Confidentiality**: the encrypted fields open with the presented
//!    viewing key and the plaintext matches the signed content hashes.
//! 3. **Anchoring**: the receipt's fingerprint proves inclusion in a
//!    certified batch whose root was committed externally.
//!
//! Identity binding (does the carried key belong to the claimed agent per
//! the key registry?) is reported alongside but never folded into the
//! layers; a self-consistent signature from an unregistered key is a
//! meaningful, distinct state.
//!
//! Each layer degrades independently. A missing viewing key does not
//! invalidate the signature; a missing anchor does not invalidate the
//! seal. [`TrustReport::is_trusted`] gives the conservative summary.

use tracing::{debug, warn};

use veriseal_certify::{verify_proof, CertificationRecord, Fingerprint, MerkleBatch};
use veriseal_core::{verify_bytes, verify_payload, canonical_payload_bytes, SignedReceipt};
use veriseal_seal::{open_receipt_fields, SealError, ViewingKey};

use crate::registry::KeyRegistry;
use crate::store::PayloadStore;

/// Outcome of the signature layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStatus {
    /// The payload verifies against the carried public key.
    Valid,
    /// Verification failed: tampered payload, wrong key, or malformed
    /// signature block.
    Invalid,
}

/// Whether the carried public key is the one registered for the claimed
/// agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityBinding {
    /// The registry knows the agent and the keys match.
    Bound,
    /// The registry knows the agent but the receipt carries a different
    /// key.
    Mismatch,
    /// The registry has no key for the claimed agent.
    Unknown,
}

/// Why the confidentiality layer failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SealFailure {
    /// AEAD authentication failed: wrong key or tampered ciphertext.
    Authentication,
    /// The blob opened but the plaintext does not match the signed
    /// content hash.
    HashMismatch,
    /// The blob is structurally invalid (truncated, bad base64, or not
    /// UTF-8 after decryption).
    Malformed,
}

/// Outcome of the confidentiality layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionStatus {
    /// The receipt carries no encrypted fields.
    NotPresent,
    /// The fields opened and the plaintext matches the signed hashes.
    Valid,
    /// Encrypted fields are present but no viewing key was offered.
    KeyUnavailable,
    /// Opening failed.
    Failed(SealFailure),
}

/// Outcome of the anchoring layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorStatus {
    /// The fingerprint proves inclusion under the certified root.
    Anchored {
        reference: veriseal_certify::AnchorReference,
    },
    /// No certification evidence, no proof for this receipt, or a proof
    /// that does not verify.
    Absent,
}

/// Certification evidence offered alongside a receipt.
#[derive(Debug, Clone, Copy)]
pub struct AnchorEvidence<'a> {
    pub batch: &'a MerkleBatch,
    pub record: &'a CertificationRecord,
}

/// The full per-receipt evaluation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustReport {
    pub receipt_id: veriseal_core::ReceiptId,
    pub signature: SignatureStatus,
    pub identity: IdentityBinding,
    pub encryption: EncryptionStatus,
    pub anchor: AnchorStatus,
}

impl TrustReport {
    /// Conservative summary: the signature is valid and any encrypted
    /// content that was checked passed. Absent anchoring and an unknown
    /// registry entry lower confidence but do not flip this bit; a hash
    /// mismatch or authentication failure does.
    pub fn is_trusted(&self) -> bool {
        if self.signature != SignatureStatus::Valid {
            return false;
        }
        matches!(
            self.encryption,
            EncryptionStatus::NotPresent | EncryptionStatus::Valid
        )
    }
}

/// Evaluates receipts against the three trust layers.
///
/// Generic over its collaborators so deployments can supply real
/// registries and stores; tests use the in-memory implementations.
pub struct TrustEvaluator<R, S> {
    registry: R,
    store: S,
}

impl<R: KeyRegistry, S: PayloadStore> TrustEvaluator<R, S> {
    pub fn new(registry: R, store: S) -> Self {
        Self { registry, store }
    }

    /// The key registry this evaluator consults.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The payload store this evaluator replays from.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist a receipt's exact canonical bytes so later evaluations can
    /// replay them instead of re-encoding a live payload.
    pub async fn record(&self, receipt: &SignedReceipt) -> crate::error::Result<()> {
        let bytes = canonical_payload_bytes(&receipt.payload);
        self.store
            .put_canonical(&receipt.payload.receipt_id, &bytes)
            .await
    }

    /// Evaluate one receipt. Verification outcomes are states in the
    /// report, never errors; only collaborator failures surface as `Err`.
    pub async fn evaluate(
        &self,
        receipt: &SignedReceipt,
        viewing_key: Option<&ViewingKey>,
        evidence: Option<AnchorEvidence<'_>>,
    ) -> crate::error::Result<TrustReport> {
        let receipt_id = receipt.payload.receipt_id.clone();
        debug!(receipt_id = %receipt_id, "evaluating receipt");

        let signature = self.check_signature(receipt).await?;
        if signature == SignatureStatus::Invalid {
            warn!(receipt_id = %receipt_id, "signature verification failed");
        }

        let identity = self.check_identity(receipt).await?;
        let encryption = check_encryption(receipt, viewing_key);
        if let EncryptionStatus::Failed(failure) = &encryption {
            warn!(receipt_id = %receipt_id, ?failure, "seal verification failed");
        }
        let anchor = check_anchor(receipt, evidence);

        Ok(TrustReport {
            receipt_id,
            signature,
            identity,
            encryption,
            anchor,
        })
    }

    /// Prefer stored canonical bytes; fall back to re-canonicalizing the
    /// live payload when the receipt was never recorded.
    async fn check_signature(
        &self,
        receipt: &SignedReceipt,
    ) -> crate::error::Result<SignatureStatus> {
        let verified = match self
            .store
            .get_canonical(&receipt.payload.receipt_id)
            .await?
        {
            Some(bytes) => verify_bytes(&bytes, &receipt.signature),
            None => verify_payload(&receipt.payload, &receipt.signature),
        };
        Ok(if verified {
            SignatureStatus::Valid
        } else {
            SignatureStatus::Invalid
        })
    }

    async fn check_identity(
        &self,
        receipt: &SignedReceipt,
    ) -> crate::error::Result<IdentityBinding> {
        let registered = self
            .registry
            .resolve_public_key(&receipt.payload.agent_id)
            .await?;
        Ok(match registered {
            None => IdentityBinding::Unknown,
            Some(key) if key.to_hex() == receipt.signature.public_key => IdentityBinding::Bound,
            Some(_) => IdentityBinding::Mismatch,
        })
    }
}

fn check_encryption(receipt: &SignedReceipt, viewing_key: Option<&ViewingKey>) -> EncryptionStatus {
    let fields = match &receipt.encrypted {
        None => return EncryptionStatus::NotPresent,
        Some(fields) => fields,
    };
    let key = match viewing_key {
        None => return EncryptionStatus::KeyUnavailable,
        Some(key) => key,
    };
    match open_receipt_fields(fields, key, &receipt.payload) {
        Ok(_) => EncryptionStatus::Valid,
        Err(SealError::AuthenticationFailure) => EncryptionStatus::Failed(SealFailure::Authentication),
        Err(SealError::HashMismatch { .. }) => EncryptionStatus::Failed(SealFailure::HashMismatch),
        Err(_) => EncryptionStatus::Failed(SealFailure::Malformed),
    }
}

fn check_anchor(receipt: &SignedReceipt, evidence: Option<AnchorEvidence<'_>>) -> AnchorStatus {
    let evidence = match evidence {
        None => return AnchorStatus::Absent,
        Some(evidence) => evidence,
    };
    // The record's root is the committed one; a batch whose root differs
    // from its record proves nothing.
    if evidence.batch.root() != evidence.record.root {
        return AnchorStatus::Absent;
    }
    let fingerprint = Fingerprint::of_payload(&receipt.payload);
    match evidence.batch.proof(&fingerprint) {
        Some(proof) if verify_proof(&fingerprint, &proof.path, &evidence.record.root) => {
            AnchorStatus::Anchored {
                reference: evidence.record.anchor_reference.clone(),
            }
        }
        _ => AnchorStatus::Absent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryKeyRegistry;
    use crate::store::MemoryPayloadStore;
    use veriseal_core::{
        ActionDescriptor, ActionKind, ActionDraft, AgentId, CostDescriptor, Keypair,
        ModelDescriptor, OwnerId, ReceiptId, ReceiptSigner, SessionContext, SessionId,
        Visibility,
    };
    use veriseal_seal::seal_fields;

    fn draft(n: u64) -> ActionDraft {
        ActionDraft {
            receipt_id: ReceiptId::new(format!("rcpt-{n:04}")),
            agent_id: AgentId::new("agent-7"),
            owner_id: OwnerId::new("owner-42"),
            timestamp: 1736870400000 + n as i64,
            action: ActionDescriptor {
                kind: ActionKind::Inference,
                name: "summarize".into(),
                duration_ms: 120,
            },
            model: ModelDescriptor {
                provider: "acme".into(),
                name: "acme-large".into(),
                tokens_in: 64,
                tokens_out: 32,
            },
            cost: CostDescriptor {
                amount_usd_micros: 1500,
                was_routed: false,
            },
            input: format!("question {n}"),
            output: format!("answer {n}"),
            task_id: None,
            visibility: Visibility::Private,
        }
    }

    fn evaluator() -> TrustEvaluator<MemoryKeyRegistry, MemoryPayloadStore> {
        TrustEvaluator::new(MemoryKeyRegistry::new(), MemoryPayloadStore::new())
    }

    #[tokio::test]
    async fn test_valid_unencrypted_receipt_is_trusted() {
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x01; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));
        let receipt = signer.sign_action(&session, &draft(0));

        let evaluator = evaluator();
        let report = evaluator.evaluate(&receipt, None, None).await.unwrap();

        assert_eq!(report.signature, SignatureStatus::Valid);
        assert_eq!(report.identity, IdentityBinding::Unknown);
        assert_eq!(report.encryption, EncryptionStatus::NotPresent);
        assert_eq!(report.anchor, AnchorStatus::Absent);
        assert!(report.is_trusted());
    }

    #[tokio::test]
    async fn test_tampered_payload_is_untrusted() {
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x01; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));
        let mut receipt = signer.sign_action(&session, &draft(0));
        receipt.payload.cost.amount_usd_micros = 999_999;

        let report = evaluator().evaluate(&receipt, None, None).await.unwrap();
        assert_eq!(report.signature, SignatureStatus::Invalid);
        assert!(!report.is_trusted());
    }

    #[tokio::test]
    async fn test_stored_bytes_beat_drifted_live_payload() {
        // Record the receipt, then drift a field on the live copy. The
        // stored exact bytes still verify, so the signature layer holds
        // even though re-encoding the drifted payload would fail.
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x01; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));
        let receipt = signer.sign_action(&session, &draft(0));

        let evaluator = evaluator();
        evaluator.record(&receipt).await.unwrap();

        let mut drifted = receipt.clone();
        drifted.payload.owner_id = OwnerId::new("Owner Forty-Two");
        let report = evaluator.evaluate(&drifted, None, None).await.unwrap();
        assert_eq!(report.signature, SignatureStatus::Valid);
    }

    #[tokio::test]
    async fn test_identity_binding_states() {
        let keypair = Keypair::from_seed(&[0x01; 32]);
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x01; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));
        let receipt = signer.sign_action(&session, &draft(0));

        let evaluator = evaluator();

        let report = evaluator.evaluate(&receipt, None, None).await.unwrap();
        assert_eq!(report.identity, IdentityBinding::Unknown);

        evaluator
            .registry
            .register(AgentId::new("agent-7"), keypair.public_key())
            .await;
        let report = evaluator.evaluate(&receipt, None, None).await.unwrap();
        assert_eq!(report.identity, IdentityBinding::Bound);

        evaluator
            .registry
            .register(AgentId::new("agent-7"), Keypair::from_seed(&[0x02; 32]).public_key())
            .await;
        let report = evaluator.evaluate(&receipt, None, None).await.unwrap();
        assert_eq!(report.identity, IdentityBinding::Mismatch);
        // Self-consistency is unaffected by the registry.
        assert_eq!(report.signature, SignatureStatus::Valid);
    }

    #[tokio::test]
    async fn test_encryption_layer_states() {
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x01; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));
        let d = draft(0);
        let key = ViewingKey::from_bytes([0x33; 32]);
        let mut receipt = signer.sign_action(&session, &d);
        receipt.encrypted = Some(seal_fields(&d.input, &d.output, &key));

        let evaluator = evaluator();

        let report = evaluator.evaluate(&receipt, None, None).await.unwrap();
        assert_eq!(report.encryption, EncryptionStatus::KeyUnavailable);
        assert!(!report.is_trusted());

        let report = evaluator.evaluate(&receipt, Some(&key), None).await.unwrap();
        assert_eq!(report.encryption, EncryptionStatus::Valid);
        assert!(report.is_trusted());

        let wrong = ViewingKey::from_bytes([0x34; 32]);
        let report = evaluator.evaluate(&receipt, Some(&wrong), None).await.unwrap();
        assert_eq!(
            report.encryption,
            EncryptionStatus::Failed(SealFailure::Authentication)
        );
        assert!(!report.is_trusted());
    }

    #[tokio::test]
    async fn test_swapped_ciphertext_reports_hash_mismatch() {
        // Both blobs open under the key, but the input slot now holds the
        // output plaintext. The AEAD accepts it; the content hash does not.
        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x01; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));
        let d = draft(0);
        let key = ViewingKey::from_bytes([0x33; 32]);
        let fields = seal_fields(&d.input, &d.output, &key);
        let mut receipt = signer.sign_action(&session, &d);
        receipt.encrypted = Some(veriseal_core::EncryptedFields {
            encrypted_input: fields.encrypted_output.clone(),
            encrypted_output: fields.encrypted_input.clone(),
        });

        let report = evaluator()
            .evaluate(&receipt, Some(&key), None)
            .await
            .unwrap();
        assert_eq!(
            report.encryption,
            EncryptionStatus::Failed(SealFailure::HashMismatch)
        );
    }

    #[tokio::test]
    async fn test_anchored_receipt_reports_reference() {
        use veriseal_certify::{MemoryAnchor, MerkleBatch};
        use veriseal_core::TaskId;

        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x01; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));
        let receipts: Vec<_> = (0..3).map(|n| signer.sign_action(&session, &draft(n))).collect();
        let payloads: Vec<_> = receipts.iter().map(|r| r.payload.clone()).collect();

        let batch = MerkleBatch::from_payloads(TaskId::new("task-1"), &payloads).unwrap();
        let anchor = MemoryAnchor::new();
        let record = batch.certify(&anchor).await.unwrap();

        let evaluator = evaluator();
        let evidence = AnchorEvidence {
            batch: &batch,
            record: &record,
        };
        let report = evaluator
            .evaluate(&receipts[1], None, Some(evidence))
            .await
            .unwrap();
        assert_eq!(
            report.anchor,
            AnchorStatus::Anchored {
                reference: record.anchor_reference.clone()
            }
        );

        // A receipt outside the batch stays unanchored.
        let outsider = signer.sign_action(&session, &draft(99));
        let report = evaluator
            .evaluate(&outsider, None, Some(evidence))
            .await
            .unwrap();
        assert_eq!(report.anchor, AnchorStatus::Absent);
    }

    #[tokio::test]
    async fn test_record_mismatch_defeats_anchor_claim() {
        use veriseal_certify::{MemoryAnchor, MerkleBatch, MerkleRoot};
        use veriseal_core::TaskId;

        let signer = ReceiptSigner::new(Keypair::from_seed(&[0x01; 32]));
        let session = SessionContext::new(SessionId::new("sess-1"));
        let receipt = signer.sign_action(&session, &draft(0));

        let batch =
            MerkleBatch::from_payloads(TaskId::new("task-1"), &[receipt.payload.clone()]).unwrap();
        let anchor = MemoryAnchor::new();
        let mut record = batch.certify(&anchor).await.unwrap();
        record.root = MerkleRoot::from_bytes([0xee; 32]);

        let report = evaluator()
            .evaluate(
                &receipt,
                None,
                Some(AnchorEvidence {
                    batch: &batch,
                    record: &record,
                }),
            )
            .await
            .unwrap();
        assert_eq!(report.anchor, AnchorStatus::Absent);
    }
}
