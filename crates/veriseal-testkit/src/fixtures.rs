//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use veriseal_core::{
    ActionDescriptor, ActionDraft, ActionKind, AgentId, CostDescriptor, Keypair, ModelDescriptor,
    OwnerId, ReceiptId, ReceiptSigner, SessionContext, SessionId, SignedReceipt, TaskId,
    Visibility,
};
use veriseal_seal::{seal_fields, ViewingKey};

/// A test fixture with a deterministic signer and an open session.
pub struct TestFixture {
    pub keypair: Keypair,
    pub signer: ReceiptSigner,
    pub session: SessionContext,
}

impl TestFixture {
    /// Create a fixture with a random keypair.
    pub fn new() -> Self {
        Self::from_keypair(Keypair::generate())
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_keypair(Keypair::from_seed(&seed))
    }

    fn from_keypair(keypair: Keypair) -> Self {
        Self {
            signer: ReceiptSigner::new(keypair.clone()),
            session: SessionContext::new(SessionId::new("sess-test")),
            keypair,
        }
    }

    /// Get the keypair's public key.
    pub fn public_key(&self) -> veriseal_core::Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// A plausible draft for the nth action of a task.
    pub fn make_draft(&self, n: u64) -> ActionDraft {
        ActionDraft {
            receipt_id: ReceiptId::new(format!("rcpt-{n:04}")),
            agent_id: AgentId::new("agent-test"),
            owner_id: OwnerId::new("owner-test"),
            timestamp: 1736870400000 + n as i64 * 1000,
            action: ActionDescriptor {
                kind: ActionKind::Inference,
                name: "summarize".into(),
                duration_ms: 250,
            },
            model: ModelDescriptor {
                provider: "acme".into(),
                name: "acme-large".into(),
                tokens_in: 128,
                tokens_out: 64,
            },
            cost: CostDescriptor {
                amount_usd_micros: 2_500,
                was_routed: false,
            },
            input: format!("question {n}"),
            output: format!("answer {n}"),
            task_id: None,
            visibility: Visibility::Private,
        }
    }

    /// Sign the nth canned draft in this fixture's session.
    pub fn sign(&self, n: u64) -> SignedReceipt {
        self.signer.sign_action(&self.session, &self.make_draft(n))
    }

    /// Sign `count` receipts all tagged with the same task.
    pub fn receipts_for_task(&self, task: &str, count: u64) -> Vec<SignedReceipt> {
        (0..count)
            .map(|n| {
                let mut draft = self.make_draft(n);
                draft.task_id = Some(TaskId::new(task));
                self.signer.sign_action(&self.session, &draft)
            })
            .collect()
    }

    /// Sign the nth draft and attach sealed input/output blobs.
    pub fn sign_sealed(&self, n: u64, key: &ViewingKey) -> SignedReceipt {
        let draft = self.make_draft(n);
        let mut receipt = self.signer.sign_action(&self.session, &draft);
        receipt.encrypted = Some(seal_fields(&draft.input, &draft.output, key));
        receipt
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple fixtures with distinct deterministic keys for
/// multi-agent tests.
pub fn multi_agent_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_seed(seed)
        })
        .collect()
}
