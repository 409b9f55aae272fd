//! Proptest generators for property-based testing.

use proptest::prelude::*;

use veriseal_core::{
    ActionDescriptor, ActionDraft, ActionKind, AgentId, CostDescriptor, Keypair, ModelDescriptor,
    OwnerId, ReceiptId, ReceiptPayload, ReceiptSigner, SessionContext, SessionId, Sha256Hash,
    SignedReceipt, TaskId, Visibility,
};
use veriseal_certify::Fingerprint;
use veriseal_seal::ViewingKey;

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random Sha256Hash.
pub fn sha256_hash() -> impl Strategy<Value = Sha256Hash> {
    any::<[u8; 32]>().prop_map(Sha256Hash::from_bytes)
}

/// Generate a random fingerprint.
pub fn fingerprint() -> impl Strategy<Value = Fingerprint> {
    any::<[u8; 32]>().prop_map(Fingerprint::from_bytes)
}

/// Generate a random viewing key.
pub fn viewing_key() -> impl Strategy<Value = ViewingKey> {
    any::<[u8; 32]>().prop_map(ViewingKey::from_bytes)
}

/// Generate an ActionKind.
pub fn action_kind() -> impl Strategy<Value = ActionKind> {
    prop_oneof![
        Just(ActionKind::Inference),
        Just(ActionKind::ToolCall),
        Just(ActionKind::Retrieval),
        Just(ActionKind::CodeExec),
    ]
}

/// Generate a Visibility.
pub fn visibility() -> impl Strategy<Value = Visibility> {
    prop_oneof![
        Just(Visibility::Private),
        Just(Visibility::Team),
        Just(Visibility::Public),
    ]
}

/// Generate an identifier string.
pub fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,31}".prop_map(String::from)
}

/// Generate a reasonable timestamp in Unix milliseconds.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=1_900_000_000_000i64
}

/// Parameters for generating a signed receipt.
#[derive(Debug, Clone)]
pub struct DraftParams {
    pub seed: [u8; 32],
    pub receipt_id: String,
    pub agent_id: String,
    pub owner_id: String,
    pub session_id: String,
    pub sequence: u64,
    pub timestamp: i64,
    pub kind: ActionKind,
    pub action_name: String,
    pub duration_ms: u64,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub amount_usd_micros: u64,
    pub was_routed: bool,
    pub input: String,
    pub output: String,
    pub task_id: Option<String>,
    pub visibility: Visibility,
}

impl Arbitrary for DraftParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            (
                any::<[u8; 32]>(),
                ident(),
                ident(),
                ident(),
                ident(),
                0u64..=10_000u64,
                timestamp(),
                action_kind(),
            ),
            (
                ident(),
                0u64..=600_000u64,
                0u64..=1_000_000u64,
                0u64..=1_000_000u64,
                0u64..=10_000_000u64,
                any::<bool>(),
                ".*",
                ".*",
                proptest::option::of(ident()),
                visibility(),
            ),
        )
            .prop_map(
                |(
                    (seed, receipt_id, agent_id, owner_id, session_id, sequence, ts, kind),
                    (
                        action_name,
                        duration_ms,
                        tokens_in,
                        tokens_out,
                        amount_usd_micros,
                        was_routed,
                        input,
                        output,
                        task_id,
                        vis,
                    ),
                )| DraftParams {
                    seed,
                    receipt_id,
                    agent_id,
                    owner_id,
                    session_id,
                    sequence,
                    timestamp: ts,
                    kind,
                    action_name,
                    duration_ms,
                    tokens_in,
                    tokens_out,
                    amount_usd_micros,
                    was_routed,
                    input,
                    output,
                    task_id,
                    visibility: vis,
                },
            )
            .boxed()
    }
}

impl DraftParams {
    fn draft(&self) -> ActionDraft {
        ActionDraft {
            receipt_id: ReceiptId::new(&self.receipt_id),
            agent_id: AgentId::new(&self.agent_id),
            owner_id: OwnerId::new(&self.owner_id),
            timestamp: self.timestamp,
            action: ActionDescriptor {
                kind: self.kind,
                name: self.action_name.clone(),
                duration_ms: self.duration_ms,
            },
            model: ModelDescriptor {
                provider: "acme".into(),
                name: "acme-large".into(),
                tokens_in: self.tokens_in,
                tokens_out: self.tokens_out,
            },
            cost: CostDescriptor {
                amount_usd_micros: self.amount_usd_micros,
                was_routed: self.was_routed,
            },
            input: self.input.clone(),
            output: self.output.clone(),
            task_id: self.task_id.as_deref().map(TaskId::new),
            visibility: self.visibility,
        }
    }
}

/// Build the payload described by the parameters, without signing.
pub fn payload_from_params(params: &DraftParams) -> ReceiptPayload {
    let signer = ReceiptSigner::new(Keypair::from_seed(&params.seed));
    let session =
        SessionContext::resume(SessionId::new(&params.session_id), params.sequence);
    signer.build_payload(&session, &params.draft())
}

/// Sign the receipt described by the parameters.
pub fn receipt_from_params(params: &DraftParams) -> SignedReceipt {
    let signer = ReceiptSigner::new(Keypair::from_seed(&params.seed));
    let session =
        SessionContext::resume(SessionId::new(&params.session_id), params.sequence);
    signer.sign_action(&session, &params.draft())
}
