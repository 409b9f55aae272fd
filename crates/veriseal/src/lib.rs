//! # Veriseal
//!
//! Verifiable receipts for AI agent actions: sign what happened, seal what
//! was said, certify batches, and evaluate trust in layers.
//!
//! This facade crate wires the protocol crates together:
//!
//! - [`veriseal_core`] (re-exported as [`core`]): payloads, canonical CBOR,
//!   SHA-256 content commitments, Ed25519 signing and verification
//! - [`veriseal_seal`] (re-exported as [`seal`]): viewing keys and
//!   AES-256-GCM envelopes bound to the signed hashes
//! - [`veriseal_certify`] (re-exported as [`certify`]): fingerprints,
//!   Merkle batches, inclusion proofs, and the anchor boundary
//!
//! and adds the pieces that need collaborators: the [`KeyRegistry`] and
//! [`PayloadStore`] seams, and the [`TrustEvaluator`] that produces a
//! per-receipt [`TrustReport`].
//!
//! ## Example
//!
//! ```
//! use veriseal::core::{
//!     ActionDescriptor, ActionDraft, ActionKind, AgentId, CostDescriptor, Keypair,
//!     ModelDescriptor, OwnerId, ReceiptId, ReceiptSigner, SessionContext, SessionId,
//!     Visibility,
//! };
//! use veriseal::{MemoryKeyRegistry, MemoryPayloadStore, TrustEvaluator};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let signer = ReceiptSigner::new(Keypair::generate());
//! let session = SessionContext::new(SessionId::new("sess-1"));
//! let receipt = signer.sign_action(&session, &ActionDraft {
//!     receipt_id: ReceiptId::new("rcpt-0001"),
//!     agent_id: AgentId::new("agent-7"),
//!     owner_id: OwnerId::new("owner-42"),
//!     timestamp: 1736870400000,
//!     action: ActionDescriptor {
//!         kind: ActionKind::Inference,
//!         name: "summarize".into(),
//!         duration_ms: 120,
//!     },
//!     model: ModelDescriptor {
//!         provider: "acme".into(),
//!         name: "acme-large".into(),
//!         tokens_in: 64,
//!         tokens_out: 32,
//!     },
//!     cost: CostDescriptor { amount_usd_micros: 1500, was_routed: false },
//!     input: "question".into(),
//!     output: "answer".into(),
//!     task_id: None,
//!     visibility: Visibility::Private,
//! });
//!
//! let evaluator = TrustEvaluator::new(MemoryKeyRegistry::new(), MemoryPayloadStore::new());
//! evaluator.record(&receipt).await?;
//! let report = evaluator.evaluate(&receipt, None, None).await?;
//! assert!(report.is_trusted());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod registry;
pub mod store;
pub mod trust;

pub use veriseal_certify as certify;
pub use veriseal_core as core;
pub use veriseal_seal as seal;

pub use error::{Result, VerisealError};
pub use registry::{KeyRegistry, MemoryKeyRegistry};
pub use store::{MemoryPayloadStore, PayloadStore};
pub use trust::{
    AnchorEvidence, AnchorStatus, EncryptionStatus, IdentityBinding, SealFailure, SignatureStatus,
    TrustEvaluator, TrustReport,
};
