//! # Veriseal Core
//!
//! Pure primitives for the Veriseal receipt protocol: payloads,
//! canonicalization, hashing, signing, and verification.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures; the only mutable state
//! anywhere is the per-session sequence counter, which the caller owns.
//!
//! ## Key Types
//!
//! - [`ReceiptPayload`] - The signed field set of one agent action
//! - [`SignedReceipt`] - Payload + signature block + optional encrypted blobs
//! - [`ReceiptSigner`] / [`SessionContext`] - Signing with owned sequence state
//! - [`Sha256Hash`] - Content commitment over raw input/output text
//!
//! ## Canonicalization
//!
//! All payloads are encoded using deterministic CBOR; the same encoder runs
//! on the signing and verification paths. See [`canonical`].

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod payload;
pub mod sequence;
pub mod signer;
pub mod types;
pub mod verify;

pub use canonical::{canonical_payload_bytes, decode_payload};
pub use crypto::{
    Ed25519PublicKey, Ed25519Signature, Keypair, Sha256Hash, SignatureBlock, SIGNATURE_ALGORITHM,
};
pub use error::CoreError;
pub use payload::{
    ActionDescriptor, ActionKind, ContentHashes, CostDescriptor, EncryptedFields, ModelDescriptor,
    ReceiptContext, ReceiptPayload, SignedReceipt, Visibility, SCHEMA_VERSION,
};
pub use sequence::{sequence_gaps, session_health, SequenceGap, SessionHealth};
pub use signer::{ActionDraft, ReceiptSigner, SessionContext};
pub use types::{AgentId, OwnerId, ReceiptId, SessionId, TaskId};
pub use verify::{check_signature_block, verify_bytes, verify_payload};
