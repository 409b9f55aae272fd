//! # Veriseal Certify
//!
//! Merkle batch certification: fingerprints, sorted-pair trees, inclusion
//! proofs, and the anchor service boundary.
//!
//! Many receipts become one anchorable root; each receipt keeps an
//! inclusion proof a third party can check offline with nothing but the
//! fingerprint, the sibling path, and the root. Fingerprints use Blake3
//! (the chain-native hash), distinct from the SHA-256 content commitments
//! inside payloads.

pub mod anchor;
pub mod batch;
pub mod error;
pub mod fingerprint;
pub mod tree;

pub use anchor::{AnchorReference, AnchorService, MemoryAnchor};
pub use batch::{CertificationRecord, MerkleBatch};
pub use error::{CertifyError, Result};
pub use fingerprint::Fingerprint;
pub use tree::{verify_proof, InclusionProof, MerkleRoot, MerkleTree};
