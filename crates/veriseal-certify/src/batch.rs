//! Merkle batches: many receipts, one anchorable root.
//!
//! A batch is built once from a finalized set of receipts belonging to one
//! task and is immutable after construction. Each receipt gets an
//! inclusion proof checkable offline against the root alone.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use veriseal_core::{ReceiptPayload, TaskId};

use crate::anchor::{AnchorReference, AnchorService};
use crate::error::{CertifyError, Result};
use crate::fingerprint::Fingerprint;
use crate::tree::{InclusionProof, MerkleRoot, MerkleTree};

/// The durable result of submitting a batch root to an anchor service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationRecord {
    pub batch_id: TaskId,
    pub root: MerkleRoot,
    pub anchor_reference: AnchorReference,
    pub receipt_count: u64,
}

/// A finalized batch: root, ordered leaves, and per-receipt proofs.
#[derive(Debug, Clone)]
pub struct MerkleBatch {
    batch_id: TaskId,
    root: MerkleRoot,
    leaves: Vec<Fingerprint>,
    proofs: HashMap<Fingerprint, InclusionProof>,
}

impl MerkleBatch {
    /// Build a batch from receipt fingerprints.
    ///
    /// Fails with [`CertifyError::EmptyLeafSet`] on an empty set.
    pub fn build(batch_id: TaskId, fingerprints: &[Fingerprint]) -> Result<Self> {
        let tree = MerkleTree::build(fingerprints)?;
        let root = tree.root();

        let leaves: Vec<Fingerprint> = tree.leaves().collect();
        let mut proofs = HashMap::with_capacity(leaves.len());
        for leaf in &leaves {
            // Every leaf of a freshly built tree has a proof.
            let proof = tree.proof(leaf).expect("leaf is in its own tree");
            proofs.insert(*leaf, proof);
        }

        Ok(Self {
            batch_id,
            root,
            leaves,
            proofs,
        })
    }

    /// Build a batch directly from signed payloads.
    pub fn from_payloads(batch_id: TaskId, payloads: &[ReceiptPayload]) -> Result<Self> {
        let fingerprints: Vec<Fingerprint> =
            payloads.iter().map(Fingerprint::of_payload).collect();
        Self::build(batch_id, &fingerprints)
    }

    /// The batch identifier (the task the receipts belong to).
    pub fn batch_id(&self) -> &TaskId {
        &self.batch_id
    }

    /// The anchorable root.
    pub fn root(&self) -> MerkleRoot {
        self.root
    }

    /// The sorted leaf fingerprints.
    pub fn leaves(&self) -> &[Fingerprint] {
        &self.leaves
    }

    /// Number of receipts in the batch.
    pub fn receipt_count(&self) -> u64 {
        self.leaves.len() as u64
    }

    /// The inclusion proof for a fingerprint, if it is in the batch.
    pub fn proof(&self, fingerprint: &Fingerprint) -> Option<&InclusionProof> {
        self.proofs.get(fingerprint)
    }

    /// Like [`proof`](Self::proof), but an error naming the missing leaf.
    pub fn require_proof(&self, fingerprint: &Fingerprint) -> Result<&InclusionProof> {
        self.proof(fingerprint)
            .ok_or_else(|| CertifyError::LeafNotFound(fingerprint.to_hex()))
    }

    /// Submit the root to an anchor service and produce the durable
    /// certification record.
    pub async fn certify(&self, anchor: &dyn AnchorService) -> Result<CertificationRecord> {
        let anchor_reference = anchor.submit(&self.root).await?;
        Ok(CertificationRecord {
            batch_id: self.batch_id.clone(),
            root: self.root,
            anchor_reference,
            receipt_count: self.receipt_count(),
        })
    }
}
