//! Sorted-pair Merkle trees over receipt fingerprints.
//!
//! Construction rules, identical on prover and verifier side:
//! - the leaf level is sorted, so the root depends only on the leaf
//!   multiset, not on input order;
//! - every internal pairing sorts its two children before hashing;
//! - an odd node at any level is carried forward unpaired.
//!
//! Sorting pairs means a proof path needs no left/right flags:
//! verification re-sorts at every step.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CertifyError, Result};
use crate::fingerprint::Fingerprint;

/// Domain prefix for internal node hashing, separating node hashes from
/// leaf fingerprints.
const NODE_DOMAIN: &[u8] = b"veriseal/node/v1";

/// A 32-byte Merkle root.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MerkleRoot(pub [u8; 32]);

impl MerkleRoot {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for MerkleRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MerkleRoot({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for MerkleRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An inclusion proof: the ordered sibling path from a leaf to the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// The leaf this proof is for.
    pub leaf: Fingerprint,
    /// The leaf's index in the sorted leaf level.
    pub index: u64,
    /// Sibling hashes, leaf level first. A carried-forward level
    /// contributes no entry.
    pub path: Vec<[u8; 32]>,
}

/// A Merkle tree built once from a finalized leaf set.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// levels[0] is the sorted leaf level; the last level has one node.
    levels: Vec<Vec<[u8; 32]>>,
}

/// Hash an internal pairing, sorting the children first.
fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = blake3::Hasher::new();
    hasher.update(NODE_DOMAIN);
    hasher.update(lo);
    hasher.update(hi);
    *hasher.finalize().as_bytes()
}

impl MerkleTree {
    /// Build a tree from a leaf multiset.
    ///
    /// Fails with [`CertifyError::EmptyLeafSet`] on zero leaves. Input
    /// order does not affect the root.
    pub fn build(leaves: &[Fingerprint]) -> Result<Self> {
        if leaves.is_empty() {
            return Err(CertifyError::EmptyLeafSet);
        }

        let mut level: Vec<[u8; 32]> = leaves.iter().map(|f| f.0).collect();
        level.sort_unstable();

        let mut levels = vec![level];
        while levels.last().expect("at least one level").len() > 1 {
            let current = levels.last().expect("at least one level");
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match pair {
                    [a, b] => next.push(hash_pair(a, b)),
                    // Odd node: carried forward unpaired.
                    [a] => next.push(*a),
                    _ => unreachable!("chunks(2) yields 1 or 2 items"),
                }
            }
            levels.push(next);
        }

        Ok(Self { levels })
    }

    /// The root of the tree.
    pub fn root(&self) -> MerkleRoot {
        MerkleRoot(self.levels.last().expect("nonempty tree")[0])
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// The sorted leaf level.
    pub fn leaves(&self) -> impl Iterator<Item = Fingerprint> + '_ {
        self.levels[0].iter().copied().map(Fingerprint)
    }

    /// Build the inclusion proof for a leaf, or `None` if it is not in
    /// the tree.
    pub fn proof(&self, leaf: &Fingerprint) -> Option<InclusionProof> {
        let mut index = self.levels[0].iter().position(|l| *l == leaf.0)?;
        let leaf_index = index as u64;

        let mut path = Vec::new();
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = index ^ 1;
            if sibling < level.len() {
                path.push(level[sibling]);
            }
            // else: carried forward, no sibling at this level
            index /= 2;
        }

        Some(InclusionProof {
            leaf: *leaf,
            index: leaf_index,
            path,
        })
    }
}

/// Verify an inclusion proof against a root.
///
/// Pure and stateless: re-hashes upward with the same sorted-pair rule,
/// O(log n) in the batch size. Suitable for offline third-party checking.
pub fn verify_proof(leaf: &Fingerprint, path: &[[u8; 32]], root: &MerkleRoot) -> bool {
    let mut node = leaf.0;
    for sibling in path {
        node = hash_pair(&node, sibling);
    }
    node == root.0
}
