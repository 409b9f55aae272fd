//! Anchor service abstraction.
//!
//! Anchoring durably and publicly commits a Merkle root somewhere outside
//! this system: a chain, a timestamping authority, an append-only log. The
//! engine only needs `submit(root) -> reference`; fees, confirmation
//! latency, and chain identifiers are the implementation's concern, as are
//! timeout and retry policy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

use crate::error::Result;
use crate::tree::MerkleRoot;

/// An opaque reference handed back by an anchor service, sufficient for a
/// third party to locate the committed root.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorReference(pub String);

impl AnchorReference {
    /// Create from any string-like value.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Get the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AnchorReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnchorReference({})", self.0)
    }
}

impl fmt::Display for AnchorReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The capability the certification engine needs from an anchoring medium.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait AnchorService: Send + Sync {
    /// Durably commit a root, returning a reference a third party can use
    /// to find it.
    async fn submit(&self, root: &MerkleRoot) -> Result<AnchorReference>;
}

/// In-memory anchor for tests: records every submitted root.
pub struct MemoryAnchor {
    submissions: Mutex<Vec<MerkleRoot>>,
}

impl MemoryAnchor {
    /// Create an empty anchor.
    pub fn new() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// All roots submitted so far, in order.
    pub fn submissions(&self) -> Vec<MerkleRoot> {
        self.submissions.lock().expect("anchor lock poisoned").clone()
    }
}

impl Default for MemoryAnchor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnchorService for MemoryAnchor {
    async fn submit(&self, root: &MerkleRoot) -> Result<AnchorReference> {
        let mut submissions = self.submissions.lock().expect("anchor lock poisoned");
        submissions.push(*root);
        Ok(AnchorReference::new(format!(
            "memory:{}:{}",
            submissions.len() - 1,
            &root.to_hex()[..16]
        )))
    }
}
