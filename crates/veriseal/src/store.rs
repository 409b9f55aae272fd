//! Payload store abstraction.
//!
//! Verification replays the literal bytes that were signed. The store
//! therefore keeps the exact canonical encoding of each payload, keyed by
//! receipt identifier; rebuilding payloads from normalized columns and
//! re-encoding them is deliberately unsupported, because any lossy
//! round trip (field substitution, unit conversion, casing) silently
//! changes the signed message.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use veriseal_core::ReceiptId;

use crate::error::Result;

/// Stores the exact canonical bytes of signed payloads.
#[async_trait]
pub trait PayloadStore: Send + Sync {
    /// Persist the literal canonical bytes for a receipt. Overwrites any
    /// previous bytes for the same identifier.
    async fn put_canonical(&self, receipt_id: &ReceiptId, canonical_bytes: &[u8]) -> Result<()>;

    /// Fetch the stored canonical bytes, or `None` if the receipt is
    /// unknown.
    async fn get_canonical(&self, receipt_id: &ReceiptId) -> Result<Option<Vec<u8>>>;
}

/// In-memory payload store for tests and single-process deployments.
pub struct MemoryPayloadStore {
    payloads: RwLock<HashMap<ReceiptId, Vec<u8>>>,
}

impl MemoryPayloadStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            payloads: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored payloads.
    pub async fn len(&self) -> usize {
        self.payloads.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.payloads.read().await.is_empty()
    }
}

impl Default for MemoryPayloadStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PayloadStore for MemoryPayloadStore {
    async fn put_canonical(&self, receipt_id: &ReceiptId, canonical_bytes: &[u8]) -> Result<()> {
        self.payloads
            .write()
            .await
            .insert(receipt_id.clone(), canonical_bytes.to_vec());
        Ok(())
    }

    async fn get_canonical(&self, receipt_id: &ReceiptId) -> Result<Option<Vec<u8>>> {
        Ok(self.payloads.read().await.get(receipt_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stored_bytes_come_back_verbatim() {
        let store = MemoryPayloadStore::new();
        let id = ReceiptId::new("rcpt-1");
        let bytes = vec![0xa5, 0x00, 0x01, 0x01, 0x62, 0x68, 0x69];

        store.put_canonical(&id, &bytes).await.unwrap();
        let fetched = store.get_canonical(&id).await.unwrap();
        assert_eq!(fetched, Some(bytes));
    }

    #[tokio::test]
    async fn test_unknown_receipt_is_none() {
        let store = MemoryPayloadStore::new();
        let fetched = store.get_canonical(&ReceiptId::new("missing")).await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryPayloadStore::new();
        let id = ReceiptId::new("rcpt-1");

        store.put_canonical(&id, &[1, 2, 3]).await.unwrap();
        store.put_canonical(&id, &[4, 5, 6]).await.unwrap();

        assert_eq!(store.get_canonical(&id).await.unwrap(), Some(vec![4, 5, 6]));
        assert_eq!(store.len().await, 1);
    }
}
