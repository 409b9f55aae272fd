//! Key registry abstraction.
//!
//! Verification needs an independent source of truth for which signing key
//! belongs to which agent. A receipt carries its own public key, but a
//! forger can carry any key they like; the registry is what binds the key
//! to the claimed identity. Deployments back this with a directory service
//! or an on-chain registry; tests use [`MemoryKeyRegistry`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use veriseal_core::{AgentId, Ed25519PublicKey};

use crate::error::Result;

/// Resolves agent identities to their registered signing keys.
#[async_trait]
pub trait KeyRegistry: Send + Sync {
    /// The registered public key for an agent, or `None` if the agent is
    /// unknown to this registry.
    async fn resolve_public_key(&self, agent_id: &AgentId) -> Result<Option<Ed25519PublicKey>>;
}

/// In-memory key registry for tests and single-process deployments.
pub struct MemoryKeyRegistry {
    keys: RwLock<HashMap<AgentId, Ed25519PublicKey>>,
}

impl MemoryKeyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Register (or replace) an agent's signing key.
    pub async fn register(&self, agent_id: AgentId, public_key: Ed25519PublicKey) {
        self.keys.write().await.insert(agent_id, public_key);
    }
}

impl Default for MemoryKeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyRegistry for MemoryKeyRegistry {
    async fn resolve_public_key(&self, agent_id: &AgentId) -> Result<Option<Ed25519PublicKey>> {
        Ok(self.keys.read().await.get(agent_id).cloned())
    }
}
