//! Receipt payload: the signed record of a single agent action.
//!
//! A payload is immutable once constructed. It commits to the action's
//! input and output through SHA-256 hashes; the raw content never enters
//! the signed structure. Encrypted blobs and the signature itself are
//! likewise outside the signed field set.

use serde::{Deserialize, Serialize};

use crate::crypto::{Sha256Hash, SignatureBlock};
use crate::error::CoreError;
use crate::types::{AgentId, OwnerId, ReceiptId, SessionId, TaskId};

/// The fixed schema version of the signed payload scheme.
///
/// Any other value is rejected as `UnsupportedVersion` on both the encode
/// and decode paths.
pub const SCHEMA_VERSION: u8 = 1;

/// The kind of action a receipt records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum ActionKind {
    /// A model inference call.
    Inference = 0x0001,
    /// An external tool invocation.
    ToolCall = 0x0002,
    /// A retrieval / search step.
    Retrieval = 0x0003,
    /// Code execution in a sandbox.
    CodeExec = 0x0004,
}

impl ActionKind {
    /// Convert to u16 for canonical encoding.
    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Try to parse from u16.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0001 => Some(Self::Inference),
            0x0002 => Some(Self::ToolCall),
            0x0003 => Some(Self::Retrieval),
            0x0004 => Some(Self::CodeExec),
            _ => None,
        }
    }
}

/// Who may see the receipt's decrypted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Visibility {
    /// Owner only.
    Private = 1,
    /// Owner's team.
    Team = 2,
    /// Anyone holding the receipt.
    Public = 3,
}

impl Visibility {
    /// Convert to u8 for canonical encoding.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Try to parse from u8.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Private),
            2 => Some(Self::Team),
            3 => Some(Self::Public),
            _ => None,
        }
    }
}

/// What the agent did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub kind: ActionKind,
    pub name: String,
    pub duration_ms: u64,
}

/// Which model served the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub provider: String,
    pub name: String,
    pub tokens_in: u64,
    pub tokens_out: u64,
}

/// What the action cost.
///
/// Amounts are integer micro-USD so canonical bytes never carry a float.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostDescriptor {
    pub amount_usd_micros: u64,
    pub was_routed: bool,
}

/// SHA-256 commitments over the raw input and output text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentHashes {
    pub input_sha256: Sha256Hash,
    pub output_sha256: Sha256Hash,
}

/// Where the receipt sits in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptContext {
    pub task_id: Option<TaskId>,
    pub session_id: SessionId,
    /// 0-indexed position within the session; increments by exactly 1.
    pub sequence: u64,
}

/// The complete signed field set of a receipt.
///
/// This struct is exactly what the canonical serializer encodes. Adding,
/// removing, or re-representing a field here changes the signed bytes and
/// silently breaks verification of existing receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptPayload {
    pub schema_version: u8,
    pub receipt_id: ReceiptId,
    pub agent_id: AgentId,
    pub owner_id: OwnerId,
    /// Signer-claimed timestamp (Unix milliseconds). Untrusted.
    pub timestamp: i64,
    pub action: ActionDescriptor,
    pub model: ModelDescriptor,
    pub cost: CostDescriptor,
    pub hashes: ContentHashes,
    pub context: ReceiptContext,
    pub visibility: Visibility,
}

impl ReceiptPayload {
    /// Check the schema version tag.
    pub fn check_version(&self) -> Result<(), CoreError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(CoreError::UnsupportedVersion(self.schema_version));
        }
        Ok(())
    }
}

/// Optional confidentiality addendum: AEAD blobs over the raw input and
/// output, base64-encoded for the wire.
///
/// Not covered by the signature. Bound to the signed payload through
/// `sha256(decrypt(blob, key)) == hashes.X_sha256`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedFields {
    pub encrypted_input: String,
    pub encrypted_output: String,
}

/// The full wire shape: payload + signature block + optional encrypted blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedReceipt {
    pub payload: ReceiptPayload,
    pub signature: SignatureBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<EncryptedFields>,
}
