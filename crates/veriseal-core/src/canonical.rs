//! Canonical CBOR encoding for deterministic payload serialization.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison, at every nesting level
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are i64 milliseconds, money is integer micro-USD)
//!
//! There is exactly one canonicalizer and it runs on both the signing and
//! the verification path. Any asymmetry between the two paths silently
//! breaks verification, so no other module may encode a payload.

use ciborium::value::Value;

use crate::crypto::Sha256Hash;
use crate::error::CoreError;
use crate::payload::{
    ActionDescriptor, ActionKind, ContentHashes, CostDescriptor, ModelDescriptor, ReceiptContext,
    ReceiptPayload, Visibility, SCHEMA_VERSION,
};
use crate::types::{AgentId, OwnerId, ReceiptId, SessionId, TaskId};

/// Payload field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR. Nested maps restart at 0.
mod keys {
    pub const VERSION: u64 = 0;
    pub const RECEIPT_ID: u64 = 1;
    pub const AGENT_ID: u64 = 2;
    pub const OWNER_ID: u64 = 3;
    pub const TIMESTAMP: u64 = 4;
    pub const ACTION: u64 = 5;
    pub const MODEL: u64 = 6;
    pub const COST: u64 = 7;
    pub const HASHES: u64 = 8;
    pub const CONTEXT: u64 = 9;
    pub const VISIBILITY: u64 = 10;

    pub const ACTION_KIND: u64 = 0;
    pub const ACTION_NAME: u64 = 1;
    pub const ACTION_DURATION_MS: u64 = 2;

    pub const MODEL_PROVIDER: u64 = 0;
    pub const MODEL_NAME: u64 = 1;
    pub const MODEL_TOKENS_IN: u64 = 2;
    pub const MODEL_TOKENS_OUT: u64 = 3;

    pub const COST_AMOUNT: u64 = 0;
    pub const COST_WAS_ROUTED: u64 = 1;

    pub const HASH_INPUT: u64 = 0;
    pub const HASH_OUTPUT: u64 = 1;

    pub const CTX_TASK_ID: u64 = 0;
    pub const CTX_SESSION_ID: u64 = 1;
    pub const CTX_SEQUENCE: u64 = 2;
}

/// Encode a payload to canonical bytes.
///
/// These are the exact bytes that get signed, and the exact bytes that a
/// verifier must replay.
pub fn canonical_payload_bytes(payload: &ReceiptPayload) -> Vec<u8> {
    let value = payload_to_cbor_value(payload);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value);
    buf
}

fn kv(key: u64, value: Value) -> (Value, Value) {
    (Value::Integer(key.into()), value)
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn hash_bytes(h: &Sha256Hash) -> Value {
    Value::Bytes(h.0.to_vec())
}

/// Convert a payload to a CBOR Value (nested maps with integer keys).
fn payload_to_cbor_value(payload: &ReceiptPayload) -> Value {
    let action = Value::Map(vec![
        kv(keys::ACTION_KIND, Value::Integer(payload.action.kind.to_u16().into())),
        kv(keys::ACTION_NAME, text(&payload.action.name)),
        kv(keys::ACTION_DURATION_MS, Value::Integer(payload.action.duration_ms.into())),
    ]);

    let model = Value::Map(vec![
        kv(keys::MODEL_PROVIDER, text(&payload.model.provider)),
        kv(keys::MODEL_NAME, text(&payload.model.name)),
        kv(keys::MODEL_TOKENS_IN, Value::Integer(payload.model.tokens_in.into())),
        kv(keys::MODEL_TOKENS_OUT, Value::Integer(payload.model.tokens_out.into())),
    ]);

    let cost = Value::Map(vec![
        kv(keys::COST_AMOUNT, Value::Integer(payload.cost.amount_usd_micros.into())),
        kv(keys::COST_WAS_ROUTED, Value::Bool(payload.cost.was_routed)),
    ]);

    let hashes = Value::Map(vec![
        kv(keys::HASH_INPUT, hash_bytes(&payload.hashes.input_sha256)),
        kv(keys::HASH_OUTPUT, hash_bytes(&payload.hashes.output_sha256)),
    ]);

    let task_value = match &payload.context.task_id {
        Some(id) => text(id.as_str()),
        None => Value::Null,
    };
    let context = Value::Map(vec![
        kv(keys::CTX_TASK_ID, task_value),
        kv(keys::CTX_SESSION_ID, text(payload.context.session_id.as_str())),
        kv(keys::CTX_SEQUENCE, Value::Integer(payload.context.sequence.into())),
    ]);

    Value::Map(vec![
        kv(keys::VERSION, Value::Integer(payload.schema_version.into())),
        kv(keys::RECEIPT_ID, text(payload.receipt_id.as_str())),
        kv(keys::AGENT_ID, text(payload.agent_id.as_str())),
        kv(keys::OWNER_ID, text(payload.owner_id.as_str())),
        kv(keys::TIMESTAMP, Value::Integer(payload.timestamp.into())),
        kv(keys::ACTION, action),
        kv(keys::MODEL, model),
        kv(keys::COST, cost),
        kv(keys::HASHES, hashes),
        kv(keys::CONTEXT, context),
        kv(keys::VISIBILITY, Value::Integer(payload.visibility.to_u8().into())),
    ])
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr),
        Value::Map(entries) => encode_map_canonical(buf, entries),
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        _ => unreachable!("floats and tags never appear in canonical payloads"),
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type, smallest form.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item);
    }
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, key_value_pairs.len() as u64);
    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode canonical bytes back into a payload.
///
/// This is an exact parse of the stored bytes, not a reconstruction from
/// normalized fields. Unknown versions and structural surprises are errors.
pub fn decode_payload(bytes: &[u8]) -> Result<ReceiptPayload, CoreError> {
    let cursor = std::io::Cursor::new(bytes);
    let value: Value =
        ciborium::from_reader(cursor).map_err(|e| CoreError::DecodingError(e.to_string()))?;
    cbor_value_to_payload(&value)
}

fn get<'a>(map: &'a [(Value, Value)], key: u64) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))
        .map(|(_, v)| v)
}

fn expect_map<'a>(value: &'a Value, field: &str) -> Result<&'a [(Value, Value)], CoreError> {
    match value {
        Value::Map(m) => Ok(m),
        _ => Err(CoreError::MalformedPayload(format!("{field}: expected map"))),
    }
}

fn expect_text(map: &[(Value, Value)], key: u64, field: &str) -> Result<String, CoreError> {
    match get(map, key) {
        Some(Value::Text(s)) => Ok(s.clone()),
        _ => Err(CoreError::MalformedPayload(format!("{field}: expected text"))),
    }
}

fn expect_u64(map: &[(Value, Value)], key: u64, field: &str) -> Result<u64, CoreError> {
    match get(map, key) {
        Some(Value::Integer(i)) => u64::try_from(i128::from(*i))
            .map_err(|_| CoreError::MalformedPayload(format!("{field}: out of range"))),
        _ => Err(CoreError::MalformedPayload(format!(
            "{field}: expected unsigned integer"
        ))),
    }
}

fn expect_i64(map: &[(Value, Value)], key: u64, field: &str) -> Result<i64, CoreError> {
    match get(map, key) {
        Some(Value::Integer(i)) => i64::try_from(i128::from(*i))
            .map_err(|_| CoreError::MalformedPayload(format!("{field}: out of range"))),
        _ => Err(CoreError::MalformedPayload(format!("{field}: expected integer"))),
    }
}

fn expect_bool(map: &[(Value, Value)], key: u64, field: &str) -> Result<bool, CoreError> {
    match get(map, key) {
        Some(Value::Bool(b)) => Ok(*b),
        _ => Err(CoreError::MalformedPayload(format!("{field}: expected bool"))),
    }
}

fn expect_hash(map: &[(Value, Value)], key: u64, field: &str) -> Result<Sha256Hash, CoreError> {
    match get(map, key) {
        Some(Value::Bytes(b)) if b.len() == 32 => {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(b);
            Ok(Sha256Hash(arr))
        }
        _ => Err(CoreError::MalformedPayload(format!(
            "{field}: expected 32 bytes"
        ))),
    }
}

fn cbor_value_to_payload(value: &Value) -> Result<ReceiptPayload, CoreError> {
    let map = expect_map(value, "payload")?;

    let version_raw = expect_u64(map, keys::VERSION, "schema_version")?;
    let version = u8::try_from(version_raw).map_err(|_| {
        CoreError::MalformedPayload(format!("schema_version out of range: {version_raw}"))
    })?;
    if version != SCHEMA_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let action_map = expect_map(
        get(map, keys::ACTION)
            .ok_or_else(|| CoreError::MalformedPayload("missing action".into()))?,
        "action",
    )?;
    let kind_raw = expect_u64(action_map, keys::ACTION_KIND, "action.kind")?;
    let kind = u16::try_from(kind_raw)
        .ok()
        .and_then(ActionKind::from_u16)
        .ok_or_else(|| CoreError::MalformedPayload(format!("invalid action kind: {kind_raw}")))?;
    let action = ActionDescriptor {
        kind,
        name: expect_text(action_map, keys::ACTION_NAME, "action.name")?,
        duration_ms: expect_u64(action_map, keys::ACTION_DURATION_MS, "action.duration_ms")?,
    };

    let model_map = expect_map(
        get(map, keys::MODEL).ok_or_else(|| CoreError::MalformedPayload("missing model".into()))?,
        "model",
    )?;
    let model = ModelDescriptor {
        provider: expect_text(model_map, keys::MODEL_PROVIDER, "model.provider")?,
        name: expect_text(model_map, keys::MODEL_NAME, "model.name")?,
        tokens_in: expect_u64(model_map, keys::MODEL_TOKENS_IN, "model.tokens_in")?,
        tokens_out: expect_u64(model_map, keys::MODEL_TOKENS_OUT, "model.tokens_out")?,
    };

    let cost_map = expect_map(
        get(map, keys::COST).ok_or_else(|| CoreError::MalformedPayload("missing cost".into()))?,
        "cost",
    )?;
    let cost = CostDescriptor {
        amount_usd_micros: expect_u64(cost_map, keys::COST_AMOUNT, "cost.amount_usd_micros")?,
        was_routed: expect_bool(cost_map, keys::COST_WAS_ROUTED, "cost.was_routed")?,
    };

    let hashes_map = expect_map(
        get(map, keys::HASHES)
            .ok_or_else(|| CoreError::MalformedPayload("missing hashes".into()))?,
        "hashes",
    )?;
    let hashes = ContentHashes {
        input_sha256: expect_hash(hashes_map, keys::HASH_INPUT, "hashes.input_sha256")?,
        output_sha256: expect_hash(hashes_map, keys::HASH_OUTPUT, "hashes.output_sha256")?,
    };

    let ctx_map = expect_map(
        get(map, keys::CONTEXT)
            .ok_or_else(|| CoreError::MalformedPayload("missing context".into()))?,
        "context",
    )?;
    let task_id = match get(ctx_map, keys::CTX_TASK_ID) {
        Some(Value::Text(s)) => Some(TaskId::new(s.clone())),
        Some(Value::Null) | None => None,
        _ => {
            return Err(CoreError::MalformedPayload(
                "context.task_id: expected text or null".into(),
            ))
        }
    };
    let context = ReceiptContext {
        task_id,
        session_id: SessionId::new(expect_text(ctx_map, keys::CTX_SESSION_ID, "context.session_id")?),
        sequence: expect_u64(ctx_map, keys::CTX_SEQUENCE, "context.sequence")?,
    };

    let visibility_raw = expect_u64(map, keys::VISIBILITY, "visibility")?;
    let visibility = u8::try_from(visibility_raw)
        .ok()
        .and_then(Visibility::from_u8)
        .ok_or_else(|| {
            CoreError::MalformedPayload(format!("invalid visibility: {visibility_raw}"))
        })?;

    Ok(ReceiptPayload {
        schema_version: version,
        receipt_id: ReceiptId::new(expect_text(map, keys::RECEIPT_ID, "receipt_id")?),
        agent_id: AgentId::new(expect_text(map, keys::AGENT_ID, "agent_id")?),
        owner_id: OwnerId::new(expect_text(map, keys::OWNER_ID, "owner_id")?),
        timestamp: expect_i64(map, keys::TIMESTAMP, "timestamp")?,
        action,
        model,
        cost,
        hashes,
        context,
        visibility,
    })
}
