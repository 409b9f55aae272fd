//! Golden vector tests for the full stack.
//!
//! The signing path and the verification path must agree on the exact
//! canonical bytes for every vector, and the wire shape must survive JSON
//! transport without disturbing the signed message.

use veriseal::core::{canonical_payload_bytes, verify_bytes, verify_payload, SignedReceipt};
use veriseal::{MemoryKeyRegistry, MemoryPayloadStore, SignatureStatus, TrustEvaluator};
use veriseal_testkit::vectors::{all_vectors, receipt_from_vector, verify_all_vectors};

#[test]
fn golden_vectors_match() {
    for (name, matches, hex) in verify_all_vectors() {
        assert!(matches, "vector '{name}' produced {hex}");
    }
}

#[test]
fn golden_vectors_verify_on_both_paths() {
    for vector in all_vectors() {
        let receipt = receipt_from_vector(&vector);
        let bytes = canonical_payload_bytes(&receipt.payload);

        assert!(
            verify_payload(&receipt.payload, &receipt.signature),
            "vector '{}' failed on the live path",
            vector.name
        );
        assert!(
            verify_bytes(&bytes, &receipt.signature),
            "vector '{}' failed on the replay path",
            vector.name
        );
    }
}

#[test]
fn golden_receipts_survive_json_transport() {
    for vector in all_vectors() {
        let receipt = receipt_from_vector(&vector);
        let json = serde_json::to_string(&receipt).unwrap();
        let decoded: SignedReceipt = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, receipt, "vector '{}' drifted in JSON", vector.name);
        assert!(
            verify_payload(&decoded.payload, &decoded.signature),
            "vector '{}' no longer verifies after transport",
            vector.name
        );
    }
}

#[tokio::test]
async fn golden_receipts_evaluate_trusted() {
    let evaluator = TrustEvaluator::new(MemoryKeyRegistry::new(), MemoryPayloadStore::new());
    for vector in all_vectors() {
        let receipt = receipt_from_vector(&vector);
        evaluator.record(&receipt).await.unwrap();

        let report = evaluator.evaluate(&receipt, None, None).await.unwrap();
        assert_eq!(report.signature, SignatureStatus::Valid, "vector '{}'", vector.name);
        assert!(report.is_trusted(), "vector '{}'", vector.name);
    }
}
