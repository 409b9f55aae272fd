//! # Veriseal Testkit
//!
//! Testing utilities for the Veriseal receipt protocol.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known test cases with expected outputs for cross-platform verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! Golden vectors ensure deterministic canonicalization across implementations:
//!
//! ```rust
//! use veriseal_testkit::vectors::{all_vectors, payload_from_vector};
//! use veriseal_core::canonical_payload_bytes;
//!
//! for vector in all_vectors() {
//!     let payload = payload_from_vector(&vector);
//!     println!("{}: {}", vector.name, hex::encode(canonical_payload_bytes(&payload)));
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use veriseal_testkit::generators::{receipt_from_params, DraftParams};
//!
//! proptest! {
//!     #[test]
//!     fn signatures_verify(params: DraftParams) {
//!         let receipt = receipt_from_params(&params);
//!         prop_assert!(veriseal_core::verify_payload(&receipt.payload, &receipt.signature));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use veriseal_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_seed([0x42; 32]);
//! let receipts = fixture.receipts_for_task("task-1", 3);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_agent_fixtures, TestFixture};
pub use generators::{payload_from_params, receipt_from_params, DraftParams};
pub use vectors::{all_vectors, payload_from_vector, receipt_from_vector, GoldenVector};
