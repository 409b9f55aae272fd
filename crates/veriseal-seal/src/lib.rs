//! # Veriseal Seal
//!
//! End-to-end confidentiality for receipt content: viewing keys,
//! AES-256-GCM envelopes, and binding to the signed hash commitments.
//!
//! The signature never covers encrypted blobs. Instead, each blob is bound
//! to the signed payload through `sha256(decrypt(blob, key)) ==
//! hashes.X_sha256`, so a reader who decrypts successfully and passes the
//! binding check holds exactly the content the signer committed to.
//!
//! Viewing keys never reach a server; only their SHA-256 fingerprint does.

pub mod binding;
pub mod envelope;
pub mod error;
pub mod key;

pub use binding::{open_bound, open_receipt_fields, seal_fields};
pub use envelope::{open, seal, IV_LEN, TAG_LEN};
pub use error::{Result, SealError};
pub use key::ViewingKey;
