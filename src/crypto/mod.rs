//! Cryptographic primitives for FileVault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - The zeroize-on-drop `DerivedKey` wrapper (`keys`)
//! - AES-256-GCM sealing and opening of payloads (`encryption`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_key, ...};
pub use encryption::{open, seal, EncryptedPayload, HEADER_LEN, NONCE_LEN, TAG_LEN};
pub use kdf::{derive, derive_key, generate_salt, Salt, KDF_ITERATIONS, SALT_LEN};
pub use keys::{DerivedKey, KEY_LEN};
