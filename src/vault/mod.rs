//! Vault module — encrypted file storage.
//!
//! This module provides:
//! - The vault root layout and atomic writes (`format`)
//! - `VaultStore` for the salt record and per-file entries (`store`)
//! - `VaultService` with the init / store / retrieve / list operations (`service`)

pub mod format;
pub mod service;
pub mod store;

// Re-export the most commonly used items.
pub use format::{validate_entry_name, ENTRY_SUFFIX, SALT_FILE_NAME};
pub use service::VaultService;
pub use store::{EntryInfo, VaultStore};
