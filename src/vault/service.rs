//! `VaultService` — the four vault operations used by CLI commands.
//!
//! A vault is either uninitialized (no salt record) or initialized.  `init`
//! is the only transition; everything else requires the salt.  The key is
//! re-derived from the password on every call and dropped (zeroized) before
//! the call returns.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use zeroize::Zeroizing;

use crate::crypto::encryption::{open, seal};
use crate::crypto::kdf::{derive, derive_key};
use crate::crypto::keys::DerivedKey;
use crate::errors::{FileVaultError, Result};

use super::format::{create_private_dir, validate_entry_name, write_atomic};
use super::store::{EntryInfo, VaultStore};

/// Orchestrates key derivation, encryption, and storage.
#[derive(Debug, Clone)]
pub struct VaultService {
    store: VaultStore,
}

impl VaultService {
    pub fn new(store: VaultStore) -> Self {
        Self { store }
    }

    /// Convenience constructor for a vault rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(VaultStore::new(root))
    }

    pub fn store_handle(&self) -> &VaultStore {
        &self.store
    }

    pub fn root(&self) -> &Path {
        self.store.root()
    }

    pub fn is_initialized(&self) -> bool {
        self.store.is_initialized()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Initialize the vault: generate and persist a salt.
    ///
    /// The key derived alongside the salt is discarded; only the salt is
    /// written.
    #[instrument(level = "info", skip_all, fields(root = %self.store.root().display()))]
    pub fn init(&self, password: &[u8]) -> Result<()> {
        if self.store.is_initialized() {
            return Err(FileVaultError::AlreadyInitialized(self.store.root().to_path_buf()));
        }

        self.store.ensure_root()?;

        let (key, salt) = derive(password, None)?;
        drop(key);

        self.store.write_salt(&salt)?;
        info!("vault initialized");
        Ok(())
    }

    /// Encrypt the file at `source` and store it under its base name.
    ///
    /// Returns the entry name. Re-storing a name replaces the old entry.
    #[instrument(level = "info", skip_all, fields(source = %source.display()))]
    pub fn store(&self, password: &[u8], source: &Path) -> Result<String> {
        let salt = self.store.read_salt()?;
        let name = entry_name_for(source)?;

        let plaintext = Zeroizing::new(fs::read(source)?);
        let key = derive_key(password, &salt)?;
        let payload = seal(&key, &plaintext)?;
        drop(key);

        self.store.write_entry(&name, &payload)?;
        info!(entry = %name, bytes = plaintext.len(), "file stored");
        Ok(name)
    }

    /// Decrypt entry `name` into `dest_dir/name`, creating `dest_dir` if
    /// needed.
    ///
    /// On a wrong password or a corrupted entry nothing is written, and
    /// both cases surface as the same `DecryptionFailed`.
    #[instrument(level = "info", skip_all, fields(entry = name, dest = %dest_dir.display()))]
    pub fn retrieve(&self, password: &[u8], name: &str, dest_dir: &Path) -> Result<PathBuf> {
        let salt = self.store.read_salt()?;
        validate_entry_name(name)?;

        let payload = self.store.read_entry(name)?;
        let key = derive_key(password, &salt)?;
        let plaintext = self.decrypt(&key, &payload)?;
        drop(key);

        if !dest_dir.is_dir() {
            create_private_dir(dest_dir)?;
        }
        let out_path = dest_dir.join(name);
        write_atomic(&out_path, &plaintext, false)?;

        info!(bytes = plaintext.len(), "file retrieved");
        Ok(out_path)
    }

    /// Names of all stored entries.  No password needed: names are not
    /// encrypted.
    pub fn list(&self) -> Result<BTreeSet<String>> {
        self.require_initialized()?;
        self.store.list_entries()
    }

    /// Like `list`, with sizes and modification times for display.
    pub fn entries(&self) -> Result<Vec<EntryInfo>> {
        self.require_initialized()?;
        self.store.entry_info()
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn require_initialized(&self) -> Result<()> {
        if self.store.is_initialized() {
            Ok(())
        } else {
            Err(FileVaultError::NotInitialized(self.store.root().to_path_buf()))
        }
    }

    fn decrypt(&self, key: &DerivedKey, payload: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        match open(key, payload) {
            Ok(plaintext) => Ok(Zeroizing::new(plaintext)),
            Err(e) => {
                debug!(error = %e, "entry did not open");
                Err(e)
            }
        }
    }
}

/// Derive the entry name from a source path's base name.
fn entry_name_for(source: &Path) -> Result<String> {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FileVaultError::InvalidEntryName(source.display().to_string()))?;
    validate_entry_name(name)?;
    Ok(name.to_string())
}
