//! `VaultStore` — the vault root directory on disk.
//!
//! Owns the salt record and the per-file encrypted entries.  It only moves
//! opaque bytes around; all cryptography happens in `VaultService`.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::crypto::kdf::{Salt, SALT_LEN};
use crate::crypto::HEADER_LEN;
use crate::errors::{FileVaultError, Result};

use super::format::{
    create_private_dir, entry_file_name, entry_name_from_file, validate_entry_name, write_atomic,
    SALT_FILE_NAME,
};

/// Display metadata about a stored entry (no ciphertext).
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    pub name: String,
    /// Size of the original file in bytes.
    pub size: u64,
    /// Last time the entry was (re)stored, if the filesystem reports it.
    pub modified: Option<DateTime<Utc>>,
}

/// Handle to a vault root directory.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
}

impl VaultStore {
    /// Create a handle; nothing touches the disk until an operation runs.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `true` if a salt record exists.
    pub fn is_initialized(&self) -> bool {
        self.salt_path().is_file()
    }

    /// Create the vault root if it does not exist yet. Idempotent.
    pub fn ensure_root(&self) -> Result<()> {
        if !self.root.is_dir() {
            create_private_dir(&self.root)?;
            debug!(root = %self.root.display(), "created vault root");
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Salt
    // ------------------------------------------------------------------

    /// Persist the salt. Fails if one already exists.
    ///
    /// Overwriting the salt would orphan every entry encrypted under the
    /// old key, so this never replaces an existing record.
    pub fn write_salt(&self, salt: &Salt) -> Result<()> {
        let path = self.salt_path();
        if path.exists() {
            return Err(FileVaultError::AlreadyInitialized(self.root.clone()));
        }

        // no_clobber closes the window between the check above and the rename.
        write_atomic(&path, salt, true).map_err(|e| match e {
            FileVaultError::Io(io) if io.kind() == ErrorKind::AlreadyExists => {
                FileVaultError::AlreadyInitialized(self.root.clone())
            }
            other => other,
        })?;

        debug!(root = %self.root.display(), "salt written");
        Ok(())
    }

    /// Load the salt.
    pub fn read_salt(&self) -> Result<Salt> {
        let data = fs::read(self.salt_path()).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FileVaultError::NotInitialized(self.root.clone()),
            _ => FileVaultError::Io(e),
        })?;

        data.as_slice().try_into().map_err(|_| {
            FileVaultError::InvalidFormat(format!(
                "salt record is {} bytes, expected {SALT_LEN}",
                data.len()
            ))
        })
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Persist an entry atomically, replacing any previous entry of the
    /// same name.
    pub fn write_entry(&self, name: &str, payload: &[u8]) -> Result<()> {
        let path = self.entry_path(name)?;
        write_atomic(&path, payload, false)?;
        debug!(entry = name, bytes = payload.len(), "entry written");
        Ok(())
    }

    /// Read an entry's raw payload.
    pub fn read_entry(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.entry_path(name)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FileVaultError::EntryNotFound(name.to_string()),
            _ => FileVaultError::Io(e),
        })
    }

    /// Returns `true` if an entry with the given name exists.
    pub fn contains_entry(&self, name: &str) -> bool {
        self.entry_path(name).is_ok_and(|p| p.is_file())
    }

    /// Names of all stored entries, sorted.
    pub fn list_entries(&self) -> Result<BTreeSet<String>> {
        Ok(self.scan()?.into_iter().map(|(name, _)| name).collect())
    }

    /// Names plus size and modification time, sorted by name.
    pub fn entry_info(&self) -> Result<Vec<EntryInfo>> {
        let mut infos = Vec::new();
        for (name, path) in self.scan()? {
            let meta = fs::metadata(&path)?;
            infos.push(EntryInfo {
                name,
                size: meta.len().saturating_sub(HEADER_LEN as u64),
                modified: meta.modified().ok().map(DateTime::<Utc>::from),
            });
        }
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }

    // ------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------

    fn salt_path(&self) -> PathBuf {
        self.root.join(SALT_FILE_NAME)
    }

    fn entry_path(&self, name: &str) -> Result<PathBuf> {
        validate_entry_name(name)?;
        Ok(self.root.join(entry_file_name(name)))
    }

    /// Every regular file in the root that maps to an entry name.
    fn scan(&self) -> Result<Vec<(String, PathBuf)>> {
        let dir = fs::read_dir(&self.root).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FileVaultError::NotInitialized(self.root.clone()),
            _ => FileVaultError::Io(e),
        })?;

        let mut found = Vec::new();
        for item in dir {
            let item = item?;
            if !item.file_type()?.is_file() {
                continue;
            }
            let file_name = item.file_name();
            // Non-UTF-8 names can't have been written by us.
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = entry_name_from_file(file_name) {
                found.push((name.to_string(), item.path()));
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, VaultStore) {
        let dir = TempDir::new().unwrap();
        let store = VaultStore::new(dir.path().join("vault"));
        (dir, store)
    }

    #[test]
    fn ensure_root_is_idempotent() {
        let (_dir, store) = store();
        store.ensure_root().unwrap();
        store.ensure_root().unwrap();
        assert!(store.root().is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn root_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = store();
        store.ensure_root().unwrap();
        let mode = fs::metadata(store.root()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn salt_roundtrip_and_write_once() {
        let (_dir, store) = store();
        store.ensure_root().unwrap();
        assert!(!store.is_initialized());

        let salt = [9u8; SALT_LEN];
        store.write_salt(&salt).unwrap();
        assert!(store.is_initialized());
        assert_eq!(store.read_salt().unwrap(), salt);

        let err = store.write_salt(&[1u8; SALT_LEN]).unwrap_err();
        assert!(matches!(err, FileVaultError::AlreadyInitialized(_)));
        assert_eq!(store.read_salt().unwrap(), salt, "salt must not change");
    }

    #[test]
    fn read_salt_before_init_is_not_initialized() {
        let (_dir, store) = store();
        assert!(matches!(
            store.read_salt(),
            Err(FileVaultError::NotInitialized(_))
        ));
    }

    #[test]
    fn truncated_salt_is_format_error() {
        let (_dir, store) = store();
        store.ensure_root().unwrap();
        fs::write(store.root().join(SALT_FILE_NAME), [0u8; 4]).unwrap();
        assert!(matches!(
            store.read_salt(),
            Err(FileVaultError::InvalidFormat(_))
        ));
    }

    #[test]
    fn entries_overwrite_and_read_back() {
        let (_dir, store) = store();
        store.ensure_root().unwrap();

        store.write_entry("note", b"first").unwrap();
        store.write_entry("note", b"second").unwrap();

        assert_eq!(store.read_entry("note").unwrap(), b"second");
        assert!(store.contains_entry("note"));
        assert!(!store.contains_entry("other"));
    }

    #[test]
    fn missing_entry_is_not_found() {
        let (_dir, store) = store();
        store.ensure_root().unwrap();
        match store.read_entry("nope") {
            Err(FileVaultError::EntryNotFound(name)) => assert_eq!(name, "nope"),
            other => panic!("expected EntryNotFound, got {other:?}"),
        }
    }

    #[test]
    fn entry_names_are_validated() {
        let (_dir, store) = store();
        store.ensure_root().unwrap();
        assert!(matches!(
            store.write_entry("../evil", b"x"),
            Err(FileVaultError::InvalidEntryName(_))
        ));
        assert!(matches!(
            store.read_entry("a/b"),
            Err(FileVaultError::InvalidEntryName(_))
        ));
    }

    #[test]
    fn list_ignores_salt_temp_and_foreign_files() {
        let (_dir, store) = store();
        store.ensure_root().unwrap();
        store.write_salt(&[0u8; SALT_LEN]).unwrap();
        store.write_entry("y", b"payload").unwrap();
        store.write_entry("x", b"payload").unwrap();
        fs::write(store.root().join(".abc.tmp"), b"partial").unwrap();
        fs::write(store.root().join("README"), b"hi").unwrap();
        fs::create_dir(store.root().join("dir.enc")).unwrap();

        let names: Vec<String> = store.list_entries().unwrap().into_iter().collect();
        assert_eq!(names, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn list_on_missing_root_is_not_initialized() {
        let (_dir, store) = store();
        assert!(matches!(
            store.list_entries(),
            Err(FileVaultError::NotInitialized(_))
        ));
    }

    #[test]
    fn entry_info_reports_plaintext_size() {
        let (_dir, store) = store();
        store.ensure_root().unwrap();
        store.write_entry("doc", &vec![0u8; HEADER_LEN + 10]).unwrap();

        let infos = store.entry_info().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].name, "doc");
        assert_eq!(infos[0].size, 10);
        assert!(infos[0].modified.is_some());
    }
}
