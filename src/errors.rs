use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in FileVault.
///
/// No variant ever carries a password, a derived key, or plaintext.
#[derive(Debug, Error)]
pub enum FileVaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Authentication tag did not verify. Wrong key and tampered data are
    /// deliberately reported the same way.
    #[error("Decryption failed — wrong password or corrupted file")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("Vault not initialized at {0} — run `filevault init` first")]
    NotInitialized(PathBuf),

    #[error("Vault already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("'{0}' not found in vault")]
    EntryNotFound(String),

    #[error("Invalid vault format: {0}")]
    InvalidFormat(String),

    #[error("Invalid entry name '{0}'")]
    InvalidEntryName(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for FileVault results.
pub type Result<T> = std::result::Result<T, FileVaultError>;
