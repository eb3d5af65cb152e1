//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The work factor is fixed at `KDF_ITERATIONS` and is part of the vault
//! format: the salt file carries no parameters, so every invocation must
//! derive with exactly the same settings to arrive at the same key.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use super::keys::{DerivedKey, KEY_LEN};
use crate::errors::{FileVaultError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// PBKDF2 iteration count used for every vault.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Lowest iteration count `derive_key_with_iterations` will accept.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// A vault salt.
pub type Salt = [u8; SALT_LEN];

/// Derive a key, generating a fresh salt when none is given.
///
/// The `None` path is only used when a vault is initialized; every later
/// operation passes the persisted salt back in.
pub fn derive(password: &[u8], salt: Option<&Salt>) -> Result<(DerivedKey, Salt)> {
    let salt = match salt {
        Some(existing) => *existing,
        None => generate_salt()?,
    };
    let key = derive_key(password, &salt)?;
    Ok((key, salt))
}

/// Derive the 32-byte vault key from a password and salt.
///
/// The same password + salt always produces the same key.
pub fn derive_key(password: &[u8], salt: &Salt) -> Result<DerivedKey> {
    derive_key_with_iterations(password, salt, KDF_ITERATIONS)
}

/// Derive a key with an explicit iteration count.
///
/// Refuses counts below `MIN_KDF_ITERATIONS`.
pub fn derive_key_with_iterations(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<DerivedKey> {
    if iterations < MIN_KDF_ITERATIONS {
        return Err(FileVaultError::KeyDerivationFailed(format!(
            "PBKDF2 iterations must be at least {MIN_KDF_ITERATIONS} (got {iterations})"
        )));
    }
    if salt.is_empty() {
        return Err(FileVaultError::KeyDerivationFailed(
            "salt cannot be empty".into(),
        ));
    }

    let mut bytes = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut bytes);
    let key = DerivedKey::new(bytes);
    bytes.zeroize();

    Ok(key)
}

/// Generate a random salt from the operating system's CSPRNG.
pub fn generate_salt() -> Result<Salt> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| FileVaultError::KeyDerivationFailed(format!("OS RNG unavailable: {e}")))?;
    Ok(salt)
}
