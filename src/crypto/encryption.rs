//! AES-256-GCM authenticated encryption.
//!
//! Each call to `seal` generates a fresh random 12-byte nonce.  The tag is
//! computed detached so the payload can carry it in front of the
//! ciphertext.
//!
//! Layout of a sealed payload:
//!
//! ```text
//! [nonce: 12 bytes][tag: 16 bytes][ciphertext: plaintext length]
//! ```
//!
//! Nonce and tag lengths are independent constants.  Nothing in the payload
//! encodes a length; the ciphertext is whatever follows the header.

use aes_gcm::aead::{AeadCore, AeadInPlace, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce, Tag};
use zeroize::Zeroize;

use super::keys::DerivedKey;
use crate::errors::{FileVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Fixed-size prefix of every payload: nonce + tag.
pub const HEADER_LEN: usize = NONCE_LEN + TAG_LEN;

/// A payload split into its three fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
    pub ciphertext: Vec<u8>,
}

impl EncryptedPayload {
    /// Split raw bytes into nonce, tag and ciphertext.
    ///
    /// Anything shorter than `HEADER_LEN` is malformed.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(FileVaultError::InvalidFormat(format!(
                "payload is {} bytes, shorter than the {HEADER_LEN}-byte header",
                data.len()
            )));
        }

        let (nonce, rest) = data.split_at(NONCE_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);

        let mut payload = Self {
            nonce: [0u8; NONCE_LEN],
            tag: [0u8; TAG_LEN],
            ciphertext: ciphertext.to_vec(),
        };
        payload.nonce.copy_from_slice(nonce);
        payload.tag.copy_from_slice(tag);
        Ok(payload)
    }

    /// Serialize as `nonce || tag || ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.ciphertext);
        out
    }
}

/// Encrypt `plaintext` under `key`.
///
/// Returns the serialized payload (nonce || tag || ciphertext).
pub fn seal(key: &DerivedKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    // Never reuse a nonce under the same key.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut buffer = plaintext.to_vec();
    let tag = match cipher.encrypt_in_place_detached(&nonce, b"", &mut buffer) {
        Ok(tag) => tag,
        Err(e) => {
            buffer.zeroize();
            return Err(FileVaultError::EncryptionFailed(format!(
                "encryption error: {e}"
            )));
        }
    };

    let mut payload = EncryptedPayload {
        nonce: [0u8; NONCE_LEN],
        tag: [0u8; TAG_LEN],
        ciphertext: buffer,
    };
    payload.nonce.copy_from_slice(&nonce);
    payload.tag.copy_from_slice(&tag);
    Ok(payload.to_bytes())
}

/// Decrypt a payload produced by `seal`.
///
/// Fails with `InvalidFormat` before any cryptographic work if the payload
/// is shorter than the header, and with `DecryptionFailed` whenever the tag
/// does not verify.  No plaintext bytes escape on failure.
pub fn open(key: &DerivedKey, payload: &[u8]) -> Result<Vec<u8>> {
    let EncryptedPayload {
        nonce,
        tag,
        ciphertext,
    } = EncryptedPayload::from_bytes(payload)?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let mut buffer = ciphertext;
    let verified = cipher.decrypt_in_place_detached(
        Nonce::from_slice(&nonce),
        b"",
        &mut buffer,
        Tag::from_slice(&tag),
    );

    if verified.is_err() {
        buffer.zeroize();
        return Err(FileVaultError::DecryptionFailed);
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KEY_LEN;

    fn key(byte: u8) -> DerivedKey {
        DerivedKey::new([byte; KEY_LEN])
    }

    #[test]
    fn payload_length_is_header_plus_plaintext() {
        let sealed = seal(&key(1), b"hello").unwrap();
        assert_eq!(sealed.len(), HEADER_LEN + 5);
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let sealed = seal(&key(2), b"").unwrap();
        assert_eq!(sealed.len(), HEADER_LEN);
        assert!(open(&key(2), &sealed).unwrap().is_empty());
    }

    #[test]
    fn payload_fields_split_at_fixed_offsets() {
        let sealed = seal(&key(3), b"abc").unwrap();
        let parsed = EncryptedPayload::from_bytes(&sealed).unwrap();
        assert_eq!(&parsed.nonce[..], &sealed[..NONCE_LEN]);
        assert_eq!(&parsed.tag[..], &sealed[NONCE_LEN..HEADER_LEN]);
        assert_eq!(&parsed.ciphertext[..], &sealed[HEADER_LEN..]);
        assert_eq!(parsed.to_bytes(), sealed);
    }

    #[test]
    fn short_payload_is_format_error() {
        for len in [0, 1, NONCE_LEN, HEADER_LEN - 1] {
            let err = open(&key(4), &vec![0u8; len]).unwrap_err();
            assert!(
                matches!(err, FileVaultError::InvalidFormat(_)),
                "len {len}: {err:?}"
            );
        }
    }

    #[test]
    fn header_only_garbage_is_integrity_error() {
        let err = open(&key(5), &[0u8; HEADER_LEN]).unwrap_err();
        assert!(matches!(err, FileVaultError::DecryptionFailed));
    }

    #[test]
    fn swapped_tag_fails() {
        let k = key(6);
        let a = seal(&k, b"first").unwrap();
        let b = seal(&k, b"other").unwrap();

        let mut spliced = a.clone();
        spliced[NONCE_LEN..HEADER_LEN].copy_from_slice(&b[NONCE_LEN..HEADER_LEN]);
        assert!(matches!(
            open(&k, &spliced),
            Err(FileVaultError::DecryptionFailed)
        ));
    }
}
