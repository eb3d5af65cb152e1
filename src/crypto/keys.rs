//! The symmetric key produced by the KDF.
//!
//! A `DerivedKey` lives for exactly one vault operation: it is recomputed
//! from (password, salt) every time and wiped from memory when dropped.
//! It is never written to disk.
//!
//! The key is a `[u8; KEY_LEN]`, so a key of the wrong length cannot be
//! constructed and the cipher never has to check it at runtime.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A 32-byte symmetric key that zeroes its memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_bytes_returns_wrapped_key() {
        let key = DerivedKey::new([7u8; KEY_LEN]);
        assert_eq!(key.as_bytes(), &[7u8; KEY_LEN]);
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = DerivedKey::new([0xAB; KEY_LEN]);
        let shown = format!("{key:?}");
        assert_eq!(shown, "DerivedKey([REDACTED])");
        assert!(!shown.contains("171"));
    }
}
