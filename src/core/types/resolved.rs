//! `ResolvedKey` - key material handed to the JOSE primitive.

use core::fmt::{self, Debug};

use rsa::RsaPrivateKey;

use crate::core::types::certificate::EcdsaPrivateKey;

/// Concrete key material for one algorithm.
///
/// The variant is chosen by the algorithm family, not by the credential mode
/// alone: a shared secret becomes [`Symmetric`](Self::Symmetric) for HMAC and
/// AES families but [`Password`](Self::Password) for PBES2. Every variant
/// borrows from the credential it was resolved from.
#[derive(Clone, Copy)]
pub enum ResolvedKey<'c> {
    /// Raw symmetric key bytes.
    Symmetric(&'c [u8]),
    /// A password for PBES2 key derivation.
    Password(&'c str),
    /// An RSA private key handle.
    Rsa(&'c RsaPrivateKey),
    /// An ECDSA private key handle.
    Ecdsa(&'c EcdsaPrivateKey),
}

impl<'c> ResolvedKey<'c> {
    /// Short name of the key shape, safe to log.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Symmetric(_) => "symmetric",
            Self::Password(_) => "password",
            Self::Rsa(_) => "rsa",
            Self::Ecdsa(_) => "ecdsa",
        }
    }

    /// The symmetric bytes, if this is a symmetric key.
    #[must_use]
    pub const fn as_symmetric(&self) -> Option<&'c [u8]> {
        match *self {
            Self::Symmetric(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The password, if this is a PBES2 password.
    #[must_use]
    pub const fn as_password(&self) -> Option<&'c str> {
        match *self {
            Self::Password(password) => Some(password),
            _ => None,
        }
    }

    /// The RSA handle, if this is an RSA key.
    #[must_use]
    pub const fn as_rsa(&self) -> Option<&'c RsaPrivateKey> {
        match *self {
            Self::Rsa(key) => Some(key),
            _ => None,
        }
    }

    /// The ECDSA handle, if this is an ECDSA key.
    #[must_use]
    pub const fn as_ecdsa(&self) -> Option<&'c EcdsaPrivateKey> {
        match *self {
            Self::Ecdsa(key) => Some(key),
            _ => None,
        }
    }
}

impl Debug for ResolvedKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedKey")
            .field("shape", &self.shape())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let key = ResolvedKey::Symmetric(b"0123456789abcdef");
        assert_eq!(key.as_symmetric(), Some(&b"0123456789abcdef"[..]));
        assert!(key.as_password().is_none());
        assert!(key.as_rsa().is_none());
        assert!(key.as_ecdsa().is_none());

        let key = ResolvedKey::Password("hunter2");
        assert_eq!(key.as_password(), Some("hunter2"));
        assert!(key.as_symmetric().is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = ResolvedKey::Password("hunter2");
        let debug_str = format!("{key:?}");
        assert!(debug_str.contains("password"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("hunter2"));
    }
}
