//! `CredentialMode` - the credential a caller supplied for one request.

use core::fmt::{self, Debug};

use crate::core::types::certificate::PrivateKeySource;
use crate::core::types::protected::SecretValue;

/// Exactly one of: no credential, a shared secret, or a certificate.
///
/// The credential is borrowed for the duration of one resolve + encode/decode
/// call; nothing in this crate keeps it beyond that.
///
/// # Example
///
/// ```rust
/// use jwtkit::core::types::{CredentialMode, SecretValue};
///
/// let secret = SecretValue::from("s3cr3t");
/// let credential = CredentialMode::from(&secret);
/// assert!(matches!(credential, CredentialMode::SharedSecret(_)));
/// ```
#[derive(Clone, Copy, Default)]
pub enum CredentialMode<'c> {
    /// No credential was supplied.
    #[default]
    None,
    /// A shared secret (HMAC, direct/AES key wrap, or PBES2 password).
    SharedSecret(&'c SecretValue),
    /// A certificate exposing RSA and/or ECDSA private keys.
    Certificate(&'c dyn PrivateKeySource),
}

impl CredentialMode<'_> {
    /// Short name of the mode, safe to log.
    #[must_use]
    pub const fn mode_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SharedSecret(_) => "shared-secret",
            Self::Certificate(_) => "certificate",
        }
    }
}

impl<'c> From<&'c SecretValue> for CredentialMode<'c> {
    fn from(secret: &'c SecretValue) -> Self {
        Self::SharedSecret(secret)
    }
}

impl<'c, S: PrivateKeySource> From<&'c S> for CredentialMode<'c> {
    fn from(source: &'c S) -> Self {
        Self::Certificate(source)
    }
}

impl Debug for CredentialMode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::SharedSecret(_) => f.debug_tuple("SharedSecret").field(&"[REDACTED]").finish(),
            Self::Certificate(_) => f.debug_tuple("Certificate").field(&"[REDACTED]").finish(),
        }
    }
}
