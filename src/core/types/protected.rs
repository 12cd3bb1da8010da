//! `SecretValue` - protected secret text.
//!
//! Shared secrets and issued tokens are carried as `SecretValue`. The
//! plaintext is only reachable through [`SecretValue::reveal`], which hands out
//! a borrow scoped to the value itself.

use core::fmt::{self, Debug};

use zeroize::Zeroize;

/// Secret text whose plaintext is zeroized on drop.
///
/// # Security
///
/// - Plaintext is zeroized on drop
/// - Debug output redacts the value
/// - Equality comparison uses constant-time comparison
///
/// # Example
///
/// ```rust
/// use jwtkit::core::types::SecretValue;
///
/// let secret = SecretValue::from("correct horse battery staple");
/// assert_eq!(secret.reveal_bytes(), b"correct horse battery staple");
/// assert!(!format!("{secret:?}").contains("horse"));
/// ```
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue {
    value: String,
}

impl SecretValue {
    /// Wraps plaintext in a `SecretValue`.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Borrows the plaintext text.
    #[must_use]
    pub fn reveal(&self) -> &str {
        &self.value
    }

    /// Borrows the plaintext as UTF-8 bytes.
    #[must_use]
    pub fn reveal_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    /// Length of the plaintext in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns true if the plaintext is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretValue")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for SecretValue {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        if self.value.len() != other.value.len() {
            return false;
        }
        self.value.as_bytes().ct_eq(other.value.as_bytes()).into()
    }
}

impl Eq for SecretValue {}
