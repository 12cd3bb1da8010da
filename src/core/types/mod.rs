//! Credential and key types.
//!
//! - [`SecretValue`] - Protected secret text (shared secrets, issued tokens)
//! - [`Certificate`] - Private-key handles of a validated certificate
//! - [`CredentialMode`] - The credential supplied for one request
//! - [`ResolvedKey`] - Key material chosen for one algorithm

mod certificate;
mod credential;
mod protected;
mod resolved;

pub use certificate::{Certificate, EcdsaCurve, EcdsaPrivateKey, PrivateKeySource};
pub use credential::CredentialMode;
pub use protected::SecretValue;
pub use resolved::ResolvedKey;

#[cfg(test)]
pub(crate) use certificate::test_keys;
