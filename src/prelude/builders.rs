//! Fluent builders for issuing and verifying tokens.
//!
//! Both builders take the algorithm as text, exactly as a caller would type
//! it, and parse it with signing-first precedence. Every configuration
//! problem (unknown identifier, credential of the wrong shape, missing
//! content encryption) is reported as an `Err` before any cryptography runs.
//!
//! # PBES2 Profiles
//!
//! | Profile | Iterations | Salt | Use Case |
//! |---------|------------|------|----------|
//! | `interactive()` | 100,000 | 16 B | Short-lived tokens |
//! | `moderate()` | 310,000 | 16 B | Balanced (default) |
//! | `sensitive()` | 600,000 | 32 B | Long-lived tokens |
//!
//! # Example
//!
//! ```rust
//! use jwtkit::prelude::*;
//!
//! let secret = SecretValue::from("a shared secret of decent length");
//! let mut claims = Claims::new();
//! claims.insert("sub".into(), "alice".into());
//!
//! let token = TokenBuilder::new("HS256")
//!     .try_issue(&claims, &secret)
//!     .expect("HS256 accepts a shared secret");
//!
//! let verifier = TokenVerifier::new("HS256");
//! assert!(verifier.verify(&token, &secret).expect("valid configuration"));
//! assert_eq!(verifier.decode(&token, &secret).expect("valid token"), claims);
//! ```

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::algorithm::{parse_algorithm, parse_content_encryption, Algorithm};
use crate::core::algorithm::{CompressionMode, ContentEncryption};
use crate::core::error::{JwtError, JwtResult};
use crate::core::operations::{self, Claims, EncryptOptions, Header, Pbes2Params};
use crate::core::resolver::{check_compression, resolve_encryption_key, resolve_signing_key};
use crate::core::types::{CredentialMode, ResolvedKey, SecretValue};

/// The parsed algorithms and the key resolved for them.
struct KeyPlan<'c> {
    algorithm: Algorithm,
    content_encryption: Option<ContentEncryption>,
    key: Option<ResolvedKey<'c>>,
}

/// Parses the algorithm fields and resolves the credential against them.
fn plan<'c>(
    algorithm: &str,
    content_encryption: Option<&str>,
    credential: CredentialMode<'c>,
    compression_requested: bool,
) -> JwtResult<KeyPlan<'c>> {
    let parsed = parse_algorithm(algorithm)?;
    let content_encryption = content_encryption
        .map(parse_content_encryption)
        .transpose()?;

    let key = match parsed {
        Algorithm::Signing(alg) => {
            let resolution =
                resolve_signing_key(alg, credential, content_encryption.is_some())?;
            check_compression(content_encryption, compression_requested)?;
            resolution.key
        }
        Algorithm::Encryption(alg) => Some(resolve_encryption_key(
            alg,
            content_encryption,
            credential,
            compression_requested,
        )?),
    };

    Ok(KeyPlan {
        algorithm: parsed,
        content_encryption,
        key,
    })
}

// =============================================================================
// Issuing
// =============================================================================

/// Builder for issuing a signed (JWS) or encrypted (JWE) token.
///
/// # Example
///
/// ```rust
/// use jwtkit::prelude::*;
///
/// let secret = SecretValue::from("correct horse battery staple");
/// let mut claims = Claims::new();
/// claims.insert("sub".into(), "alice".into());
///
/// let token = TokenBuilder::new("PBES2-HS256+A128KW")
///     .content_encryption("A128CBC-HS256")
///     .pbes2(Pbes2Params::interactive())
///     .extra_header("kid", "2024-01")
///     .try_issue(&claims, &secret)
///     .expect("PBES2 accepts a shared secret");
///
/// assert_eq!(token.reveal().split('.').count(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    algorithm: String,
    content_encryption: Option<String>,
    compression: Option<CompressionMode>,
    extra_headers: Option<Header>,
    pbes2: Pbes2Params,
}

impl TokenBuilder {
    /// Creates a builder for `algorithm`, a signing or key management
    /// identifier such as `"HS256"`, `"RSA_OAEP_256"` or `"RSA-OAEP-256"`.
    #[must_use]
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            content_encryption: None,
            compression: None,
            extra_headers: None,
            pbes2: Pbes2Params::default(),
        }
    }

    /// Sets the content encryption. Required for key management algorithms,
    /// rejected for signing algorithms.
    #[must_use]
    pub fn content_encryption(mut self, content_encryption: impl Into<String>) -> Self {
        self.content_encryption = Some(content_encryption.into());
        self
    }

    /// Compresses the payload before encryption.
    #[must_use]
    pub fn compression(mut self, mode: CompressionMode) -> Self {
        self.compression = Some(mode);
        self
    }

    /// Replaces the extra protected header parameters.
    #[must_use]
    pub fn extra_headers(mut self, headers: Header) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Adds one extra protected header parameter.
    ///
    /// `alg`, `enc`, `zip` and key management parameters are always set by
    /// the encoder and cannot be overridden.
    #[must_use]
    pub fn extra_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_headers
            .get_or_insert_with(Header::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the PBES2 parameters. Ignored by other algorithms.
    #[must_use]
    pub fn pbes2(mut self, params: Pbes2Params) -> Self {
        self.pbes2 = params;
        self
    }

    /// Returns the configured PBES2 parameters.
    #[must_use]
    pub const fn get_pbes2(&self) -> Pbes2Params {
        self.pbes2
    }

    /// Issues a token for `claims` using `credential`.
    ///
    /// The compact token is returned as a [`SecretValue`].
    ///
    /// # Errors
    ///
    /// - `JwtError::Parse` if an identifier is unknown or excluded
    /// - `JwtError::Diagnosis` if the credential does not fit the algorithm
    /// - `JwtError::IssueFailed` if the JOSE primitive rejects the key
    ///   material (for example a `dir` secret of the wrong length)
    pub fn try_issue<'c>(
        &self,
        claims: &Claims,
        credential: impl Into<CredentialMode<'c>>,
    ) -> JwtResult<SecretValue> {
        let credential = credential.into();
        let plan = plan(
            &self.algorithm,
            self.content_encryption.as_deref(),
            credential,
            self.compression.is_some(),
        )?;

        debug!(
            algorithm = %plan.algorithm,
            credential = credential.mode_name(),
            "issuing token"
        );

        let options = EncryptOptions {
            compression: self.compression,
            extra_headers: self.extra_headers.as_ref(),
            pbes2: self.pbes2,
        };
        let token = operations::encode(
            claims,
            plan.algorithm,
            plan.key,
            plan.content_encryption,
            &options,
        )
        .map_err(JwtError::IssueFailed)?;

        Ok(SecretValue::from(token))
    }
}

// =============================================================================
// Verifying
// =============================================================================

/// Verifier for tokens issued with a known algorithm.
///
/// The algorithm is fixed by the verifier, never taken from the token.
///
/// # Example
///
/// ```rust
/// use jwtkit::prelude::*;
///
/// let secret = SecretValue::from("s3cr3t");
/// let verifier = TokenVerifier::new("HS256");
///
/// let forged = SecretValue::from("eyJhbGciOiJub25lIn0.e30.");
/// assert!(!verifier.verify(&forged, &secret).expect("valid configuration"));
///
/// let misconfigured = TokenVerifier::new("PS256");
/// assert!(misconfigured.verify(&forged, &secret).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    algorithm: String,
    content_encryption: Option<String>,
}

impl TokenVerifier {
    /// Creates a verifier for `algorithm`.
    #[must_use]
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            content_encryption: None,
        }
    }

    /// Requires encrypted tokens to use `content_encryption`.
    ///
    /// Without it, encrypted tokens are still checked for a supported
    /// content encryption but any of them is accepted.
    #[must_use]
    pub fn content_encryption(mut self, content_encryption: impl Into<String>) -> Self {
        self.content_encryption = Some(content_encryption.into());
        self
    }

    fn plan<'c>(&self, credential: CredentialMode<'c>) -> JwtResult<KeyPlan<'c>> {
        let parsed = parse_algorithm(&self.algorithm)?;
        match parsed {
            // The token header names its own content encryption. The resolver
            // only needs one to be present; the key does not depend on it.
            Algorithm::Encryption(alg) => {
                let requested = self
                    .content_encryption
                    .as_deref()
                    .map(parse_content_encryption)
                    .transpose()?;
                let key = resolve_encryption_key(
                    alg,
                    Some(requested.unwrap_or(ContentEncryption::A256Gcm)),
                    credential,
                    false,
                )?;
                Ok(KeyPlan {
                    algorithm: parsed,
                    content_encryption: requested,
                    key: Some(key),
                })
            }
            Algorithm::Signing(_) => plan(
                &self.algorithm,
                self.content_encryption.as_deref(),
                credential,
                false,
            ),
        }
    }

    fn decode_with(plan: &KeyPlan<'_>, token: &SecretValue) -> JwtResult<Claims> {
        debug!(algorithm = %plan.algorithm, "decoding token");
        operations::decode(
            token.reveal(),
            plan.algorithm,
            plan.key,
            plan.content_encryption,
        )
        .map_err(JwtError::TokenValidationFailed)
    }

    fn check(plan: &KeyPlan<'_>, token: &SecretValue) -> bool {
        match Self::decode_with(plan, token) {
            Ok(_) => true,
            Err(err) => {
                warn!(algorithm = %plan.algorithm, error = %err, "invalid token");
                false
            }
        }
    }

    /// Reports whether `token` is valid for this verifier and `credential`.
    ///
    /// # Errors
    ///
    /// Only configuration problems are errors (`JwtError::Parse`,
    /// `JwtError::Diagnosis`). A malformed, forged or undecryptable token
    /// yields `Ok(false)` and a warning event.
    pub fn verify<'c>(
        &self,
        token: &SecretValue,
        credential: impl Into<CredentialMode<'c>>,
    ) -> JwtResult<bool> {
        let plan = self.plan(credential.into())?;
        Ok(Self::check(&plan, token))
    }

    /// Verifies `token` and returns its claims.
    ///
    /// # Errors
    ///
    /// Configuration problems as for [`verify`](Self::verify), and
    /// `JwtError::TokenValidationFailed` if the token is rejected.
    pub fn decode<'c>(
        &self,
        token: &SecretValue,
        credential: impl Into<CredentialMode<'c>>,
    ) -> JwtResult<Claims> {
        let plan = self.plan(credential.into())?;
        Self::decode_with(&plan, token)
    }

    /// Verifies a batch of tokens against one credential.
    ///
    /// The key is resolved once. An invalid token is reported as `false` in
    /// its slot and does not stop the batch.
    ///
    /// # Errors
    ///
    /// Configuration problems as for [`verify`](Self::verify).
    pub fn verify_all<'c, 't>(
        &self,
        tokens: impl IntoIterator<Item = &'t SecretValue>,
        credential: impl Into<CredentialMode<'c>>,
    ) -> JwtResult<Vec<bool>> {
        let plan = self.plan(credential.into())?;
        Ok(tokens
            .into_iter()
            .map(|token| Self::check(&plan, token))
            .collect())
    }
}
