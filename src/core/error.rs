//! Error types for token operations.
//!
//! Three layers of failure are kept apart:
//!
//! - [`ParseError`] - an algorithm identifier that is unknown or deliberately
//!   excluded.
//! - [`Diagnosis`] - a caller/configuration error found while pairing an
//!   algorithm with a credential. Always terminating, never retried.
//! - [`JoseError`] - a failure inside the JOSE primitive itself (malformed
//!   token, forged signature, wrong key). Messages are intentionally vague for
//!   security-sensitive operations to avoid leaking information that could aid
//!   attacks.
//!
//! [`JwtError`] unifies the three for the command layer.

use core::fmt::{self, Display};

use thiserror::Error;

use crate::core::algorithm::{Algorithm, EncryptionAlgorithm, SigningAlgorithm};
use crate::core::family::AlgorithmFamily;
use crate::core::types::EcdsaCurve;

/// An algorithm identifier that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The identifier is not a known signing or encryption algorithm.
    #[error("Unrecognized algorithm identifier: {0}")]
    Unrecognized(String),

    /// The identifier names an algorithm that is not supported.
    #[error("Unsupported algorithm identifier: {0}")]
    Excluded(String),
}

/// A list of algorithm families, rendered as the identifiers they contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyList(pub Vec<AlgorithmFamily>);

impl FamilyList {
    /// Returns the families in this list.
    #[must_use]
    pub fn families(&self) -> &[AlgorithmFamily] {
        &self.0
    }

    /// Returns true if `family` is part of this list.
    #[must_use]
    pub fn contains(&self, family: AlgorithmFamily) -> bool {
        self.0.contains(&family)
    }
}

impl From<&[AlgorithmFamily]> for FamilyList {
    fn from(families: &[AlgorithmFamily]) -> Self {
        Self(families.to_vec())
    }
}

impl Display for FamilyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for family in &self.0 {
            for name in family.member_names() {
                if !first {
                    f.write_str(",")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Why an algorithm and a credential cannot be used together.
///
/// Every variant is detected before any cryptographic operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnosis {
    /// A content encryption was supplied together with a signing algorithm.
    #[error("Encryption is only applicable to JWE algorithms, not {algorithm}")]
    EncryptionNotApplicable {
        /// The signing algorithm that was requested.
        algorithm: SigningAlgorithm,
    },

    /// A keyed algorithm was requested without any credential.
    #[error("Algorithm {0} requires a secret key or certificate")]
    AlgorithmRequiresKey(Algorithm),

    /// An encryption algorithm was requested without a content encryption.
    #[error("Algorithm {algorithm} requires a content encryption")]
    ContentEncryptionRequired {
        /// The encryption algorithm that was requested.
        algorithm: EncryptionAlgorithm,
    },

    /// Compression was requested without a content encryption.
    #[error("Compression requires a content encryption")]
    CompressionRequiresContentEncryption,

    /// A shared secret was supplied for an algorithm outside these families.
    #[error("Secret key requires one of the following algorithms: {0}")]
    SecretRequiresFamily(FamilyList),

    /// A certificate was supplied for an algorithm outside these families.
    #[error("Certificate requires one of the following algorithms: {0}")]
    CertificateRequiresFamily(FamilyList),

    /// The certificate's ECDSA key is on a different curve than the algorithm.
    #[error("Algorithm {algorithm} requires a {expected} key, certificate holds {actual}")]
    CurveMismatch {
        /// The ECDSA signing algorithm that was requested.
        algorithm: SigningAlgorithm,
        /// The curve the algorithm is defined over.
        expected: EcdsaCurve,
        /// The curve of the certificate's key.
        actual: EcdsaCurve,
    },
}

/// Errors raised by the JOSE encode/decode primitive.
#[derive(Debug, Error)]
pub enum JoseError {
    /// The compact serialization is malformed.
    #[error("Invalid token format")]
    InvalidFormat,

    /// The protected header is malformed or missing a required member.
    #[error("Invalid token header")]
    InvalidHeader,

    /// The token header names a different algorithm than the one expected.
    #[error("Token algorithm does not match the expected algorithm")]
    AlgorithmMismatch,

    /// The key material is invalid for the algorithm (wrong size, type, etc.).
    #[error("Invalid key material")]
    InvalidKey,

    /// Signature verification failed.
    /// Intentionally vague for security.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Decryption failed (wrong key, corrupted data, etc.).
    /// Intentionally vague for security.
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Authentication tag verification failed.
    /// Intentionally vague for security.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// PBES2 key derivation failed or its parameters are out of range.
    #[error("Key derivation failed")]
    KeyDerivationFailed,

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// DEFLATE compression or decompression failed.
    #[error("Compression failed")]
    Compression,

    /// The requested compression is not available in this build.
    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(String),

    /// Generic cryptographic error.
    /// Intentionally vague for security.
    #[error("Cryptographic operation failed")]
    CryptoError,
}

/// Errors surfaced to the command layer.
#[derive(Debug, Error)]
pub enum JwtError {
    /// The algorithm text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The algorithm and credential are incompatible.
    #[error(transparent)]
    Diagnosis(#[from] Diagnosis),

    /// The JOSE primitive could not produce a token from a resolved key.
    #[error("Token could not be issued: {0}")]
    IssueFailed(#[source] JoseError),

    /// The token was rejected by the JOSE primitive.
    #[error("Token validation failed: {0}")]
    TokenValidationFailed(#[source] JoseError),
}

impl From<JoseError> for JwtError {
    fn from(err: JoseError) -> Self {
        Self::TokenValidationFailed(err)
    }
}

/// Result type alias for JOSE primitive operations.
pub type JoseResult<T> = Result<T, JoseError>;

/// Result type alias for command-layer operations.
pub type JwtResult<T> = Result<T, JwtError>;
