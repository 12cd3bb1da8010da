//! Test vector types for the compatibility suites.
//!
//! Vectors live next to this file as JSON and describe what a caller asks
//! for (algorithm text, content encryption, credential) and what must
//! happen: a working token or a specific rejection.

// Some fields only exist to document the vector
#![allow(dead_code)]

use std::sync::OnceLock;

use jwtkit::core::types::{Certificate, EcdsaCurve, EcdsaPrivateKey};
use jwtkit::prelude::*;
use rsa::RsaPrivateKey;
use serde::Deserialize;

/// A test vector suite (top-level JSON structure).
#[derive(Debug, Deserialize)]
pub struct TestVectorSuite<T> {
    pub name: String,
    pub tests: Vec<T>,
}

/// One algorithm identifier and how it must parse.
#[derive(Debug, Deserialize)]
pub struct IdentifierTestVector {
    pub name: String,
    pub text: String,
    #[serde(rename = "expect-fail")]
    pub expect_fail: bool,
    /// Identifier name of the parsed algorithm (success tests)
    #[serde(default)]
    pub algorithm: Option<String>,
    /// `"signing"` or `"encryption"` (success tests)
    #[serde(default)]
    pub space: Option<String>,
    /// `"Unrecognized"` or `"Excluded"` (fail tests)
    #[serde(default)]
    pub error: Option<String>,
}

/// A credential as named in the vector files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialKind {
    None,
    Secret,
    Rsa,
    EcdsaP256,
    EcdsaP384,
    EcdsaP521,
    RsaEcdsaP256,
    EmptyCertificate,
}

/// One issue/verify request and its required outcome.
#[derive(Debug, Deserialize)]
pub struct CompatibilityTestVector {
    pub name: String,
    pub algorithm: String,
    #[serde(rename = "content-encryption", default)]
    pub content_encryption: Option<String>,
    #[serde(default)]
    pub compression: bool,
    pub credential: CredentialKind,
    /// Secret text for `secret` credentials
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(rename = "expect-fail")]
    pub expect_fail: bool,
    /// Error kind (fail tests), see [`error_kind`]
    #[serde(default)]
    pub error: Option<String>,
    /// Exact error message (fail tests, optional)
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Owned credential material for one vector.
pub enum Credential {
    None,
    Secret(SecretValue),
    Certificate(Certificate),
}

impl Credential {
    pub fn mode(&self) -> CredentialMode<'_> {
        match self {
            Self::None => CredentialMode::None,
            Self::Secret(secret) => CredentialMode::from(secret),
            Self::Certificate(certificate) => CredentialMode::from(certificate),
        }
    }
}

/// RSA key shared by every test in the binary; generation is slow.
pub fn rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut rand_core::OsRng, 2048).expect("RSA key generation"))
}

/// Builds the credential a vector names.
pub fn credential_for(kind: CredentialKind, secret: Option<&str>) -> Credential {
    match kind {
        CredentialKind::None => Credential::None,
        CredentialKind::Secret => Credential::Secret(SecretValue::from(
            secret.unwrap_or("a shared secret of decent length"),
        )),
        CredentialKind::Rsa => Credential::Certificate(Certificate::from_rsa(rsa_key().clone())),
        CredentialKind::EcdsaP256 => ecdsa(EcdsaCurve::P256),
        CredentialKind::EcdsaP384 => ecdsa(EcdsaCurve::P384),
        CredentialKind::EcdsaP521 => ecdsa(EcdsaCurve::P521),
        CredentialKind::RsaEcdsaP256 => Credential::Certificate(
            Certificate::from_rsa(rsa_key().clone())
                .with_ecdsa(EcdsaPrivateKey::random(EcdsaCurve::P256)),
        ),
        CredentialKind::EmptyCertificate => Credential::Certificate(Certificate::default()),
    }
}

fn ecdsa(curve: EcdsaCurve) -> Credential {
    Credential::Certificate(Certificate::from_ecdsa(EcdsaPrivateKey::random(curve)))
}

/// Short name of an error's kind, as used in the vector files.
pub fn error_kind(err: &JwtError) -> &'static str {
    match err {
        JwtError::Parse(ParseError::Unrecognized(_)) => "Unrecognized",
        JwtError::Parse(ParseError::Excluded(_)) => "Excluded",
        JwtError::Diagnosis(diagnosis) => match diagnosis {
            Diagnosis::EncryptionNotApplicable { .. } => "EncryptionNotApplicable",
            Diagnosis::AlgorithmRequiresKey(_) => "AlgorithmRequiresKey",
            Diagnosis::ContentEncryptionRequired { .. } => "ContentEncryptionRequired",
            Diagnosis::CompressionRequiresContentEncryption => {
                "CompressionRequiresContentEncryption"
            }
            Diagnosis::SecretRequiresFamily(_) => "SecretRequiresFamily",
            Diagnosis::CertificateRequiresFamily(_) => "CertificateRequiresFamily",
            Diagnosis::CurveMismatch { .. } => "CurveMismatch",
        },
        JwtError::IssueFailed(_) => "IssueFailed",
        JwtError::TokenValidationFailed(_) => "TokenValidationFailed",
    }
}

/// Claims used by every vector.
pub fn sample_claims() -> Claims {
    let mut claims = Claims::new();
    claims.insert("iss".into(), "jwtkit-tests".into());
    claims.insert("sub".into(), "alice".into());
    claims.insert("exp".into(), 1_900_000_000_u64.into());
    claims.insert("roles".into(), serde_json::json!(["reader", "writer"]));
    claims
}

pub fn load_vectors<T: serde::de::DeserializeOwned>(path: &str) -> TestVectorSuite<T> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read test vector file {path}: {e}"));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse test vector file {path}: {e}"))
}
