//! Key resolution: pairing an algorithm with the caller's credential.
//!
//! Each resolution is a single-shot decision. It either yields key material
//! of exactly the shape the algorithm family needs, or a [`Diagnosis`]
//! explaining why the pairing is invalid. There is no fallback key and no
//! retry; a diagnosis terminates the request.
//!
//! | Credential | Signing families | Encryption families |
//! |------------|------------------|---------------------|
//! | none | `none` only | never |
//! | shared secret | HS (raw bytes) | DIR, AES-KW, AES-GCM-KW (raw bytes), PBES2 (password) |
//! | certificate | RS (RSA key), ES (ECDSA key) | RSA (RSA key) |
//!
//! # Example
//!
//! ```rust
//! use jwtkit::core::algorithm::SigningAlgorithm;
//! use jwtkit::core::resolver::resolve_signing_key;
//! use jwtkit::core::types::{CredentialMode, ResolvedKey, SecretValue};
//!
//! let secret = SecretValue::from("s3cr3t");
//! let resolution = resolve_signing_key(
//!     SigningAlgorithm::Hs256,
//!     CredentialMode::from(&secret),
//!     false,
//! )
//! .expect("HS256 accepts a shared secret");
//!
//! assert!(matches!(resolution.key, Some(ResolvedKey::Symmetric(b"s3cr3t"))));
//! ```

use core::fmt::{self, Display};

use crate::core::algorithm::{ContentEncryption, EncryptionAlgorithm, SigningAlgorithm};
use crate::core::error::{Diagnosis, FamilyList};
use crate::core::family::{
    classify_encryption, classify_signing, AlgorithmFamily, EncryptionFamily, SigningFamily,
};
use crate::core::types::{CredentialMode, EcdsaCurve, PrivateKeySource, ResolvedKey};

/// Signing families a shared secret can serve.
const SECRET_SIGNING_FAMILIES: [AlgorithmFamily; 1] = [AlgorithmFamily::Signing(SigningFamily::Hs)];

/// Signing families a certificate can serve.
const CERTIFICATE_SIGNING_FAMILIES: [AlgorithmFamily; 2] = [
    AlgorithmFamily::Signing(SigningFamily::Rs),
    AlgorithmFamily::Signing(SigningFamily::Es),
];

/// Encryption families a shared secret can serve.
const SECRET_ENCRYPTION_FAMILIES: [AlgorithmFamily; 4] = [
    AlgorithmFamily::Encryption(EncryptionFamily::Dir),
    AlgorithmFamily::Encryption(EncryptionFamily::AesKeyWrap),
    AlgorithmFamily::Encryption(EncryptionFamily::AesGcmKeyWrap),
    AlgorithmFamily::Encryption(EncryptionFamily::Pbes2),
];

/// Encryption families a certificate can serve.
const CERTIFICATE_ENCRYPTION_FAMILIES: [AlgorithmFamily; 1] =
    [AlgorithmFamily::Encryption(EncryptionFamily::Rsa)];

/// A non-fatal note attached to a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// The token will carry no signature.
    Unsigned,
}

impl Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned => f.write_str("token is unsigned"),
        }
    }
}

/// The outcome of a successful signing-key resolution.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'c> {
    /// The key to sign or verify with; `None` only for the `none` algorithm.
    pub key: Option<ResolvedKey<'c>>,
    /// A non-fatal note for the caller.
    pub advisory: Option<Advisory>,
}

/// The curve an ECDSA algorithm is defined over.
const fn expected_curve(alg: SigningAlgorithm) -> Option<EcdsaCurve> {
    match alg {
        SigningAlgorithm::Es256 => Some(EcdsaCurve::P256),
        SigningAlgorithm::Es384 => Some(EcdsaCurve::P384),
        SigningAlgorithm::Es512 => Some(EcdsaCurve::P521),
        _ => None,
    }
}

/// Signing families this particular certificate can serve.
///
/// Falls back to every certificate family when the certificate holds no
/// usable key at all.
fn certificate_capabilities(source: &dyn PrivateKeySource) -> FamilyList {
    let mut families = Vec::with_capacity(2);
    if source.rsa_private_key().is_some() {
        families.push(AlgorithmFamily::Signing(SigningFamily::Rs));
    }
    if source.ecdsa_private_key().is_some() {
        families.push(AlgorithmFamily::Signing(SigningFamily::Es));
    }
    if families.is_empty() {
        return FamilyList::from(&CERTIFICATE_SIGNING_FAMILIES[..]);
    }
    FamilyList(families)
}

/// Resolves the key for a JWS signing algorithm.
///
/// # Arguments
///
/// * `alg` - The signing algorithm
/// * `credential` - The credential supplied by the caller
/// * `encryption_field_present` - Whether a content encryption was supplied
///
/// # Errors
///
/// - `Diagnosis::EncryptionNotApplicable` if a content encryption was supplied
/// - `Diagnosis::AlgorithmRequiresKey` if a keyed algorithm has no credential
/// - `Diagnosis::SecretRequiresFamily` if a shared secret is paired with a non-HS algorithm
/// - `Diagnosis::CertificateRequiresFamily` if a certificate is paired with an
///   algorithm it holds no key for
/// - `Diagnosis::CurveMismatch` if the certificate's ECDSA curve does not match
pub fn resolve_signing_key<'c>(
    alg: SigningAlgorithm,
    credential: CredentialMode<'c>,
    encryption_field_present: bool,
) -> Result<Resolution<'c>, Diagnosis> {
    if encryption_field_present {
        return Err(Diagnosis::EncryptionNotApplicable { algorithm: alg });
    }

    let source = match credential {
        CredentialMode::None if alg == SigningAlgorithm::None => {
            tracing::warn!(algorithm = %alg, "token is unsigned");
            return Ok(Resolution {
                key: None,
                advisory: Some(Advisory::Unsigned),
            });
        }
        CredentialMode::None => return Err(Diagnosis::AlgorithmRequiresKey(alg.into())),
        CredentialMode::SharedSecret(secret) => {
            if classify_signing(alg) != SigningFamily::Hs {
                return Err(Diagnosis::SecretRequiresFamily(FamilyList::from(
                    &SECRET_SIGNING_FAMILIES[..],
                )));
            }
            let key = ResolvedKey::Symmetric(secret.reveal_bytes());
            tracing::debug!(algorithm = %alg, key = key.shape(), "resolved signing key");
            return Ok(Resolution {
                key: Some(key),
                advisory: None,
            });
        }
        CredentialMode::Certificate(source) => source,
    };

    let key = match classify_signing(alg) {
        SigningFamily::Rs => source
            .rsa_private_key()
            .map(ResolvedKey::Rsa)
            .ok_or_else(|| Diagnosis::CertificateRequiresFamily(certificate_capabilities(source)))?,
        SigningFamily::Es => {
            let key = source.ecdsa_private_key().ok_or_else(|| {
                Diagnosis::CertificateRequiresFamily(certificate_capabilities(source))
            })?;
            if let Some(expected) = expected_curve(alg) {
                if key.curve() != expected {
                    return Err(Diagnosis::CurveMismatch {
                        algorithm: alg,
                        expected,
                        actual: key.curve(),
                    });
                }
            }
            ResolvedKey::Ecdsa(key)
        }
        SigningFamily::Hs | SigningFamily::Unknown => {
            return Err(Diagnosis::CertificateRequiresFamily(FamilyList::from(
                &CERTIFICATE_SIGNING_FAMILIES[..],
            )));
        }
    };

    tracing::debug!(algorithm = %alg, key = key.shape(), "resolved signing key");
    Ok(Resolution {
        key: Some(key),
        advisory: None,
    })
}

/// Rejects compression that has no content encryption to ride on.
///
/// # Errors
///
/// Returns `Diagnosis::CompressionRequiresContentEncryption` if compression is
/// requested while `content_enc` is absent.
pub fn check_compression(
    content_enc: Option<ContentEncryption>,
    compression_requested: bool,
) -> Result<(), Diagnosis> {
    if compression_requested && content_enc.is_none() {
        return Err(Diagnosis::CompressionRequiresContentEncryption);
    }
    Ok(())
}

/// Resolves the key for a JWE key management algorithm.
///
/// A missing content encryption is reported before a compression problem, so
/// the diagnosis names the root cause when both are missing.
///
/// # Arguments
///
/// * `alg` - The key management algorithm
/// * `content_enc` - The content encryption, required
/// * `credential` - The credential supplied by the caller
/// * `compression_requested` - Whether payload compression was requested
///
/// # Errors
///
/// - `Diagnosis::ContentEncryptionRequired` if `content_enc` is absent
/// - `Diagnosis::CompressionRequiresContentEncryption` (see [`check_compression`])
/// - `Diagnosis::SecretRequiresFamily` if a shared secret is paired with RSA key transport
/// - `Diagnosis::CertificateRequiresFamily` if a certificate is paired with a
///   symmetric family or holds no RSA key
/// - `Diagnosis::AlgorithmRequiresKey` if no credential was supplied
pub fn resolve_encryption_key<'c>(
    alg: EncryptionAlgorithm,
    content_enc: Option<ContentEncryption>,
    credential: CredentialMode<'c>,
    compression_requested: bool,
) -> Result<ResolvedKey<'c>, Diagnosis> {
    if content_enc.is_none() {
        return Err(Diagnosis::ContentEncryptionRequired { algorithm: alg });
    }
    check_compression(content_enc, compression_requested)?;

    let family = classify_encryption(alg);
    let key = match credential {
        CredentialMode::SharedSecret(secret) => match family {
            EncryptionFamily::Dir | EncryptionFamily::AesKeyWrap | EncryptionFamily::AesGcmKeyWrap => {
                ResolvedKey::Symmetric(secret.reveal_bytes())
            }
            EncryptionFamily::Pbes2 => ResolvedKey::Password(secret.reveal()),
            EncryptionFamily::Rsa | EncryptionFamily::Unknown => {
                return Err(Diagnosis::SecretRequiresFamily(FamilyList::from(
                    &SECRET_ENCRYPTION_FAMILIES[..],
                )));
            }
        },
        CredentialMode::Certificate(source) => match (family, source.rsa_private_key()) {
            (EncryptionFamily::Rsa, Some(key)) => ResolvedKey::Rsa(key),
            _ => {
                return Err(Diagnosis::CertificateRequiresFamily(FamilyList::from(
                    &CERTIFICATE_ENCRYPTION_FAMILIES[..],
                )));
            }
        },
        CredentialMode::None => return Err(Diagnosis::AlgorithmRequiresKey(alg.into())),
    };

    tracing::debug!(
        algorithm = %alg,
        family = %family,
        key = key.shape(),
        "resolved encryption key"
    );
    Ok(key)
}
