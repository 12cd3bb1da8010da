//! Algorithm identifiers and their parsing rules.
//!
//! The identifier sets are closed enumerations. Parsing is case-insensitive
//! and accepts both the identifier names (`RSA_OAEP_256`) and the RFC 7518
//! wire names (`RSA-OAEP-256`). Some lexically valid JOSE algorithms are
//! excluded on purpose and always fail to parse:
//!
//! - `PS256`, `PS384`, `PS512` (RSASSA-PSS signing)
//! - `ECDH_ES` and its key-wrap variants (ECDH key agreement)
//!
//! A single algorithm field is resolved with [`parse_algorithm`], which tries
//! the signing set first and the encryption set only if that fails.

use core::fmt::{self, Display};
use core::str::FromStr;

use crate::core::error::ParseError;

/// Signing algorithms excluded from [`SigningAlgorithm`].
pub const EXCLUDED_SIGNING: [&str; 3] = ["PS256", "PS384", "PS512"];

/// Key management algorithms excluded from [`EncryptionAlgorithm`].
pub const EXCLUDED_ENCRYPTION: [&str; 4] = [
    "ECDH_ES",
    "ECDH_ES_A128KW",
    "ECDH_ES_A192KW",
    "ECDH_ES_A256KW",
];

/// Upper-cases an identifier and folds wire-name separators into `_`.
fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| match c {
            '-' | '+' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Finds the variant whose normalized name matches `text`.
fn lookup<T: Copy>(text: &str, all: &[T], name: impl Fn(T) -> &'static str) -> Option<T> {
    let wanted = normalize(text);
    all.iter()
        .copied()
        .find(|candidate| normalize(name(*candidate)) == wanted)
}

/// Parses `text` against one identifier set, honouring its exclusion list.
fn parse_in<T: Copy>(
    text: &str,
    all: &[T],
    excluded: &[&str],
    name: impl Fn(T) -> &'static str,
) -> Result<T, ParseError> {
    let wanted = normalize(text);
    if excluded.iter().any(|e| *e == wanted) {
        return Err(ParseError::Excluded(text.to_string()));
    }
    lookup(text, all, name).ok_or_else(|| ParseError::Unrecognized(text.to_string()))
}

// =============================================================================
// Signing algorithms (JWS)
// =============================================================================

/// JWS signing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    /// Unsecured token, no signature.
    None,
    /// HMAC using SHA-256.
    Hs256,
    /// HMAC using SHA-384.
    Hs384,
    /// HMAC using SHA-512.
    Hs512,
    /// RSASSA-PKCS1-v1_5 using SHA-256.
    Rs256,
    /// RSASSA-PKCS1-v1_5 using SHA-384.
    Rs384,
    /// RSASSA-PKCS1-v1_5 using SHA-512.
    Rs512,
    /// ECDSA using P-256 and SHA-256.
    Es256,
    /// ECDSA using P-384 and SHA-384.
    Es384,
    /// ECDSA using P-521 and SHA-512.
    Es512,
}

impl SigningAlgorithm {
    /// Every supported signing algorithm.
    pub const ALL: [Self; 10] = [
        Self::None,
        Self::Hs256,
        Self::Hs384,
        Self::Hs512,
        Self::Rs256,
        Self::Rs384,
        Self::Rs512,
        Self::Es256,
        Self::Es384,
        Self::Es512,
    ];

    /// The identifier name (e.g. `HS256`, `none`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
            Self::Es256 => "ES256",
            Self::Es384 => "ES384",
            Self::Es512 => "ES512",
        }
    }

    /// The `alg` header value. Identical to [`name`](Self::name) for JWS.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        self.name()
    }
}

impl Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_signing(s)
    }
}

/// Parses a signing algorithm, rejecting the `PS*` family.
///
/// # Errors
///
/// Returns `ParseError::Excluded` for `PS256`/`PS384`/`PS512` and
/// `ParseError::Unrecognized` for anything else outside the set.
pub fn parse_signing(text: &str) -> Result<SigningAlgorithm, ParseError> {
    parse_in(
        text,
        &SigningAlgorithm::ALL,
        &EXCLUDED_SIGNING,
        SigningAlgorithm::name,
    )
}

// =============================================================================
// Key management algorithms (JWE)
// =============================================================================

/// JWE key management algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionAlgorithm {
    /// RSAES OAEP using SHA-256 and MGF1 with SHA-256.
    RsaOaep256,
    /// RSAES OAEP using default parameters (SHA-1).
    RsaOaep,
    /// RSAES-PKCS1-v1_5.
    Rsa1_5,
    /// Direct use of a shared symmetric key as the CEK.
    Dir,
    /// AES Key Wrap with a 128-bit key.
    A128Kw,
    /// AES Key Wrap with a 192-bit key.
    A192Kw,
    /// AES Key Wrap with a 256-bit key.
    A256Kw,
    /// Key wrapping with AES GCM using a 128-bit key.
    A128GcmKw,
    /// Key wrapping with AES GCM using a 192-bit key.
    A192GcmKw,
    /// Key wrapping with AES GCM using a 256-bit key.
    A256GcmKw,
    /// PBES2 with HMAC SHA-256 and A128KW wrapping.
    Pbes2Hs256A128Kw,
    /// PBES2 with HMAC SHA-384 and A192KW wrapping.
    Pbes2Hs384A192Kw,
    /// PBES2 with HMAC SHA-512 and A256KW wrapping.
    Pbes2Hs512A256Kw,
}

impl EncryptionAlgorithm {
    /// Every supported key management algorithm.
    pub const ALL: [Self; 13] = [
        Self::RsaOaep256,
        Self::RsaOaep,
        Self::Rsa1_5,
        Self::Dir,
        Self::A128Kw,
        Self::A192Kw,
        Self::A256Kw,
        Self::A128GcmKw,
        Self::A192GcmKw,
        Self::A256GcmKw,
        Self::Pbes2Hs256A128Kw,
        Self::Pbes2Hs384A192Kw,
        Self::Pbes2Hs512A256Kw,
    ];

    /// The identifier name (e.g. `RSA_OAEP_256`, `DIR`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RsaOaep256 => "RSA_OAEP_256",
            Self::RsaOaep => "RSA_OAEP",
            Self::Rsa1_5 => "RSA1_5",
            Self::Dir => "DIR",
            Self::A128Kw => "A128KW",
            Self::A192Kw => "A192KW",
            Self::A256Kw => "A256KW",
            Self::A128GcmKw => "A128GCMKW",
            Self::A192GcmKw => "A192GCMKW",
            Self::A256GcmKw => "A256GCMKW",
            Self::Pbes2Hs256A128Kw => "PBES2_HS256_A128KW",
            Self::Pbes2Hs384A192Kw => "PBES2_HS384_A192KW",
            Self::Pbes2Hs512A256Kw => "PBES2_HS512_A256KW",
        }
    }

    /// The RFC 7518 `alg` header value (e.g. `RSA-OAEP-256`, `dir`).
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::RsaOaep256 => "RSA-OAEP-256",
            Self::RsaOaep => "RSA-OAEP",
            Self::Rsa1_5 => "RSA1_5",
            Self::Dir => "dir",
            Self::A128Kw => "A128KW",
            Self::A192Kw => "A192KW",
            Self::A256Kw => "A256KW",
            Self::A128GcmKw => "A128GCMKW",
            Self::A192GcmKw => "A192GCMKW",
            Self::A256GcmKw => "A256GCMKW",
            Self::Pbes2Hs256A128Kw => "PBES2-HS256+A128KW",
            Self::Pbes2Hs384A192Kw => "PBES2-HS384+A192KW",
            Self::Pbes2Hs512A256Kw => "PBES2-HS512+A256KW",
        }
    }
}

impl Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_encryption(s)
    }
}

/// Parses a key management algorithm, rejecting the `ECDH_ES*` family.
///
/// # Errors
///
/// Returns `ParseError::Excluded` for `ECDH_ES` and its key-wrap variants and
/// `ParseError::Unrecognized` for anything else outside the set.
pub fn parse_encryption(text: &str) -> Result<EncryptionAlgorithm, ParseError> {
    parse_in(
        text,
        &EncryptionAlgorithm::ALL,
        &EXCLUDED_ENCRYPTION,
        EncryptionAlgorithm::name,
    )
}

// =============================================================================
// Content encryption (JWE "enc")
// =============================================================================

/// JWE content encryption algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentEncryption {
    /// AES-128-CBC with HMAC SHA-256.
    A128CbcHs256,
    /// AES-192-CBC with HMAC SHA-384.
    A192CbcHs384,
    /// AES-256-CBC with HMAC SHA-512.
    A256CbcHs512,
    /// AES-GCM with a 128-bit key.
    A128Gcm,
    /// AES-GCM with a 192-bit key.
    A192Gcm,
    /// AES-GCM with a 256-bit key.
    A256Gcm,
}

impl ContentEncryption {
    /// Every supported content encryption.
    pub const ALL: [Self; 6] = [
        Self::A128CbcHs256,
        Self::A192CbcHs384,
        Self::A256CbcHs512,
        Self::A128Gcm,
        Self::A192Gcm,
        Self::A256Gcm,
    ];

    /// The identifier name (e.g. `A128CBC_HS256`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A128CbcHs256 => "A128CBC_HS256",
            Self::A192CbcHs384 => "A192CBC_HS384",
            Self::A256CbcHs512 => "A256CBC_HS512",
            Self::A128Gcm => "A128GCM",
            Self::A192Gcm => "A192GCM",
            Self::A256Gcm => "A256GCM",
        }
    }

    /// The RFC 7518 `enc` header value (e.g. `A128CBC-HS256`).
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::A128CbcHs256 => "A128CBC-HS256",
            Self::A192CbcHs384 => "A192CBC-HS384",
            Self::A256CbcHs512 => "A256CBC-HS512",
            Self::A128Gcm => "A128GCM",
            Self::A192Gcm => "A192GCM",
            Self::A256Gcm => "A256GCM",
        }
    }

    /// Length in bytes of the content encryption key.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::A128CbcHs256 => 32,
            Self::A192CbcHs384 => 48,
            Self::A256CbcHs512 => 64,
            Self::A128Gcm => 16,
            Self::A192Gcm => 24,
            Self::A256Gcm => 32,
        }
    }
}

impl Display for ContentEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentEncryption {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_content_encryption(s)
    }
}

/// Parses a content encryption identifier.
///
/// # Errors
///
/// Returns `ParseError::Unrecognized` if `text` is not a content encryption.
pub fn parse_content_encryption(text: &str) -> Result<ContentEncryption, ParseError> {
    parse_in(text, &ContentEncryption::ALL, &[], ContentEncryption::name)
}

// =============================================================================
// Compression (JWE "zip")
// =============================================================================

/// JWE payload compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMode {
    /// Raw DEFLATE (RFC 1951).
    Deflate,
}

impl CompressionMode {
    /// The `zip` header value.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Deflate => "DEF",
        }
    }
}

impl Display for CompressionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for CompressionMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "DEF" | "DEFLATE" => Ok(Self::Deflate),
            _ => Err(ParseError::Unrecognized(s.to_string())),
        }
    }
}

// =============================================================================
// Single algorithm field
// =============================================================================

/// An algorithm field resolved to either identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// A JWS signing algorithm.
    Signing(SigningAlgorithm),
    /// A JWE key management algorithm.
    Encryption(EncryptionAlgorithm),
}

impl Algorithm {
    /// The `alg` header value.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Signing(alg) => alg.wire_name(),
            Self::Encryption(alg) => alg.wire_name(),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signing(alg) => Display::fmt(alg, f),
            Self::Encryption(alg) => Display::fmt(alg, f),
        }
    }
}

impl From<SigningAlgorithm> for Algorithm {
    fn from(alg: SigningAlgorithm) -> Self {
        Self::Signing(alg)
    }
}

impl From<EncryptionAlgorithm> for Algorithm {
    fn from(alg: EncryptionAlgorithm) -> Self {
        Self::Encryption(alg)
    }
}

impl FromStr for Algorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_algorithm(s)
    }
}

/// Parses a single algorithm field, signing identifiers first.
///
/// The encryption set is consulted only when signing parsing fails. When both
/// fail, an exclusion from either set wins over a plain unrecognized error.
///
/// # Errors
///
/// Returns a `ParseError` if `text` is neither a signing nor an encryption
/// algorithm.
pub fn parse_algorithm(text: &str) -> Result<Algorithm, ParseError> {
    let signing_err = match parse_signing(text) {
        Ok(alg) => return Ok(Algorithm::Signing(alg)),
        Err(err) => err,
    };

    match parse_encryption(text) {
        Ok(alg) => Ok(Algorithm::Encryption(alg)),
        Err(ParseError::Unrecognized(_)) if matches!(signing_err, ParseError::Excluded(_)) => {
            Err(signing_err)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signing_case_insensitive() -> Result<(), ParseError> {
        assert_eq!(parse_signing("HS256")?, SigningAlgorithm::Hs256);
        assert_eq!(parse_signing("hs384")?, SigningAlgorithm::Hs384);
        assert_eq!(parse_signing("Rs512")?, SigningAlgorithm::Rs512);
        assert_eq!(parse_signing("es256")?, SigningAlgorithm::Es256);
        assert_eq!(parse_signing("NONE")?, SigningAlgorithm::None);
        assert_eq!(parse_signing(" none ")?, SigningAlgorithm::None);
        Ok(())
    }

    #[test]
    fn test_parse_signing_every_name() -> Result<(), ParseError> {
        for alg in SigningAlgorithm::ALL {
            assert_eq!(parse_signing(alg.name())?, alg);
            assert_eq!(alg.name().parse::<SigningAlgorithm>()?, alg);
        }
        Ok(())
    }

    #[test]
    fn test_parse_signing_rejects_pss() {
        for text in ["PS256", "PS384", "PS512", "ps256", "Ps384", "pS512"] {
            assert_eq!(
                parse_signing(text),
                Err(ParseError::Excluded(text.to_string()))
            );
        }
    }

    #[test]
    fn test_parse_signing_unrecognized() {
        assert!(matches!(
            parse_signing("HS1024"),
            Err(ParseError::Unrecognized(_))
        ));
        assert!(matches!(parse_signing(""), Err(ParseError::Unrecognized(_))));
        assert!(matches!(
            parse_signing("A128KW"),
            Err(ParseError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_parse_encryption_names_and_wire_names() -> Result<(), ParseError> {
        for alg in EncryptionAlgorithm::ALL {
            assert_eq!(parse_encryption(alg.name())?, alg);
            assert_eq!(parse_encryption(alg.wire_name())?, alg);
            assert_eq!(parse_encryption(&alg.name().to_lowercase())?, alg);
        }
        assert_eq!(parse_encryption("dir")?, EncryptionAlgorithm::Dir);
        assert_eq!(
            parse_encryption("pbes2-hs512+a256kw")?,
            EncryptionAlgorithm::Pbes2Hs512A256Kw
        );
        Ok(())
    }

    #[test]
    fn test_parse_encryption_rejects_ecdh() {
        for text in [
            "ECDH_ES",
            "ECDH_ES_A128KW",
            "ECDH_ES_A192KW",
            "ECDH_ES_A256KW",
            "ecdh-es",
            "ECDH-ES+A256KW",
        ] {
            assert_eq!(
                parse_encryption(text),
                Err(ParseError::Excluded(text.to_string()))
            );
        }
    }

    #[test]
    fn test_parse_content_encryption() -> Result<(), ParseError> {
        for enc in ContentEncryption::ALL {
            assert_eq!(parse_content_encryption(enc.name())?, enc);
            assert_eq!(parse_content_encryption(enc.wire_name())?, enc);
        }
        assert!(matches!(
            parse_content_encryption("A512GCM"),
            Err(ParseError::Unrecognized(_))
        ));
        Ok(())
    }

    #[test]
    fn test_parse_compression() -> Result<(), ParseError> {
        assert_eq!("DEF".parse::<CompressionMode>()?, CompressionMode::Deflate);
        assert_eq!("def".parse::<CompressionMode>()?, CompressionMode::Deflate);
        assert!("GZIP".parse::<CompressionMode>().is_err());
        Ok(())
    }

    #[test]
    fn test_parse_algorithm_precedence() -> Result<(), ParseError> {
        assert_eq!(
            parse_algorithm("HS256")?,
            Algorithm::Signing(SigningAlgorithm::Hs256)
        );
        assert_eq!(
            parse_algorithm("none")?,
            Algorithm::Signing(SigningAlgorithm::None)
        );
        assert_eq!(
            parse_algorithm("A128KW")?,
            Algorithm::Encryption(EncryptionAlgorithm::A128Kw)
        );
        assert_eq!(
            parse_algorithm("RSA-OAEP-256")?,
            Algorithm::Encryption(EncryptionAlgorithm::RsaOaep256)
        );
        Ok(())
    }

    #[test]
    fn test_parse_algorithm_exclusions_survive_fallback() {
        assert_eq!(
            parse_algorithm("PS256"),
            Err(ParseError::Excluded("PS256".to_string()))
        );
        assert_eq!(
            parse_algorithm("ECDH_ES_A128KW"),
            Err(ParseError::Excluded("ECDH_ES_A128KW".to_string()))
        );
        assert_eq!(
            parse_algorithm("XYZ"),
            Err(ParseError::Unrecognized("XYZ".to_string()))
        );
    }

    #[test]
    fn test_identifier_sets_are_disjoint() {
        for signing in SigningAlgorithm::ALL {
            assert!(parse_encryption(signing.name()).is_err());
        }
        for encryption in EncryptionAlgorithm::ALL {
            assert!(parse_signing(encryption.name()).is_err());
        }
    }

    #[test]
    fn test_display_uses_identifier_names() {
        assert_eq!(SigningAlgorithm::None.to_string(), "none");
        assert_eq!(EncryptionAlgorithm::RsaOaep256.to_string(), "RSA_OAEP_256");
        assert_eq!(ContentEncryption::A256CbcHs512.to_string(), "A256CBC_HS512");
        assert_eq!(
            Algorithm::Encryption(EncryptionAlgorithm::Dir).to_string(),
            "DIR"
        );
    }

    #[test]
    fn test_key_lengths() {
        assert_eq!(ContentEncryption::A128Gcm.key_len(), 16);
        assert_eq!(ContentEncryption::A192Gcm.key_len(), 24);
        assert_eq!(ContentEncryption::A256Gcm.key_len(), 32);
        assert_eq!(ContentEncryption::A128CbcHs256.key_len(), 32);
        assert_eq!(ContentEncryption::A192CbcHs384.key_len(), 48);
        assert_eq!(ContentEncryption::A256CbcHs512.key_len(), 64);
    }
}
