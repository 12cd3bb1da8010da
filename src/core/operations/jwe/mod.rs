//! JWE compact encryption and decryption.
//!
//! Token layout:
//!
//! ```text
//! BASE64URL(header) . BASE64URL(encrypted key) . BASE64URL(iv)
//!     . BASE64URL(ciphertext) . BASE64URL(tag)
//! ```
//!
//! The protected header carries `alg`, `enc`, optional `zip`, any key
//! management parameters, and the caller's extras.

mod content;
mod key_management;

use serde_json::Value;

use crate::core::algorithm::{CompressionMode, ContentEncryption, EncryptionAlgorithm};
use crate::core::error::{JoseError, JoseResult};
use crate::core::operations::compact::{
    b64_decode, b64_encode, encode_object, header_str, header_with_extras, parse_object,
    split_segments, Claims, Header, JWE_SEGMENTS,
};
use crate::core::operations::compression;
use crate::core::types::ResolvedKey;

pub use content::{CBC_IV_SIZE, GCM_IV_SIZE, GCM_TAG_SIZE};

/// Upper bound on `p2c` accepted when decrypting PBES2 tokens.
pub const PBES2_MAX_ITERATIONS: u32 = 1_000_000;

/// Smallest `p2s` length used when issuing PBES2 tokens (RFC 7518 section 4.8.1.1).
pub const PBES2_MIN_SALT_SIZE: usize = 8;

/// PBES2 parameters used when issuing password-protected tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbes2Params {
    /// PBKDF2 iteration count, written to the header as `p2c`.
    pub iterations: u32,
    /// Random salt length in bytes, written to the header as `p2s`.
    pub salt_len: usize,
}

impl Default for Pbes2Params {
    fn default() -> Self {
        Self::moderate()
    }
}

impl Pbes2Params {
    /// Custom parameters.
    #[must_use]
    pub const fn new(iterations: u32, salt_len: usize) -> Self {
        Self {
            iterations,
            salt_len,
        }
    }

    /// Interactive profile: fast, suitable for short-lived tokens.
    /// - Iterations: 100,000
    #[must_use]
    pub const fn interactive() -> Self {
        Self::new(100_000, 16)
    }

    /// Moderate profile: balanced security and performance.
    /// - Iterations: 310,000
    #[must_use]
    pub const fn moderate() -> Self {
        Self::new(310_000, 16)
    }

    /// Sensitive profile: slower derivation for long-lived tokens.
    /// - Iterations: 600,000
    #[must_use]
    pub const fn sensitive() -> Self {
        Self::new(600_000, 32)
    }
}

/// Optional inputs to [`encrypt`].
#[derive(Debug, Clone, Default)]
pub struct EncryptOptions<'h> {
    /// Compress the payload before encryption.
    pub compression: Option<CompressionMode>,
    /// Additional protected header parameters.
    pub extra_headers: Option<&'h Header>,
    /// PBES2 parameters. Ignored by other algorithms.
    pub pbes2: Pbes2Params,
}

/// Encrypts `claims` into a JWE compact token.
///
/// # Errors
///
/// - `JoseError::InvalidKey` if the key shape or length does not fit
/// - `JoseError::KeyDerivationFailed` for unusable PBES2 parameters
/// - `JoseError::UnsupportedCompression` if compression was requested but
///   the crate was built without it
pub fn encrypt(
    claims: &Claims,
    alg: EncryptionAlgorithm,
    enc: ContentEncryption,
    key: ResolvedKey<'_>,
    options: &EncryptOptions<'_>,
) -> JoseResult<String> {
    let envelope = key_management::wrap_new_key(alg, enc, key, &options.pbes2)?;

    let mut header = header_with_extras(options.extra_headers);
    header.extend(envelope.header);
    header.insert("alg".into(), Value::from(alg.wire_name()));
    header.insert("enc".into(), Value::from(enc.wire_name()));
    if let Some(mode) = options.compression {
        header.insert("zip".into(), Value::from(mode.wire_name()));
    }

    let mut plaintext = serde_json::to_vec(claims)?;
    if let Some(mode) = options.compression {
        plaintext = compression::compress(mode, &plaintext)?;
    }

    let encoded_header = encode_object(&header)?;
    let sealed = content::seal(enc, &envelope.cek, encoded_header.as_bytes(), &plaintext)?;

    Ok([
        encoded_header,
        b64_encode(&envelope.encrypted_key),
        b64_encode(&sealed.iv),
        b64_encode(&sealed.ciphertext),
        b64_encode(&sealed.tag),
    ]
    .join("."))
}

/// Decrypts a JWE compact token and returns its claims.
///
/// The header's `alg` must equal `alg`. When `enc` is given the header's
/// `enc` must equal it too; otherwise any supported content encryption is
/// accepted.
///
/// # Errors
///
/// - `JoseError::InvalidFormat` if the token is not five segments
/// - `JoseError::AlgorithmMismatch` if the header names other algorithms
/// - `JoseError::DecryptionFailed` / `JoseError::AuthenticationFailed` if the
///   key is wrong or the token was modified
pub fn decrypt(
    token: &str,
    alg: EncryptionAlgorithm,
    key: ResolvedKey<'_>,
    enc: Option<ContentEncryption>,
) -> JoseResult<Claims> {
    let segments = split_segments(token, JWE_SEGMENTS)?;
    let header = parse_object(&b64_decode(segments[0])?)?;

    if header_str(&header, "alg")? != alg.wire_name() {
        return Err(JoseError::AlgorithmMismatch);
    }
    let header_enc = header_str(&header, "enc")?;
    let token_enc = ContentEncryption::ALL
        .into_iter()
        .find(|candidate| candidate.wire_name() == header_enc)
        .ok_or(JoseError::InvalidHeader)?;
    if enc.is_some_and(|expected| expected != token_enc) {
        return Err(JoseError::AlgorithmMismatch);
    }

    let encrypted_key = b64_decode(segments[1])?;
    let iv = b64_decode(segments[2])?;
    let ciphertext = b64_decode(segments[3])?;
    let tag = b64_decode(segments[4])?;

    let cek = key_management::unwrap_key(alg, token_enc, key, &header, &encrypted_key)?;
    let plaintext = content::open(
        token_enc,
        &cek,
        segments[0].as_bytes(),
        &iv,
        &ciphertext,
        &tag,
    )?;

    match header.get("zip") {
        None => parse_object(&plaintext),
        Some(Value::String(zip)) => {
            if zip != CompressionMode::Deflate.wire_name() {
                return Err(JoseError::UnsupportedCompression(zip.clone()));
            }
            parse_object(&compression::decompress(
                CompressionMode::Deflate,
                &plaintext,
            )?)
        }
        Some(_) => Err(JoseError::InvalidHeader),
    }
}
