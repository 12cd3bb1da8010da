//! Native JOSE operations.
//!
//! - [`jws`] - Compact JWS signing and verification
//! - [`jwe`] - Compact JWE encryption and decryption
//! - [`compression`] - `zip` payload compression
//!
//! [`encode`] and [`decode`] dispatch over a single [`Algorithm`] and are the
//! only entry points the command layer uses. Neither checks credential
//! compatibility; that is the resolver's job.

pub mod compression;
pub mod jwe;
pub mod jws;

mod compact;

pub use compact::{peek_header, Claims, Header, JWE_SEGMENTS, JWS_SEGMENTS, RESERVED_HEADERS};
pub use jwe::{EncryptOptions, Pbes2Params, PBES2_MAX_ITERATIONS};

use crate::core::algorithm::{Algorithm, ContentEncryption};
use crate::core::error::{JoseError, JoseResult};
use crate::core::types::ResolvedKey;

/// Encodes `claims` as a compact JWS or JWE.
///
/// For encryption algorithms both `key` and `enc` are required.
///
/// # Errors
///
/// Returns `JoseError::InvalidKey` or `JoseError::InvalidHeader` when a
/// required input is missing, plus any error from [`jws::sign`] or
/// [`jwe::encrypt`].
pub fn encode(
    claims: &Claims,
    alg: Algorithm,
    key: Option<ResolvedKey<'_>>,
    enc: Option<ContentEncryption>,
    options: &EncryptOptions<'_>,
) -> JoseResult<String> {
    match alg {
        Algorithm::Signing(alg) => jws::sign(claims, alg, key, options.extra_headers),
        Algorithm::Encryption(alg) => {
            let key = key.ok_or(JoseError::InvalidKey)?;
            let enc = enc.ok_or(JoseError::InvalidHeader)?;
            jwe::encrypt(claims, alg, enc, key, options)
        }
    }
}

/// Decodes and validates a compact JWS or JWE, returning its claims.
///
/// # Errors
///
/// Returns any error from [`jws::verify`] or [`jwe::decrypt`].
pub fn decode(
    token: &str,
    alg: Algorithm,
    key: Option<ResolvedKey<'_>>,
    enc: Option<ContentEncryption>,
) -> JoseResult<Claims> {
    match alg {
        Algorithm::Signing(alg) => jws::verify(token, alg, key),
        Algorithm::Encryption(alg) => {
            let key = key.ok_or(JoseError::InvalidKey)?;
            jwe::decrypt(token, alg, key, enc)
        }
    }
}

/// Fills a fresh buffer from the OS RNG.
pub(crate) fn random_bytes(len: usize) -> JoseResult<Vec<u8>> {
    use rand_core::{OsRng, RngCore};

    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| JoseError::CryptoError)?;
    Ok(bytes)
}
