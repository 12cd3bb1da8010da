//! JWE key management: producing and recovering the content encryption key.
//!
//! Every algorithm either wraps a fresh random CEK or, for `dir`, uses the
//! shared key as the CEK. Header parameters produced while wrapping (`iv`,
//! `tag`, `p2s`, `p2c`) are protected by the content encryption AAD.

use aes::cipher::generic_array::GenericArray;
use aes_kw::{KekAes128, KekAes192, KekAes256};
use hmac::Hmac;
use rand_core::OsRng;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey};
use serde_json::Value;
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use super::content::{gcm_open, gcm_seal, GCM_IV_SIZE, GCM_TAG_SIZE};
use super::{Pbes2Params, PBES2_MAX_ITERATIONS, PBES2_MIN_SALT_SIZE};
use crate::core::algorithm::{ContentEncryption, EncryptionAlgorithm};
use crate::core::error::{JoseError, JoseResult};
use crate::core::operations::compact::{b64_decode, b64_encode, header_str, Header};
use crate::core::operations::random_bytes;
use crate::core::types::ResolvedKey;

/// A content encryption key together with its wire form.
pub(crate) struct KeyEnvelope {
    /// The plaintext CEK.
    pub cek: Zeroizing<Vec<u8>>,
    /// The JWE Encrypted Key segment (empty for `dir`).
    pub encrypted_key: Vec<u8>,
    /// Header parameters the recipient needs to unwrap.
    pub header: Header,
}

/// Produces the CEK for a new token.
pub(crate) fn wrap_new_key(
    alg: EncryptionAlgorithm,
    enc: ContentEncryption,
    key: ResolvedKey<'_>,
    pbes2: &Pbes2Params,
) -> JoseResult<KeyEnvelope> {
    use EncryptionAlgorithm as A;

    let mut header = Header::new();

    if let (A::Dir, ResolvedKey::Symmetric(shared)) = (alg, key) {
        if shared.len() != enc.key_len() {
            return Err(JoseError::InvalidKey);
        }
        return Ok(KeyEnvelope {
            cek: Zeroizing::new(shared.to_vec()),
            encrypted_key: Vec::new(),
            header,
        });
    }

    let cek = Zeroizing::new(random_bytes(enc.key_len())?);

    let encrypted_key = match (alg, key) {
        (A::RsaOaep256 | A::RsaOaep | A::Rsa1_5, ResolvedKey::Rsa(rsa_key)) => {
            rsa_encrypt(alg, rsa_key, &cek)?
        }
        (A::A128Kw | A::A192Kw | A::A256Kw, ResolvedKey::Symmetric(kek)) => {
            check_kek_len(alg, kek)?;
            aes_key_wrap(kek, &cek)?
        }
        (A::A128GcmKw | A::A192GcmKw | A::A256GcmKw, ResolvedKey::Symmetric(kek)) => {
            check_kek_len(alg, kek)?;
            let iv = random_bytes(GCM_IV_SIZE)?;
            let mut wrapped = cek.to_vec();
            let tag = gcm_seal(kek, &iv, &[], &mut wrapped)?;
            header.insert("iv".into(), Value::from(b64_encode(&iv)));
            header.insert("tag".into(), Value::from(b64_encode(&tag)));
            wrapped
        }
        (
            A::Pbes2Hs256A128Kw | A::Pbes2Hs384A192Kw | A::Pbes2Hs512A256Kw,
            ResolvedKey::Password(password),
        ) => {
            if pbes2.salt_len < PBES2_MIN_SALT_SIZE
                || pbes2.iterations == 0
                || pbes2.iterations > PBES2_MAX_ITERATIONS
            {
                return Err(JoseError::KeyDerivationFailed);
            }
            let p2s = random_bytes(pbes2.salt_len)?;
            let kek = pbes2_derive(alg, password, &p2s, pbes2.iterations)?;
            header.insert("p2s".into(), Value::from(b64_encode(&p2s)));
            header.insert("p2c".into(), Value::from(pbes2.iterations));
            aes_key_wrap(&kek, &cek)?
        }
        _ => return Err(JoseError::InvalidKey),
    };

    Ok(KeyEnvelope {
        cek,
        encrypted_key,
        header,
    })
}

/// Recovers the CEK of a received token.
///
/// For RSA1_5 a failed unwrap yields a random CEK of `enc`'s length, so the
/// token is rejected by content decryption instead (RFC 7516 section 11.5).
pub(crate) fn unwrap_key(
    alg: EncryptionAlgorithm,
    enc: ContentEncryption,
    key: ResolvedKey<'_>,
    header: &Header,
    encrypted_key: &[u8],
) -> JoseResult<Zeroizing<Vec<u8>>> {
    use EncryptionAlgorithm as A;

    match (alg, key) {
        (A::Dir, ResolvedKey::Symmetric(shared)) => {
            if !encrypted_key.is_empty() {
                return Err(JoseError::InvalidFormat);
            }
            Ok(Zeroizing::new(shared.to_vec()))
        }
        (A::RsaOaep256 | A::RsaOaep | A::Rsa1_5, ResolvedKey::Rsa(rsa_key)) => {
            rsa_decrypt(alg, rsa_key, encrypted_key, enc.key_len())
        }
        (A::A128Kw | A::A192Kw | A::A256Kw, ResolvedKey::Symmetric(kek)) => {
            check_kek_len(alg, kek)?;
            aes_key_unwrap(kek, encrypted_key)
        }
        (A::A128GcmKw | A::A192GcmKw | A::A256GcmKw, ResolvedKey::Symmetric(kek)) => {
            check_kek_len(alg, kek)?;
            let iv = b64_decode(header_str(header, "iv")?)?;
            let tag = b64_decode(header_str(header, "tag")?)?;
            if iv.len() != GCM_IV_SIZE || tag.len() != GCM_TAG_SIZE {
                return Err(JoseError::InvalidHeader);
            }
            let mut cek = Zeroizing::new(encrypted_key.to_vec());
            gcm_open(kek, &iv, &[], &mut cek, &tag)?;
            Ok(cek)
        }
        (
            A::Pbes2Hs256A128Kw | A::Pbes2Hs384A192Kw | A::Pbes2Hs512A256Kw,
            ResolvedKey::Password(password),
        ) => {
            let p2s = b64_decode(header_str(header, "p2s")?)?;
            let p2c = header
                .get("p2c")
                .and_then(Value::as_u64)
                .ok_or(JoseError::InvalidHeader)?;
            // Bounded so a hostile token cannot pin the CPU.
            let iterations = u32::try_from(p2c)
                .ok()
                .filter(|count| (1..=PBES2_MAX_ITERATIONS).contains(count))
                .ok_or(JoseError::InvalidHeader)?;
            let kek = pbes2_derive(alg, password, &p2s, iterations)?;
            aes_key_unwrap(&kek, encrypted_key)
        }
        _ => Err(JoseError::InvalidKey),
    }
}

// =============================================================================
// Primitives
// =============================================================================

/// Key-encryption-key length required by an AES-based algorithm.
const fn kek_len(alg: EncryptionAlgorithm) -> usize {
    match alg {
        EncryptionAlgorithm::A192Kw
        | EncryptionAlgorithm::A192GcmKw
        | EncryptionAlgorithm::Pbes2Hs384A192Kw => 24,
        EncryptionAlgorithm::A256Kw
        | EncryptionAlgorithm::A256GcmKw
        | EncryptionAlgorithm::Pbes2Hs512A256Kw => 32,
        _ => 16,
    }
}

fn check_kek_len(alg: EncryptionAlgorithm, kek: &[u8]) -> JoseResult<()> {
    if kek.len() == kek_len(alg) {
        Ok(())
    } else {
        Err(JoseError::InvalidKey)
    }
}

/// RFC 3394 AES key wrap. The KEK size picks the AES variant.
fn aes_key_wrap(kek: &[u8], cek: &[u8]) -> JoseResult<Vec<u8>> {
    let wrapped = match kek.len() {
        16 => KekAes128::new(GenericArray::from_slice(kek)).wrap_vec(cek),
        24 => KekAes192::new(GenericArray::from_slice(kek)).wrap_vec(cek),
        32 => KekAes256::new(GenericArray::from_slice(kek)).wrap_vec(cek),
        _ => return Err(JoseError::InvalidKey),
    };
    wrapped.map_err(|_| JoseError::CryptoError)
}

fn aes_key_unwrap(kek: &[u8], wrapped: &[u8]) -> JoseResult<Zeroizing<Vec<u8>>> {
    let cek = match kek.len() {
        16 => KekAes128::new(GenericArray::from_slice(kek)).unwrap_vec(wrapped),
        24 => KekAes192::new(GenericArray::from_slice(kek)).unwrap_vec(wrapped),
        32 => KekAes256::new(GenericArray::from_slice(kek)).unwrap_vec(wrapped),
        _ => return Err(JoseError::InvalidKey),
    };
    cek.map(Zeroizing::new)
        .map_err(|_| JoseError::DecryptionFailed)
}

/// PBES2 key derivation (RFC 7518 section 4.8).
///
/// The PBKDF2 salt is `alg || 0x00 || p2s`, binding the derived key to the
/// algorithm name.
fn pbes2_derive(
    alg: EncryptionAlgorithm,
    password: &str,
    p2s: &[u8],
    iterations: u32,
) -> JoseResult<Zeroizing<Vec<u8>>> {
    let mut salt = Vec::with_capacity(alg.wire_name().len() + 1 + p2s.len());
    salt.extend_from_slice(alg.wire_name().as_bytes());
    salt.push(0);
    salt.extend_from_slice(p2s);

    let mut kek = Zeroizing::new(vec![0u8; kek_len(alg)]);
    let password = password.as_bytes();
    let derived = match alg {
        EncryptionAlgorithm::Pbes2Hs384A192Kw => {
            pbkdf2::pbkdf2::<Hmac<Sha384>>(password, &salt, iterations, &mut kek)
        }
        EncryptionAlgorithm::Pbes2Hs512A256Kw => {
            pbkdf2::pbkdf2::<Hmac<Sha512>>(password, &salt, iterations, &mut kek)
        }
        _ => pbkdf2::pbkdf2::<Hmac<Sha256>>(password, &salt, iterations, &mut kek),
    };
    derived.map_err(|_| JoseError::KeyDerivationFailed)?;
    Ok(kek)
}

fn rsa_encrypt(alg: EncryptionAlgorithm, key: &RsaPrivateKey, cek: &[u8]) -> JoseResult<Vec<u8>> {
    let public = key.to_public_key();
    let encrypted = match alg {
        EncryptionAlgorithm::RsaOaep256 => public.encrypt(&mut OsRng, Oaep::new::<Sha256>(), cek),
        EncryptionAlgorithm::RsaOaep => public.encrypt(&mut OsRng, Oaep::new::<sha1::Sha1>(), cek),
        _ => public.encrypt(&mut OsRng, Pkcs1v15Encrypt, cek),
    };
    encrypted.map_err(|_| JoseError::CryptoError)
}

fn rsa_decrypt(
    alg: EncryptionAlgorithm,
    key: &RsaPrivateKey,
    encrypted_key: &[u8],
    cek_len: usize,
) -> JoseResult<Zeroizing<Vec<u8>>> {
    let decrypted = match alg {
        EncryptionAlgorithm::RsaOaep256 => key.decrypt(Oaep::new::<Sha256>(), encrypted_key),
        EncryptionAlgorithm::RsaOaep => key.decrypt(Oaep::new::<sha1::Sha1>(), encrypted_key),
        _ => {
            // A padding failure must look like a tag failure.
            let cek = key
                .decrypt(Pkcs1v15Encrypt, encrypted_key)
                .map(Zeroizing::new)
                .ok()
                .filter(|cek| cek.len() == cek_len);
            return match cek {
                Some(cek) => Ok(cek),
                None => random_bytes(cek_len).map(Zeroizing::new),
            };
        }
    };
    decrypted
        .map(Zeroizing::new)
        .map_err(|_| JoseError::DecryptionFailed)
}
