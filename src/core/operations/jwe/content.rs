//! JWE content encryption.
//!
//! Two constructions are supported:
//!
//! - AES-GCM with a 96-bit IV and 128-bit tag
//! - AES-CBC + HMAC-SHA2 (RFC 7518 section 5.2), where the first half of the
//!   CEK is the MAC key and the second half the AES key
//!
//! The AAD is always the ASCII of the encoded protected header.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::core::algorithm::ContentEncryption;
use crate::core::error::{JoseError, JoseResult};
use crate::core::operations::random_bytes;

/// AES-GCM IV size (96 bits).
pub const GCM_IV_SIZE: usize = 12;

/// AES-GCM tag size (128 bits).
pub const GCM_TAG_SIZE: usize = 16;

/// AES-CBC IV size (one AES block).
pub const CBC_IV_SIZE: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Output of content encryption.
pub(crate) struct Sealed {
    pub iv: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

/// Encrypts `plaintext` under `cek` with a fresh IV.
pub(crate) fn seal(
    enc: ContentEncryption,
    cek: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> JoseResult<Sealed> {
    if cek.len() != enc.key_len() {
        return Err(JoseError::InvalidKey);
    }

    match enc {
        ContentEncryption::A128Gcm | ContentEncryption::A192Gcm | ContentEncryption::A256Gcm => {
            let iv = random_bytes(GCM_IV_SIZE)?;
            let mut ciphertext = plaintext.to_vec();
            let tag = gcm_seal(cek, &iv, aad, &mut ciphertext)?;
            Ok(Sealed {
                iv,
                ciphertext,
                tag,
            })
        }
        ContentEncryption::A128CbcHs256
        | ContentEncryption::A192CbcHs384
        | ContentEncryption::A256CbcHs512 => {
            let iv = random_bytes(CBC_IV_SIZE)?;
            let (mac_key, enc_key) = cek.split_at(cek.len() / 2);
            let ciphertext = cbc_encrypt(enc_key, &iv, plaintext)?;
            let tag = cbc_hmac_tag(enc, mac_key, aad, &iv, &ciphertext)?;
            Ok(Sealed {
                iv,
                ciphertext,
                tag,
            })
        }
    }
}

/// Authenticates and decrypts a received ciphertext.
///
/// The tag is checked before any decryption happens.
pub(crate) fn open(
    enc: ContentEncryption,
    cek: &[u8],
    aad: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> JoseResult<Zeroizing<Vec<u8>>> {
    if cek.len() != enc.key_len() {
        return Err(JoseError::DecryptionFailed);
    }

    match enc {
        ContentEncryption::A128Gcm | ContentEncryption::A192Gcm | ContentEncryption::A256Gcm => {
            if iv.len() != GCM_IV_SIZE || tag.len() != GCM_TAG_SIZE {
                return Err(JoseError::InvalidFormat);
            }
            let mut plaintext = Zeroizing::new(ciphertext.to_vec());
            gcm_open(cek, iv, aad, &mut plaintext, tag)?;
            Ok(plaintext)
        }
        ContentEncryption::A128CbcHs256
        | ContentEncryption::A192CbcHs384
        | ContentEncryption::A256CbcHs512 => {
            if iv.len() != CBC_IV_SIZE {
                return Err(JoseError::InvalidFormat);
            }
            let (mac_key, enc_key) = cek.split_at(cek.len() / 2);
            let expected = cbc_hmac_tag(enc, mac_key, aad, iv, ciphertext)?;
            if expected.len() != tag.len() || !bool::from(expected.ct_eq(tag)) {
                return Err(JoseError::AuthenticationFailed);
            }
            cbc_decrypt(enc_key, iv, ciphertext)
        }
    }
}

// =============================================================================
// AES-GCM
// =============================================================================

/// Encrypts `buffer` in place and returns the detached tag. The key size
/// picks the AES variant.
pub(crate) fn gcm_seal(key: &[u8], iv: &[u8], aad: &[u8], buffer: &mut [u8]) -> JoseResult<Vec<u8>> {
    if iv.len() != GCM_IV_SIZE {
        return Err(JoseError::InvalidFormat);
    }
    match key.len() {
        16 => gcm_seal_with::<Aes128Gcm>(key, iv, aad, buffer),
        24 => gcm_seal_with::<Aes192Gcm>(key, iv, aad, buffer),
        32 => gcm_seal_with::<Aes256Gcm>(key, iv, aad, buffer),
        _ => Err(JoseError::InvalidKey),
    }
}

/// Verifies `tag` and decrypts `buffer` in place.
pub(crate) fn gcm_open(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    buffer: &mut [u8],
    tag: &[u8],
) -> JoseResult<()> {
    if iv.len() != GCM_IV_SIZE || tag.len() != GCM_TAG_SIZE {
        return Err(JoseError::InvalidFormat);
    }
    match key.len() {
        16 => gcm_open_with::<Aes128Gcm>(key, iv, aad, buffer, tag),
        24 => gcm_open_with::<Aes192Gcm>(key, iv, aad, buffer, tag),
        32 => gcm_open_with::<Aes256Gcm>(key, iv, aad, buffer, tag),
        _ => Err(JoseError::InvalidKey),
    }
}

fn gcm_seal_with<C>(key: &[u8], iv: &[u8], aad: &[u8], buffer: &mut [u8]) -> JoseResult<Vec<u8>>
where
    C: AeadInPlace + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(|_| JoseError::InvalidKey)?;
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(iv), aad, buffer)
        .map_err(|_| JoseError::CryptoError)?;
    Ok(tag.to_vec())
}

fn gcm_open_with<C>(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    buffer: &mut [u8],
    tag: &[u8],
) -> JoseResult<()>
where
    C: AeadInPlace + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(|_| JoseError::InvalidKey)?;
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(iv),
            aad,
            buffer,
            GenericArray::from_slice(tag),
        )
        .map_err(|_| JoseError::AuthenticationFailed)
}

// =============================================================================
// AES-CBC + HMAC-SHA2
// =============================================================================

fn cbc_encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> JoseResult<Vec<u8>> {
    let ciphertext = match key.len() {
        16 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        24 => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
            .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        32 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        _ => return Err(JoseError::InvalidKey),
    };
    ciphertext.map_err(|_| JoseError::CryptoError)
}

fn cbc_decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> JoseResult<Zeroizing<Vec<u8>>> {
    let plaintext = match key.len() {
        16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| JoseError::CryptoError)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        24 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|_| JoseError::CryptoError)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        32 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| JoseError::CryptoError)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        _ => return Err(JoseError::InvalidKey),
    };
    plaintext
        .map(Zeroizing::new)
        .map_err(|_| JoseError::DecryptionFailed)
}

/// `HMAC(mac_key, AAD || IV || ciphertext || AL)` truncated to the MAC key
/// length, where AL is the AAD bit length as a big-endian u64.
fn cbc_hmac_tag(
    enc: ContentEncryption,
    mac_key: &[u8],
    aad: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> JoseResult<Vec<u8>> {
    let aad_bits = (aad.len() as u64).wrapping_mul(8).to_be_bytes();
    let parts: [&[u8]; 4] = [aad, iv, ciphertext, &aad_bits];

    let mut full = match enc {
        ContentEncryption::A192CbcHs384 => hmac_concat::<Hmac<Sha384>>(mac_key, &parts)?,
        ContentEncryption::A256CbcHs512 => hmac_concat::<Hmac<Sha512>>(mac_key, &parts)?,
        _ => hmac_concat::<Hmac<Sha256>>(mac_key, &parts)?,
    };
    full.truncate(mac_key.len());
    Ok(full)
}

fn hmac_concat<M: Mac + hmac::digest::KeyInit>(key: &[u8], parts: &[&[u8]]) -> JoseResult<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(key).map_err(|_| JoseError::CryptoError)?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().to_vec())
}
