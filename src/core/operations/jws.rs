//! JWS compact signing and verification.
//!
//! The protected header is `{"alg": <wire name>, "typ": "JWT"}` plus any
//! caller extras. Extras may replace `typ` but never `alg`.
//!
//! | Family | Primitive                       | Signature bytes        |
//! |--------|---------------------------------|------------------------|
//! | HS     | HMAC-SHA-256/384/512            | full MAC               |
//! | RS     | RSASSA-PKCS1-v1_5 SHA-256/384/512 | modulus-sized        |
//! | ES     | ECDSA P-256/P-384/P-521         | fixed-width `r \|\| s` |
//! | none   | -                               | empty                  |

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use p256::ecdsa::signature::{Signer, Verifier};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use serde_json::Value;
use sha2::{Digest, Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::core::algorithm::SigningAlgorithm;
use crate::core::error::{JoseError, JoseResult};
use crate::core::operations::compact::{
    b64_decode, b64_encode, encode_object, header_str, header_with_extras, parse_object,
    split_segments, Claims, Header, JWS_SEGMENTS,
};
use crate::core::types::{EcdsaPrivateKey, ResolvedKey};

/// Signs `claims` into a JWS compact token.
///
/// `key` must be `None` exactly when `alg` is `none`.
///
/// # Errors
///
/// Returns `JoseError::InvalidKey` if the key shape does not fit `alg`, or
/// `JoseError::CryptoError` if the primitive fails.
pub fn sign(
    claims: &Claims,
    alg: SigningAlgorithm,
    key: Option<ResolvedKey<'_>>,
    extra_headers: Option<&Header>,
) -> JoseResult<String> {
    let mut header = Header::new();
    header.insert("typ".into(), Value::from("JWT"));
    header.extend(header_with_extras(extra_headers));
    header.insert("alg".into(), Value::from(alg.wire_name()));

    let signing_input = format!("{}.{}", encode_object(&header)?, encode_object(claims)?);
    let signature = compute_signature(alg, key, signing_input.as_bytes())?;

    Ok(format!("{signing_input}.{}", b64_encode(&signature)))
}

/// Verifies a JWS compact token and returns its claims.
///
/// The header's `alg` must equal `alg`; the token cannot choose its own
/// algorithm.
///
/// # Errors
///
/// - `JoseError::InvalidFormat` if the token is not three segments
/// - `JoseError::AlgorithmMismatch` if the header names another algorithm
/// - `JoseError::InvalidSignature` if the signature does not verify
/// - `JoseError::InvalidKey` if the key shape does not fit `alg`
pub fn verify(token: &str, alg: SigningAlgorithm, key: Option<ResolvedKey<'_>>) -> JoseResult<Claims> {
    let segments = split_segments(token, JWS_SEGMENTS)?;
    let header = parse_object(&b64_decode(segments[0])?)?;
    if header_str(&header, "alg")? != alg.wire_name() {
        return Err(JoseError::AlgorithmMismatch);
    }

    let signature = b64_decode(segments[2])?;
    let signing_input = &token.trim()[..segments[0].len() + 1 + segments[1].len()];
    check_signature(alg, key, signing_input.as_bytes(), &signature)?;

    parse_object(&b64_decode(segments[1])?)
}

// =============================================================================
// Signature primitives
// =============================================================================

fn compute_signature(
    alg: SigningAlgorithm,
    key: Option<ResolvedKey<'_>>,
    input: &[u8],
) -> JoseResult<Vec<u8>> {
    use SigningAlgorithm as A;

    match (alg, key) {
        (A::None, None) => Ok(Vec::new()),
        (A::Hs256, Some(ResolvedKey::Symmetric(k))) => hmac_tag::<Hmac<Sha256>>(k, input),
        (A::Hs384, Some(ResolvedKey::Symmetric(k))) => hmac_tag::<Hmac<Sha384>>(k, input),
        (A::Hs512, Some(ResolvedKey::Symmetric(k))) => hmac_tag::<Hmac<Sha512>>(k, input),
        (A::Rs256 | A::Rs384 | A::Rs512, Some(ResolvedKey::Rsa(k))) => rsa_sign(alg, k, input),
        (A::Es256, Some(ResolvedKey::Ecdsa(EcdsaPrivateKey::P256(k)))) => {
            let signature: p256::ecdsa::Signature = k.sign(input);
            Ok(signature.to_bytes().to_vec())
        }
        (A::Es384, Some(ResolvedKey::Ecdsa(EcdsaPrivateKey::P384(k)))) => {
            let signature: p384::ecdsa::Signature = k.sign(input);
            Ok(signature.to_bytes().to_vec())
        }
        (A::Es512, Some(ResolvedKey::Ecdsa(EcdsaPrivateKey::P521(k)))) => {
            let signature: p521::ecdsa::Signature = k.sign(input);
            Ok(signature.to_bytes().to_vec())
        }
        _ => Err(JoseError::InvalidKey),
    }
}

fn check_signature(
    alg: SigningAlgorithm,
    key: Option<ResolvedKey<'_>>,
    input: &[u8],
    signature: &[u8],
) -> JoseResult<()> {
    use SigningAlgorithm as A;

    match (alg, key) {
        (A::None, None) => {
            if signature.is_empty() {
                Ok(())
            } else {
                Err(JoseError::InvalidSignature)
            }
        }
        (A::Hs256 | A::Hs384 | A::Hs512, Some(ResolvedKey::Symmetric(_))) => {
            let expected = compute_signature(alg, key, input)?;
            if expected.len() == signature.len() && bool::from(expected.ct_eq(signature)) {
                Ok(())
            } else {
                Err(JoseError::InvalidSignature)
            }
        }
        (A::Rs256 | A::Rs384 | A::Rs512, Some(ResolvedKey::Rsa(k))) => {
            let (scheme, digest) = rsa_scheme(alg, input);
            k.to_public_key()
                .verify(scheme, &digest, signature)
                .map_err(|_| JoseError::InvalidSignature)
        }
        (A::Es256, Some(ResolvedKey::Ecdsa(EcdsaPrivateKey::P256(k)))) => {
            let signature = p256::ecdsa::Signature::from_slice(signature)
                .map_err(|_| JoseError::InvalidSignature)?;
            k.verifying_key()
                .verify(input, &signature)
                .map_err(|_| JoseError::InvalidSignature)
        }
        (A::Es384, Some(ResolvedKey::Ecdsa(EcdsaPrivateKey::P384(k)))) => {
            let signature = p384::ecdsa::Signature::from_slice(signature)
                .map_err(|_| JoseError::InvalidSignature)?;
            k.verifying_key()
                .verify(input, &signature)
                .map_err(|_| JoseError::InvalidSignature)
        }
        (A::Es512, Some(ResolvedKey::Ecdsa(EcdsaPrivateKey::P521(k)))) => {
            let signature = p521::ecdsa::Signature::from_slice(signature)
                .map_err(|_| JoseError::InvalidSignature)?;
            p521::ecdsa::VerifyingKey::from(k)
                .verify(input, &signature)
                .map_err(|_| JoseError::InvalidSignature)
        }
        _ => Err(JoseError::InvalidKey),
    }
}

fn hmac_tag<M: Mac + KeyInit>(key: &[u8], input: &[u8]) -> JoseResult<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(key).map_err(|_| JoseError::CryptoError)?;
    mac.update(input);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn rsa_scheme(alg: SigningAlgorithm, input: &[u8]) -> (Pkcs1v15Sign, Vec<u8>) {
    match alg {
        SigningAlgorithm::Rs384 => (Pkcs1v15Sign::new::<Sha384>(), Sha384::digest(input).to_vec()),
        SigningAlgorithm::Rs512 => (Pkcs1v15Sign::new::<Sha512>(), Sha512::digest(input).to_vec()),
        _ => (Pkcs1v15Sign::new::<Sha256>(), Sha256::digest(input).to_vec()),
    }
}

fn rsa_sign(alg: SigningAlgorithm, key: &RsaPrivateKey, input: &[u8]) -> JoseResult<Vec<u8>> {
    let (scheme, digest) = rsa_scheme(alg, input);
    key.sign(scheme, &digest).map_err(|_| JoseError::CryptoError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{test_keys, EcdsaCurve};

    fn claims() -> Claims {
        let mut claims = Claims::new();
        claims.insert("sub".into(), Value::from("alice"));
        claims.insert("admin".into(), Value::from(true));
        claims
    }

    #[test]
    fn test_hs256_roundtrip() -> JoseResult<()> {
        let key = Some(ResolvedKey::Symmetric(b"a shared secret of decent length"));
        let token = sign(&claims(), SigningAlgorithm::Hs256, key, None)?;
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(verify(&token, SigningAlgorithm::Hs256, key)?, claims());
        Ok(())
    }

    #[test]
    fn test_hmac_known_answer() -> JoseResult<()> {
        // RFC 4231 test case 2
        let tag = hmac_tag::<Hmac<Sha256>>(b"Jefe", b"what do ya want for nothing?")?;
        assert_eq!(
            tag[..4],
            [0x5b, 0xdc, 0xc1, 0x46],
            "HMAC-SHA-256 prefix mismatch"
        );
        Ok(())
    }

    #[test]
    fn test_header_contents() -> JoseResult<()> {
        let mut extras = Header::new();
        extras.insert("kid".into(), Value::from("k1"));
        extras.insert("typ".into(), Value::from("at+jwt"));
        extras.insert("alg".into(), Value::from("none"));

        let token = sign(
            &claims(),
            SigningAlgorithm::Hs384,
            Some(ResolvedKey::Symmetric(b"k")),
            Some(&extras),
        )?;
        let header = crate::core::operations::peek_header(&token)?;
        assert_eq!(header["alg"], "HS384");
        assert_eq!(header["typ"], "at+jwt");
        assert_eq!(header["kid"], "k1");
        Ok(())
    }

    #[test]
    fn test_wrong_secret_fails() -> JoseResult<()> {
        let token = sign(
            &claims(),
            SigningAlgorithm::Hs512,
            Some(ResolvedKey::Symmetric(b"right")),
            None,
        )?;
        let result = verify(
            &token,
            SigningAlgorithm::Hs512,
            Some(ResolvedKey::Symmetric(b"wrong")),
        );
        assert!(matches!(result, Err(JoseError::InvalidSignature)));
        Ok(())
    }

    #[test]
    fn test_algorithm_mismatch() -> JoseResult<()> {
        let key = Some(ResolvedKey::Symmetric(b"secret"));
        let token = sign(&claims(), SigningAlgorithm::Hs256, key, None)?;
        let result = verify(&token, SigningAlgorithm::Hs384, key);
        assert!(matches!(result, Err(JoseError::AlgorithmMismatch)));
        Ok(())
    }

    #[test]
    fn test_rs256_roundtrip() -> JoseResult<()> {
        let key = Some(ResolvedKey::Rsa(test_keys::rsa_key()));
        for alg in [
            SigningAlgorithm::Rs256,
            SigningAlgorithm::Rs384,
            SigningAlgorithm::Rs512,
        ] {
            let token = sign(&claims(), alg, key, None)?;
            assert_eq!(verify(&token, alg, key)?, claims());
        }
        Ok(())
    }

    #[test]
    fn test_ecdsa_roundtrip_and_signature_width() -> JoseResult<()> {
        for (alg, curve, width) in [
            (SigningAlgorithm::Es256, EcdsaCurve::P256, 64),
            (SigningAlgorithm::Es384, EcdsaCurve::P384, 96),
            (SigningAlgorithm::Es512, EcdsaCurve::P521, 132),
        ] {
            let ec = EcdsaPrivateKey::random(curve);
            let key = Some(ResolvedKey::Ecdsa(&ec));
            let token = sign(&claims(), alg, key, None)?;

            let signature = token.rsplit('.').next().unwrap_or_default();
            assert_eq!(b64_decode(signature)?.len(), width);
            assert_eq!(verify(&token, alg, key)?, claims());
        }
        Ok(())
    }

    #[test]
    fn test_es512_rejects_other_key() -> JoseResult<()> {
        let signer = EcdsaPrivateKey::random(EcdsaCurve::P521);
        let other = EcdsaPrivateKey::random(EcdsaCurve::P521);
        let token = sign(
            &claims(),
            SigningAlgorithm::Es512,
            Some(ResolvedKey::Ecdsa(&signer)),
            None,
        )?;

        assert_eq!(
            verify(&token, SigningAlgorithm::Es512, Some(ResolvedKey::Ecdsa(&signer)))?,
            claims()
        );
        let result = verify(&token, SigningAlgorithm::Es512, Some(ResolvedKey::Ecdsa(&other)));
        assert!(matches!(result, Err(JoseError::InvalidSignature)));
        Ok(())
    }

    #[test]
    fn test_curve_key_mismatch_is_invalid_key() {
        let ec = EcdsaPrivateKey::random(EcdsaCurve::P384);
        let result = sign(
            &claims(),
            SigningAlgorithm::Es256,
            Some(ResolvedKey::Ecdsa(&ec)),
            None,
        );
        assert!(matches!(result, Err(JoseError::InvalidKey)));
    }

    #[test]
    fn test_none_is_unsigned() -> JoseResult<()> {
        let token = sign(&claims(), SigningAlgorithm::None, None, None)?;
        assert!(token.ends_with('.'));
        assert_eq!(verify(&token, SigningAlgorithm::None, None)?, claims());

        let forged = format!("{token}AAAA");
        assert!(matches!(
            verify(&forged, SigningAlgorithm::None, None),
            Err(JoseError::InvalidSignature)
        ));
        Ok(())
    }

    #[test]
    fn test_none_with_key_is_rejected() {
        let result = sign(
            &claims(),
            SigningAlgorithm::None,
            Some(ResolvedKey::Symmetric(b"k")),
            None,
        );
        assert!(matches!(result, Err(JoseError::InvalidKey)));
    }

    #[test]
    fn test_tampered_payload_fails() -> JoseResult<()> {
        let key = Some(ResolvedKey::Symmetric(b"secret"));
        let token = sign(&claims(), SigningAlgorithm::Hs256, key, None)?;
        let segments: Vec<&str> = token.split('.').collect();
        let mut other = Claims::new();
        other.insert("sub".into(), Value::from("mallory"));
        let forged = format!("{}.{}.{}", segments[0], encode_object(&other)?, segments[2]);

        assert!(matches!(
            verify(&forged, SigningAlgorithm::Hs256, key),
            Err(JoseError::InvalidSignature)
        ));
        Ok(())
    }

    #[test]
    fn test_malformed_tokens() {
        let key = Some(ResolvedKey::Symmetric(b"secret"));
        assert!(matches!(
            verify("abc", SigningAlgorithm::Hs256, key),
            Err(JoseError::InvalidFormat)
        ));
        assert!(matches!(
            verify("!!.e30.", SigningAlgorithm::Hs256, key),
            Err(JoseError::Base64Decode(_))
        ));
    }
}
