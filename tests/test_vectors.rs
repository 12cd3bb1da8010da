//! Integration tests driven by the JSON vector files.
//!
//! `identifiers.json` pins how algorithm text is parsed. `compatibility.json`
//! pins which algorithm/credential pairings issue a working token and which
//! are rejected, down to the exact diagnosis message.

// Test code legitimately uses panic patterns for test failure reporting
#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

mod vectors;

use std::path::PathBuf;

use jwtkit::prelude::*;
use jwtkit::{parse_algorithm, Algorithm};
use vectors::*;

/// Get the path to the test vectors directory.
fn vectors_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/vectors")
}

// =============================================================================
// Identifier Vectors
// =============================================================================

#[test]
fn test_identifier_vectors() {
    let path = vectors_dir().join("identifiers.json");
    let suite: TestVectorSuite<IdentifierTestVector> =
        load_vectors(path.to_str().expect("valid path"));
    assert!(!suite.tests.is_empty(), "{} is empty", suite.name);

    for test in suite.tests {
        let result = parse_algorithm(&test.text);

        if test.expect_fail {
            let err = result.expect_err(&format!(
                "Test '{}' should have failed but succeeded",
                test.name
            ));
            let kind = error_kind(&JwtError::Parse(err));
            assert_eq!(
                Some(kind),
                test.error.as_deref(),
                "Test '{}' failed with the wrong error",
                test.name
            );
        } else {
            let alg = result.unwrap_or_else(|e| panic!("Test '{}' parsing failed: {e}", test.name));
            let space = match alg {
                Algorithm::Signing(_) => "signing",
                Algorithm::Encryption(_) => "encryption",
            };
            assert_eq!(
                Some(alg.to_string().as_str()),
                test.algorithm.as_deref(),
                "Test '{}' parsed to the wrong algorithm",
                test.name
            );
            assert_eq!(
                Some(space),
                test.space.as_deref(),
                "Test '{}' parsed into the wrong identifier set",
                test.name
            );
        }
    }
}

// =============================================================================
// Compatibility Vectors
// =============================================================================

#[test]
fn test_compatibility_vectors() {
    let path = vectors_dir().join("compatibility.json");
    let suite: TestVectorSuite<CompatibilityTestVector> =
        load_vectors(path.to_str().expect("valid path"));
    let claims = sample_claims();

    for test in suite.tests {
        let credential = credential_for(test.credential, test.secret.as_deref());

        let mut builder = TokenBuilder::new(test.algorithm.as_str())
            // Keep PBES2 vectors fast; the iteration count is not under test
            .pbes2(Pbes2Params::new(1_000, 16));
        if let Some(enc) = &test.content_encryption {
            builder = builder.content_encryption(enc.as_str());
        }
        if test.compression {
            builder = builder.compression(CompressionMode::Deflate);
        }

        let result = builder.try_issue(&claims, credential.mode());

        if test.expect_fail {
            let err = result.expect_err(&format!(
                "Test '{}' should have failed but succeeded",
                test.name
            ));
            assert_eq!(
                Some(error_kind(&err)),
                test.error.as_deref(),
                "Test '{}' failed with the wrong error: {err}",
                test.name
            );
            if let Some(message) = &test.message {
                assert_eq!(
                    err.to_string(),
                    *message,
                    "Test '{}' message mismatch",
                    test.name
                );
            }
            continue;
        }

        let token = result.unwrap_or_else(|e| panic!("Test '{}' issue failed: {e}", test.name));
        let segments = token.reveal().split('.').count();
        let expected_segments = if test.content_encryption.is_some() { 5 } else { 3 };
        assert_eq!(
            segments, expected_segments,
            "Test '{}' produced the wrong serialization",
            test.name
        );

        let mut verifier = TokenVerifier::new(test.algorithm.as_str());
        if let Some(enc) = &test.content_encryption {
            verifier = verifier.content_encryption(enc.as_str());
        }
        let verified = verifier
            .verify(&token, credential.mode())
            .unwrap_or_else(|e| panic!("Test '{}' verify config failed: {e}", test.name));
        assert!(verified, "Test '{}' did not verify", test.name);

        let decoded = verifier
            .decode(&token, credential.mode())
            .unwrap_or_else(|e| panic!("Test '{}' decode failed: {e}", test.name));
        assert_eq!(decoded, claims, "Test '{}' claims mismatch", test.name);
    }
}

// =============================================================================
// Cross-Credential Rejection
// =============================================================================

#[test]
fn test_token_rejected_with_other_credential() {
    let claims = sample_claims();
    let issuer = credential_for(CredentialKind::EcdsaP256, None);
    let other = credential_for(CredentialKind::EcdsaP256, None);

    let token = TokenBuilder::new("ES256")
        .try_issue(&claims, issuer.mode())
        .expect("ES256 accepts a P-256 certificate");

    let verifier = TokenVerifier::new("ES256");
    assert!(verifier.verify(&token, issuer.mode()).expect("valid configuration"));
    assert!(!verifier.verify(&token, other.mode()).expect("valid configuration"));
}

#[test]
fn test_unsigned_token_rejected_by_keyed_verifier() {
    let claims = sample_claims();
    let token = TokenBuilder::new("none")
        .try_issue(&claims, CredentialMode::None)
        .expect("none needs no credential");

    let secret = credential_for(CredentialKind::Secret, None);
    let verified = TokenVerifier::new("HS256")
        .verify(&token, secret.mode())
        .expect("valid configuration");
    assert!(!verified);
}
