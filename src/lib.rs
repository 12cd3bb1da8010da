//! Issue and verify JSON Web Tokens with strict algorithm/key pairing.
//!
//! Every request names an algorithm and supplies one credential: nothing, a
//! shared secret, or a certificate. Before any cryptography runs, the
//! algorithm is classified into a family and the credential is checked
//! against it. A mismatch is a typed [`Diagnosis`]
//! naming the algorithms the credential could have served; the crate never
//! substitutes a fallback key.
//!
//! # Quick Start
//!
//! ```rust
//! use jwtkit::prelude::*;
//!
//! let secret = SecretValue::from("a shared secret of decent length");
//! let mut claims = Claims::new();
//! claims.insert("sub".into(), "alice".into());
//!
//! // Signed (JWS)
//! let token = TokenBuilder::new("HS256").try_issue(&claims, &secret)?;
//! assert!(TokenVerifier::new("HS256").verify(&token, &secret)?);
//!
//! // A secret cannot sign RS256
//! let err = TokenBuilder::new("RS256").try_issue(&claims, &secret).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Secret key requires one of the following algorithms: HS256,HS384,HS512"
//! );
//! # Ok::<(), JwtError>(())
//! ```
//!
//! # Credential Compatibility
//!
//! | Credential | Signing | Encryption |
//! |------------|---------|------------|
//! | none | `none` | - |
//! | shared secret | HS256/384/512 | `dir`, AxKW, AxGCMKW, PBES2 |
//! | certificate | RS256/384/512, ES256/384/512 | RSA-OAEP-256, RSA-OAEP, RSA1_5 |
//!
//! `PS256/384/512` and the `ECDH-ES` family are rejected at parse time.
//!
//! # Features
//!
//! - `prelude` (default) - [`TokenBuilder`](prelude::TokenBuilder) and
//!   [`TokenVerifier`](prelude::TokenVerifier)
//! - `compression` (default) - `"zip": "DEF"` payload compression
//!
//! # Security
//!
//! - Secrets and issued tokens are zeroized on drop
//! - Debug output redacts secrets and key material
//! - MACs and secrets are compared in constant time
//! - The verifier fixes the algorithm; the token header cannot choose it
//! - No unsafe code
//!
//! # Modules
//!
//! - [`core`] - Algorithms, classification, key resolution, JOSE operations
//! - [`prelude`] - Ergonomic imports (requires `prelude` feature)

pub mod core;

#[cfg(feature = "prelude")]
pub mod prelude;

// Re-export commonly used items at crate root
pub use crate::core::algorithm::{
    parse_algorithm, Algorithm, CompressionMode, ContentEncryption, EncryptionAlgorithm,
    SigningAlgorithm,
};
pub use crate::core::error::{Diagnosis, JoseError, JwtError, JwtResult, ParseError};
pub use crate::core::family::{classify_encryption, classify_signing, EncryptionFamily, SigningFamily};
pub use crate::core::resolver::{resolve_encryption_key, resolve_signing_key, Advisory, Resolution};
pub use crate::core::types::{CredentialMode, ResolvedKey, SecretValue};
