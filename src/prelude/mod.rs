//! Ergonomic layer for issuing and verifying tokens.
//!
//! The prelude re-exports the builders together with the types needed to
//! call them, so most callers only need one import.
//!
//! # Usage
//!
//! ```rust
//! use jwtkit::prelude::*;
//! ```

mod builders;

pub use builders::{TokenBuilder, TokenVerifier};

pub use crate::core::algorithm::{
    CompressionMode, ContentEncryption, EncryptionAlgorithm, SigningAlgorithm,
};
pub use crate::core::error::{Diagnosis, JoseError, JwtError, JwtResult, ParseError};
pub use crate::core::operations::{Claims, Header, Pbes2Params};
pub use crate::core::types::{
    Certificate, CredentialMode, EcdsaCurve, EcdsaPrivateKey, PrivateKeySource, SecretValue,
};
