//! Core types and operations.
//!
//! - [`algorithm`] - Algorithm identifiers and parsing
//! - [`family`] - Algorithm families and the classifiers
//! - [`types`] - Secrets, certificates, credentials and resolved keys
//! - [`resolver`] - Pairing an algorithm with a credential
//! - [`error`] - Error types
//! - [`operations`] - Native JOSE encode/decode

pub mod algorithm;
pub mod error;
pub mod family;
pub mod operations;
pub mod resolver;
pub mod types;

// Re-export commonly used items
pub use error::{JoseError, JoseResult, JwtError, JwtResult};
