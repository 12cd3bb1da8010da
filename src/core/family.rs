//! Algorithm families.
//!
//! A family groups the algorithms that need the same credential shape. This
//! module is the single place where an algorithm is mapped to its family;
//! both classifiers match every variant explicitly, so adding an algorithm
//! fails to compile until it is classified.

use core::fmt::{self, Display};

use crate::core::algorithm::{EncryptionAlgorithm, SigningAlgorithm};

/// JWS algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningFamily {
    /// HMAC (shared secret).
    Hs,
    /// RSASSA-PKCS1-v1_5 (RSA private key).
    Rs,
    /// ECDSA (EC private key).
    Es,
    /// No keyed family (`none`).
    Unknown,
}

impl SigningFamily {
    /// The algorithms belonging to this family.
    #[must_use]
    pub const fn members(self) -> &'static [SigningAlgorithm] {
        match self {
            Self::Hs => &[
                SigningAlgorithm::Hs256,
                SigningAlgorithm::Hs384,
                SigningAlgorithm::Hs512,
            ],
            Self::Rs => &[
                SigningAlgorithm::Rs256,
                SigningAlgorithm::Rs384,
                SigningAlgorithm::Rs512,
            ],
            Self::Es => &[
                SigningAlgorithm::Es256,
                SigningAlgorithm::Es384,
                SigningAlgorithm::Es512,
            ],
            Self::Unknown => &[],
        }
    }
}

impl Display for SigningFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hs => "HS",
            Self::Rs => "RS",
            Self::Es => "ES",
            Self::Unknown => "Unknown",
        })
    }
}

/// JWE key management family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionFamily {
    /// RSA key transport (RSA private key).
    Rsa,
    /// Direct symmetric key.
    Dir,
    /// AES key wrap.
    AesKeyWrap,
    /// AES-GCM key wrap.
    AesGcmKeyWrap,
    /// Password-based key wrap.
    Pbes2,
    /// Not a supported family.
    Unknown,
}

impl EncryptionFamily {
    /// The algorithms belonging to this family.
    #[must_use]
    pub const fn members(self) -> &'static [EncryptionAlgorithm] {
        match self {
            Self::Rsa => &[
                EncryptionAlgorithm::RsaOaep256,
                EncryptionAlgorithm::RsaOaep,
                EncryptionAlgorithm::Rsa1_5,
            ],
            Self::Dir => &[EncryptionAlgorithm::Dir],
            Self::AesKeyWrap => &[
                EncryptionAlgorithm::A128Kw,
                EncryptionAlgorithm::A192Kw,
                EncryptionAlgorithm::A256Kw,
            ],
            Self::AesGcmKeyWrap => &[
                EncryptionAlgorithm::A128GcmKw,
                EncryptionAlgorithm::A192GcmKw,
                EncryptionAlgorithm::A256GcmKw,
            ],
            Self::Pbes2 => &[
                EncryptionAlgorithm::Pbes2Hs256A128Kw,
                EncryptionAlgorithm::Pbes2Hs384A192Kw,
                EncryptionAlgorithm::Pbes2Hs512A256Kw,
            ],
            Self::Unknown => &[],
        }
    }
}

impl Display for EncryptionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rsa => "RSA",
            Self::Dir => "DIR",
            Self::AesKeyWrap => "AESKeyWrap",
            Self::AesGcmKeyWrap => "AESGCMKeyWrap",
            Self::Pbes2 => "PBES2",
            Self::Unknown => "Unknown",
        })
    }
}

/// A family from either identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// A JWS family.
    Signing(SigningFamily),
    /// A JWE family.
    Encryption(EncryptionFamily),
}

impl AlgorithmFamily {
    /// Identifier names of the algorithms in this family.
    #[must_use]
    pub fn member_names(self) -> Vec<&'static str> {
        match self {
            Self::Signing(family) => family.members().iter().map(|a| a.name()).collect(),
            Self::Encryption(family) => family.members().iter().map(|a| a.name()).collect(),
        }
    }
}

impl Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signing(family) => Display::fmt(family, f),
            Self::Encryption(family) => Display::fmt(family, f),
        }
    }
}

impl From<SigningFamily> for AlgorithmFamily {
    fn from(family: SigningFamily) -> Self {
        Self::Signing(family)
    }
}

impl From<EncryptionFamily> for AlgorithmFamily {
    fn from(family: EncryptionFamily) -> Self {
        Self::Encryption(family)
    }
}

/// Classifies a signing algorithm. `none` has no keyed family.
#[must_use]
pub const fn classify_signing(alg: SigningAlgorithm) -> SigningFamily {
    match alg {
        SigningAlgorithm::Hs256 | SigningAlgorithm::Hs384 | SigningAlgorithm::Hs512 => {
            SigningFamily::Hs
        }
        SigningAlgorithm::Rs256 | SigningAlgorithm::Rs384 | SigningAlgorithm::Rs512 => {
            SigningFamily::Rs
        }
        SigningAlgorithm::Es256 | SigningAlgorithm::Es384 | SigningAlgorithm::Es512 => {
            SigningFamily::Es
        }
        SigningAlgorithm::None => SigningFamily::Unknown,
    }
}

/// Classifies a key management algorithm.
#[must_use]
pub const fn classify_encryption(alg: EncryptionAlgorithm) -> EncryptionFamily {
    match alg {
        EncryptionAlgorithm::RsaOaep256 | EncryptionAlgorithm::RsaOaep | EncryptionAlgorithm::Rsa1_5 => {
            EncryptionFamily::Rsa
        }
        EncryptionAlgorithm::Dir => EncryptionFamily::Dir,
        EncryptionAlgorithm::A128Kw | EncryptionAlgorithm::A192Kw | EncryptionAlgorithm::A256Kw => {
            EncryptionFamily::AesKeyWrap
        }
        EncryptionAlgorithm::A128GcmKw
        | EncryptionAlgorithm::A192GcmKw
        | EncryptionAlgorithm::A256GcmKw => EncryptionFamily::AesGcmKeyWrap,
        EncryptionAlgorithm::Pbes2Hs256A128Kw
        | EncryptionAlgorithm::Pbes2Hs384A192Kw
        | EncryptionAlgorithm::Pbes2Hs512A256Kw => EncryptionFamily::Pbes2,
    }
}
