//! JWE payload compression (`"zip": "DEF"`, raw DEFLATE per RFC 1951).
//!
//! Without the `compression` feature both directions fail with
//! `JoseError::UnsupportedCompression`.

use crate::core::algorithm::CompressionMode;
use crate::core::error::{JoseError, JoseResult};

/// Largest payload accepted when inflating a received token.
pub const MAX_DECOMPRESSED_SIZE: u64 = 1024 * 1024;

/// Compresses a serialized payload.
#[cfg(feature = "compression")]
pub(crate) fn compress(mode: CompressionMode, plaintext: &[u8]) -> JoseResult<Vec<u8>> {
    use std::io::Write;

    use flate2::write::DeflateEncoder;
    use flate2::Compression;

    match mode {
        CompressionMode::Deflate => {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(plaintext)
                .map_err(|_| JoseError::Compression)?;
            encoder.finish().map_err(|_| JoseError::Compression)
        }
    }
}

/// Inflates a decrypted payload, refusing output past
/// [`MAX_DECOMPRESSED_SIZE`].
#[cfg(feature = "compression")]
pub(crate) fn decompress(mode: CompressionMode, compressed: &[u8]) -> JoseResult<Vec<u8>> {
    use std::io::Read;

    use flate2::read::DeflateDecoder;

    match mode {
        CompressionMode::Deflate => {
            let mut inflated = Vec::new();
            DeflateDecoder::new(compressed)
                .take(MAX_DECOMPRESSED_SIZE + 1)
                .read_to_end(&mut inflated)
                .map_err(|_| JoseError::Compression)?;
            if inflated.len() as u64 > MAX_DECOMPRESSED_SIZE {
                return Err(JoseError::Compression);
            }
            Ok(inflated)
        }
    }
}

#[cfg(not(feature = "compression"))]
pub(crate) fn compress(mode: CompressionMode, _plaintext: &[u8]) -> JoseResult<Vec<u8>> {
    Err(JoseError::UnsupportedCompression(mode.wire_name().to_owned()))
}

#[cfg(not(feature = "compression"))]
pub(crate) fn decompress(mode: CompressionMode, _compressed: &[u8]) -> JoseResult<Vec<u8>> {
    Err(JoseError::UnsupportedCompression(mode.wire_name().to_owned()))
}

#[cfg(all(test, feature = "compression"))]
mod tests {
    use super::*;

    #[test]
    fn test_deflate_roundtrip() -> JoseResult<()> {
        let payload = format!(r#"{{"sub":"alice","pad":"{}"}}"#, "ab".repeat(100));
        let compressed = compress(CompressionMode::Deflate, payload.as_bytes())?;
        assert!(compressed.len() < payload.len());
        assert_eq!(
            decompress(CompressionMode::Deflate, &compressed)?,
            payload.as_bytes()
        );
        Ok(())
    }

    #[test]
    fn test_output_limit() -> JoseResult<()> {
        let huge = vec![0u8; 2 * 1024 * 1024];
        let compressed = compress(CompressionMode::Deflate, &huge)?;
        assert!(matches!(
            decompress(CompressionMode::Deflate, &compressed),
            Err(JoseError::Compression)
        ));
        Ok(())
    }

    #[test]
    fn test_garbage_input() {
        assert!(matches!(
            decompress(CompressionMode::Deflate, &[0xff, 0xff, 0xff, 0xff]),
            Err(JoseError::Compression)
        ));
    }
}
