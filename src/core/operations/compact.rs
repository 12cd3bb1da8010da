//! Compact serialization helpers.
//!
//! Both token kinds are dot-separated base64url (no padding) segments. The
//! first segment is always the protected header as a JSON object.

use base64::prelude::*;
use serde_json::{Map, Value};

use crate::core::error::{JoseError, JoseResult};

/// A decoded JWT payload.
pub type Claims = Map<String, Value>;

/// A protected header as a JSON object.
pub type Header = Map<String, Value>;

/// Segment count of a JWS compact token.
pub const JWS_SEGMENTS: usize = 3;

/// Segment count of a JWE compact token.
pub const JWE_SEGMENTS: usize = 5;

/// Header names owned by the encoder. Caller-supplied extras never replace them.
pub const RESERVED_HEADERS: [&str; 8] = ["alg", "enc", "zip", "iv", "tag", "p2s", "p2c", "crit"];

pub(crate) fn b64_encode(bytes: &[u8]) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

pub(crate) fn b64_decode(segment: &str) -> JoseResult<Vec<u8>> {
    Ok(BASE64_URL_SAFE_NO_PAD.decode(segment)?)
}

/// Serializes a JSON object and base64url-encodes it.
pub(crate) fn encode_object(object: &Map<String, Value>) -> JoseResult<String> {
    let json = serde_json::to_vec(object)?;
    Ok(b64_encode(&json))
}

/// Parses a JSON object from raw bytes.
pub(crate) fn parse_object(bytes: &[u8]) -> JoseResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(object) => Ok(object),
        _ => Err(JoseError::InvalidFormat),
    }
}

/// Splits a compact token into exactly `expected` segments.
pub(crate) fn split_segments(token: &str, expected: usize) -> JoseResult<Vec<&str>> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != expected {
        return Err(JoseError::InvalidFormat);
    }
    Ok(segments)
}

/// Starts a header from caller extras, dropping any reserved names.
pub(crate) fn header_with_extras(extra_headers: Option<&Header>) -> Header {
    let mut header = Header::new();
    if let Some(extras) = extra_headers {
        for (name, value) in extras {
            if !RESERVED_HEADERS.contains(&name.as_str()) {
                header.insert(name.clone(), value.clone());
            }
        }
    }
    header
}

/// Reads a string-valued header parameter.
pub(crate) fn header_str<'h>(header: &'h Header, name: &str) -> JoseResult<&'h str> {
    header
        .get(name)
        .and_then(Value::as_str)
        .ok_or(JoseError::InvalidHeader)
}

/// Decodes the protected header of a compact token without verifying anything.
///
/// Useful for routing a token (JWS vs JWE, `kid`, `alg`) before picking a key.
/// Nothing in the returned header is trustworthy until the token is verified.
///
/// # Errors
///
/// Returns an error if the token is not 3 or 5 segments or the header is not
/// a base64url JSON object.
///
/// # Example
///
/// ```rust
/// use jwtkit::core::operations::peek_header;
///
/// // {"alg":"none","typ":"JWT"} . {"sub":"x"} .
/// let header = peek_header("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJzdWIiOiJ4In0.")?;
/// assert_eq!(header["alg"], "none");
/// # Ok::<(), jwtkit::core::error::JoseError>(())
/// ```
pub fn peek_header(token: &str) -> JoseResult<Header> {
    let count = token.trim().split('.').count();
    if count != JWS_SEGMENTS && count != JWE_SEGMENTS {
        return Err(JoseError::InvalidFormat);
    }
    let first = token.trim().split('.').next().unwrap_or_default();
    parse_object(&b64_decode(first)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_b64_is_unpadded_url_safe() -> JoseResult<()> {
        let encoded = b64_encode(&[0xfb, 0xff, 0xfe]);
        assert_eq!(encoded, "-__-");
        assert_eq!(b64_decode(&encoded)?, vec![0xfb, 0xff, 0xfe]);
        assert!(b64_decode("a+b/").is_err());
        Ok(())
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("a.b.c", 3).map(|s| s.len()).ok(), Some(3));
        assert!(matches!(
            split_segments("a.b", 3),
            Err(JoseError::InvalidFormat)
        ));
        assert!(matches!(
            split_segments("a.b.c", 5),
            Err(JoseError::InvalidFormat)
        ));
    }

    #[test]
    fn test_parse_object_rejects_non_objects() {
        assert!(matches!(parse_object(b"[1,2]"), Err(JoseError::InvalidFormat)));
        assert!(matches!(parse_object(b"{"), Err(JoseError::Json(_))));
    }

    #[test]
    fn test_header_with_extras_drops_reserved() {
        let mut extras = Header::new();
        extras.insert("alg".into(), Value::from("none"));
        extras.insert("kid".into(), Value::from("key-1"));
        extras.insert("p2c".into(), Value::from(1));

        let header = header_with_extras(Some(&extras));
        assert_eq!(header.len(), 1);
        assert_eq!(header.get("kid"), Some(&Value::from("key-1")));
        assert!(header_with_extras(None).is_empty());
    }

    #[test]
    fn test_peek_header() -> JoseResult<()> {
        let mut header = Header::new();
        header.insert("alg".into(), Value::from("HS256"));
        let token = format!("{}.e30.sig", encode_object(&header)?);

        assert_eq!(peek_header(&token)?, header);
        assert!(matches!(
            peek_header("only.two"),
            Err(JoseError::InvalidFormat)
        ));
        Ok(())
    }
}
