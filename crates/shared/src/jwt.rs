//! Compact JWT inspection without signature verification.
//!
//! Identity providers that skip the OIDC userinfo endpoint hand back all of
//! the user's claims inside the identity token. These helpers split the
//! compact form and decode the payload segment so callers can read those
//! claims locally. Nothing here checks the signature: callers are expected to
//! have received the token over the provider's TLS-protected token endpoint.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::{Map, Value};
use thiserror::Error;

/// Claims object decoded from a token payload.
pub type ClaimSet = Map<String, Value>;

/// Error type for compact token inspection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Token has {0} segment(s), expected at least 2")]
    MissingSegments(usize),

    #[error("Payload is not valid base64url: {0}")]
    InvalidEncoding(String),

    #[error("Payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Payload is not a JSON object")]
    NotAnObject,
}

/// Segments of a compact token. The signature is absent for two-part tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactSegments<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: Option<&'a str>,
}

/// Splits a compact token on `.` into header, payload and optional signature.
///
/// Anything after the third segment is ignored.
pub fn split_compact(token: &str) -> Result<CompactSegments<'_>, JwtError> {
    let mut parts = token.split('.');
    let header = parts.next().unwrap_or_default();
    let payload = parts.next().ok_or(JwtError::MissingSegments(1))?;
    let signature = parts.next();

    Ok(CompactSegments {
        header,
        payload,
        signature,
    })
}

/// Decodes a base64url segment, tolerating trailing `=` padding.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, JwtError> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| JwtError::InvalidEncoding(e.to_string()))
}

/// Decodes the payload segment of a compact token into its claim set.
pub fn decode_unverified_payload(token: &str) -> Result<ClaimSet, JwtError> {
    let segments = split_compact(token)?;
    let bytes = decode_segment(segments.payload)?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(claims)) => Ok(claims),
        Ok(_) => Err(JwtError::NotAnObject),
        Err(e) => Err(JwtError::InvalidJson(e.to_string())),
    }
}

/// Builds an unsigned `header.payload.sig` token around the given claims.
///
/// Only meant for fixtures; the signature segment is a fixed placeholder.
pub fn encode_unsigned_for_testing(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.sig", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE;
    use serde_json::json;

    #[test]
    fn test_split_compact_three_segments() {
        let segments = split_compact("aaa.bbb.ccc").unwrap();
        assert_eq!(segments.header, "aaa");
        assert_eq!(segments.payload, "bbb");
        assert_eq!(segments.signature, Some("ccc"));
    }

    #[test]
    fn test_split_compact_two_segments() {
        let segments = split_compact("aaa.bbb").unwrap();
        assert_eq!(segments.payload, "bbb");
        assert_eq!(segments.signature, None);
    }

    #[test]
    fn test_split_compact_single_segment() {
        assert_eq!(
            split_compact("onlyonesegment"),
            Err(JwtError::MissingSegments(1))
        );
        assert_eq!(split_compact(""), Err(JwtError::MissingSegments(1)));
    }

    #[test]
    fn test_decode_known_payload() {
        let claims =
            decode_unverified_payload("header.eyJlbWFpbCI6ImpvaG5AZXhhbXBsZS5jb20ifQ.sig").unwrap();
        assert_eq!(claims["email"], "john@example.com");
    }

    #[test]
    fn test_decode_tolerates_padding() {
        let padded = URL_SAFE.encode(r#"{"email":"a@b.com"}"#);
        assert!(padded.ends_with('='));

        let claims = decode_unverified_payload(&format!("h.{}.s", padded)).unwrap();
        assert_eq!(claims["email"], "a@b.com");
    }

    #[test]
    fn test_decode_rejects_standard_alphabet() {
        // '+' and '/' belong to the standard alphabet only
        let result = decode_unverified_payload("h.ab+/cd.s");
        assert!(matches!(result, Err(JwtError::InvalidEncoding(_))));
    }

    #[test]
    fn test_decode_rejects_truncated_segment() {
        // 4n+1 characters can never encode a whole number of bytes
        let result = decode_unverified_payload("h.eyJhIjoxf.s");
        assert!(matches!(result, Err(JwtError::InvalidEncoding(_))));
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let payload = URL_SAFE_NO_PAD.encode("definitely not json");
        let result = decode_unverified_payload(&format!("h.{}.s", payload));
        assert!(matches!(result, Err(JwtError::InvalidJson(_))));
    }

    #[test]
    fn test_decode_rejects_non_object_json() {
        let payload = URL_SAFE_NO_PAD.encode(r#"["email"]"#);
        let result = decode_unverified_payload(&format!("h.{}.s", payload));
        assert_eq!(result, Err(JwtError::NotAnObject));
    }

    #[test]
    fn test_decode_empty_payload_segment() {
        let result = decode_unverified_payload("h..s");
        assert!(matches!(result, Err(JwtError::InvalidJson(_))));
    }

    #[test]
    fn test_encode_unsigned_for_testing() {
        let token = encode_unsigned_for_testing(&json!({"email": "x@y.z", "sub": "001"}));
        assert_eq!(token.split('.').count(), 3);

        let claims = decode_unverified_payload(&token).unwrap();
        assert_eq!(claims["sub"], "001");
    }

    #[test]
    fn test_decode_signed_token_without_verifying() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let claims = json!({
            "iss": "https://appleid.apple.com",
            "sub": "001234.abcdef",
            "email": "signed@example.com",
            "email_verified": true,
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"not-apple"),
        )
        .unwrap();

        let decoded = decode_unverified_payload(&token).unwrap();
        assert_eq!(decoded["email"], "signed@example.com");
        assert_eq!(decoded["email_verified"], true);
    }
}
