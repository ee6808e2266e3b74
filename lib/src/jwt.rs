//! Compact JWT decomposition.
//!
//! Claims are read two independent ways:
//! - structurally, by parsing the decoded JSON into [`JwtClaims`];
//! - positionally, by searching the decoded payload text for `"<claim>":`.
//!
//! The circuit only sees the second form, so offsets are always taken from
//! the original decoded bytes, never from a re-serialized object.

use serde_json::{Map, Value};

use crate::byte_vector::ByteVector;
use crate::error::{InputError, TokenError};

const PAYLOAD: &str = "payload";
const HEADER: &str = "header";

/// Claims this layer needs, validated at parse time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JwtClaims {
    pub nonce: String,
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub kid: String,
    /// `None` when the payload carries no email.
    pub email: Option<String>,
}

/// A parsed `header.payload.signature` token. Read-only after parsing.
#[derive(Clone, Debug)]
pub struct Jwt {
    raw: String,
    header: String,
    payload: String,
    signature: String,
    payload_json: ByteVector,
    claims: JwtClaims,
}

fn next_segment<'a>(
    segments: &mut std::str::Split<'a, char>,
    name: &'static str,
) -> Result<&'a str, TokenError> {
    segments
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or(TokenError::MissingSegment(name))
}

/// Split a compact token into its three base64url segments. Empty segments
/// count as missing.
pub fn split_compact(raw: &str) -> Result<(&str, &str, &str), TokenError> {
    let mut segments = raw.split('.');
    let header = next_segment(&mut segments, HEADER)?;
    let payload = next_segment(&mut segments, PAYLOAD)?;
    let signature = next_segment(&mut segments, "signature")?;
    let extra = segments.count();
    if extra > 0 {
        return Err(TokenError::TooManySegments(3 + extra));
    }
    Ok((header, payload, signature))
}

fn decode_object(segment: &'static str, encoded: &str) -> Result<(ByteVector, Map<String, Value>), InputError> {
    let decoded = ByteVector::from_base64_url(encoded)?;
    let value: Value =
        serde_json::from_str(&decoded.to_ascii_string()).map_err(|e| TokenError::InvalidJson {
            segment,
            reason: e.to_string(),
        })?;
    match value {
        Value::Object(map) => Ok((decoded, map)),
        other => Err(TokenError::InvalidJson {
            segment,
            reason: format!("expected an object, found {other}"),
        }
        .into()),
    }
}

fn required_string(
    object: &Map<String, Value>,
    segment: &'static str,
    claim: &'static str,
) -> Result<String, TokenError> {
    match object.get(claim) {
        None => Err(TokenError::MissingClaim { segment, claim }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(TokenError::ClaimNotString { segment, claim }),
    }
}

fn optional_string(
    object: &Map<String, Value>,
    segment: &'static str,
    claim: &'static str,
) -> Result<Option<String>, TokenError> {
    match object.get(claim) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(TokenError::ClaimNotString { segment, claim }),
    }
}

impl Jwt {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let (header, payload, signature) = split_compact(raw)?;

        let (payload_json, payload_claims) = decode_object(PAYLOAD, payload)?;
        let (_, header_claims) = decode_object(HEADER, header)?;

        let claims = JwtClaims {
            nonce: required_string(&payload_claims, PAYLOAD, "nonce")?,
            iss: required_string(&payload_claims, PAYLOAD, "iss")?,
            aud: required_string(&payload_claims, PAYLOAD, "aud")?,
            sub: required_string(&payload_claims, PAYLOAD, "sub")?,
            kid: required_string(&header_claims, HEADER, "kid")?,
            email: optional_string(&payload_claims, PAYLOAD, "email")?,
        };

        Ok(Jwt {
            raw: raw.to_string(),
            header: header.to_string(),
            payload: payload.to_string(),
            signature: signature.to_string(),
            payload_json,
            claims,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn claims(&self) -> &JwtClaims {
        &self.claims
    }

    /// Decoded payload bytes, exactly as signed.
    pub fn payload_json(&self) -> &ByteVector {
        &self.payload_json
    }

    /// `header.payload`: the bytes covered by the signature.
    pub fn message_for_signing(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }

    /// Offset of the `.` between header and payload in the raw token.
    pub fn period_index(&self) -> usize {
        self.header.len()
    }

    /// Byte offset of the literal `"<claim>":` in the decoded payload.
    pub fn claim_key_offset(&self, claim: &str) -> Result<usize, InputError> {
        let key = format!("\"{claim}\":");
        self.payload_json
            .find(key.as_bytes())
            .ok_or(InputError::ClaimKeyNotFound(key))
    }
}
