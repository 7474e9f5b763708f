//! Compact JWS parsing
//!
//! A compact token is `base64url(header).base64url(payload).base64url(signature)`.
//! Parsing keeps the signing input exactly as transmitted so the signature is
//! checked over the original bytes, never over a re-encoded copy.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::{Map, Value};

use crate::claims::Claims;
use crate::{Error, Result};

/// base64url that accepts segments with or without `=` padding
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded JOSE header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header(Map<String, Value>);

impl Header {
    /// Declared algorithm (`alg`), rendered as text
    ///
    /// A non-string `alg` is rendered as its JSON form so it can still be
    /// reported; it never equals `RS256`.
    pub fn algorithm(&self) -> Option<String> {
        self.0.get("alg").map(|alg| match alg {
            Value::String(alg) => alg.clone(),
            other => other.to_string(),
        })
    }

    /// Key ID (`kid`), when present and a string
    pub fn key_id(&self) -> Option<&str> {
        self.0.get("kid").and_then(Value::as_str)
    }

    /// Token type (`typ`), when present and a string
    pub fn token_type(&self) -> Option<&str> {
        self.0.get("typ").and_then(Value::as_str)
    }

    /// Look up any header parameter
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// A compact token split into its parts, not yet verified
#[derive(Debug, Clone)]
pub struct RawToken<'a> {
    header: Header,
    claims: Claims,
    signing_input: &'a str,
    signature: Vec<u8>,
}

impl<'a> RawToken<'a> {
    /// Split and decode a compact token
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenFormat`] unless the token has exactly three
    /// segments, header and payload are base64url JSON objects, and the
    /// signature is base64url.
    pub fn parse(token: &'a str) -> Result<Self> {
        let (signing_input, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| malformed("token must have three segments"))?;
        let (header, payload) = signing_input
            .split_once('.')
            .ok_or_else(|| malformed("token must have three segments"))?;
        if payload.contains('.') {
            return Err(malformed("token must have three segments"));
        }

        let header = Header(decode_object(header, "header")?);
        let claims = Claims::from(decode_object(payload, "payload")?);
        let signature = SEGMENT_ENGINE
            .decode(signature)
            .map_err(|e| Error::TokenFormat(format!("invalid signature encoding: {e}")))?;

        Ok(Self {
            header,
            claims,
            signing_input,
            signature,
        })
    }

    /// Decoded header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Decoded claims (unverified until the signature has been checked)
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// `<header>.<payload>` exactly as transmitted
    pub fn signing_input(&self) -> &'a str {
        self.signing_input
    }

    /// Raw signature bytes
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Take the claims, discarding the rest of the token
    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

fn malformed(reason: &str) -> Error {
    Error::TokenFormat(reason.to_string())
}

fn decode_object(segment: &str, part: &str) -> Result<Map<String, Value>> {
    let bytes = SEGMENT_ENGINE
        .decode(segment)
        .map_err(|e| Error::TokenFormat(format!("invalid {part} encoding: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::TokenFormat(format!("{part} is not a JSON object: {e}")))
}
