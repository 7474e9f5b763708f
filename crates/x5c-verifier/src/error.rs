//! Error types for JWKS loading and token verification
//!
//! Every failure in the pipeline is terminal for the call that produced it and
//! is returned as one of these variants. Messages carry enough context to log
//! (key ID, algorithm, timestamps) but never key material.

use thiserror::Error;

/// Errors produced while building a verifier or verifying a token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The JWKS source identifier is not a valid URI
    #[error("Invalid JWKS source {uri:?}: {reason}")]
    InvalidSource {
        /// The rejected source identifier
        uri: String,
        /// Why it was rejected
        reason: String,
    },

    /// The JWKS could not be read from its source
    #[error("Failed to retrieve JWKS from {source_uri:?}: {reason}")]
    Transport {
        /// Where the JWKS was being read from
        source_uri: String,
        /// Underlying transport or IO failure
        reason: String,
    },

    /// The JWKS document does not match the expected schema
    #[error("Could not parse JWKS: {0}")]
    MalformedJwks(String),

    /// The compact token is not well formed
    #[error("Malformed token: {0}")]
    TokenFormat(String),

    /// The token header declares an algorithm other than RS256
    #[error("Incorrect algorithm: expected RS256, got {}", describe_alg(.found))]
    AlgorithmMismatch {
        /// Algorithm declared by the token, if any
        found: Option<String>,
    },

    /// The token header carries no usable `kid`
    #[error("Token header must contain a 'kid' string")]
    MissingKeyId,

    /// No JWKS entry matches the token's `kid`
    #[error("Could not find key with matching kid={kid:?}")]
    KeyNotFound {
        /// Requested key ID
        kid: String,
    },

    /// Several JWKS entries share the token's `kid`
    #[error("Key ID {kid:?} is ambiguous: {count} entries in JWKS")]
    AmbiguousKeyId {
        /// Requested key ID
        kid: String,
        /// Number of entries carrying it
        count: usize,
    },

    /// The matched JWKS entry has no certificate chain
    #[error("Key {kid:?} has no x5c certificate chain")]
    MissingCertificate {
        /// Key ID of the matched entry
        kid: String,
    },

    /// The certificate blob is not valid base64/PEM
    #[error("Failed to decode certificate PEM: {0}")]
    CertificateFormat(String),

    /// The certificate DER could not be parsed into an RSA public key
    #[error("Failed to parse certificate: {0}")]
    CertificateParse(String),

    /// RS256 signature verification failed
    #[error("Signature verification failed")]
    SignatureInvalid,

    /// The `exp` claim is not in the future
    #[error("Token is expired (exp={expired_at})")]
    TokenExpired {
        /// The token's `exp` value, seconds since the epoch
        expired_at: i64,
    },

    /// The `nbf` claim is in the future
    #[error("Token is not valid yet (nbf={not_before})")]
    TokenNotYetValid {
        /// The token's `nbf` value, seconds since the epoch
        not_before: i64,
    },

    /// The `iat` claim is in the future
    #[error("Token used before issued (iat={issued_at})")]
    TokenIssuedInFuture {
        /// The token's `iat` value, seconds since the epoch
        issued_at: i64,
    },

    /// A registered time claim is present but not numeric
    #[error("Claim '{claim}' must be a NumericDate")]
    InvalidTimeClaim {
        /// Name of the offending claim
        claim: &'static str,
    },
}

impl Error {
    /// Whether this error can only arise while constructing a verifier
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSource { .. } | Self::Transport { .. } | Self::MalformedJwks(_)
        )
    }

    /// Whether the JWKS source could not be reached or read
    ///
    /// Distinguishes "could not reach source" from "source returned garbage"
    /// ([`Error::MalformedJwks`]).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Whether the token was rejected because of its time claims
    pub fn is_time_violation(&self) -> bool {
        matches!(
            self,
            Self::TokenExpired { .. }
                | Self::TokenNotYetValid { .. }
                | Self::TokenIssuedInFuture { .. }
        )
    }

    pub(crate) fn transport(source_uri: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Transport {
            source_uri: source_uri.into(),
            reason: reason.to_string(),
        }
    }
}

fn describe_alg(found: &Option<String>) -> String {
    found
        .as_deref()
        .map_or_else(|| "<none>".to_string(), |alg| format!("{alg:?}"))
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedJwks(err.to_string())
    }
}
