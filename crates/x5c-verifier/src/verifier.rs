//! RS256 token verification against a fixed JWKS
//!
//! Verification is a short pipeline in which the first failure wins:
//!
//! 1. Decode the compact token
//! 2. Algorithm gate: the header must declare `RS256`, checked before any key
//!    is looked up
//! 3. Key identification: the header must carry a string `kid`
//! 4. Key resolution: `kid` to the leaf certificate of the matching JWKS entry
//! 5. Signature over the exact signing input
//! 6. Time claims (`exp`, `nbf`, optionally `iat`)
//!
//! There is no per-token state and no I/O after construction, so one verifier
//! can be shared across threads behind an `Arc`.

use std::fmt;
use std::time::SystemTime;

use tracing::debug;

use crate::claims::{Claims, TimeValidation, to_system_time};
use crate::config::{LoaderConfig, VerifierConfig};
use crate::jwks::{JwkSet, JwksLoader, JwksSource};
use crate::resolver::resolve_key;
use crate::signature::verify_signature;
use crate::token::{Header, RawToken};
use crate::{Error, Result};

/// The only accepted signing algorithm
pub const RS256: &str = "RS256";

/// Result of a successful verification
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    /// The verified claims
    pub claims: Claims,
    /// Key ID that signed the token
    pub key_id: String,
    /// When the token was issued (`iat`)
    pub issued_at: Option<SystemTime>,
    /// When the token expires (`exp`)
    pub expires_at: Option<SystemTime>,
}

/// RS256 verifier bound to one JWKS
///
/// # Example
///
/// ```rust,no_run
/// # use x5c_verifier::Rs256Verifier;
/// # tokio_test::block_on(async {
/// let verifier = Rs256Verifier::load("https://auth.example.com/.well-known/jwks.json").await?;
///
/// let token = "eyJ0eXAiOiJKV1QiLCJhbGc...";
/// let verified = verifier.verify(token)?;
///
/// println!("Token signed by key {}", verified.key_id);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # });
/// ```
#[derive(Clone)]
pub struct Rs256Verifier {
    jwks: JwkSet,
    config: VerifierConfig,
}

// Key IDs only; the certificate chains are noise in logs
impl fmt::Debug for Rs256Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rs256Verifier")
            .field("key_ids", &self.key_ids().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

impl Rs256Verifier {
    /// Load the JWKS from `uri` once and build a verifier with default settings
    ///
    /// `file:` URIs are read from disk; anything else is fetched with a single
    /// HTTP GET.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSource`] if `uri` cannot be parsed
    /// - [`Error::Transport`] if the source cannot be read
    /// - [`Error::MalformedJwks`] if the document is not a JWKS
    pub async fn load(uri: &str) -> Result<Self> {
        Self::load_with_config(uri, LoaderConfig::default(), VerifierConfig::default()).await
    }

    /// Load the JWKS from `uri` with custom loading and verification settings
    ///
    /// # Errors
    ///
    /// Same as [`Rs256Verifier::load`].
    pub async fn load_with_config(
        uri: &str,
        loader: LoaderConfig,
        config: VerifierConfig,
    ) -> Result<Self> {
        let source = JwksSource::parse(uri)?;
        let jwks = JwksLoader::with_config(loader).load(&source).await?;
        Ok(Self::with_config(jwks, config))
    }

    /// Build a verifier over an already-parsed JWKS
    pub fn from_jwks(jwks: JwkSet) -> Self {
        Self::with_config(jwks, VerifierConfig::default())
    }

    /// Build a verifier over an already-parsed JWKS with custom settings
    pub fn with_config(jwks: JwkSet, config: VerifierConfig) -> Self {
        Self { jwks, config }
    }

    /// Build a verifier from a JWKS document held in memory
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedJwks`] if `bytes` is not a JWKS document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        JwkSet::from_slice(bytes).map(Self::from_jwks)
    }

    /// The key set this verifier was built with
    pub fn jwks(&self) -> &JwkSet {
        &self.jwks
    }

    /// Verification settings
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Key IDs published in the key set, in document order
    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.jwks.key_ids()
    }

    /// Verify a compact token at the current time
    ///
    /// # Errors
    ///
    /// See [`Rs256Verifier::verify_at`].
    pub fn verify(&self, token: &str) -> Result<VerifiedToken> {
        self.verify_at(token, SystemTime::now())
    }

    /// Verify a compact token as of `now`
    ///
    /// # Errors
    ///
    /// - [`Error::TokenFormat`] if the token cannot be decoded
    /// - [`Error::AlgorithmMismatch`] if the header does not declare `RS256`
    /// - [`Error::MissingKeyId`] if the header has no string `kid`
    /// - [`Error::KeyNotFound`], [`Error::AmbiguousKeyId`],
    ///   [`Error::MissingCertificate`], [`Error::CertificateFormat`] or
    ///   [`Error::CertificateParse`] if no usable key matches `kid`
    /// - [`Error::SignatureInvalid`] if the signature does not match
    /// - [`Error::TokenExpired`], [`Error::TokenNotYetValid`],
    ///   [`Error::TokenIssuedInFuture`] or [`Error::InvalidTimeClaim`] if the
    ///   time claims reject the token
    pub fn verify_at(&self, token: &str, now: SystemTime) -> Result<VerifiedToken> {
        self.run_pipeline(token, now).inspect_err(|e| {
            debug!(error = %e, "Token rejected");
        })
    }

    fn run_pipeline(&self, token: &str, now: SystemTime) -> Result<VerifiedToken> {
        let raw = RawToken::parse(token)?;

        check_algorithm(raw.header())?;
        let key_id = raw.header().key_id().ok_or(Error::MissingKeyId)?;

        let key = resolve_key(key_id, &self.jwks)?;

        verify_signature(raw.signing_input().as_bytes(), raw.signature(), &key)?;

        TimeValidation::new(now, &self.config).validate(raw.claims())?;

        let key_id = key_id.to_string();
        let claims = raw.into_claims();
        // Both claims were validated as numeric above when present
        let issued_at = claim_time(claims.issued_at());
        let expires_at = claim_time(claims.expiration());

        debug!(kid = %key_id, "Token verified");
        Ok(VerifiedToken {
            claims,
            key_id,
            issued_at,
            expires_at,
        })
    }
}

fn check_algorithm(header: &Header) -> Result<()> {
    match header.algorithm() {
        Some(alg) if alg == RS256 => Ok(()),
        found => Err(Error::AlgorithmMismatch { found }),
    }
}

fn claim_time(claim: Result<Option<i64>>) -> Option<SystemTime> {
    claim.ok().flatten().and_then(to_system_time)
}
