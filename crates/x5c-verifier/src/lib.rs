//! # x5c-verifier - RS256 Token Verification against JWKS Certificates
//!
//! Verifies compact RS256 bearer tokens (JWS, RFC 7515) using public keys taken
//! from the X.509 certificate chains (`x5c`) published in a JSON Web Key Set
//! (RFC 7517). The key set is loaded once, from a `file:` URI or an HTTP
//! endpoint, when the verifier is built.
//!
//! ## Core Features
//!
//! - **RS256 only** - Any other `alg` is rejected before a key is looked up
//! - **Certificate-backed keys** - Keys come from the leaf certificate, never
//!   from raw `n`/`e` members
//! - **Strict key lookup** - Unknown or duplicated `kid` values are errors
//! - **Time claims** - `exp` and `nbf` with configurable leeway, optional `iat`
//! - **Lock-free sharing** - `verify` is pure computation over immutable keys
//!
//! ## Architecture
//!
//! - `certificate` - base64 DER certificate to RSA public key
//! - `jwks` - JWKS model, source classification and one-shot loading
//! - `resolver` - `kid` to public key
//! - `token` - compact token parsing
//! - `signature` - RSASSA-PKCS1-v1_5 / SHA-256 check
//! - `claims` - claim access and time-window rules
//! - `verifier` - the verification pipeline
//! - `config` - loader and verifier settings
//! - `error` - error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use x5c_verifier::Rs256Verifier;
//!
//! # tokio_test::block_on(async {
//! let verifier = Rs256Verifier::load("file:///etc/auth/jwks.json").await?;
//!
//! match verifier.verify("eyJ0eXAiOiJKV1QiLCJhbGc...") {
//!     Ok(token) => println!("subject: {:?}", token.claims.subject()),
//!     Err(e) if e.is_time_violation() => println!("stale token: {e}"),
//!     Err(e) => println!("rejected: {e}"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

pub mod certificate;
pub mod claims;
pub mod config;
pub mod error;
pub mod jwks;
pub mod resolver;
pub mod signature;
pub mod token;
pub mod verifier;

// Re-export core types for convenience
pub use certificate::decode_certificate;
pub use claims::{Claims, TimeValidation};
pub use config::{LoaderConfig, VerifierConfig};
pub use error::Error;
pub use jwks::{Jwk, JwkSet, JwksLoader, JwksSource, KeyOperations};
pub use resolver::resolve_key;
pub use token::{Header, RawToken};
pub use verifier::{RS256, Rs256Verifier, VerifiedToken};

/// Result type for JWKS loading and token verification
pub type Result<T> = std::result::Result<T, Error>;
