//! Configuration types for JWKS loading and token verification

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// JWKS retrieval configuration
///
/// Applies only to construction: a verifier performs exactly one fetch or
/// file read and never refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Request timeout for remote sources (default: 10 seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,

    /// Maximum accepted JWKS document size in bytes (default: 1 MiB)
    #[serde(default = "default_max_response_size")]
    pub max_response_size: usize,

    /// User agent for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_response_size() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_user_agent() -> String {
    format!("x5c-verifier/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            max_response_size: default_max_response_size(),
            user_agent: default_user_agent(),
        }
    }
}

impl LoaderConfig {
    /// Set the request timeout for remote sources
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the maximum accepted document size
    pub fn with_max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = bytes;
        self
    }

    /// Set the user agent sent with HTTP requests
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Token verification configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Clock skew tolerance applied to `exp`, `nbf` and `iat` (default: none)
    #[serde(default)]
    pub leeway: Duration,

    /// Reject tokens whose `iat` lies in the future (default: false)
    #[serde(default)]
    pub validate_iat: bool,
}

impl VerifierConfig {
    /// Set clock skew tolerance
    ///
    /// Zero by default: `exp` must be strictly in the future and `nbf` must
    /// not be. Only widen this when issuer and verifier clocks are known to
    /// drift.
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Enable or disable the `iat` check
    pub fn with_iat_validation(mut self, enabled: bool) -> Self {
        self.validate_iat = enabled;
        self
    }
}
