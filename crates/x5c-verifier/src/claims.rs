//! JWT claims and time-based claim validation (RFC 7519 Section 4.1)

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::VerifierConfig;
use crate::{Error, Result};

/// Decoded token payload
///
/// Arbitrary claim shapes are preserved as JSON values. Registered claims
/// have typed accessors; use [`Claims::deserialize_into`] for an
/// application-specific view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Look up a claim by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether a claim is present
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Subject (`sub`), when it is a string
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// Issuer (`iss`), when it is a string
    pub fn issuer(&self) -> Option<&str> {
        self.get("iss").and_then(Value::as_str)
    }

    /// Audience (`aud`), normalised to a list
    pub fn audience(&self) -> Vec<&str> {
        match self.get("aud") {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(auds)) => auds.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Expiration time (`exp`) in seconds since the epoch
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeClaim`] if the claim is present but not a number.
    pub fn expiration(&self) -> Result<Option<i64>> {
        self.numeric_date("exp")
    }

    /// Not-before time (`nbf`) in seconds since the epoch
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeClaim`] if the claim is present but not a number.
    pub fn not_before(&self) -> Result<Option<i64>> {
        self.numeric_date("nbf")
    }

    /// Issued-at time (`iat`) in seconds since the epoch
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeClaim`] if the claim is present but not a number.
    pub fn issued_at(&self) -> Result<Option<i64>> {
        self.numeric_date("iat")
    }

    /// Deserialize the claims into an application type
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the claims do not fit `T`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }

    /// All claims
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying map
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    // NumericDate may be fractional; fractions are truncated toward zero.
    fn numeric_date(&self, claim: &'static str) -> Result<Option<i64>> {
        match self.get(claim) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Some)
                .ok_or(Error::InvalidTimeClaim { claim }),
            Some(_) => Err(Error::InvalidTimeClaim { claim }),
        }
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Time-window rules applied to `exp`, `nbf` and (optionally) `iat`
///
/// Absent claims are unbounded. With leeway `L`:
/// - `exp` must satisfy `now < exp + L`
/// - `nbf` must satisfy `nbf <= now + L`
/// - `iat`, when enabled, must satisfy `iat <= now + L`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValidation {
    now: i64,
    leeway: i64,
    validate_iat: bool,
}

impl TimeValidation {
    /// Rules evaluated at `now` with the verifier's leeway and `iat` setting
    pub fn new(now: SystemTime, config: &VerifierConfig) -> Self {
        Self {
            now: unix_seconds(now),
            leeway: i64::try_from(config.leeway.as_secs()).unwrap_or(i64::MAX),
            validate_iat: config.validate_iat,
        }
    }

    /// Check the claims against the window
    ///
    /// # Errors
    ///
    /// - [`Error::TokenExpired`] if `exp` has passed
    /// - [`Error::TokenNotYetValid`] if `nbf` is in the future
    /// - [`Error::TokenIssuedInFuture`] if `iat` is in the future and the check is enabled
    /// - [`Error::InvalidTimeClaim`] if any checked claim is not numeric
    pub fn validate(&self, claims: &Claims) -> Result<()> {
        if let Some(exp) = claims.expiration()?
            && self.now >= exp.saturating_add(self.leeway)
        {
            return Err(Error::TokenExpired { expired_at: exp });
        }

        if let Some(nbf) = claims.not_before()?
            && nbf > self.now.saturating_add(self.leeway)
        {
            return Err(Error::TokenNotYetValid { not_before: nbf });
        }

        if self.validate_iat
            && let Some(iat) = claims.issued_at()?
            && iat > self.now.saturating_add(self.leeway)
        {
            return Err(Error::TokenIssuedInFuture { issued_at: iat });
        }

        Ok(())
    }
}

fn unix_seconds(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

/// Convert a NumericDate to a `SystemTime`; pre-epoch values map to `None`
pub(crate) fn to_system_time(seconds: i64) -> Option<SystemTime> {
    u64::try_from(seconds)
        .ok()
        .map(|secs| UNIX_EPOCH + Duration::from_secs(secs))
}
