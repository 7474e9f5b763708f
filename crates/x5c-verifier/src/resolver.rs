//! Key resolution: `kid` to RSA public key via the JWKS certificate chain

use rsa::RsaPublicKey;

use crate::certificate::decode_certificate;
use crate::jwks::JwkSet;
use crate::{Error, Result};

/// Resolve the verification key for `key_id`
///
/// Scans the whole set. Exactly one entry must carry the requested `kid`;
/// its leaf certificate (`x5c[0]`) supplies the key. Intermediate and root
/// certificates are ignored and no chain-of-trust validation is performed.
///
/// # Errors
///
/// - [`Error::KeyNotFound`] if no entry carries `key_id`
/// - [`Error::AmbiguousKeyId`] if more than one entry carries it
/// - [`Error::MissingCertificate`] if the entry has no `x5c` chain, even when
///   raw `n`/`e` members are published
/// - [`Error::CertificateFormat`] / [`Error::CertificateParse`] if the leaf
///   certificate cannot be decoded
pub fn resolve_key(key_id: &str, jwks: &JwkSet) -> Result<RsaPublicKey> {
    let mut candidates = jwks.find_all(key_id);

    let jwk = candidates.next().ok_or_else(|| Error::KeyNotFound {
        kid: key_id.to_string(),
    })?;

    let others = candidates.count();
    if others > 0 {
        return Err(Error::AmbiguousKeyId {
            kid: key_id.to_string(),
            count: others + 1,
        });
    }

    let leaf = jwk.leaf_certificate().ok_or_else(|| Error::MissingCertificate {
        kid: key_id.to_string(),
    })?;

    decode_certificate(leaf)
}
