//! RS256 signature check (RSASSA-PKCS1-v1_5 with SHA-256)

use rsa::RsaPublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use sha2::Sha256;

use crate::{Error, Result};

/// Verify `signature` over `signing_input` with `key`
///
/// # Errors
///
/// Returns [`Error::SignatureInvalid`] if the signature is malformed, has the
/// wrong length for the key, or does not match.
pub fn verify_signature(signing_input: &[u8], signature: &[u8], key: &RsaPublicKey) -> Result<()> {
    let signature = Signature::try_from(signature).map_err(|_| Error::SignatureInvalid)?;
    VerifyingKey::<Sha256>::new(key.clone())
        .verify(signing_input, &signature)
        .map_err(|_| Error::SignatureInvalid)
}
