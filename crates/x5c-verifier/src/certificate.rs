//! X.509 certificate decoding for `x5c` entries
//!
//! An `x5c` element is the base64 DER body of a certificate without PEM
//! armour. The public key used for RS256 verification always comes from the
//! certificate's subject public key info, never from raw `n`/`e` members.

use rsa::RsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use x509_cert::Certificate;
use x509_cert::der::{Decode, Encode};

use crate::{Error, Result};

const PEM_HEADER: &str = "-----BEGIN CERTIFICATE-----";
const PEM_FOOTER: &str = "-----END CERTIFICATE-----";

/// Decode a base64 DER certificate body into its RSA public key
///
/// # Errors
///
/// - [`Error::CertificateFormat`] if the PEM envelope (base64) cannot be decoded
/// - [`Error::CertificateParse`] if the DER is not a certificate, or the
///   certificate does not carry an RSA key
pub fn decode_certificate(encoded: &str) -> Result<RsaPublicKey> {
    let certificate = parse_certificate(encoded)?;

    let spki_der = certificate
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| Error::CertificateParse(format!("invalid subject public key info: {e}")))?;

    RsaPublicKey::from_public_key_der(&spki_der).map_err(|e| {
        Error::CertificateParse(format!("certificate does not carry an RSA public key: {e}"))
    })
}

/// Parse a base64 DER certificate body into an X.509 certificate
pub(crate) fn parse_certificate(encoded: &str) -> Result<Certificate> {
    let armoured = format!("{PEM_HEADER}\n{}\n{PEM_FOOTER}\n", encoded.trim());

    let block = pem::parse(armoured).map_err(|e| Error::CertificateFormat(e.to_string()))?;

    Certificate::from_der(block.contents()).map_err(|e| Error::CertificateParse(e.to_string()))
}
