//! Common test utilities for integration tests
//!
//! Provides fixture access, certificate-backed RSA test keys, token signing
//! and a mock JWKS endpoint.

#![allow(dead_code)]

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::EncodePublicKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{Value, json};
use sha2::Sha256;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};
use x509_cert::builder::{Builder, CertificateBuilder, Profile};
use x509_cert::der::{Decode, Encode};
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::time::Validity;

/// Path of a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// `file:` URI of a fixture
pub fn fixture_uri(name: &str) -> String {
    file_uri(&fixture_path(name))
}

/// `file:` URI for any local path
pub fn file_uri(path: &std::path::Path) -> String {
    Url::from_file_path(path)
        .expect("Fixture path must be absolute")
        .to_string()
}

/// A fixture token, without the trailing newline
pub fn fixture_token(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .expect("Failed to read token fixture")
        .trim()
        .to_string()
}

/// Raw bytes of a fixture
pub fn fixture_bytes(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("Failed to read fixture")
}

/// An RSA key pair with a self-signed certificate for its public half
pub struct TestKey {
    pub private_key: RsaPrivateKey,
    /// Base64 (standard alphabet) DER certificate, as published in `x5c`
    pub certificate: String,
}

impl TestKey {
    /// Generate a 2048-bit key and a one-day self-signed certificate
    pub fn generate(common_name: &str) -> Self {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate RSA key");
        let certificate = self_signed_certificate(&private_key, common_name);
        Self {
            private_key,
            certificate,
        }
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }

    /// A JWKS entry carrying this key's certificate under `kid`
    pub fn jwk(&self, kid: &str) -> Value {
        json!({
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": kid,
            "x5c": [self.certificate],
        })
    }

    /// Sign `claims` as an RS256 token with `kid` in the header
    pub fn sign(&self, kid: &str, claims: &Value) -> String {
        self.sign_with_header(&json!({"alg": "RS256", "typ": "JWT", "kid": kid}), claims)
    }

    /// Sign arbitrary header and claims with RSASSA-PKCS1-v1_5 / SHA-256
    pub fn sign_with_header(&self, header: &Value, claims: &Value) -> String {
        let signing_input = format!("{}.{}", encode_segment(header), encode_segment(claims));
        let signature = SigningKey::<Sha256>::new(self.private_key.clone())
            .sign(signing_input.as_bytes())
            .to_bytes();
        format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature))
    }
}

fn self_signed_certificate(private_key: &RsaPrivateKey, common_name: &str) -> String {
    let signer = SigningKey::<Sha256>::new(private_key.clone());
    let spki_der = private_key
        .to_public_key()
        .to_public_key_der()
        .expect("Failed to encode public key");
    let spki = SubjectPublicKeyInfoOwned::from_der(spki_der.as_bytes())
        .expect("Failed to decode public key info");

    let builder = CertificateBuilder::new(
        Profile::Root,
        SerialNumber::new(&[0x01]).expect("Invalid serial number"),
        Validity::from_now(Duration::from_secs(86_400)).expect("Invalid validity"),
        Name::from_str(&format!("CN={common_name}")).expect("Invalid subject"),
        spki,
        &signer,
    )
    .expect("Failed to create certificate builder");

    let certificate = builder
        .build::<rsa::pkcs1v15::Signature>()
        .expect("Failed to sign certificate");
    STANDARD.encode(certificate.to_der().expect("Failed to encode certificate"))
}

static PRIMARY_KEY: LazyLock<TestKey> = LazyLock::new(|| TestKey::generate("primary"));
static SECONDARY_KEY: LazyLock<TestKey> = LazyLock::new(|| TestKey::generate("secondary"));

/// Shared key used by most tests; generated once per test binary
pub fn primary_key() -> &'static TestKey {
    &PRIMARY_KEY
}

/// A second, unrelated key
pub fn secondary_key() -> &'static TestKey {
    &SECONDARY_KEY
}

/// Base64 DER certificate holding an EC P-256 key
pub fn ec_certificate() -> String {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .expect("Failed to generate EC certificate");
    let der: &[u8] = certified.cert.der().as_ref();
    STANDARD.encode(der)
}

/// Base64url-encode a JSON value as a token segment
pub fn encode_segment(value: &Value) -> String {
    URL_SAFE_NO_PAD.encode(value.to_string())
}

/// Serialize a JWKS document from entries
pub fn jwks_document(keys: &[Value]) -> Vec<u8> {
    serde_json::to_vec(&json!({ "keys": keys })).expect("Failed to serialize JWKS")
}

/// Get current Unix timestamp
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64
}

/// Standard claims valid for an hour from now
pub fn fresh_claims(sub: &str) -> Value {
    let now = current_timestamp();
    json!({
        "sub": sub,
        "iss": "https://auth.example.com",
        "aud": "https://api.example.com",
        "iat": now,
        "nbf": now,
        "exp": now + 3600,
    })
}

/// Mock JWKS endpoint
pub struct MockJwksServer {
    pub server: MockServer,
    pub jwks_uri: String,
}

impl MockJwksServer {
    /// Start a mock server; the JWKS is served at `/jwks`
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let jwks_uri = format!("{}/jwks", server.uri());
        Self { server, jwks_uri }
    }

    /// Serve a JWKS document, expecting exactly `expected_calls` requests
    pub async fn mock_jwks(&self, body: Vec<u8>, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_bytes(body),
            )
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Answer with `status` and an arbitrary body
    pub async fn mock_response(&self, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}
