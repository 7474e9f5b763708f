//! JWKS (JSON Web Key Set) model, parsing and one-shot loading
//!
//! A [`JwkSet`] is parsed once from a byte buffer and never mutated. There is
//! no cache, TTL or refresh: a verifier built from a set
//! sees exactly the keys that were published when it was constructed. Callers
//! that need fresh keys construct a new verifier.
//!
//! - [`source`] - classify a source URI (`file:` vs remote)
//! - [`loader`] - read or fetch the document, then parse it

pub mod loader;
pub mod source;

pub use loader::JwksLoader;
pub use source::JwksSource;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::LoaderConfig;
use crate::{Error, Result};

/// Value of a JWK `key_ops` member
///
/// RFC 7517 defines an array of strings; some issuers publish a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyOperations {
    /// A single operation
    Single(String),
    /// A list of operations
    List(Vec<String>),
}

/// One published key record (RFC 7517 Section 4)
///
/// Every member is optional at the schema level. Only `kid` and `x5c` are
/// consulted during key resolution; the rest is carried for callers. Raw RSA
/// members (`n`, `e`) are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type (`kty`), e.g. "RSA"
    #[serde(rename = "kty", default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,

    /// Intended use (`use`), e.g. "sig"
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub public_key_use: Option<String>,

    /// Permitted operations (`key_ops`)
    #[serde(rename = "key_ops", default, skip_serializing_if = "Option::is_none")]
    pub key_operations: Option<KeyOperations>,

    /// Advertised algorithm (`alg`). Informational: the algorithm gate is
    /// applied to the token header, never to this field.
    #[serde(rename = "alg", default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,

    /// Key ID (`kid`)
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    /// X.509 URL (`x5u`)
    #[serde(rename = "x5u", default, skip_serializing_if = "Option::is_none")]
    pub x509_url: Option<String>,

    /// X.509 certificate chain (`x5c`), base64 DER, leaf first
    #[serde(rename = "x5c", default, skip_serializing_if = "Option::is_none")]
    pub x509_chain: Option<Vec<String>>,

    /// X.509 SHA-1 thumbprint (`x5t`)
    #[serde(rename = "x5t", default, skip_serializing_if = "Option::is_none")]
    pub x509_sha1_fingerprint: Option<String>,
}

impl Jwk {
    /// The certificate chain, empty when `x5c` is absent
    pub fn certificate_chain(&self) -> &[String] {
        self.x509_chain.as_deref().unwrap_or_default()
    }

    /// The leaf certificate, i.e. the one that carries this key
    pub fn leaf_certificate(&self) -> Option<&str> {
        self.certificate_chain().first().map(String::as_str)
    }
}

/// An immutable, ordered JSON Web Key Set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    /// Published keys in document order
    #[serde(default, deserialize_with = "null_as_empty")]
    keys: Vec<Jwk>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Jwk>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Jwk>>::deserialize(deserializer)?.unwrap_or_default())
}

impl JwkSet {
    /// Build a set from already-parsed keys
    pub fn new(keys: Vec<Jwk>) -> Self {
        Self { keys }
    }

    /// Parse a JWKS document
    ///
    /// An empty or missing `keys` array is accepted; lookups against it
    /// simply fail later.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedJwks`] if the bytes are not a JSON object
    /// matching the JWKS schema.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        // Structs also deserialize from JSON arrays; insist on an object.
        let document: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(bytes)?;
        Ok(serde_json::from_value(serde_json::Value::Object(document))?)
    }

    /// Load and parse a JWKS from a `file:` or remote URI
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSource`] if `uri` is not a URI
    /// - [`Error::Transport`] if the source cannot be read
    /// - [`Error::MalformedJwks`] if the content is not a JWKS
    pub async fn load(uri: &str) -> Result<Self> {
        Self::load_with_config(uri, LoaderConfig::default()).await
    }

    /// Load and parse a JWKS with custom retrieval settings
    ///
    /// # Errors
    ///
    /// Same as [`JwkSet::load`].
    pub async fn load_with_config(uri: &str, config: LoaderConfig) -> Result<Self> {
        let source = JwksSource::parse(uri)?;
        JwksLoader::with_config(config).load(&source).await
    }

    /// Published keys in document order
    pub fn keys(&self) -> &[Jwk] {
        &self.keys
    }

    /// Number of published keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set has no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Every entry whose `kid` equals `key_id`, in document order
    pub fn find_all<'a>(&'a self, key_id: &'a str) -> impl Iterator<Item = &'a Jwk> + 'a {
        self.keys
            .iter()
            .filter(move |jwk| jwk.key_id.as_deref() == Some(key_id))
    }

    /// Key IDs of all entries that declare one
    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().filter_map(|jwk| jwk.key_id.as_deref())
    }
}

impl std::str::FromStr for JwkSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(s.as_bytes())
    }
}
