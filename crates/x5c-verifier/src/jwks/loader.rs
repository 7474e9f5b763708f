//! One-shot JWKS retrieval from a file or an HTTP endpoint
//!
//! The loader reads exactly once and parses the result. It distinguishes
//! "could not reach source" ([`Error::Transport`]) from "source returned
//! garbage" ([`Error::MalformedJwks`]). No retries, no caching.

use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};
use url::Url;

use super::{JwkSet, JwksSource};
use crate::config::LoaderConfig;
use crate::{Error, Result};

/// JWKS loader for `file:` and remote sources
///
/// # Example
///
/// ```rust,no_run
/// # use x5c_verifier::jwks::{JwksLoader, JwksSource};
/// # tokio_test::block_on(async {
/// let source = JwksSource::parse("https://auth.example.com/.well-known/jwks.json")?;
/// let jwks = JwksLoader::new().load(&source).await?;
/// println!("{} keys published", jwks.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct JwksLoader {
    config: LoaderConfig,
}

impl JwksLoader {
    /// Create a loader with default settings (10s timeout, 1 MiB limit)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom settings
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Loader settings
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Read or fetch the JWKS once and parse it
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the file cannot be read, the request fails,
    ///   the endpoint answers with a non-success status, or the document
    ///   exceeds `max_response_size`
    /// - [`Error::MalformedJwks`] if the content is not a JWKS document
    pub async fn load(&self, source: &JwksSource) -> Result<JwkSet> {
        let body = match source {
            JwksSource::File(path) => self.read_file(path, source).await?,
            JwksSource::Remote(url) => self.fetch(url).await?,
        };

        let jwks = JwkSet::from_slice(&body).inspect_err(|e| {
            warn!(source = %source, error = %e, "JWKS document is malformed");
        })?;

        info!(source = %source, key_count = jwks.len(), "Loaded JWKS");
        Ok(jwks)
    }

    async fn read_file(&self, path: &Path, source: &JwksSource) -> Result<Vec<u8>> {
        debug!(path = %path.display(), "Reading JWKS file");

        let read_failed = |e: std::io::Error| {
            warn!(path = %path.display(), error = %e, "Failed to read JWKS file");
            Error::transport(source.to_string(), format!("could not read JWKS file: {e}"))
        };

        let file = File::open(path).await.map_err(read_failed)?;
        let limit = self.config.max_response_size;
        if let Ok(metadata) = file.metadata().await
            && metadata.len() > limit as u64
        {
            return Err(self.too_large(source.to_string()));
        }

        // The file may grow after the metadata check; never buffer past the limit.
        let mut body = Vec::new();
        file.take(limit as u64 + 1)
            .read_to_end(&mut body)
            .await
            .map_err(read_failed)?;
        if body.len() > limit {
            return Err(self.too_large(source.to_string()));
        }

        Ok(body)
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        info!(jwks_uri = %url, "Fetching JWKS from endpoint");

        let client = reqwest::Client::builder()
            .timeout(self.config.request_timeout)
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                Error::transport(url.as_str(), format!("failed to create HTTP client: {e}"))
            })?;

        let mut response = client.get(url.clone()).send().await.map_err(|e| {
            warn!(jwks_uri = %url, error = %e, "Failed to fetch JWKS");
            Error::transport(url.as_str(), format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            warn!(
                jwks_uri = %url,
                status = %response.status(),
                "JWKS endpoint returned error status"
            );
            return Err(Error::transport(
                url.as_str(),
                format!("endpoint returned status {}", response.status()),
            ));
        }

        if let Some(content_length) = response.content_length()
            && content_length > self.config.max_response_size as u64
        {
            return Err(self.too_large(url.to_string()));
        }

        // Read chunk by chunk so a lying or absent Content-Length cannot
        // make us buffer an unbounded body.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::transport(url.as_str(), format!("failed to read response: {e}")))?
        {
            if body.len() + chunk.len() > self.config.max_response_size {
                return Err(self.too_large(url.to_string()));
            }
            body.extend_from_slice(&chunk);
        }

        debug!(jwks_uri = %url, bytes = body.len(), "Fetched JWKS document");
        Ok(body)
    }

    fn too_large(&self, source_uri: String) -> Error {
        warn!(
            source = %source_uri,
            limit = self.config.max_response_size,
            "JWKS document exceeds size limit"
        );
        Error::transport(
            source_uri,
            format!(
                "document exceeds size limit of {} bytes",
                self.config.max_response_size
            ),
        )
    }
}
