//! JWKS source identifiers

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::{Error, Result};

/// Where a JWKS document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwksSource {
    /// Local file, from a `file:` URI
    File(PathBuf),
    /// Anything else, fetched with an HTTP GET
    Remote(Url),
}

impl JwksSource {
    /// Classify a source URI by scheme
    ///
    /// `file:` URIs resolve to their path component; every other scheme is
    /// treated as a remote endpoint. Whether the remote scheme is actually
    /// reachable is only discovered when loading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSource`] if `uri` cannot be parsed, or if a
    /// `file:` URI names a non-local host.
    pub fn parse(uri: &str) -> Result<Self> {
        let url = Url::parse(uri).map_err(|e| Error::InvalidSource {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "file" {
            return Ok(Self::Remote(url));
        }

        let path = url.to_file_path().map_err(|()| Error::InvalidSource {
            uri: uri.to_string(),
            reason: "file URI must name a local path".to_string(),
        })?;
        Ok(Self::File(path))
    }

    /// Whether the source is a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

impl FromStr for JwksSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for JwksSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file://{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}
