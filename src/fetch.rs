//! JSON retrieval for the project loader.
//!
//! The loader only ever asks one question of the outside world: "give me the
//! JSON document at this site-relative URL". [`Fetch`] is that seam, with two
//! implementations:
//!
//! - [`HttpFetcher`] talks to a deployed site over HTTP(S). Every request
//!   carries `Cache-Control: no-store` so a freshly regenerated manifest is
//!   never served stale.
//! - [`LocalFetcher`] serves the same URLs from a web root on disk, which is
//!   how the CLI previews a site before it is deployed.
//!
//! Tests substitute an in-memory site (see `test_helpers::FakeSite`).

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("GET {url} -> {status}")]
    Status { url: String, status: u16 },
    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// True when the resource simply does not exist, as opposed to existing
    /// and being unreadable or malformed.
    pub fn is_missing(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => *status == StatusCode::NOT_FOUND.as_u16(),
            FetchError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Source of JSON documents addressed by site-relative URLs.
pub trait Fetch {
    fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        (**self).get_json(url)
    }
}

impl<F: Fetch + ?Sized> Fetch for Box<F> {
    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        (**self).get_json(url)
    }
}

/// Fetches JSON over HTTP(S), resolving relative URLs against a base URL.
pub struct HttpFetcher {
    base: Url,
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher rooted at `base` (e.g. `https://example.com/`).
    ///
    /// `timeout` of `None` leaves the transport default in place.
    pub fn new(base: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let base = Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{base}: {e}")))?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| FetchError::Network {
            url: base.to_string(),
            source,
        })?;
        Ok(Self { base, client })
    }

    fn resolve(&self, url: &str) -> Result<Url, FetchError> {
        self.base
            .join(url)
            .map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))
    }
}

impl Fetch for HttpFetcher {
    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let target = self.resolve(url)?;
        debug!(url = %target, "GET");
        let network = |source| FetchError::Network {
            url: target.to_string(),
            source,
        };
        let response = self
            .client
            .get(target.clone())
            .header(CACHE_CONTROL, "no-store")
            .send()
            .map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: target.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().map_err(network)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Serves site-relative URLs from a directory on disk.
///
/// `./assets/projects/manifest.json?123` and `/assets/projects/manifest.json`
/// both map to `<web_root>/assets/projects/manifest.json`.
pub struct LocalFetcher {
    web_root: PathBuf,
}

impl LocalFetcher {
    pub fn new(web_root: impl Into<PathBuf>) -> Self {
        Self {
            web_root: web_root.into(),
        }
    }

    /// Map a site-relative URL to a file path under the web root.
    pub fn resolve(&self, url: &str) -> Result<PathBuf, FetchError> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_start_matches("./").trim_start_matches('/');
        if path.is_empty() || path.split('/').any(|segment| segment == "..") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }
        Ok(self.web_root.join(path))
    }
}

impl Fetch for LocalFetcher {
    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let path = self.resolve(url)?;
        debug!(path = %path.display(), "read");
        let content = std::fs::read_to_string(&path).map_err(|source| FetchError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
