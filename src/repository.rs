//! Remote repository access.
//!
//! [`Transport`] is the only seam that touches the network. [`HttpTransport`]
//! is the real implementation; tests substitute an in-memory one.

use crate::coordinate::metadata_url;
use regex::Regex;
use std::io::Read;
use std::sync::LazyLock;
use thiserror::Error;

/// Header carrying the static repository credential.
pub const API_KEY_HEADER: &str = "X-JFrog-Art-Api";

const USER_AGENT: &str = concat!("jar-manager/", env!("CARGO_PKG_VERSION"));

static VERSIONING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<versioning\b[^>]*>(.*?)</versioning>").expect("valid regex"));
static RELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<release\b[^>]*>(.*?)</release>").expect("valid regex"));

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("reading response from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Blocking GET that succeeds only on HTTP 200.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

pub struct HttpTransport {
    agent: ureq::Agent,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(api_key: Option<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .user_agent(USER_AGENT)
            .build()
            .into();
        Self {
            agent,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let mut request = self.agent.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.call().map_err(|e| TransportError::Request {
            url: url.to_string(),
            source: Box::new(e),
        })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(TransportError::Status {
                url: url.to_string(),
                status,
            });
        }

        let mut bytes = Vec::new();
        response
            .into_body()
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|source| TransportError::Body {
                url: url.to_string(),
                source,
            })?;
        Ok(bytes)
    }
}

/// Looks up the latest released version below `artifact_path`.
///
/// Every failure mode (transport, status, shape) collapses to `None`.
pub fn latest_version(transport: &dyn Transport, artifact_path: &str) -> Option<String> {
    let url = metadata_url(artifact_path);
    tracing::debug!("metadata url is {}", url);

    let body = match transport.get(&url) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("could not get metadata xml: {}", e);
            return None;
        }
    };

    let xml = String::from_utf8_lossy(&body);
    let release = release_from_metadata(&xml);
    if release.is_none() {
        tracing::error!("no <versioning><release> in {}", url);
    }
    release
}

/// Extracts `<versioning><release>` from a `maven-metadata.xml` document.
pub fn release_from_metadata(xml: &str) -> Option<String> {
    let versioning = VERSIONING_RE.captures(xml)?.get(1)?.as_str();
    let release = RELEASE_RE.captures(versioning)?.get(1)?.as_str().trim();
    if release.is_empty() {
        None
    } else {
        Some(release.to_string())
    }
}
