//! HTTP fetch pipeline for favicon acquisition.
//!
//! This is the privileged role's network path: it performs the actual
//! cross-origin request and converts the payload into a self-contained
//! `data:` URL, so the presentation side never touches the network to
//! render an icon.
//!
//! ### Behavior
//! - Per-request timeout (default 8s) aborts the in-flight transfer and
//!   yields a single `FETCH_TIMEOUT` error.
//! - Non-2xx responses are rejected with status code and reason.
//! - Zero-length bodies are rejected as empty responses.
//! - Any declared content type is accepted; mislabeled icon responses are
//!   common, so a non-image type only logs a warning.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, header};
use std::time::{Duration, Instant};

use keydash_core::Error;

/// Configuration for the favicon fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "keydash/0.1")
    pub user_agent: String,

    /// Per-request timeout (default: 8s)
    pub timeout: Duration,

    /// Maximum response body size in bytes (default: 1MB)
    pub max_bytes: usize,

    /// URL used by the liveness probe (default: httpbin.org)
    pub probe_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "keydash/0.1".to_string(),
            timeout: Duration::from_millis(8000),
            max_bytes: 1024 * 1024,
            probe_url: "https://httpbin.org/get".to_string(),
        }
    }
}

/// Seam between the bridge service and the real network.
///
/// The bridge is written against this trait so tests can substitute a
/// scripted fetcher.
#[async_trait]
pub trait IconFetcher: Send + Sync {
    /// Fetch `url` and encode the body as an inline `data:` URL.
    async fn fetch_data_url(&self, url: &str) -> Result<String, Error>;

    /// Cheap network liveness probe.
    async fn probe(&self) -> Result<(), Error>;
}

/// HTTP fetch client for icon payloads.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl IconFetcher for FetchClient {
    async fn fetch_data_url(&self, url: &str) -> Result<String, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "image/*,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(url.to_string())
                } else {
                    Error::HttpError(format!("network error: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!(
                "status {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown")
            )));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(url.to_string())
            } else {
                Error::HttpError(format!("failed to read response: {e}"))
            }
        })?;

        if bytes.is_empty() {
            return Err(Error::EmptyBody(url.to_string()));
        }

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        if let Some(ct) = content_type.as_deref()
            && !ct.trim_start().starts_with("image/")
        {
            tracing::warn!("{} served non-image content type {:?}, converting anyway", url, ct);
        }

        let data_url = encode_data_url(&bytes, content_type.as_deref());

        tracing::debug!(
            "fetched {} in {}ms ({} bytes)",
            url,
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(data_url)
    }

    async fn probe(&self) -> Result<(), Error> {
        let response = self
            .http
            .get(&self.config.probe_url)
            .send()
            .await
            .map_err(|e| Error::HttpError(format!("probe failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::HttpError(format!("probe status {}", status.as_u16())))
        }
    }
}

/// Encode an icon payload as a self-contained `data:` URL.
///
/// The media type comes from the response's Content-Type with any
/// parameters stripped; a missing or empty type falls back to
/// `application/octet-stream`, mirroring how browsers type unlabeled blobs.
pub fn encode_data_url(bytes: &[u8], content_type: Option<&str>) -> String {
    let mime = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "keydash/0.1");
        assert_eq!(config.timeout, Duration::from_millis(8000));
        assert_eq!(config.max_bytes, 1024 * 1024);
        assert_eq!(config.probe_url, "https://httpbin.org/get");
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let client = FetchClient::new(FetchConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_encode_data_url_basic() {
        let encoded = encode_data_url(&[1, 2, 3], Some("image/png"));
        assert_eq!(encoded, "data:image/png;base64,AQID");
    }

    #[test]
    fn test_encode_data_url_strips_parameters() {
        let encoded = encode_data_url(b"x", Some("image/svg+xml; charset=utf-8"));
        assert!(encoded.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_encode_data_url_missing_type() {
        let encoded = encode_data_url(b"x", None);
        assert!(encoded.starts_with("data:application/octet-stream;base64,"));
    }

    #[test]
    fn test_encode_data_url_empty_type() {
        let encoded = encode_data_url(b"x", Some(""));
        assert!(encoded.starts_with("data:application/octet-stream;base64,"));
    }

    #[test]
    fn test_encode_data_url_non_image_type_still_encodes() {
        let encoded = encode_data_url(&[0xff], Some("text/plain"));
        assert_eq!(encoded, "data:text/plain;base64,/w==");
    }
}
