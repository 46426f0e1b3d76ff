//! HTTP transport for the lookup service.
//!
//! The core interpreter only ever sees raw response bytes or a
//! [`TransportError`]; retry policy, timeouts and status handling all live
//! here. The whole layer is synchronous: a lookup is one blocking fetch.

use std::thread::sleep;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Url;
use reqwest::blocking::{Client, Response};

use crate::error::TransportError;

/// Configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Number of retry attempts
    pub retry_attempts: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Maximum retry delay in milliseconds (for exponential backoff cap)
    pub max_retry_delay_ms: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            retry_attempts: 3,
            retry_delay_ms: 1000,
            max_retry_delay_ms: 30000,
            user_agent: format!("spotilook/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Fetches raw response bytes for a constructed URL.
///
/// The seam between the client and the network: lookups go through this
/// trait so tests can substitute canned responses.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport> Transport for &T {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP transport with retry and exponential backoff
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new transport with the given configuration
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(TransportError::from)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Fetch with retry logic
    fn fetch_with_retry(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let mut attempt = 0;

        loop {
            match self.make_request(url) {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let bytes = response.bytes().map_err(TransportError::from)?;
                        debug!("fetched {} ({} bytes)", url, bytes.len());
                        return Ok(bytes.to_vec());
                    }

                    let error = TransportError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                        message: format!(
                            "HTTP {}: {}",
                            status.as_u16(),
                            status.canonical_reason().unwrap_or("Unknown")
                        ),
                    };

                    // Retry on server errors (5xx) but not client errors (4xx)
                    if status.is_server_error() && attempt < self.config.retry_attempts {
                        warn!("retrying {} after {}", url, error);
                        self.wait_before_retry(attempt);
                        attempt += 1;
                        continue;
                    }

                    return Err(error);
                }
                Err(error) => {
                    if attempt < self.config.retry_attempts && self.is_retryable_error(&error) {
                        warn!("retrying {} after {}", url, error);
                        self.wait_before_retry(attempt);
                        attempt += 1;
                        continue;
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Make a single HTTP request, mapping client-side timeouts to a
    /// distinguishable error
    fn make_request(&self, url: &Url) -> Result<Response, TransportError> {
        self.client.get(url.clone()).send().map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url.to_string(),
                    timeout_seconds: self.config.timeout_seconds,
                }
            } else {
                TransportError::from(e)
            }
        })
    }

    /// Wait before retry with exponential backoff
    fn wait_before_retry(&self, attempt: u32) {
        let delay_ms = self.config.retry_delay_ms * 2_u64.pow(attempt);
        let capped_delay = delay_ms.min(self.config.max_retry_delay_ms);
        sleep(Duration::from_millis(capped_delay));
    }

    /// Check if an error is retryable
    fn is_retryable_error(&self, error: &TransportError) -> bool {
        match error {
            TransportError::Http(reqwest_error) => {
                // Retry on network errors and timeouts, not on invalid
                // requests
                reqwest_error.is_timeout()
                    || reqwest_error.is_connect()
                    || reqwest_error.is_request()
            }
            TransportError::Timeout { .. } => true,
            TransportError::HttpStatus { .. } => false,
        }
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        self.fetch_with_retry(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new(HttpConfig::default());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.retry_attempts, 3);
        assert!(config.user_agent.starts_with("spotilook/"));
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let config = HttpConfig {
            retry_delay_ms: 10,
            max_retry_delay_ms: 25,
            ..Default::default()
        };
        let transport = HttpTransport::new(config).unwrap();

        let start = Instant::now();
        transport.wait_before_retry(0); // 10ms
        assert!(start.elapsed() >= Duration::from_millis(10));

        let start = Instant::now();
        transport.wait_before_retry(3); // 80ms, capped to 25ms
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(25));
        assert!(elapsed < Duration::from_millis(80));
    }

    #[test]
    fn test_retryable_error_classification() {
        let transport = HttpTransport::new(HttpConfig::default()).unwrap();

        let timeout = TransportError::Timeout {
            url: "http://ws.spotify.com/lookup/1/".to_string(),
            timeout_seconds: 30,
        };
        assert!(transport.is_retryable_error(&timeout));

        // Status errors are handled by the status branch, never re-fetched
        // from here.
        let not_found = TransportError::HttpStatus {
            url: "http://ws.spotify.com/lookup/1/".to_string(),
            status: 404,
            message: "HTTP 404: Not Found".to_string(),
        };
        assert!(!transport.is_retryable_error(&not_found));
    }

    #[test]
    fn test_mock_transport_seam() {
        let mut transport = MockTransport::new();
        transport
            .expect_fetch()
            .returning(|_| Ok(b"<track/>".to_vec()));

        let url = Url::parse("http://ws.spotify.com/lookup/1/?uri=spotify:track:abc123").unwrap();
        let bytes = transport.fetch(&url).unwrap();
        assert_eq!(bytes, b"<track/>");
    }
}
