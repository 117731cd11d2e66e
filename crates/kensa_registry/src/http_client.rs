//! HTTP client with an optional insecure retry.

use std::time::Duration;

use tracing::warn;

use crate::error::FetchError;

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client used for checksum requests.
///
/// With `insecure` enabled, a request whose connection fails (for example
/// on a TLS handshake error) is retried once without certificate validation.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    insecure_client: Option<reqwest::Client>,
}

/// Builder for HttpClient.
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    insecure: bool,
}

impl HttpClient {
    /// Create a new builder for HttpClient.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder {
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
        }
    }

    /// Send a GET request to `url`.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        match self.client.get(url).send().await {
            Ok(response) => Ok(response),
            Err(e) if e.is_connect() => match &self.insecure_client {
                Some(insecure) => {
                    warn!(
                        "Re-trying {} without verifying the TLS certificate: {}",
                        url, e
                    );
                    Ok(insecure.get(url).send().await?)
                }
                None => Err(e.into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    pub fn retries_insecurely(&self) -> bool {
        self.insecure_client.is_some()
    }
}

impl HttpClientBuilder {
    /// Set timeout for HTTP requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Allow one retry without certificate validation.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Build the HttpClient.
    pub fn build(self) -> Result<HttpClient, FetchError> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let insecure_client = if self.insecure {
            Some(
                reqwest::Client::builder()
                    .timeout(self.timeout)
                    .danger_accept_invalid_certs(true)
                    .build()?,
            )
        } else {
            None
        };

        Ok(HttpClient {
            client,
            insecure_client,
        })
    }
}
