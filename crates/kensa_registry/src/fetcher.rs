//! Checksum fetcher for published plugin versions.

use std::time::Duration;

use kensa_core::{DEFAULT_CHECKSUM_URL, ManifestProvider};
use kensa_manifest::{ChecksumManifest, parse_payload};
use reqwest::StatusCode;
use tracing::debug;

use crate::error::FetchError;
use crate::http_client::{DEFAULT_TIMEOUT, HttpClient};

/// Maximum size for a checksum payload (10MB).
const MAX_PAYLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Fetches checksum payloads from a URL template such as
/// `https://downloads.wordpress.org/plugin-checksums/{slug}/{version}.json`.
pub struct ChecksumFetcher {
    http_client: HttpClient,
    url_template: String,
}

/// Builder for ChecksumFetcher.
#[derive(Debug)]
pub struct ChecksumFetcherBuilder {
    url_template: String,
    timeout: Duration,
    insecure: bool,
}

impl ChecksumFetcher {
    pub fn builder() -> ChecksumFetcherBuilder {
        ChecksumFetcherBuilder {
            url_template: DEFAULT_CHECKSUM_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
        }
    }

    /// Create a fetcher for the public checksum API.
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    /// URL of the checksum payload for `slug` at `version`.
    pub fn checksum_url(&self, slug: &str, version: &str) -> String {
        self.url_template
            .replace("{slug}", slug)
            .replace("{version}", version)
    }

    /// Fetch the manifest of `slug` at `version`.
    ///
    /// A payload without a `files` table yields `Ok(None)`.
    pub async fn fetch_checksums(
        &self,
        slug: &str,
        version: &str,
    ) -> Result<Option<ChecksumManifest>, FetchError> {
        let url = self.checksum_url(slug, version);
        debug!("Fetching checksums from {}", url);

        let response = self.http_client.get(&url).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        if let Some(size) = response.content_length()
            && size > MAX_PAYLOAD_SIZE
        {
            return Err(FetchError::ResponseTooLarge {
                size,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.len() as u64 > MAX_PAYLOAD_SIZE {
            return Err(FetchError::ResponseTooLarge {
                size: bytes.len() as u64,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let text = String::from_utf8_lossy(&bytes);
        Ok(parse_payload(&text)?)
    }
}

impl ManifestProvider for ChecksumFetcher {
    type Error = FetchError;

    async fn fetch(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Option<ChecksumManifest>, FetchError> {
        self.fetch_checksums(name, version).await
    }
}

impl ChecksumFetcherBuilder {
    /// Set the URL template; `{slug}` and `{version}` are substituted.
    pub fn url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    /// Set timeout for HTTP requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retry once without certificate validation on connection failures.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn build(self) -> Result<ChecksumFetcher, FetchError> {
        let http_client = HttpClient::builder()
            .timeout(self.timeout)
            .insecure(self.insecure)
            .build()?;

        Ok(ChecksumFetcher {
            http_client,
            url_template: self.url_template,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kensa_manifest::HashAlgorithm;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_for(server: &MockServer) -> ChecksumFetcher {
        ChecksumFetcher::builder()
            .url_template(format!("{}/plugin-checksums/{{slug}}/{{version}}.json", server.uri()))
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[test]
    fn test_checksum_url_default_template() {
        let fetcher = ChecksumFetcher::new().unwrap();
        assert_eq!(
            fetcher.checksum_url("akismet", "5.3"),
            "https://downloads.wordpress.org/plugin-checksums/akismet/5.3.json"
        );
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/plugin-checksums/akismet/5.3.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{
                    "plugin_name": "akismet",
                    "version": "5.3",
                    "files": {
                        "akismet.php": {
                            "md5": "5eb63bbbe01eeed093cb22bb8f5acdc3",
                            "sha256": ["aa", "bb"]
                        }
                    }
                }"#,
            ))
            .mount(&mock_server)
            .await;

        let manifest = fetcher_for(&mock_server)
            .fetch("akismet", "5.3")
            .await
            .unwrap()
            .unwrap();

        let entry = manifest.get("akismet.php").unwrap();
        assert_eq!(entry.preferred().unwrap().0, HashAlgorithm::Sha256);
        assert_eq!(entry.accepted(HashAlgorithm::Sha256).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_not_found_carries_message() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let result = fetcher_for(&mock_server).fetch("ghost", "1.0").await;

        match result {
            Err(e @ FetchError::HttpStatus { status: 404, .. }) => {
                let message = e.to_string();
                assert!(message.starts_with("Couldn't fetch response from "));
                assert!(message.ends_with("/plugin-checksums/ghost/1.0.json (HTTP code 404)."));
            }
            other => panic!("Expected HttpStatus error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_payload_without_files() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"error":"nope"}"#))
            .mount(&mock_server)
            .await;

        let result = fetcher_for(&mock_server).fetch("akismet", "5.3").await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_fetch_malformed_payload() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let result = fetcher_for(&mock_server).fetch("akismet", "5.3").await;
        assert!(matches!(result, Err(FetchError::InvalidManifest(_))));
    }

    #[tokio::test]
    async fn test_fetch_too_large() {
        let mock_server = MockServer::start().await;
        let large = " ".repeat((MAX_PAYLOAD_SIZE + 100) as usize);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(large))
            .mount(&mock_server)
            .await;

        match fetcher_for(&mock_server).fetch("akismet", "5.3").await {
            Err(FetchError::ResponseTooLarge { size, max }) => {
                assert!(size > max);
                assert_eq!(max, MAX_PAYLOAD_SIZE);
            }
            other => panic!("Expected ResponseTooLarge error, got {:?}", other),
        }
    }
}
