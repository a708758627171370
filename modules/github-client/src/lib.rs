pub mod error;
pub mod types;

pub use error::{GithubError, Result};
pub use types::{parse_listing, ContentEntry};

use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

const BASE_URL: &str = "https://api.github.com";

/// Accept header for structured responses from the v3 REST API.
const ACCEPT_JSON: &str = "application/vnd.github.v3+json";

/// Client identification required by the GitHub API.
const USER_AGENT: &str = concat!("docsync/", env!("CARGO_PKG_VERSION"));

/// Max attempts per request. Throttling (429) and server errors retry
/// with exponential backoff (500ms, 1s) plus random jitter (0-250ms).
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE: Duration = Duration::from_millis(500);

pub struct GithubClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, token }
    }

    /// List a repository directory via the contents endpoint.
    ///
    /// `repo` is `owner/name`. Returns descriptors in provider order. A
    /// success body that is not a JSON array (error object, single file)
    /// is a `Listing` error.
    pub async fn list_dir(&self, repo: &str, path: &str) -> Result<Vec<ContentEntry>> {
        let url = format!("{}/repos/{}/contents/{}", BASE_URL, repo, path);
        let resp = self.get_with_retry(&url, Some(ACCEPT_JSON)).await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = resp.json().await?;
        let entries = parse_listing(body)?;
        debug!(repo, path, count = entries.len(), "Directory listed");
        Ok(entries)
    }

    /// Fetch an absolute API URL as a JSON object (entry metadata).
    pub async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let resp = self.get_with_retry(url, Some(ACCEPT_JSON)).await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch an absolute URL as plain text (raw document content).
    pub async fn fetch_raw(&self, url: &str) -> Result<String> {
        let resp = self.get_with_retry(url, None).await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }

    async fn get_with_retry(&self, url: &str, accept: Option<&str>) -> Result<reqwest::Response> {
        let mut attempt = 0;

        loop {
            let mut req = self.client.get(url).header("User-Agent", USER_AGENT);
            if let Some(accept) = accept {
                req = req.header("Accept", accept);
            }
            if let Some(ref token) = self.token {
                req = req.bearer_auth(token);
            }

            match req.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let throttled = status.as_u16() == 429 || status.is_server_error();
                    if !throttled || attempt + 1 >= MAX_ATTEMPTS {
                        return Ok(resp);
                    }

                    let backoff = RETRY_BASE * 2u32.pow(attempt);
                    let jitter = Duration::from_millis(rand::rng().random_range(0..250));
                    warn!(
                        url,
                        status = status.as_u16(),
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        "GitHub request throttled, retrying after backoff"
                    );
                    tokio::time::sleep(backoff + jitter).await;
                }
                Err(e) => {
                    if attempt + 1 >= MAX_ATTEMPTS {
                        return Err(GithubError::Network(e.to_string()));
                    }
                    let backoff = RETRY_BASE * 2u32.pow(attempt);
                    let jitter = Duration::from_millis(rand::rng().random_range(0..250));
                    warn!(
                        url,
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "GitHub request failed, retrying after backoff"
                    );
                    tokio::time::sleep(backoff + jitter).await;
                }
            }

            attempt += 1;
        }
    }
}
