// Trait abstractions for the loader's two external seams.
//
// DocsHost wraps the provider API (GithubClient in production), DocStore
// wraps the content store the site renders from. Both enable deterministic
// testing with MockHost and MemoryDocStore: no network, no provider rate
// limits. `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;

use docsync_common::DocumentRecord;
use github_client::error::Result as GithubResult;
use github_client::{ContentEntry, GithubClient};

// ---------------------------------------------------------------------------
// DocsHost — the source-control provider
// ---------------------------------------------------------------------------

#[async_trait]
pub trait DocsHost: Send + Sync {
    /// List a repository directory's file descriptors, in provider order.
    async fn list_dir(&self, repo: &str, path: &str) -> GithubResult<Vec<ContentEntry>>;

    /// Fetch an entry's metadata object.
    async fn fetch_json(&self, url: &str) -> GithubResult<serde_json::Value>;

    /// Fetch an entry's raw Markdown body.
    async fn fetch_raw(&self, url: &str) -> GithubResult<String>;
}

#[async_trait]
impl DocsHost for GithubClient {
    async fn list_dir(&self, repo: &str, path: &str) -> GithubResult<Vec<ContentEntry>> {
        GithubClient::list_dir(self, repo, path).await
    }

    async fn fetch_json(&self, url: &str) -> GithubResult<serde_json::Value> {
        GithubClient::fetch_json(self, url).await
    }

    async fn fetch_raw(&self, url: &str) -> GithubResult<String> {
        GithubClient::fetch_raw(self, url).await
    }
}

// ---------------------------------------------------------------------------
// DocStore — the content store
// ---------------------------------------------------------------------------

/// Keyed upsert/list persistence for validated records. Key = `record.url`.
/// Concurrent upserts are the store's responsibility, not the pipeline's.
#[async_trait]
pub trait DocStore: Send + Sync {
    /// Write a record under its canonical URL, overwriting any existing one.
    async fn upsert(&self, record: DocumentRecord) -> Result<()>;

    /// Read one record by canonical URL.
    async fn get(&self, url: &str) -> Result<Option<DocumentRecord>>;

    /// All stored records, for downstream renderers.
    async fn list(&self) -> Result<Vec<DocumentRecord>>;

    /// All stored keys, for staleness reconciliation.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Remove one record. Returns whether a record existed at that key.
    async fn remove(&self, url: &str) -> Result<bool>;
}
