// Test mocks for the loader pipeline.
//
// MockHost (DocsHost) — HashMap-based listings/metadata/content with
// per-URL download counters for cache assertions. MemoryDocStore doubles
// as the test store. Plus helpers for provider-shaped fixtures.
//
// Unregistered URLs return an Api error, which doubles as fetch-failure
// injection.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use docsync_common::DocumentRecord;
use github_client::error::Result as GithubResult;
use github_client::{parse_listing, ContentEntry, GithubError};

use crate::traits::DocsHost;

pub const API_BASE: &str = "https://api.github.com/repos/o/r/contents";
pub const RAW_BASE: &str = "https://raw.githubusercontent.com/o/r/main";

pub fn metadata_url(slug: &str) -> String {
    format!("{API_BASE}/docs/{slug}.md")
}

pub fn content_url(slug: &str) -> String {
    format!("{RAW_BASE}/docs/{slug}.md")
}

/// One listing descriptor as the contents endpoint emits it.
pub fn doc_descriptor(slug: &str) -> Value {
    json!({
        "name": format!("{slug}.md"),
        "path": format!("docs/{slug}.md"),
        "sha": format!("sha-{slug}"),
        "url": metadata_url(slug),
        "download_url": content_url(slug),
        "type": "file"
    })
}

/// Full metadata payload for one entry, DocumentRecord-shaped minus the
/// rewritten content.
pub fn doc_metadata(slug: &str, sha: &str) -> Value {
    json!({
        "name": format!("{slug}.md"),
        "path": format!("docs/{slug}.md"),
        "sha": sha,
        "size": 1024,
        "url": metadata_url(slug),
        "html_url": format!("https://github.com/o/r/blob/main/docs/{slug}.md"),
        "git_url": format!("https://api.github.com/repos/o/r/git/blobs/{sha}"),
        "download_url": content_url(slug),
        "type": "file",
        "content": "IyBEb2M=",
        "encoding": "base64",
        "_links": {
            "self": metadata_url(slug),
            "git": format!("https://api.github.com/repos/o/r/git/blobs/{sha}"),
            "html": format!("https://github.com/o/r/blob/main/docs/{slug}.md")
        }
    })
}

/// A validated record, for seeding stores directly.
pub fn doc_record(slug: &str, sha: &str) -> DocumentRecord {
    let mut value = doc_metadata(slug, sha);
    value["content"] = json!("# Doc");
    serde_json::from_value(value).expect("fixture record is schema-valid")
}

// ---------------------------------------------------------------------------
// MockHost
// ---------------------------------------------------------------------------

pub struct MockHost {
    listings: HashMap<String, Value>,
    metadata: HashMap<String, Value>,
    content: HashMap<String, String>,
    content_fetches: Mutex<HashMap<String, u32>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            listings: HashMap::new(),
            metadata: HashMap::new(),
            content: HashMap::new(),
            content_fetches: Mutex::new(HashMap::new()),
        }
    }

    /// Register the raw listing body for `repo`/`path` — may be any JSON
    /// shape, so tests can exercise the non-array fatal condition.
    pub fn on_listing(mut self, repo: &str, path: &str, body: Value) -> Self {
        self.listings.insert(format!("{repo}/{path}"), body);
        self
    }

    pub fn on_metadata(mut self, url: &str, body: Value) -> Self {
        self.metadata.insert(url.to_string(), body);
        self
    }

    pub fn on_content(mut self, url: &str, body: &str) -> Self {
        self.content.insert(url.to_string(), body.to_string());
        self
    }

    /// How many times `fetch_raw` was called for `url`.
    pub fn content_fetch_count(&self, url: &str) -> u32 {
        self.content_fetches
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(0)
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocsHost for MockHost {
    async fn list_dir(&self, repo: &str, path: &str) -> GithubResult<Vec<ContentEntry>> {
        let body = self
            .listings
            .get(&format!("{repo}/{path}"))
            .cloned()
            .ok_or_else(|| GithubError::Api {
                status: 404,
                message: format!("MockHost: no listing registered for {repo}/{path}"),
            })?;
        parse_listing(body)
    }

    async fn fetch_json(&self, url: &str) -> GithubResult<Value> {
        self.metadata
            .get(url)
            .cloned()
            .ok_or_else(|| GithubError::Api {
                status: 404,
                message: format!("MockHost: no metadata registered for {url}"),
            })
    }

    async fn fetch_raw(&self, url: &str) -> GithubResult<String> {
        *self
            .content_fetches
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        self.content
            .get(url)
            .cloned()
            .ok_or_else(|| GithubError::Api {
                status: 404,
                message: format!("MockHost: no content registered for {url}"),
            })
    }
}
