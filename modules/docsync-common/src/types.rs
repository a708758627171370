use serde::{Deserialize, Serialize};

/// Ephemeral pair produced by discovery and consumed once by the fetcher.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredRef {
    /// Canonical metadata address — becomes the store key.
    pub metadata_url: String,
    /// Raw content address.
    pub content_url: String,
}

/// Hypermedia links nested under `_links` in the provider payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLinks {
    #[serde(rename = "self")]
    pub self_url: String,
    pub git: String,
    pub html: String,
}

/// The persisted document entity.
///
/// Field names and nesting are a compatibility surface for downstream
/// renderers — the serde renames (`type`, `_links`, `self`) must keep the
/// wire shape exactly as the provider emits it. All fields except `content`
/// come verbatim from the metadata response; `content` holds the raw
/// Markdown body after link rewriting.
///
/// `url` is globally unique per document and stable across runs; it is the
/// store key, and re-synced records overwrite (never merge) at that key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub size: u64,
    pub url: String,
    pub html_url: String,
    pub git_url: String,
    pub download_url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub encoding: String,
    #[serde(rename = "_links")]
    pub links: RecordLinks,
}
