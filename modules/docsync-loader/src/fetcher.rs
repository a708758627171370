//! Per-entry pipeline: parse → metadata → content → rewrite → validate →
//! store.
//!
//! Failures here are isolated to the entry: the orchestrator aggregates
//! outcomes instead of aborting the run, so one bad document never throws
//! away the work already stored for its siblings.

use serde_json::Value;
use tracing::{debug, info, warn};

use docsync_common::{DiscoveredRef, DocumentRecord, SyncError};

use crate::rewrite::rewrite_links;
use crate::traits::{DocStore, DocsHost};

/// What became of one discovered entry.
#[derive(Debug)]
pub enum EntryOutcome {
    /// Validated and written to the store under the given key.
    Stored(String),
    /// Store already holds this `sha`; content download skipped.
    Unchanged(String),
    /// URLs failed to parse; entry silently dropped.
    Skipped,
    /// Fetch, validation, or store write failed for this entry only.
    Failed { url: String, error: SyncError },
}

/// Per-entry knobs passed down from the sync configuration.
pub struct FetchOptions<'a> {
    pub route_prefix: &'a str,
    pub skip_unchanged: bool,
}

pub async fn process_entry(
    host: &dyn DocsHost,
    store: &dyn DocStore,
    entry: &DiscoveredRef,
    opts: &FetchOptions<'_>,
) -> EntryOutcome {
    // Structurally invalid references are dropped, not fatal.
    for raw in [&entry.metadata_url, &entry.content_url] {
        if let Err(e) = url::Url::parse(raw) {
            warn!(url = raw.as_str(), error = %e, "Dropping entry with malformed URL");
            return EntryOutcome::Skipped;
        }
    }

    let key = entry.metadata_url.clone();

    let metadata = match host.fetch_json(&entry.metadata_url).await {
        Ok(value) => value,
        Err(e) => {
            return EntryOutcome::Failed {
                url: key.clone(),
                error: SyncError::Fetch {
                    url: key,
                    message: e.to_string(),
                },
            }
        }
    };

    // Unchanged content needs no download: the stored record is already
    // the post-rewrite result for this sha.
    if opts.skip_unchanged {
        if let Some(sha) = metadata.get("sha").and_then(Value::as_str) {
            match store.get(&key).await {
                Ok(Some(existing)) if existing.sha == sha => {
                    debug!(url = key.as_str(), sha, "Content unchanged, skipping download");
                    return EntryOutcome::Unchanged(key);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(url = key.as_str(), error = %e, "Store lookup failed, re-fetching")
                }
            }
        }
    }

    let body = match host.fetch_raw(&entry.content_url).await {
        Ok(text) => text,
        Err(e) => {
            return EntryOutcome::Failed {
                url: key.clone(),
                error: SyncError::Fetch {
                    url: entry.content_url.clone(),
                    message: e.to_string(),
                },
            }
        }
    };
    if body.is_empty() {
        return EntryOutcome::Failed {
            url: key,
            error: SyncError::EmptyContent(entry.content_url.clone()),
        };
    }

    let content = rewrite_links(&body, opts.route_prefix);

    // Merge: metadata verbatim, content overwritten with the rewritten
    // text. Deserializing into DocumentRecord is the schema check — every
    // scalar field present with the right primitive kind, `_links` with
    // its three strings.
    let mut merged = metadata;
    let Some(fields) = merged.as_object_mut() else {
        return EntryOutcome::Failed {
            url: key.clone(),
            error: SyncError::Validation(format!("{key}: metadata response is not an object")),
        };
    };
    fields.insert("content".to_string(), Value::String(content));

    let record: DocumentRecord = match serde_json::from_value(merged) {
        Ok(record) => record,
        Err(e) => {
            return EntryOutcome::Failed {
                url: key.clone(),
                error: SyncError::Validation(format!("{key}: {e}")),
            }
        }
    };

    let key = record.url.clone();
    match store.upsert(record).await {
        Ok(()) => {
            info!(url = key.as_str(), "Document stored");
            EntryOutcome::Stored(key)
        }
        Err(e) => EntryOutcome::Failed {
            url: key,
            error: SyncError::Store(e.to_string()),
        },
    }
}
