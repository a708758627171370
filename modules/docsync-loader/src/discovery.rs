//! Entry discovery: one directory listing, filtered to eligible documents.

use tracing::{debug, info};

use docsync_common::{DiscoveredRef, SyncError};
use github_client::ContentEntry;

use crate::traits::DocsHost;

/// List the configured directory and filter to eligible document entries.
///
/// Any listing failure — non-success response or a body that is not an
/// array of descriptors — is fatal: the sync aborts before any fetch
/// begins.
pub async fn discover(
    host: &dyn DocsHost,
    repo: &str,
    path: &str,
) -> Result<Vec<DiscoveredRef>, SyncError> {
    let entries = host
        .list_dir(repo, path)
        .await
        .map_err(|e| SyncError::Listing(e.to_string()))?;

    let refs = filter_entries(entries);
    info!(repo, path, count = refs.len(), "Discovered document entries");
    Ok(refs)
}

/// Keep a descriptor iff both URLs are present, its download path ends in
/// `.md`, and the download path does not contain `README.md`. Provider
/// order is preserved; no re-sorting.
pub fn filter_entries(entries: Vec<ContentEntry>) -> Vec<DiscoveredRef> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let metadata_url = entry.url?;
            let content_url = entry.download_url?;

            // Path checks ignore any query string on the download URL.
            let path = content_url
                .split(['?', '#'])
                .next()
                .unwrap_or(content_url.as_str());
            if !path.ends_with(".md") || path.contains("README.md") {
                debug!(path = entry.path.as_str(), "Skipping ineligible entry");
                return None;
            }

            Some(DiscoveredRef {
                metadata_url,
                content_url,
            })
        })
        .collect()
}
