//! End-to-end sync tests through MockHost and MemoryDocStore: no network,
//! no provider.

use std::sync::Arc;

use serde_json::json;

use docsync_common::{Config, SyncError};
use docsync_loader::store::MemoryDocStore;
use docsync_loader::sync::{SyncStats, Syncer};
use docsync_loader::testing::{
    content_url, doc_descriptor, doc_metadata, doc_record, metadata_url, MockHost,
};
use docsync_loader::traits::DocStore;

fn test_config() -> Config {
    Config {
        repo: "o/r".to_string(),
        dir: "docs".to_string(),
        github_token: None,
        route_prefix: "/docs".to_string(),
        max_concurrent: 4,
        skip_unchanged: true,
        output_path: None,
    }
}

/// MockHost serving a complete listing + metadata + content for `slugs`.
fn host_with_docs(slugs: &[&str]) -> MockHost {
    let listing = json!(slugs.iter().map(|s| doc_descriptor(s)).collect::<Vec<_>>());
    let mut host = MockHost::new().on_listing("o/r", "docs", listing);
    for slug in slugs {
        host = host
            .on_metadata(&metadata_url(slug), doc_metadata(slug, &format!("sha-{slug}")))
            .on_content(&content_url(slug), &format!("# {slug}\n\nSee [Intro](./intro.md)."));
    }
    host
}

async fn run(host: &Arc<MockHost>, store: &Arc<MemoryDocStore>) -> SyncStats {
    Syncer::new(host.clone(), store.clone(), test_config())
        .run()
        .await
        .expect("sync run should not abort")
}

#[tokio::test]
async fn full_run_stores_every_discovered_entry() {
    let host = Arc::new(host_with_docs(&["intro", "guide"]));
    let store = Arc::new(MemoryDocStore::new());

    let stats = run(&host, &store).await;

    assert_eq!(stats.discovered, 2);
    assert_eq!(stats.stored, 2);
    assert!(stats.failures.is_empty());
    assert_eq!(store.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn stored_content_is_rewritten() {
    let host = Arc::new(
        MockHost::new()
            .on_listing("o/r", "docs", json!([doc_descriptor("intro")]))
            .on_metadata(&metadata_url("intro"), doc_metadata("intro", "sha-1"))
            .on_content(
                &content_url("intro"),
                "[Setup](./setup.md#install) and [Ext](https://example.com/x)",
            ),
    );
    let store = Arc::new(MemoryDocStore::new());

    run(&host, &store).await;

    let record = store.get(&metadata_url("intro")).await.unwrap().unwrap();
    assert_eq!(
        record.content,
        "[Setup](/docs/setup.md#install) and [Ext](https://example.com/x)"
    );
    // Everything else comes from the metadata response verbatim.
    assert_eq!(record.sha, "sha-1");
    assert_eq!(record.encoding, "base64");
}

#[tokio::test]
async fn non_array_listing_aborts_with_zero_writes() {
    let host = Arc::new(MockHost::new().on_listing("o/r", "docs", json!({"message": "Not Found"})));
    let store = Arc::new(MemoryDocStore::new());

    let err = Syncer::new(host.clone(), store.clone(), test_config())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Listing(ref msg) if msg.contains("Not Found")));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_metadata_url_is_skipped_without_aborting() {
    let mut broken = doc_descriptor("broken");
    broken["url"] = json!("not a valid url");
    let listing = json!([broken, doc_descriptor("intro")]);

    let host = Arc::new(
        MockHost::new()
            .on_listing("o/r", "docs", listing)
            .on_metadata(&metadata_url("intro"), doc_metadata("intro", "sha-1"))
            .on_content(&content_url("intro"), "# Intro"),
    );
    let store = Arc::new(MemoryDocStore::new());

    let stats = run(&host, &store).await;

    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.stored, 1);
    assert!(stats.failures.is_empty());
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_canonical_urls_collapse_to_one_record() {
    let listing = json!([doc_descriptor("intro"), doc_descriptor("intro")]);
    let host = Arc::new(
        MockHost::new()
            .on_listing("o/r", "docs", listing)
            .on_metadata(&metadata_url("intro"), doc_metadata("intro", "sha-1"))
            .on_content(&content_url("intro"), "# Intro"),
    );
    let store = Arc::new(MemoryDocStore::new());

    let stats = run(&host, &store).await;

    assert_eq!(stats.discovered, 2);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn entry_fetch_failure_is_isolated() {
    // "missing" has a listing descriptor but no registered metadata, so its
    // metadata fetch fails. The other entry must still be stored.
    let listing = json!([doc_descriptor("intro"), doc_descriptor("missing")]);
    let host = Arc::new(
        MockHost::new()
            .on_listing("o/r", "docs", listing)
            .on_metadata(&metadata_url("intro"), doc_metadata("intro", "sha-1"))
            .on_content(&content_url("intro"), "# Intro"),
    );
    let store = Arc::new(MemoryDocStore::new());

    let stats = run(&host, &store).await;

    assert_eq!(stats.stored, 1);
    assert_eq!(stats.failures.len(), 1);
    assert_eq!(stats.failures[0].url, metadata_url("missing"));
    assert!(matches!(stats.failures[0].error, SyncError::Fetch { .. }));
    assert!(store.get(&metadata_url("intro")).await.unwrap().is_some());
}

#[tokio::test]
async fn empty_content_body_is_a_failure() {
    let host = Arc::new(
        MockHost::new()
            .on_listing("o/r", "docs", json!([doc_descriptor("intro")]))
            .on_metadata(&metadata_url("intro"), doc_metadata("intro", "sha-1"))
            .on_content(&content_url("intro"), ""),
    );
    let store = Arc::new(MemoryDocStore::new());

    let stats = run(&host, &store).await;

    assert_eq!(stats.stored, 0);
    assert_eq!(stats.failures.len(), 1);
    assert!(matches!(stats.failures[0].error, SyncError::EmptyContent(_)));
}

#[tokio::test]
async fn invalid_metadata_shape_fails_only_that_entry() {
    let mut bad = doc_metadata("bad", "sha-1");
    bad.as_object_mut().unwrap().remove("size");

    let listing = json!([doc_descriptor("bad"), doc_descriptor("intro")]);
    let host = Arc::new(
        MockHost::new()
            .on_listing("o/r", "docs", listing)
            .on_metadata(&metadata_url("bad"), bad)
            .on_content(&content_url("bad"), "# Bad")
            .on_metadata(&metadata_url("intro"), doc_metadata("intro", "sha-1"))
            .on_content(&content_url("intro"), "# Intro"),
    );
    let store = Arc::new(MemoryDocStore::new());

    let stats = run(&host, &store).await;

    assert_eq!(stats.stored, 1);
    assert_eq!(stats.failures.len(), 1);
    assert!(matches!(stats.failures[0].error, SyncError::Validation(_)));
    assert!(store.get(&metadata_url("bad")).await.unwrap().is_none());
}

#[tokio::test]
async fn reconciliation_removes_records_not_rediscovered() {
    let host = Arc::new(host_with_docs(&["intro"]));
    let store = Arc::new(MemoryDocStore::new());
    store.upsert(doc_record("removed-upstream", "sha-old")).await.unwrap();

    let stats = run(&host, &store).await;

    assert_eq!(stats.removed, 1);
    assert!(store
        .get(&metadata_url("removed-upstream"))
        .await
        .unwrap()
        .is_none());
    assert!(store.get(&metadata_url("intro")).await.unwrap().is_some());
}

#[tokio::test]
async fn failed_entry_keeps_its_previous_record() {
    // Seed a record for "intro", then run a pass where its metadata fetch
    // fails. Reconciliation must not delete the stale-but-discovered key.
    let listing = json!([doc_descriptor("intro")]);
    let host = Arc::new(MockHost::new().on_listing("o/r", "docs", listing));
    let store = Arc::new(MemoryDocStore::new());
    store.upsert(doc_record("intro", "sha-1")).await.unwrap();

    let stats = run(&host, &store).await;

    assert_eq!(stats.failures.len(), 1);
    assert_eq!(stats.removed, 0);
    assert!(store.get(&metadata_url("intro")).await.unwrap().is_some());
}

#[tokio::test]
async fn unchanged_sha_skips_content_download() {
    let host = Arc::new(host_with_docs(&["intro"]));
    let store = Arc::new(MemoryDocStore::new());

    let first = run(&host, &store).await;
    assert_eq!(first.stored, 1);
    assert_eq!(host.content_fetch_count(&content_url("intro")), 1);

    let second = run(&host, &store).await;
    assert_eq!(second.stored, 0);
    assert_eq!(second.unchanged, 1);
    // Same sha — no second download.
    assert_eq!(host.content_fetch_count(&content_url("intro")), 1);
}

#[tokio::test]
async fn changed_sha_refetches_and_overwrites() {
    let host = Arc::new(host_with_docs(&["intro"]));
    let store = Arc::new(MemoryDocStore::new());
    // Previous run stored a record with a different sha.
    store.upsert(doc_record("intro", "stale-sha")).await.unwrap();

    let stats = run(&host, &store).await;

    assert_eq!(stats.stored, 1);
    assert_eq!(host.content_fetch_count(&content_url("intro")), 1);
    let record = store.get(&metadata_url("intro")).await.unwrap().unwrap();
    assert_eq!(record.sha, "sha-intro");
}

#[tokio::test]
async fn readme_and_non_markdown_never_reach_the_fetcher() {
    let mut png = doc_descriptor("diagram");
    png["download_url"] = json!("https://raw.githubusercontent.com/o/r/main/docs/diagram.png");
    let listing = json!([doc_descriptor("README"), png, doc_descriptor("intro")]);

    let host = Arc::new(
        MockHost::new()
            .on_listing("o/r", "docs", listing)
            .on_metadata(&metadata_url("intro"), doc_metadata("intro", "sha-1"))
            .on_content(&content_url("intro"), "# Intro"),
    );
    let store = Arc::new(MemoryDocStore::new());

    let stats = run(&host, &store).await;

    assert_eq!(stats.discovered, 1);
    assert_eq!(stats.stored, 1);
    assert!(stats.failures.is_empty());
}
