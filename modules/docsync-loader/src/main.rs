use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use docsync_common::Config;
use docsync_loader::store::MemoryDocStore;
use docsync_loader::sync::Syncer;
use docsync_loader::traits::DocStore;
use github_client::GithubClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("docsync_loader=info".parse()?)
                .add_directive("github_client=info".parse()?),
        )
        .init();

    info!("Docs sync starting...");

    // Load config
    let config = Config::from_env();
    config.log_redacted();

    let host = Arc::new(GithubClient::new(config.github_token.clone()));
    let store = Arc::new(MemoryDocStore::new());

    let syncer = Syncer::new(host, store.clone(), config.clone());
    let stats = syncer.run().await?;

    if let Some(ref path) = config.output_path {
        let records = store
            .list()
            .await
            .context("Failed to read synced collection")?;
        let json = serde_json::to_string_pretty(&records)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {path}"))?;
        info!(path = path.as_str(), count = records.len(), "Exported collection");
    }

    if !stats.failures.is_empty() {
        anyhow::bail!("{} entries failed to sync", stats.failures.len());
    }

    Ok(())
}
