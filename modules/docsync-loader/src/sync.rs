//! Sync orchestrator: one discovery pass, bounded concurrent fan-out over
//! entries, then staleness reconciliation against the discovered key set.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use docsync_common::{Config, SyncError};

use crate::discovery;
use crate::fetcher::{self, EntryOutcome, FetchOptions};
use crate::traits::{DocStore, DocsHost};

/// One entry's failure, surfaced to the caller instead of thrown past the
/// work that already completed.
#[derive(Debug)]
pub struct EntryFailure {
    pub url: String,
    pub error: SyncError,
}

/// Stats from one sync pass.
#[derive(Debug, Default)]
pub struct SyncStats {
    pub discovered: usize,
    pub stored: u32,
    pub unchanged: u32,
    pub skipped: u32,
    pub removed: u32,
    pub failures: Vec<EntryFailure>,
}

impl std::fmt::Display for SyncStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Docs Sync Complete ===")?;
        writeln!(f, "Entries discovered: {}", self.discovered)?;
        writeln!(f, "Records stored:     {}", self.stored)?;
        writeln!(f, "Unchanged:          {}", self.unchanged)?;
        writeln!(f, "Skipped:            {}", self.skipped)?;
        writeln!(f, "Stale removed:      {}", self.removed)?;
        writeln!(f, "Failures:           {}", self.failures.len())?;
        for failure in &self.failures {
            writeln!(f, "  {} — {}", failure.url, failure.error)?;
        }
        Ok(())
    }
}

pub struct Syncer {
    host: Arc<dyn DocsHost>,
    store: Arc<dyn DocStore>,
    config: Config,
}

impl Syncer {
    pub fn new(host: Arc<dyn DocsHost>, store: Arc<dyn DocStore>, config: Config) -> Self {
        Self {
            host,
            store,
            config,
        }
    }

    /// Run one synchronization pass.
    ///
    /// Only a discovery failure aborts; per-entry failures land in
    /// `SyncStats::failures`. Records stored before a later failure remain
    /// stored — there is no transactional rollback across a run.
    pub async fn run(&self) -> Result<SyncStats, SyncError> {
        let refs =
            discovery::discover(self.host.as_ref(), &self.config.repo, &self.config.dir).await?;

        let mut stats = SyncStats {
            discovered: refs.len(),
            ..Default::default()
        };

        let opts = FetchOptions {
            route_prefix: &self.config.route_prefix,
            skip_unchanged: self.config.skip_unchanged,
        };

        // Bounded fan-out: every entry's pipeline runs concurrently, capped
        // so a large directory cannot burst-load the provider.
        let outcomes: Vec<EntryOutcome> = stream::iter(refs.iter().map(|entry| {
            let opts = &opts;
            async move {
                fetcher::process_entry(self.host.as_ref(), self.store.as_ref(), entry, opts).await
            }
        }))
        .buffer_unordered(self.config.max_concurrent.max(1))
        .collect()
        .await;

        for outcome in outcomes {
            match outcome {
                EntryOutcome::Stored(_) => stats.stored += 1,
                EntryOutcome::Unchanged(_) => stats.unchanged += 1,
                EntryOutcome::Skipped => stats.skipped += 1,
                EntryOutcome::Failed { url, error } => {
                    warn!(url = url.as_str(), error = %error, "Entry failed");
                    stats.failures.push(EntryFailure { url, error });
                }
            }
        }

        // Reconciliation: stored keys absent from this run's discovered set
        // belong to documents removed upstream. Failed entries stay in the
        // discovered set, so a transient failure never deletes a record.
        let discovered: HashSet<&str> = refs.iter().map(|r| r.metadata_url.as_str()).collect();
        match self.store.keys().await {
            Ok(keys) => {
                for key in keys {
                    if discovered.contains(key.as_str()) {
                        continue;
                    }
                    match self.store.remove(&key).await {
                        Ok(true) => {
                            info!(url = key.as_str(), "Removed stale record");
                            stats.removed += 1;
                        }
                        Ok(false) => {}
                        Err(e) => {
                            warn!(url = key.as_str(), error = %e, "Failed to remove stale record")
                        }
                    }
                }
            }
            Err(e) => warn!(error = %e, "Could not list store keys, skipping reconciliation"),
        }

        info!("{stats}");
        Ok(stats)
    }
}
