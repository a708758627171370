use thiserror::Error;

/// Failure classes of a sync run.
///
/// `Listing` is fatal — it aborts the run before any entry is fetched.
/// Everything else is scoped to a single entry: the orchestrator records
/// the failure and keeps processing the rest.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Listing error: {0}")]
    Listing(String),

    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Empty content body from {0}")]
    EmptyContent(String),

    #[error("Malformed reference: {0}")]
    MalformedReference(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),
}
