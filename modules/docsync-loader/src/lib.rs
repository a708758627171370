//! Remote Markdown loader.
//!
//! One pipeline: discover document entries in a GitHub repository
//! directory, fetch each entry's metadata and raw text, rewrite relative
//! links into site-absolute routes, validate the merged record, and commit
//! it to the content store keyed by the entry's canonical metadata URL.
//!
//! Downstream renderers only consume the store's `get`/`list` surface.

pub mod discovery;
pub mod fetcher;
pub mod rewrite;
pub mod store;
pub mod sync;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use fetcher::EntryOutcome;
pub use rewrite::rewrite_links;
pub use store::MemoryDocStore;
pub use sync::{SyncStats, Syncer};
pub use traits::{DocStore, DocsHost};
