//! DocStore implementations.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use docsync_common::DocumentRecord;

use crate::traits::DocStore;

/// In-memory content store keyed by canonical URL. Thread-safe; concurrent
/// upserts serialize on the inner lock.
pub struct MemoryDocStore {
    records: Mutex<HashMap<String, DocumentRecord>>,
}

impl MemoryDocStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryDocStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocStore for MemoryDocStore {
    async fn upsert(&self, record: DocumentRecord) -> Result<()> {
        self.records
            .lock()
            .unwrap()
            .insert(record.url.clone(), record);
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<Option<DocumentRecord>> {
        Ok(self.records.lock().unwrap().get(url).cloned())
    }

    async fn list(&self) -> Result<Vec<DocumentRecord>> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.records.lock().unwrap().keys().cloned().collect())
    }

    async fn remove(&self, url: &str) -> Result<bool> {
        Ok(self.records.lock().unwrap().remove(url).is_some())
    }
}
