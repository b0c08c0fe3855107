use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::Document;
use crate::errors::StoreError;

use super::StorageBackend;

/// Backend holding its document purely in process memory.
///
/// Reports itself as persistent so a cache layer's commit still replaces the
/// held document, even though nothing touches durable storage.
pub struct InMemoryBackend {
    data: RwLock<Document>,
}

impl InMemoryBackend {
    pub fn new(data: Document) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    fn persistent(&self) -> bool {
        true
    }

    async fn read(&self) -> Result<Document, StoreError> {
        Ok(self.data.read().await.clone())
    }

    async fn write(&self, document: &Document) -> Result<(), StoreError> {
        *self.data.write().await = document.clone();
        Ok(())
    }
}
