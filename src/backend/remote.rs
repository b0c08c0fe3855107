use async_trait::async_trait;
use tracing::info;

use crate::codec::Codec;
use crate::document::Document;
use crate::errors::StoreError;

use super::StorageBackend;

/// Read-only backend fetching its document from a remote file over HTTP.
///
/// Writes are a no-op and the backend is never persistent, so a cache
/// layer's commit against it does nothing.
pub struct RemoteBackend {
    address: String,
    codec: Codec,
    client: reqwest::Client,
}

impl RemoteBackend {
    pub fn new(address: impl Into<String>, codec: Codec) -> Self {
        Self {
            address: address.into(),
            codec,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl StorageBackend for RemoteBackend {
    fn persistent(&self) -> bool {
        false
    }

    async fn read(&self) -> Result<Document, StoreError> {
        info!(address = %self.address, "downloading database from remote file");
        let response = self
            .client
            .get(&self.address)
            .send()
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let raw = response
            .text()
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        self.codec.parse(&raw)
    }

    async fn write(&self, _document: &Document) -> Result<(), StoreError> {
        Ok(())
    }
}
