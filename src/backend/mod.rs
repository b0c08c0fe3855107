//! Storage backends: transports moving a whole document in and out of a
//! storage medium, plus the routing that resolves a configuration value into
//! a concrete backend.

pub mod file;
pub mod memory;
pub mod remote;
pub mod versioned;

use async_trait::async_trait;
use tracing::info;

use crate::codec::Codec;
use crate::document::Document;
use crate::errors::StoreError;
use crate::options::DbOptions;

use self::file::FileBackend;
use self::memory::InMemoryBackend;
use self::remote::RemoteBackend;

/// Uniform contract for moving a whole document in and out of a storage
/// medium. One handle per storage location; callers serialize operations
/// against the same handle.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Whether the backend should ever attempt to write and persist data.
    fn persistent(&self) -> bool;

    /// Read and return the entire document, such as by reading a file from
    /// disk or sending a GET request over HTTP.
    async fn read(&self) -> Result<Document, StoreError>;

    /// Write and persist the entire document. A no-op for backends that are
    /// not persistent.
    async fn write(&self, document: &Document) -> Result<(), StoreError>;
}

/// Resolve a configuration value into a concrete backend.
///
/// - `None` → empty in-memory backend
/// - inline mapping → in-memory backend seeded with it
/// - `http://`/`https://` location → read-only remote backend
/// - any other location → local file backend
///
/// Locations must end in `.json`, `.yaml` or `.yml`; anything else is a
/// [`StoreError::Config`].
pub fn resolve_backend(
    options: Option<&DbOptions>,
) -> Result<Box<dyn StorageBackend>, StoreError> {
    match options {
        None => {
            info!("no database configured, creating an empty in-memory backend");
            Ok(Box::new(InMemoryBackend::new(Document::new())))
        }
        Some(DbOptions::Seed(seed)) => {
            info!(keys = seed.len(), "creating an in-memory backend seeded from configuration");
            Ok(Box::new(InMemoryBackend::new(seed.clone())))
        }
        Some(DbOptions::Location(location)) if is_remote(location) => {
            let codec = Codec::for_location(location)?;
            info!(%location, ?codec, "creating a read-only remote backend");
            Ok(Box::new(RemoteBackend::new(location.clone(), codec)))
        }
        Some(DbOptions::Location(location)) => {
            let codec = Codec::for_location(location)?;
            info!(%location, ?codec, "creating a local file backend");
            Ok(Box::new(FileBackend::new(location.as_str(), codec)))
        }
    }
}

pub(crate) fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}
