use tracing::info;

use crate::backend::file::FileBackend;
use crate::backend::is_remote;
use crate::backend::versioned::{MigrationCollector, VersionedFileBackend};
use crate::codec::Codec;
use crate::errors::StoreError;
use crate::options::DbOptions;

use super::cached::{CachedStore, DocumentCache};

/// Cache layer over a versioned file backend.
///
/// Restricted to local file locations: the envelope-upgrade path rewrites
/// the backing file, which in-memory and remote configurations cannot
/// support. Opening runs the migration protocol before the cache is built,
/// so the cache always starts from data at the target version.
pub struct VersionedCachedStore<C> {
    inner: CachedStore<C>,
}

impl<C: DocumentCache> VersionedCachedStore<C> {
    /// Open the store at the configured file location, migrating the stored
    /// data to `version` if it is behind.
    pub async fn open(
        options: Option<&DbOptions>,
        version: u64,
        migrate: MigrationCollector,
    ) -> Result<Self, StoreError> {
        let location = match options {
            Some(DbOptions::Location(location)) if !is_remote(location) => location,
            Some(DbOptions::Location(location)) => {
                return Err(StoreError::Config(format!(
                    "versioned stores require a local file, got a remote location: {location}"
                )))
            }
            _ => {
                return Err(StoreError::Config(
                    "versioned stores require a file location".to_string(),
                ))
            }
        };
        let codec = Codec::for_location(location)?;
        info!(%location, ?codec, version, "opening a versioned file store");
        let file = FileBackend::new(location.as_str(), codec);
        let backend = VersionedFileBackend::new(file, version, migrate);
        let inner = CachedStore::with_backend(Box::new(backend)).await?;
        Ok(Self { inner })
    }

    pub fn cache(&self) -> &C {
        self.inner.cache()
    }

    /// Mutable access to the cache. Changes are not persisted until
    /// [`dirty`](VersionedCachedStore::dirty) is called.
    pub fn cache_mut(&mut self) -> &mut C {
        self.inner.cache_mut()
    }

    pub fn persistent(&self) -> bool {
        self.inner.persistent()
    }

    /// Commit: serialize the cache and write it back wrapped at the target
    /// version.
    pub async fn dirty(&self) -> Result<(), StoreError> {
        self.inner.dirty().await
    }
}
