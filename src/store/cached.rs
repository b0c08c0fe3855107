use crate::backend::{resolve_backend, StorageBackend};
use crate::document::Document;
use crate::errors::StoreError;
use crate::options::DbOptions;

/// Conversion between a cache object and its document form.
///
/// Implementors own the in-process representation that lives between
/// commits: built once from the document read at startup, mutated in place
/// by the application, and serialized back on demand.
pub trait DocumentCache: Send + Sync + Sized {
    /// Build the initial cache from the given document.
    fn from_document(document: Document) -> Result<Self, StoreError>;

    /// Convert the current cache into a storable document.
    fn to_document(&self) -> Result<Document, StoreError>;
}

/// The trivial cache: the document itself.
impl DocumentCache for Document {
    fn from_document(document: Document) -> Result<Self, StoreError> {
        Ok(document)
    }

    fn to_document(&self) -> Result<Document, StoreError> {
        Ok(self.clone())
    }
}

/// Store keeping an in-process cache of type `C` over a backend resolved
/// from configuration.
///
/// The cache is built once at [`open`](CachedStore::open) and written back
/// only on an explicit [`dirty`](CachedStore::dirty) call; the owning
/// application chooses the commit granularity, so a burst of mutations can
/// be committed with one call. Each store exclusively owns its backend and
/// cache; callers serialize operations against the same store.
pub struct CachedStore<C> {
    backend: Box<dyn StorageBackend>,
    cache: C,
}

/// Map-backed store whose cache is the document itself.
pub type SimpleDocumentStore = CachedStore<Document>;

impl<C: DocumentCache> CachedStore<C> {
    /// Resolve a backend from configuration, read the initial document and
    /// build the cache from it.
    pub async fn open(options: Option<&DbOptions>) -> Result<Self, StoreError> {
        Self::with_backend(resolve_backend(options)?).await
    }

    /// Like [`open`](CachedStore::open), for a backend constructed by the
    /// caller.
    pub async fn with_backend(backend: Box<dyn StorageBackend>) -> Result<Self, StoreError> {
        let initial = backend.read().await?;
        let cache = C::from_document(initial)?;
        Ok(Self { backend, cache })
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Mutable access to the cache. Changes are not persisted until
    /// [`dirty`](CachedStore::dirty) is called.
    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    /// Whether commits reach durable storage.
    pub fn persistent(&self) -> bool {
        self.backend.persistent()
    }

    /// Commit: serialize the cache and write it through the backend, if the
    /// backend is persistent; otherwise a no-op.
    pub async fn dirty(&self) -> Result<(), StoreError> {
        if self.backend.persistent() {
            let document = self.cache.to_document()?;
            self.backend.write(&document).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    /// Backend recording how often it is written to.
    struct CountingBackend {
        persistent: bool,
        seed: Document,
        writes: Arc<AtomicUsize>,
        last_write: Arc<Mutex<Option<Document>>>,
    }

    impl CountingBackend {
        fn boxed(
            persistent: bool,
            seed: Document,
        ) -> (Box<dyn StorageBackend>, Arc<AtomicUsize>, Arc<Mutex<Option<Document>>>) {
            let writes = Arc::new(AtomicUsize::new(0));
            let last_write = Arc::new(Mutex::new(None));
            let backend = Box::new(Self {
                persistent,
                seed,
                writes: writes.clone(),
                last_write: last_write.clone(),
            });
            (backend, writes, last_write)
        }
    }

    #[async_trait]
    impl StorageBackend for CountingBackend {
        fn persistent(&self) -> bool {
            self.persistent
        }

        async fn read(&self) -> Result<Document, StoreError> {
            Ok(self.seed.clone())
        }

        async fn write(&self, document: &Document) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            *self.last_write.lock().unwrap() = Some(document.clone());
            Ok(())
        }
    }

    /// Typed cache used to check the serialize/deserialize seam.
    struct Counter {
        value: i64,
        serializations: AtomicUsize,
    }

    impl DocumentCache for Counter {
        fn from_document(document: Document) -> Result<Self, StoreError> {
            let value = document
                .get("value")
                .and_then(|v| v.as_i64())
                .unwrap_or_default();
            Ok(Self {
                value,
                serializations: AtomicUsize::new(0),
            })
        }

        fn to_document(&self) -> Result<Document, StoreError> {
            self.serializations.fetch_add(1, Ordering::SeqCst);
            let mut doc = Document::new();
            doc.insert("value".into(), json!(self.value));
            Ok(doc)
        }
    }

    #[tokio::test]
    async fn commit_writes_once_when_persistent() -> Result<(), anyhow::Error> {
        let mut seed = Document::new();
        seed.insert("value".into(), json!(7));
        let (backend, writes, last_write) = CountingBackend::boxed(true, seed);

        let mut store = CachedStore::<Counter>::with_backend(backend).await?;
        assert_eq!(store.cache().value, 7);

        store.cache_mut().value = 8;
        store.dirty().await?;

        assert_eq!(writes.load(Ordering::SeqCst), 1);
        assert_eq!(store.cache().serializations.load(Ordering::SeqCst), 1);
        let written = last_write.lock().unwrap().clone().expect("written");
        assert_eq!(written["value"], 8);
        Ok(())
    }

    #[tokio::test]
    async fn commit_is_a_no_op_when_not_persistent() -> Result<(), anyhow::Error> {
        let (backend, writes, _) = CountingBackend::boxed(false, Document::new());
        let store = CachedStore::<Counter>::with_backend(backend).await?;
        store.dirty().await?;
        store.dirty().await?;
        assert_eq!(writes.load(Ordering::SeqCst), 0);
        assert_eq!(store.cache().serializations.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn simple_store_round_trips_through_memory() -> Result<(), anyhow::Error> {
        let mut seed = Document::new();
        seed.insert("a".into(), json!(1));
        let options = DbOptions::Seed(seed);

        let mut store = SimpleDocumentStore::open(Some(&options)).await?;
        assert_eq!(store.cache()["a"], 1);

        store.cache_mut().insert("b".into(), json!(2));
        store.dirty().await?;
        assert!(store.persistent());
        Ok(())
    }

    #[tokio::test]
    async fn absent_options_open_an_empty_store() -> Result<(), anyhow::Error> {
        let store = SimpleDocumentStore::open(None).await?;
        assert!(store.cache().is_empty());
        assert!(store.persistent());
        Ok(())
    }

    #[tokio::test]
    async fn unsupported_location_fails_at_open() {
        let options = DbOptions::Location("state.csv".into());
        assert!(matches!(
            SimpleDocumentStore::open(Some(&options)).await,
            Err(StoreError::Config(_))
        ));
    }
}
