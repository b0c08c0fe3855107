//! Async persistence layer for extension state.
//!
//! Each extension of the host application keeps its structured state in a
//! [`Document`] behind a [`StorageBackend`]: an in-memory map, a local
//! JSON/YAML file (optionally schema-versioned with migrations), or a
//! read-only remote file. A [`CachedStore`] resolves its backend from
//! configuration, materializes an in-process cache from the initial read and
//! writes the cache back only on an explicit [`dirty`](CachedStore::dirty)
//! call, so the owner picks the commit granularity.

pub mod backend;
pub mod codec;
pub mod document;
pub mod errors;
pub mod options;
pub mod store;

pub use backend::file::FileBackend;
pub use backend::memory::InMemoryBackend;
pub use backend::remote::RemoteBackend;
pub use backend::versioned::{Migration, MigrationCollector, VersionedFileBackend};
pub use backend::{resolve_backend, StorageBackend};
pub use codec::Codec;
pub use document::Document;
pub use errors::StoreError;
pub use options::{DbOptions, StoreOptions};
pub use store::cached::{CachedStore, DocumentCache, SimpleDocumentStore};
pub use store::versioned::VersionedCachedStore;
