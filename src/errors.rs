use thiserror::Error;

/// Errors surfaced by backends and stores.
///
/// Nothing here is retried internally; everything propagates to the
/// initializing caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unsupported or malformed backend configuration. Raised at
    /// backend-selection time, fatal to initialization.
    #[error("invalid database configuration: {0}")]
    Config(String),

    /// The storage medium was unreachable or its contents failed to decode.
    #[error("storage error: {0}")]
    Storage(String),

    /// The stored version is newer than the version this store understands.
    #[error("cannot migrate data backwards from unrecognized future version {actual} down to expected version {expected}")]
    BackwardsMigration { expected: u64, actual: u64 },

    /// The migration collector or one of its steps failed. The original
    /// failure is preserved as the source.
    #[error("failed to migrate data from version {actual} to expected version {expected}")]
    FailedMigration {
        expected: u64,
        actual: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
